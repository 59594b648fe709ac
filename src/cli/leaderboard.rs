// ============================================================================
// HexRail - 排行榜命令处理
// ============================================================================
//
// 文件: src/cli/leaderboard.rs
// 职责: 读取并展示排行榜
// 边界:
//   - ✅ 排行榜命令参数解析
//   - ❌ 不应包含 CSV 读写细节
//
// ============================================================================

use anyhow::Result;
use clap::Args;

use crate::core::leaderboard::Leaderboard;
use crate::models::config::Config;
use crate::ui::summary::render_leaderboard;
use crate::utils::logger::Logger;
use crate::{t, tf};

/// 排行榜命令参数
#[derive(Debug, Args)]
pub struct LeaderboardArgs {
    /// 显示前 N 条记录
    #[arg(short = 'n', long, default_value_t = 10)]
    pub top: usize,

    /// 显示全部记录
    #[arg(long)]
    pub all: bool,
}

/// 处理排行榜命令
pub fn handle_leaderboard(args: LeaderboardArgs) -> Result<()> {
    let config = Config::snapshot();
    let leaderboard = Leaderboard::new(&config.leaderboard.path);
    let entries = if args.all {
        leaderboard.sorted_by_score()?
    } else {
        leaderboard.top(args.top)?
    };

    if entries.is_empty() {
        Logger::info(tf!("leaderboard.empty", leaderboard.path().display()));
        return Ok(());
    }
    Logger::info(t!("leaderboard.title"));
    render_leaderboard(&entries);
    Ok(())
}
