// ============================================================================
// HexRail - 锦标赛命令处理
// ============================================================================
//
// 文件: src/cli/tournament.rs
// 职责: 并发运行多局 AI 对局并展示统计
// 边界:
//   - ✅ 锦标赛参数解析与校验
//   - ✅ 进度条与结果展示
//   - ❌ 不应包含调度实现
//
// ============================================================================

use anyhow::Result;
use clap::Args;
use std::sync::Arc;
use std::time::Instant;

use crate::cli::resolve_seed;
use crate::core::names::NameGenerator;
use crate::core::tournament::{run_tournament, TournamentOptions};
use crate::models::config::Config;
use crate::models::player::AiKind;
use crate::ui::progress::GameProgress;
use crate::ui::summary::render_tournament_report;
use crate::utils::logger::Logger;
use crate::tf;

/// 锦标赛命令参数
#[derive(Debug, Args)]
pub struct TournamentArgs {
    /// 对局数
    #[arg(short = 'n', long, default_value_t = 10)]
    pub games: usize,

    /// 每局 AI 玩家数
    #[arg(short, long, default_value_t = 2)]
    pub players: usize,

    /// AI 类型
    #[arg(long, default_value = "basic")]
    pub ai: String,

    /// 以 JSON 输出统计
    #[arg(long)]
    pub json: bool,
}

/// 处理锦标赛命令
pub async fn handle_tournament(args: TournamentArgs) -> Result<()> {
    let config = Config::snapshot();
    let rules = &config.rules;
    if args.players < rules.min_players || args.players > rules.max_players {
        anyhow::bail!(tf!(
            "tournament.invalid_players",
            args.players,
            rules.min_players,
            rules.max_players
        ));
    }
    let ai = AiKind::from_str(&args.ai).map_err(anyhow::Error::msg)?;

    let options = TournamentOptions {
        games: args.games,
        players: args.players,
        ai,
        seed: resolve_seed(&config),
    };
    let names = Arc::new(NameGenerator::from_settings(&config.map)?);

    if !args.json {
        Logger::info(tf!(
            "tournament.start",
            options.games,
            options.players,
            options.seed,
            config.execution.max_concurrency
        ));
    }
    let progress = (config.output.show_progress && !args.json)
        .then(|| GameProgress::new(options.games));
    let start = Instant::now();
    let report = run_tournament(
        &config,
        &options,
        names,
        progress.as_ref().map(GameProgress::callback),
    )
    .await;
    if let Some(progress) = progress {
        progress.finish();
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        render_tournament_report(&report, start.elapsed());
    }

    if !report.failed.is_empty() && !config.execution.continue_on_failure {
        anyhow::bail!(tf!("tournament.failed_games", report.failed.len()));
    }
    Ok(())
}
