// ============================================================================
// HexRail - 地图命令处理
// ============================================================================
//
// 文件: src/cli/map.rs
// 职责: 生成地图并输出摘要、字符画或 JSON
// 边界:
//   - ✅ 地图命令参数解析
//   - ✅ 种子解析与名称训练数据加载
//   - ❌ 不应包含地图生成算法
//
// ============================================================================

use anyhow::{Context, Result};
use clap::Args;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::cli::resolve_seed;
use crate::core::mapgen::MapGenerator;
use crate::core::names::NameGenerator;
use crate::models::config::Config;
use crate::ui::summary::{render_map, render_map_summary};
use crate::utils::logger::Logger;
use crate::{t, tf};

/// 地图命令参数
#[derive(Debug, Args)]
pub struct MapArgs {
    /// 以 JSON 输出地图快照
    #[arg(long)]
    pub json: bool,

    /// 只输出摘要，不绘制地图
    #[arg(long)]
    pub summary_only: bool,
}

/// 处理地图命令
pub fn handle_map(args: MapArgs) -> Result<()> {
    let config = Config::snapshot();
    let seed = resolve_seed(&config);
    let names = NameGenerator::from_settings(&config.map)?;

    let mut rng = StdRng::seed_from_u64(seed);
    let grid = MapGenerator::new(&config.map, &config.rules)
        .generate(&names, &mut rng)
        .with_context(|| t!("map.generation_failed"))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&grid.snapshot())?);
        return Ok(());
    }

    Logger::info(tf!("map.generated", seed));
    render_map_summary(&grid);
    if !args.summary_only {
        render_map(&grid);
    }
    Ok(())
}
