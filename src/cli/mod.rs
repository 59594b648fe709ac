// ============================================================================
// HexRail - CLI 模块
// ============================================================================
//
// 文件: src/cli/mod.rs
// 职责: CLI 命令行接口模块入口和路由
// 边界:
//   - ✅ CLI 结构定义和命令枚举
//   - ✅ 全局参数到运行时配置的映射
//   - ✅ 命令路由分发
//   - ❌ 不应包含游戏规则
//   - ❌ 不应包含数据模型定义
//
// ============================================================================

pub mod init;
pub mod leaderboard;
pub mod map;
pub mod play;
pub mod tournament;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::models::config::{Config, RuntimeArgs};
use crate::utils::colors::Colors;
use crate::utils::logger::Logger;
use init::{handle_init, InitArgs};
use leaderboard::{handle_leaderboard, LeaderboardArgs};
use map::{handle_map, MapArgs};
use play::{handle_play, PlayArgs};
use tournament::{handle_tournament, TournamentArgs};

/// HexRail - Hex-grid railway building game
#[derive(Debug, Parser)]
#[command(name = "hexrail")]
#[command(about = "Hex-grid railway building game with AI players and tournaments")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Global verbose mode
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Interface language (zh_cn, en_us)
    #[arg(short, long, global = true)]
    pub language: Option<String>,

    /// Random seed for map generation and games
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Maximum number of concurrent games
    #[arg(short = 'j', long, global = true)]
    pub max_concurrency: Option<usize>,

    /// Per-game timeout (seconds, 0 disables)
    #[arg(long, global = true)]
    pub timeout: Option<u32>,

    /// Continue on failure
    #[arg(long, global = true)]
    pub continue_on_failure: bool,

    /// Leaderboard CSV path
    #[arg(long, global = true)]
    pub leaderboard: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Disable progress bar
    #[arg(long, global = true)]
    pub no_progress: bool,

    /// Commands
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Initialize configuration file
    Init(InitArgs),
    /// Generate a map and print it
    Map(MapArgs),
    /// Play a full game
    Play(PlayArgs),
    /// Run many seeded AI games
    Tournament(TournamentArgs),
    /// Show the leaderboard
    Leaderboard(LeaderboardArgs),
}

pub async fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    Logger::init_tracing(cli.verbose);

    // Build runtime args to override config
    let runtime_args = build_runtime_args(&cli);
    // Merge runtime args to global config
    Config::merge_runtime_args(runtime_args)?;
    Colors::set_enabled(Config::get_colored());

    match cli.command {
        Commands::Init(args) => handle_init(args),
        Commands::Map(args) => handle_map(args),
        Commands::Play(args) => handle_play(args),
        Commands::Tournament(args) => handle_tournament(args).await,
        Commands::Leaderboard(args) => handle_leaderboard(args),
    }
}

/// Build runtime args from CLI arguments
fn build_runtime_args(cli: &Cli) -> RuntimeArgs {
    RuntimeArgs {
        verbose: if cli.verbose { Some(true) } else { None },
        colored: if cli.no_color { Some(false) } else { None },
        show_progress: if cli.no_progress { Some(false) } else { None },
        max_concurrency: cli.max_concurrency,
        game_timeout: cli.timeout,
        continue_on_failure: if cli.continue_on_failure { Some(true) } else { None },
        seed: cli.seed,
        language: cli.language.clone(),
        leaderboard_path: cli.leaderboard.clone(),
    }
}

/// 配置中的种子，未设置时随机生成
pub(crate) fn resolve_seed(config: &Config) -> u64 {
    config.map.seed.unwrap_or_else(rand::random)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_flags_become_runtime_overrides() {
        let cli = Cli::parse_from([
            "hexrail",
            "--no-color",
            "--seed",
            "42",
            "-j",
            "3",
            "tournament",
            "--games",
            "5",
        ]);
        let args = build_runtime_args(&cli);
        assert_eq!(args.colored, Some(false));
        assert_eq!(args.seed, Some(42));
        assert_eq!(args.max_concurrency, Some(3));
        assert_eq!(args.verbose, None);
        assert!(matches!(cli.command, Commands::Tournament(ref t) if t.games == 5));
    }

    #[test]
    fn configured_seed_is_used() {
        let mut config = Config::default();
        config.map.seed = Some(9);
        assert_eq!(resolve_seed(&config), 9);
    }
}
