// ============================================================================
// HexRail - 程序入口
// ============================================================================
//
// 文件: src/main.rs
// 职责: 初始化配置与日志，启动 CLI
//
// ============================================================================

use hexrail::cli::run_cli;
use hexrail::models::config::Config;
use hexrail::utils::logger::Logger;

#[tokio::main]
async fn main() {
    if let Err(e) = Config::initialize() {
        Logger::error(format!("{:#}", e));
        std::process::exit(1);
    }

    if let Err(e) = run_cli().await {
        Logger::error(format!("{:#}", e));
        std::process::exit(1);
    }
}
