// ============================================================================
// HexRail - 库入口
// ============================================================================
//
// 文件: src/lib.rs
// 职责: 六边形铁路游戏引擎与命令行工具
//
// ============================================================================

pub mod cli;
pub mod core;
pub mod error;
pub mod i18n;
pub mod models;
pub mod ui;
pub mod utils;

pub use error::{GameError, GameResult};
