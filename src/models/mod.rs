// ============================================================================
// HexRail - 数据模型模块
// ============================================================================
//
// 文件: src/models/mod.rs
// 职责: 数据模型模块入口
// 边界:
//   - ✅ 坐标、棋盘、玩家、配置、开局准备
//   - ❌ 不应包含游戏流程逻辑
//
// ============================================================================

pub mod board;
pub mod config;
pub mod player;
pub mod position;
pub mod setup;
