// ============================================================================
// HexRail - 终端界面模块
// ============================================================================
//
// 文件: src/ui/mod.rs
// 职责: 终端输出组件
// 边界:
//   - ✅ 结果汇总、地图绘制与进度条
//   - ❌ 不应包含游戏规则
//
// ============================================================================

pub mod progress;
pub mod summary;
