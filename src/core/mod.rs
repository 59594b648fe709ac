// ============================================================================
// HexRail - Core 核心模块
// ============================================================================
//
// 文件: src/core/mod.rs
// 职责: 游戏引擎模块入口和导出
// 边界:
//   - ✅ 核心子模块导出
//   - ✅ 常用类型重新导出
//   - ❌ 不应包含具体业务实现
//   - ❌ 不应包含 CLI 相关逻辑
//   - ❌ 不应包含 UI 相关逻辑
//
// ============================================================================

pub mod actions;
pub mod agent;
pub mod game;
pub mod grid;
pub mod leaderboard;
pub mod mapgen;
pub mod names;
pub mod player_controller;
pub mod scheduler;
pub mod state;
pub mod tournament;

// 重新导出常用类型
pub use actions::{PlayerAction, PlayerObjective};
pub use agent::{create_agent, AgentView, BasicAi, PlayerAgent, ScriptedAgent};
pub use game::{GameController, GameLimits, GameSummary, PlayerStanding};
pub use grid::{GridSnapshot, HexGrid};
pub use leaderboard::{Leaderboard, LeaderboardEntry};
pub use mapgen::MapGenerator;
pub use names::NameGenerator;
pub use player_controller::{PlayerController, PlayerState};
pub use scheduler::{GameJob, GameScheduler, RunResult, SchedulerConfig};
pub use state::{GamePhase, GameState};
pub use tournament::{run_tournament, TournamentOptions, TournamentReport};
