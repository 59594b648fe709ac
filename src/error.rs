// ============================================================================
// HexRail - 错误类型
// ============================================================================
//
// 文件: src/error.rs
// 职责: 游戏引擎的错误类型定义
// 边界:
//   - ✅ 引擎错误枚举
//   - ✅ 结果类型别名
//   - ❌ 不应包含错误展示逻辑（由 CLI 负责）
//
// ============================================================================

use thiserror::Error;

use crate::models::player::PlayerId;
use crate::models::position::TilePosition;

/// 游戏引擎错误
#[derive(Debug, Error)]
pub enum GameError {
    /// 当前状态下不允许的动作
    #[error("illegal action: {0}")]
    IllegalAction(String),

    #[error("not enough players: {found} joined, at least {min} required")]
    NotEnoughPlayers { found: usize, min: usize },

    #[error("too many players: at most {max} allowed")]
    TooManyPlayers { max: usize },

    #[error("game was stopped")]
    Stopped,

    /// 玩家的控制器没有给出动作
    #[error("player {0} produced no action")]
    NoAction(PlayerId),

    #[error("player {0} exceeded the illegal action limit of {1}")]
    TooManyIllegalActions(PlayerId, u32),

    #[error("{phase} phase exceeded {limit} rounds")]
    RoundLimit { phase: String, limit: u32 },

    #[error("unknown player {0}")]
    UnknownPlayer(PlayerId),

    #[error("no tile at {0}")]
    UnknownPosition(TilePosition),

    #[error("no edge between {0} and {1}")]
    UnknownEdge(TilePosition, TilePosition),

    #[error("map generation failed: {0}")]
    MapGeneration(String),

    /// 清理后为空的排行榜名称
    #[error("invalid leaderboard name: {0:?}")]
    InvalidName(String),

    #[error("malformed record: {0}")]
    Parse(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl GameError {
    pub fn illegal(message: impl Into<String>) -> Self {
        GameError::IllegalAction(message.into())
    }

    /// 可以通过重新请求动作恢复的错误
    pub fn is_recoverable(&self) -> bool {
        matches!(self, GameError::IllegalAction(_))
    }
}

pub type GameResult<T> = std::result::Result<T, GameError>;
