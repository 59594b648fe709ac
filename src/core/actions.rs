// ============================================================================
// HexRail - 玩家动作与目标
// ============================================================================
//
// 文件: src/core/actions.rs
// 职责: 玩家可执行的动作，以及每个目标允许的动作
// 边界:
//   - ✅ 动作定义
//   - ✅ 目标与允许动作的对应关系
//   - ❌ 不应包含动作执行逻辑（由游戏控制器分发）
//
// ============================================================================

use std::collections::BTreeSet;
use std::fmt;

use crate::models::board::EdgeKey;
use crate::models::position::TilePosition;

/// 玩家动作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerAction {
    /// 按顺序建造铁轨，遇到第一条失败即停止
    BuildRails(Vec<EdgeKey>),
    /// 结束建造
    ConfirmBuild,
    RollDice,
    /// 随机选择本轮的起点与终点城市
    ChooseCities,
    /// 选择要租用的他人铁轨
    ChooseRails(BTreeSet<EdgeKey>),
    /// 接受或拒绝当前路径
    ConfirmDrive(bool),
    /// 驾驶到指定地块
    Drive(TilePosition),
}

/// 动作类型（不含参数）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    BuildRails,
    ConfirmBuild,
    RollDice,
    ChooseCities,
    ChooseRails,
    ConfirmDrive,
    Drive,
}

impl PlayerAction {
    pub fn kind(&self) -> ActionKind {
        match self {
            PlayerAction::BuildRails(_) => ActionKind::BuildRails,
            PlayerAction::ConfirmBuild => ActionKind::ConfirmBuild,
            PlayerAction::RollDice => ActionKind::RollDice,
            PlayerAction::ChooseCities => ActionKind::ChooseCities,
            PlayerAction::ChooseRails(_) => ActionKind::ChooseRails,
            PlayerAction::ConfirmDrive(_) => ActionKind::ConfirmDrive,
            PlayerAction::Drive(_) => ActionKind::Drive,
        }
    }
}

impl fmt::Display for PlayerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerAction::BuildRails(edges) => {
                write!(f, "build [")?;
                for (i, edge) in edges.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", edge)?;
                }
                write!(f, "]")
            }
            PlayerAction::ConfirmBuild => write!(f, "confirm build"),
            PlayerAction::RollDice => write!(f, "roll dice"),
            PlayerAction::ChooseCities => write!(f, "choose cities"),
            PlayerAction::ChooseRails(edges) => write!(f, "rent {} rails", edges.len()),
            PlayerAction::ConfirmDrive(accept) => {
                write!(f, "{} path", if *accept { "accept" } else { "reject" })
            }
            PlayerAction::Drive(position) => write!(f, "drive to {}", position),
        }
    }
}

/// 玩家当前需要完成的目标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PlayerObjective {
    PlaceRail,
    RollDice,
    ChooseCities,
    Drive,
    ChoosePath,
    ConfirmPath,
    #[default]
    Idle,
}

impl PlayerObjective {
    pub fn allowed_actions(&self) -> &'static [ActionKind] {
        match self {
            PlayerObjective::PlaceRail => &[ActionKind::BuildRails, ActionKind::ConfirmBuild],
            PlayerObjective::RollDice => &[ActionKind::RollDice],
            PlayerObjective::ChooseCities => &[ActionKind::ChooseCities],
            PlayerObjective::Drive => &[ActionKind::Drive],
            PlayerObjective::ChoosePath => &[ActionKind::ChooseRails],
            PlayerObjective::ConfirmPath => &[ActionKind::ConfirmDrive],
            PlayerObjective::Idle => &[],
        }
    }

    pub fn allows(&self, action: &PlayerAction) -> bool {
        self.allowed_actions().contains(&action.kind())
    }
}

impl fmt::Display for PlayerObjective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlayerObjective::PlaceRail => "place rail",
            PlayerObjective::RollDice => "roll dice",
            PlayerObjective::ChooseCities => "choose cities",
            PlayerObjective::Drive => "drive",
            PlayerObjective::ChoosePath => "choose path",
            PlayerObjective::ConfirmPath => "confirm path",
            PlayerObjective::Idle => "idle",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn objectives_allow_their_actions() {
        assert!(PlayerObjective::PlaceRail.allows(&PlayerAction::ConfirmBuild));
        assert!(PlayerObjective::PlaceRail.allows(&PlayerAction::BuildRails(vec![])));
        assert!(!PlayerObjective::PlaceRail.allows(&PlayerAction::RollDice));
        assert!(PlayerObjective::ConfirmPath.allows(&PlayerAction::ConfirmDrive(false)));
        assert!(PlayerObjective::Drive.allows(&PlayerAction::Drive(TilePosition::ORIGIN)));
    }

    #[test]
    fn idle_allows_nothing() {
        let actions = [
            PlayerAction::RollDice,
            PlayerAction::ChooseCities,
            PlayerAction::ChooseRails(BTreeSet::new()),
        ];
        assert!(actions.iter().all(|a| !PlayerObjective::Idle.allows(a)));
        assert_eq!(PlayerObjective::default(), PlayerObjective::Idle);
    }
}
