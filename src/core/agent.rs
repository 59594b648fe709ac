// ============================================================================
// HexRail - 玩家代理
// ============================================================================
//
// 文件: src/core/agent.rs
// 职责: 根据当前目标为玩家产生动作
// 边界:
//   - ✅ 代理接口定义
//   - ✅ 基础 AI
//   - ✅ 脚本代理（测试与回放）
//   - ❌ 不应包含终端交互（由 CLI 实现）
//   - ❌ 不应直接修改游戏状态
//
// ============================================================================

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::{BTreeSet, VecDeque};

use crate::core::actions::{PlayerAction, PlayerObjective};
use crate::core::player_controller::PlayerState;
use crate::core::state::GameState;
use crate::models::player::{AiKind, PlayerId};

/// 代理在决策时能看到的信息
pub struct AgentView<'a> {
    pub state: &'a GameState,
    pub player: PlayerId,
    pub player_state: &'a PlayerState,
}

impl AgentView<'_> {
    pub fn objective(&self) -> PlayerObjective {
        self.player_state.objective
    }
}

/// 玩家代理
///
/// 返回 `None` 表示无法给出动作，游戏将以错误结束。
pub trait PlayerAgent: Send {
    fn next_action(&mut self, view: &AgentView<'_>) -> Option<PlayerAction>;
}

/// 按类型创建 AI 代理
pub fn create_agent(kind: AiKind, seed: u64) -> Box<dyn PlayerAgent> {
    match kind {
        AiKind::Basic => Box::new(BasicAi::new(seed)),
    }
}

/// 基础 AI：随机建造，总是接受路径，随机驾驶
#[derive(Debug)]
pub struct BasicAi {
    rng: StdRng,
}

impl BasicAi {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl PlayerAgent for BasicAi {
    fn next_action(&mut self, view: &AgentView<'_>) -> Option<PlayerAction> {
        let player_state = view.player_state;
        match view.objective() {
            PlayerObjective::RollDice => Some(PlayerAction::RollDice),
            PlayerObjective::PlaceRail => {
                let buildable: Vec<_> = player_state.buildable_rails.iter().copied().collect();
                if buildable.is_empty() {
                    Some(PlayerAction::ConfirmBuild)
                } else {
                    let edge = buildable[self.rng.gen_range(0..buildable.len())];
                    Some(PlayerAction::BuildRails(vec![edge]))
                }
            }
            PlayerObjective::ChooseCities => Some(PlayerAction::ChooseCities),
            PlayerObjective::ChoosePath => Some(PlayerAction::ChooseRails(BTreeSet::new())),
            PlayerObjective::ConfirmPath => Some(PlayerAction::ConfirmDrive(true)),
            PlayerObjective::Drive => {
                let tiles: Vec<_> = player_state.drivable_tiles.keys().copied().collect();
                if tiles.is_empty() {
                    return None;
                }
                let target = view.state.current_cities().map(|(_, target)| target);
                match target.filter(|t| player_state.drivable_tiles.contains_key(t)) {
                    Some(target) => Some(PlayerAction::Drive(target)),
                    None => Some(PlayerAction::Drive(tiles[self.rng.gen_range(0..tiles.len())])),
                }
            }
            PlayerObjective::Idle => None,
        }
    }
}

/// 按顺序给出预先写好的动作
#[derive(Debug, Default)]
pub struct ScriptedAgent {
    actions: VecDeque<PlayerAction>,
}

impl ScriptedAgent {
    pub fn new(actions: impl IntoIterator<Item = PlayerAction>) -> Self {
        Self {
            actions: actions.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.actions.len()
    }
}

impl PlayerAgent for ScriptedAgent {
    fn next_action(&mut self, _view: &AgentView<'_>) -> Option<PlayerAction> {
        self.actions.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::grid::tests::{key, small_grid};
    use crate::models::position::TilePosition;

    fn view_with<'a>(state: &'a GameState, player_state: &'a PlayerState) -> AgentView<'a> {
        AgentView {
            state,
            player: PlayerId(1),
            player_state,
        }
    }

    #[test]
    fn basic_ai_builds_until_nothing_is_buildable() {
        let state = GameState::new(small_grid(), Vec::new());
        let mut ai = BasicAi::new(1);

        let mut player_state = PlayerState {
            objective: PlayerObjective::PlaceRail,
            ..PlayerState::default()
        };
        player_state.buildable_rails.insert(key((-2, 0), (-1, 0)));
        assert_eq!(
            ai.next_action(&view_with(&state, &player_state)),
            Some(PlayerAction::BuildRails(vec![key((-2, 0), (-1, 0))]))
        );

        player_state.buildable_rails.clear();
        assert_eq!(
            ai.next_action(&view_with(&state, &player_state)),
            Some(PlayerAction::ConfirmBuild)
        );
    }

    #[test]
    fn basic_ai_prefers_target_city() {
        let mut state = GameState::new(small_grid(), Vec::new());
        let target = TilePosition::new(0, 2);
        state.set_current_cities(Some((TilePosition::new(-2, 0), target)));
        let mut ai = BasicAi::new(1);

        let mut player_state = PlayerState {
            objective: PlayerObjective::Drive,
            ..PlayerState::default()
        };
        player_state.drivable_tiles.insert(TilePosition::new(-1, 0), vec![]);
        player_state.drivable_tiles.insert(target, vec![]);
        assert_eq!(
            ai.next_action(&view_with(&state, &player_state)),
            Some(PlayerAction::Drive(target))
        );
    }

    #[test]
    fn basic_ai_answers_every_objective_but_idle() {
        let state = GameState::new(small_grid(), Vec::new());
        let mut ai = BasicAi::new(1);
        let expected = [
            (PlayerObjective::RollDice, Some(PlayerAction::RollDice)),
            (PlayerObjective::ChooseCities, Some(PlayerAction::ChooseCities)),
            (
                PlayerObjective::ChoosePath,
                Some(PlayerAction::ChooseRails(BTreeSet::new())),
            ),
            (PlayerObjective::ConfirmPath, Some(PlayerAction::ConfirmDrive(true))),
            (PlayerObjective::Idle, None),
        ];
        for (objective, action) in expected {
            let player_state = PlayerState {
                objective,
                ..PlayerState::default()
            };
            assert_eq!(ai.next_action(&view_with(&state, &player_state)), action);
        }
    }

    #[test]
    fn scripted_agent_drains_queue() {
        let state = GameState::new(small_grid(), Vec::new());
        let player_state = PlayerState::default();
        let mut agent = ScriptedAgent::new([PlayerAction::RollDice, PlayerAction::ConfirmBuild]);
        assert_eq!(agent.next_action(&view_with(&state, &player_state)), Some(PlayerAction::RollDice));
        assert_eq!(agent.remaining(), 1);
        assert_eq!(
            agent.next_action(&view_with(&state, &player_state)),
            Some(PlayerAction::ConfirmBuild)
        );
        assert_eq!(agent.next_action(&view_with(&state, &player_state)), None);
    }
}
