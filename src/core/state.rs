// ============================================================================
// HexRail - 游戏状态
// ============================================================================
//
// 文件: src/core/state.rs
// 职责: 一局游戏的全部可变状态
// 边界:
//   - ✅ 地图、玩家、阶段
//   - ✅ 驾驶阶段的位置、盈余、已选城市
//   - ✅ 当前骰子点数、回合数、本轮城市对
//   - ❌ 不应包含动作合法性判断（由玩家控制器负责）
//   - ❌ 不应包含回合调度（由游戏控制器负责）
//
// ============================================================================

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::core::grid::HexGrid;
use crate::error::{GameError, GameResult};
use crate::models::config::Rules;
use crate::models::player::{AiKind, Player, PlayerBuilder, PlayerId};
use crate::models::position::TilePosition;

/// 游戏阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GamePhase {
    Building,
    Driving,
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GamePhase::Building => write!(f, "building"),
            GamePhase::Driving => write!(f, "driving"),
        }
    }
}

/// 一局游戏的状态
#[derive(Debug, Clone)]
pub struct GameState {
    grid: HexGrid,
    players: Vec<Player>,
    phase: GamePhase,
    driving_players: Vec<PlayerId>,
    player_positions: BTreeMap<PlayerId, TilePosition>,
    point_surplus: BTreeMap<PlayerId, i32>,
    chosen_cities: BTreeSet<TilePosition>,
    winner: Option<PlayerId>,
    dice_roll: u32,
    round: u32,
    /// 本轮的（起点, 终点）城市
    current_cities: Option<(TilePosition, TilePosition)>,
}

impl GameState {
    pub fn new(grid: HexGrid, players: Vec<Player>) -> Self {
        Self {
            grid,
            players,
            phase: GamePhase::Building,
            driving_players: Vec::new(),
            player_positions: BTreeMap::new(),
            point_surplus: BTreeMap::new(),
            chosen_cities: BTreeSet::new(),
            winner: None,
            dice_roll: 0,
            round: 0,
            current_cities: None,
        }
    }

    pub fn grid(&self) -> &HexGrid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut HexGrid {
        &mut self.grid
    }

    pub fn rules(&self) -> &Rules {
        self.grid.rules()
    }

    // ------------------------------------------------------------------------
    // 玩家
    // ------------------------------------------------------------------------

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id() == id)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id() == id)
    }

    pub fn credits(&self, id: PlayerId) -> u32 {
        self.player(id).map(Player::credits).unwrap_or(0)
    }

    /// 添加玩家，总数超过上限时不做修改并返回错误
    pub fn add_players(&mut self, players: Vec<Player>) -> GameResult<()> {
        let max = self.rules().max_players;
        if self.players.len() + players.len() > max {
            return Err(GameError::TooManyPlayers { max });
        }
        self.players.extend(players);
        Ok(())
    }

    /// 以下一个序号创建并加入新玩家
    pub fn new_player<R: Rng + ?Sized>(
        &mut self,
        name: Option<String>,
        color: Option<String>,
        ai: Option<AiKind>,
        rng: &mut R,
    ) -> GameResult<PlayerId> {
        let id = (self.players.len() + 1) as u8;
        let player = PlayerBuilder::new(id)
            .name(name)
            .color(color)
            .ai(ai)
            .build(self.rules().starting_credits, rng);
        self.add_players(vec![player])?;
        Ok(PlayerId(id))
    }

    // ------------------------------------------------------------------------
    // 阶段与回合
    // ------------------------------------------------------------------------

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn set_phase(&mut self, phase: GamePhase) {
        self.phase = phase;
    }

    pub fn dice_roll(&self) -> u32 {
        self.dice_roll
    }

    pub fn set_dice_roll(&mut self, roll: u32) {
        self.dice_roll = roll;
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn set_round(&mut self, round: u32) {
        self.round = round;
    }

    pub fn current_cities(&self) -> Option<(TilePosition, TilePosition)> {
        self.current_cities
    }

    pub fn set_current_cities(&mut self, cities: Option<(TilePosition, TilePosition)>) {
        self.current_cities = cities;
    }

    // ------------------------------------------------------------------------
    // 驾驶阶段
    // ------------------------------------------------------------------------

    pub fn player_positions(&self) -> &BTreeMap<PlayerId, TilePosition> {
        &self.player_positions
    }

    pub fn player_position(&self, id: PlayerId) -> Option<TilePosition> {
        self.player_positions.get(&id).copied()
    }

    pub fn set_player_position(&mut self, id: PlayerId, position: TilePosition) {
        self.player_positions.insert(id, position);
    }

    pub fn reset_player_positions(&mut self) {
        self.player_positions.clear();
    }

    pub fn point_surplus(&self) -> &BTreeMap<PlayerId, i32> {
        &self.point_surplus
    }

    pub fn add_player_point_surplus(&mut self, id: PlayerId, surplus: i32) {
        *self.point_surplus.entry(id).or_insert(0) += surplus;
    }

    pub fn reset_player_surplus(&mut self) {
        self.point_surplus.clear();
    }

    pub fn driving_players(&self) -> &[PlayerId] {
        &self.driving_players
    }

    pub fn is_driving(&self, id: PlayerId) -> bool {
        self.driving_players.contains(&id)
    }

    pub fn add_driving_player(&mut self, id: PlayerId) {
        if !self.driving_players.contains(&id) {
            self.driving_players.push(id);
        }
    }

    pub fn reset_driving_players(&mut self) {
        self.driving_players.clear();
    }

    pub fn chosen_cities(&self) -> &BTreeSet<TilePosition> {
        &self.chosen_cities
    }

    pub fn add_chosen_city(&mut self, position: TilePosition) {
        self.chosen_cities.insert(position);
    }

    // ------------------------------------------------------------------------
    // 结果
    // ------------------------------------------------------------------------

    pub fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    pub fn set_winner(&mut self, id: PlayerId) {
        self.winner = Some(id);
    }

    pub fn is_game_over(&self) -> bool {
        self.winner.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::grid::tests::small_grid;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn new_player_assigns_next_id_and_enforces_limit() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut state = GameState::new(small_grid(), Vec::new());
        for i in 1..=6 {
            let id = state.new_player(None, None, None, &mut rng).unwrap();
            assert_eq!(id, PlayerId(i));
        }
        assert!(matches!(
            state.new_player(None, None, None, &mut rng),
            Err(GameError::TooManyPlayers { max: 6 })
        ));
        assert_eq!(state.players().len(), 6);
        assert_eq!(state.credits(PlayerId(1)), 20);
    }

    #[test]
    fn surplus_accumulates_and_resets() {
        let mut state = GameState::new(small_grid(), Vec::new());
        state.add_player_point_surplus(PlayerId(1), 3);
        state.add_player_point_surplus(PlayerId(1), -5);
        assert_eq!(state.point_surplus().get(&PlayerId(1)), Some(&-2));
        state.reset_player_surplus();
        assert!(state.point_surplus().is_empty());
    }

    #[test]
    fn driving_players_are_unique() {
        let mut state = GameState::new(small_grid(), Vec::new());
        state.add_driving_player(PlayerId(2));
        state.add_driving_player(PlayerId(2));
        assert_eq!(state.driving_players(), [PlayerId(2)]);
        assert!(state.is_driving(PlayerId(2)));
        state.reset_driving_players();
        assert!(!state.is_driving(PlayerId(2)));
    }

    #[test]
    fn winner_ends_game() {
        let mut state = GameState::new(small_grid(), Vec::new());
        assert!(!state.is_game_over());
        assert_eq!(state.phase(), GamePhase::Building);
        state.set_winner(PlayerId(1));
        assert!(state.is_game_over());
    }
}
