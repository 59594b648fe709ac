// ============================================================================
// HexRail - 玩家控制器
// ============================================================================
//
// 文件: src/core/player_controller.rs
// 职责: 单个玩家的回合状态与动作执行
// 边界:
//   - ✅ 建造铁轨的合法性与费用结算
//   - ✅ 选择租用铁轨与路径确认
//   - ✅ 驾驶阶段的可达地块计算与移动
//   - ✅ 动作队列与控制代理
//   - ✅ 玩家状态快照
//   - ❌ 不应包含回合调度（由游戏控制器负责）
//   - ❌ 不应包含掷骰与选城（需要游戏级随机源）
//
// ============================================================================

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use tracing::debug;

use crate::core::actions::{PlayerAction, PlayerObjective};
use crate::core::agent::{AgentView, PlayerAgent};
use crate::core::state::{GamePhase, GameState};
use crate::error::{GameError, GameResult};
use crate::models::board::EdgeKey;
use crate::models::player::PlayerId;
use crate::models::position::TilePosition;

/// 可驾驶到的地块 -> 经过的地块（含起点与终点）
pub type DrivableTiles = BTreeMap<TilePosition, Vec<TilePosition>>;

/// 玩家状态快照，供代理和界面读取
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerState {
    pub buildable_rails: BTreeSet<EdgeKey>,
    pub objective: PlayerObjective,
    pub choosable_edges: BTreeSet<EdgeKey>,
    pub rented_edges: BTreeSet<EdgeKey>,
    pub has_path: bool,
    pub drivable_tiles: DrivableTiles,
    pub building_budget: u32,
}

/// 单个玩家的控制器
pub struct PlayerController {
    player: PlayerId,
    objective: PlayerObjective,
    building_budget: u32,
    rented_edges: BTreeSet<EdgeKey>,
    has_path: bool,
    has_confirmed_path: bool,
    actions: VecDeque<PlayerAction>,
    agent: Option<Box<dyn PlayerAgent>>,
    player_state: PlayerState,
}

impl std::fmt::Debug for PlayerController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayerController")
            .field("player", &self.player)
            .field("objective", &self.objective)
            .field("building_budget", &self.building_budget)
            .field("rented_edges", &self.rented_edges)
            .field("has_path", &self.has_path)
            .field("has_confirmed_path", &self.has_confirmed_path)
            .field("queued_actions", &self.actions.len())
            .field("has_agent", &self.agent.is_some())
            .finish()
    }
}

impl PlayerController {
    pub fn new(player: PlayerId) -> Self {
        Self {
            player,
            objective: PlayerObjective::Idle,
            building_budget: 0,
            rented_edges: BTreeSet::new(),
            has_path: false,
            has_confirmed_path: false,
            actions: VecDeque::new(),
            agent: None,
            player_state: PlayerState::default(),
        }
    }

    pub fn player(&self) -> PlayerId {
        self.player
    }

    pub fn set_agent(&mut self, agent: Box<dyn PlayerAgent>) {
        self.agent = Some(agent);
    }

    pub fn has_agent(&self) -> bool {
        self.agent.is_some()
    }

    // ------------------------------------------------------------------------
    // 目标与状态
    // ------------------------------------------------------------------------

    pub fn objective(&self) -> PlayerObjective {
        self.objective
    }

    /// 设置目标，变为空闲时刷新快照
    pub fn set_objective(&mut self, objective: PlayerObjective, state: &GameState) {
        self.objective = objective;
        if objective == PlayerObjective::Idle {
            self.update_player_state(state);
        }
    }

    pub fn player_state(&self) -> &PlayerState {
        &self.player_state
    }

    pub fn update_player_state(&mut self, state: &GameState) {
        self.player_state = PlayerState {
            buildable_rails: self.buildable_rails(state),
            objective: self.objective,
            choosable_edges: self.choosable_edges(state),
            rented_edges: self.rented_edges.clone(),
            has_path: self.has_path,
            drivable_tiles: self.drivable_tiles(state),
            building_budget: self.building_budget,
        };
    }

    pub fn building_budget(&self) -> u32 {
        self.building_budget
    }

    pub fn set_building_budget(&mut self, amount: u32) {
        self.building_budget = amount;
    }

    pub fn has_path(&self) -> bool {
        self.has_path
    }

    pub fn has_confirmed_path(&self) -> bool {
        self.has_confirmed_path
    }

    pub fn rented_edges(&self) -> &BTreeSet<EdgeKey> {
        &self.rented_edges
    }

    pub fn reset_driving_phase(&mut self) {
        self.has_confirmed_path = false;
        self.has_path = false;
        self.rented_edges.clear();
    }

    // ------------------------------------------------------------------------
    // 动作来源
    // ------------------------------------------------------------------------

    /// 将动作放入队列，优先于代理
    pub fn trigger_action(&mut self, action: PlayerAction) {
        self.actions.push_back(action);
    }

    /// 取下一个动作：先取队列，再询问代理
    pub fn next_action(&mut self, state: &GameState) -> Option<PlayerAction> {
        if let Some(action) = self.actions.pop_front() {
            return Some(action);
        }
        let view = AgentView {
            state,
            player: self.player,
            player_state: &self.player_state,
        };
        self.agent.as_mut()?.next_action(&view)
    }

    // ------------------------------------------------------------------------
    // 建造
    // ------------------------------------------------------------------------

    /// 费用是否允许在该边建造（不检查放置规则）
    pub fn can_build_rail(&self, state: &GameState, key: &EdgeKey) -> bool {
        let grid = state.grid();
        let Some(edge) = grid.edge_by_key(key) else {
            return false;
        };
        if edge.is_owned_by(self.player) {
            return false;
        }
        let Ok(base) = grid.base_building_cost(key) else {
            return false;
        };
        if base > self.building_budget {
            return false;
        }
        let parallel = grid.total_parallel_cost(key, self.player);
        let credits = state.credits(self.player);
        match state.phase() {
            GamePhase::Building => parallel <= credits,
            GamePhase::Driving => base + parallel <= credits,
        }
    }

    /// 当前可以建造的所有边
    pub fn buildable_rails(&self, state: &GameState) -> BTreeSet<EdgeKey> {
        let grid = state.grid();
        let rails = grid.rails(self.player);

        let candidates: BTreeSet<EdgeKey> = if rails.is_empty() {
            grid.starting_cities()
                .iter()
                .flat_map(|city| grid.tile_edges(city.position))
                .map(|edge| edge.key)
                .collect()
        } else {
            rails
                .iter()
                .flat_map(|rail| grid.connected_edges(rail))
                .filter(|key| !rails.contains(key))
                .collect()
        };

        candidates
            .into_iter()
            .filter(|key| self.can_build_rail(state, key))
            .collect()
    }

    /// 建造一段铁轨并结算费用
    pub fn build_rail(&mut self, state: &mut GameState, key: &EdgeKey) -> GameResult<()> {
        if !self.buildable_rails(state).contains(key) {
            return Err(GameError::illegal(format!("cannot build rail on {}", key)));
        }

        let base = state.grid().base_building_cost(key)?;
        let parallel = state.grid().parallel_cost_per_player(key, self.player);
        let parallel_total: u32 = parallel.values().sum();
        let newly_connected: Vec<TilePosition> = key
            .adjacent_positions()
            .into_iter()
            .filter(|p| state.grid().city_at(*p).is_some() && !state.grid().is_city_connected(*p))
            .collect();

        let charge = match state.phase() {
            GamePhase::Building => parallel_total,
            GamePhase::Driving => base + parallel_total,
        };
        let player = state
            .player_mut(self.player)
            .ok_or(GameError::UnknownPlayer(self.player))?;
        if !player.remove_credits(charge) {
            return Err(GameError::illegal(format!(
                "cannot afford {} credits for {}",
                charge, key
            )));
        }

        if !state.grid_mut().add_rail(key, self.player) {
            // 放置规则已在 buildable_rails 中检查过，这里只需退还
            if let Some(player) = state.player_mut(self.player) {
                player.add_credits(charge);
            }
            return Err(GameError::illegal(format!("cannot place rail on {}", key)));
        }
        self.building_budget -= base;

        for (owner, amount) in parallel {
            if let Some(owner) = state.player_mut(owner) {
                owner.add_credits(amount);
            }
        }

        if !newly_connected.is_empty() {
            let bonus = state.rules().city_connection_bonus * newly_connected.len() as u32;
            if let Some(player) = state.player_mut(self.player) {
                player.add_credits(bonus);
            }
        }

        debug!(
            player = %self.player,
            edge = %key,
            base,
            parallel = parallel_total,
            budget = self.building_budget,
            "rail built"
        );
        Ok(())
    }

    /// 按顺序建造，遇到第一条失败即停止
    pub fn build_rails(&mut self, state: &mut GameState, keys: &[EdgeKey]) -> GameResult<()> {
        if self.buildable_rails(state).is_empty() {
            return Err(GameError::illegal("no rails can be built"));
        }
        for key in keys {
            self.build_rail(state, key)?;
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // 选择路径
    // ------------------------------------------------------------------------

    /// 可租用的他人铁轨
    ///
    /// 从与自己铁轨相连的他人铁轨出发做广度优先搜索，
    /// 距离不超过 min(信用点, 最大租用距离)。
    pub fn choosable_edges(&self, state: &GameState) -> BTreeSet<EdgeKey> {
        let credits = state.credits(self.player);
        if credits == 0 || state.phase() != GamePhase::Driving {
            return BTreeSet::new();
        }

        let grid = state.grid();
        let foreign = |key: &EdgeKey| {
            grid.edge_by_key(key)
                .is_some_and(|edge| edge.has_rail() && !edge.is_owned_by(self.player))
        };

        let mut choosable: BTreeSet<EdgeKey> = grid
            .rails(self.player)
            .iter()
            .flat_map(|rail| grid.connected_edges(rail))
            .filter(|key| foreign(key))
            .collect();

        let limit = (credits as usize).min(state.rules().max_rentable_distance);
        let mut queue: VecDeque<(EdgeKey, usize)> =
            choosable.iter().map(|key| (*key, 1)).collect();

        while let Some((current, distance)) = queue.pop_front() {
            let next_distance = distance + 1;
            if next_distance > limit {
                continue;
            }
            for key in grid.connected_edges(&current) {
                if foreign(&key) && choosable.insert(key) {
                    queue.push_back((key, next_distance));
                }
            }
        }

        choosable
    }

    /// 选择租用的铁轨并计算路径
    pub fn choose_edges(&mut self, state: &GameState, edges: &BTreeSet<EdgeKey>) -> GameResult<()> {
        self.has_path = false;

        let choosable = self.choosable_edges(state);
        if !edges.is_subset(&choosable) {
            return Err(GameError::illegal("some chosen rails cannot be rented"));
        }
        let max = state.rules().max_rentable_distance;
        if edges.len() > max {
            return Err(GameError::illegal(format!(
                "cannot rent more than {} rails",
                max
            )));
        }
        let grid = state.grid();
        let rent: u32 = edges
            .iter()
            .map(|key| grid.renting_cost(key, self.player).values().sum::<u32>())
            .sum();
        if rent > state.credits(self.player) {
            return Err(GameError::illegal(format!("cannot afford rent of {}", rent)));
        }

        let (start, target) = state
            .current_cities()
            .ok_or_else(|| GameError::illegal("no cities chosen"))?;

        let mut available = grid.rails(self.player);
        available.extend(edges.iter().copied());
        available.retain(|key| grid.edge_by_key(key).is_some_and(|e| e.has_rail()));

        let path = grid.find_path(start, target, &available, |from, to| {
            grid.driving_cost_between(from, to).unwrap_or(u32::MAX / 4)
        });
        if path.is_empty() {
            self.rented_edges.clear();
            return Ok(());
        }

        self.has_path = true;
        self.rented_edges = path
            .into_iter()
            .filter(|key| grid.edge_by_key(key).is_some_and(|e| !e.is_owned_by(self.player)))
            .collect();
        debug!(
            player = %self.player,
            rented = self.rented_edges.len(),
            "path chosen"
        );
        Ok(())
    }

    /// 接受或拒绝当前路径；接受且有路径时支付租金并加入驾驶
    pub fn confirm_path(&mut self, state: &mut GameState, accept: bool) -> GameResult<()> {
        if !accept {
            self.has_confirmed_path = false;
            self.rented_edges.clear();
            return Ok(());
        }

        self.has_confirmed_path = true;
        if !self.has_path {
            return Ok(());
        }

        let mut payments: BTreeMap<PlayerId, u32> = BTreeMap::new();
        for key in &self.rented_edges {
            for (owner, amount) in state.grid().renting_cost(key, self.player) {
                *payments.entry(owner).or_insert(0) += amount;
            }
        }
        let total: u32 = payments.values().sum();
        let player = state
            .player_mut(self.player)
            .ok_or(GameError::UnknownPlayer(self.player))?;
        if !player.remove_credits(total) {
            self.has_confirmed_path = false;
            return Err(GameError::illegal(format!("cannot afford rent of {}", total)));
        }
        for (owner, amount) in payments {
            if let Some(owner) = state.player_mut(owner) {
                owner.add_credits(amount);
            }
        }
        state.add_driving_player(self.player);
        Ok(())
    }

    // ------------------------------------------------------------------------
    // 驾驶
    // ------------------------------------------------------------------------

    pub fn can_drive(&self, state: &GameState) -> bool {
        state.phase() == GamePhase::Driving && state.is_driving(self.player)
    }

    /// 本次掷骰可以到达的地块
    ///
    /// 恰好用完点数的地块、剩余点数不足以进入下一地块时所在的地块、
    /// 或死路尽头的地块均可到达；
    /// 点数内可到达终点城市时，终点是唯一的选项。
    pub fn drivable_tiles(&self, state: &GameState) -> DrivableTiles {
        let mut drivable = DrivableTiles::new();
        if !self.can_drive(state) {
            return drivable;
        }
        let (Some(start), Some((_, target))) =
            (state.player_position(self.player), state.current_cities())
        else {
            return drivable;
        };

        let grid = state.grid();
        let roll = state.dice_roll();
        let mut available = grid.rails(self.player);
        available.extend(self.rented_edges.iter().copied());

        let mut visited: BTreeSet<TilePosition> = BTreeSet::from([start]);
        let mut queue: VecDeque<(TilePosition, u32, Vec<TilePosition>)> =
            VecDeque::from([(start, 0, vec![start])]);

        while let Some((position, distance, path)) = queue.pop_front() {
            let mut moved = false;
            for next in grid.connected_neighbours(position, &available) {
                if visited.contains(&next) {
                    continue;
                }
                let Ok(cost) = grid.driving_cost_between(position, next) else {
                    continue;
                };
                let next_distance = distance + cost;
                if next_distance > roll {
                    // 点数不足以进入下一地块时可以停在当前地块
                    if position != start {
                        drivable.entry(position).or_insert_with(|| path.clone());
                    }
                    continue;
                }
                moved = true;
                let mut next_path = path.clone();
                next_path.push(next);
                if next == target {
                    return DrivableTiles::from([(next, next_path)]);
                }
                if next_distance < roll {
                    visited.insert(next);
                    queue.push_back((next, next_distance, next_path));
                } else {
                    drivable.entry(next).or_insert(next_path);
                }
            }
            if !moved && position != start {
                drivable.entry(position).or_insert(path);
            }
        }

        drivable
    }

    /// 驾驶到指定地块；到达终点时记录剩余点数
    pub fn drive(&mut self, state: &mut GameState, tile: TilePosition) -> GameResult<()> {
        let drivable = self.drivable_tiles(state);
        let path = drivable
            .get(&tile)
            .ok_or_else(|| GameError::illegal(format!("cannot drive to {}", tile)))?;

        let mut cost = 0;
        for pair in path.windows(2) {
            cost += state.grid().driving_cost_between(pair[0], pair[1])?;
        }

        state.set_player_position(self.player, tile);
        if state.current_cities().is_some_and(|(_, target)| target == tile) {
            let surplus = state.dice_roll() as i32 - cost as i32;
            state.add_player_point_surplus(self.player, surplus);
            debug!(player = %self.player, surplus, "arrived at target");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::grid::tests::{key, small_grid, P1, P2};
    use crate::models::player::PlayerBuilder;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn state() -> GameState {
        let mut rng = StdRng::seed_from_u64(11);
        let players = vec![
            PlayerBuilder::new(1).build(20, &mut rng),
            PlayerBuilder::new(2).build(20, &mut rng),
        ];
        GameState::new(small_grid(), players)
    }

    fn pos(q: i32, r: i32) -> TilePosition {
        TilePosition::new(q, r)
    }

    #[test]
    fn first_buildable_rails_touch_starting_city() {
        let state = state();
        let mut controller = PlayerController::new(P1);
        controller.set_building_budget(1);
        let buildable = controller.buildable_rails(&state);
        assert_eq!(buildable.len(), 6);
        assert!(buildable.iter().all(|k| k.touches(pos(-2, 0))));
    }

    #[test]
    fn budget_limits_building() {
        let mut state = state();
        let mut controller = PlayerController::new(P1);
        controller.set_building_budget(2);
        controller
            .build_rails(&mut state, &[key((-2, 0), (-1, 0)), key((-1, 0), (0, 0))])
            .unwrap();
        assert_eq!(controller.building_budget(), 0);
        assert!(controller.buildable_rails(&state).is_empty());
        assert!(controller.build_rails(&mut state, &[key((0, 0), (1, 0))]).is_err());
        // 建造阶段只获得连接城市的奖励，不扣信用点
        assert_eq!(state.credits(P1), 26);
    }

    #[test]
    fn mountain_edge_needs_larger_budget() {
        let mut state = state();
        let mut controller = PlayerController::new(P1);
        controller.set_building_budget(10);
        for k in [key((-2, 0), (-1, 0)), key((-1, 0), (0, 0)), key((0, 0), (1, 0))] {
            controller.build_rail(&mut state, &k).unwrap();
        }
        controller.set_building_budget(2);
        assert!(!controller.can_build_rail(&state, &key((1, 0), (2, 0))));
        controller.set_building_budget(3);
        assert!(controller.can_build_rail(&state, &key((1, 0), (2, 0))));
    }

    #[test]
    fn parallel_costs_are_paid_to_owner() {
        let mut state = state();
        let mut first = PlayerController::new(P1);
        first.set_building_budget(5);
        first.build_rail(&mut state, &key((-2, 0), (-1, 0))).unwrap();

        let mut second = PlayerController::new(P2);
        second.set_building_budget(5);
        second.build_rail(&mut state, &key((-2, 0), (-1, 0))).unwrap();
        assert_eq!(state.credits(P2), 17);
        // 20 + 6（连接奖励）+ 3（平行费用）
        assert_eq!(state.credits(P1), 29);
    }

    #[test]
    fn connecting_city_grants_bonus_once() {
        let mut state = state();
        let mut first = PlayerController::new(P1);
        first.set_building_budget(5);
        first.build_rail(&mut state, &key((-2, 0), (-1, 0))).unwrap();
        assert_eq!(state.credits(P1), 26);

        let mut second = PlayerController::new(P2);
        second.set_building_budget(5);
        second.build_rail(&mut state, &key((-2, 0), (-2, 1))).unwrap();
        // 城市已连接，不再有奖励
        assert_eq!(state.credits(P2), 20);
    }

    #[test]
    fn driving_phase_charges_total_cost() {
        let mut state = state();
        state.set_phase(GamePhase::Driving);
        let mut controller = PlayerController::new(P1);
        controller.set_building_budget(10);
        controller.build_rail(&mut state, &key((-2, 0), (-1, 0))).unwrap();
        // 20 - 1 + 6
        assert_eq!(state.credits(P1), 25);
        assert_eq!(controller.building_budget(), 9);
    }

    /// P1 拥有 (-2,0)->(0,0)，P2 拥有 (0,0)->(0,2)；本轮从 (-2,0) 到 (0,2)
    fn driving_setup() -> (GameState, PlayerController, PlayerController) {
        let mut state = state();
        let mut p1 = PlayerController::new(P1);
        let mut p2 = PlayerController::new(P2);
        p1.set_building_budget(10);
        p2.set_building_budget(10);
        p1.build_rails(&mut state, &[key((-2, 0), (-1, 0)), key((-1, 0), (0, 0))])
            .unwrap();
        p2.build_rails(
            &mut state,
            &[key((-2, 0), (-2, 1)), key((-2, 1), (-1, 1)), key((-1, 1), (0, 1)), key((0, 1), (0, 2))],
        )
        .unwrap();
        state.set_phase(GamePhase::Driving);
        state.set_current_cities(Some((pos(-2, 0), pos(0, 2))));
        state.set_player_position(P1, pos(-2, 0));
        (state, p1, p2)
    }

    #[test]
    fn choosable_edges_start_next_to_own_rails() {
        let (state, p1, _) = driving_setup();
        let choosable = p1.choosable_edges(&state);
        assert!(choosable.contains(&key((-2, 0), (-2, 1))));
        assert!(choosable.contains(&key((0, 1), (0, 2))));
        assert!(choosable.iter().all(|k| !state.grid().edge_by_key(k).unwrap().is_owned_by(P1)));

        let mut building = state.clone();
        building.set_phase(GamePhase::Building);
        assert!(p1.choosable_edges(&building).is_empty());
    }

    #[test]
    fn choose_edges_finds_path_and_confirm_pays_rent() {
        let (mut state, mut p1, _) = driving_setup();
        let credits_before = (state.credits(P1), state.credits(P2));
        let rent: BTreeSet<EdgeKey> = [key((-1, 0), (-1, 1)), key((-1, 1), (0, 1)), key((0, 1), (0, 2))]
            .into_iter()
            .filter(|k| p1.choosable_edges(&state).contains(k))
            .collect();
        // (-1,0)-(-1,1) 没有铁轨，不可租用
        assert_eq!(rent.len(), 2);
        let rent: BTreeSet<EdgeKey> = [key((-2, 0), (-2, 1)), key((-2, 1), (-1, 1)), key((-1, 1), (0, 1)), key((0, 1), (0, 2))]
            .into_iter()
            .collect();
        p1.choose_edges(&state, &rent).unwrap();
        assert!(p1.has_path());
        assert_eq!(p1.rented_edges().len(), 4);

        p1.confirm_path(&mut state, true).unwrap();
        assert!(p1.has_confirmed_path());
        assert!(state.is_driving(P1));
        assert_eq!(state.credits(P1), credits_before.0 - 4);
        assert_eq!(state.credits(P2), credits_before.1 + 4);
    }

    #[test]
    fn choose_edges_rejects_unrentable_rails() {
        let (state, mut p1, _) = driving_setup();
        let bad: BTreeSet<EdgeKey> = [key((2, 0), (3, 0))].into_iter().collect();
        assert!(p1.choose_edges(&state, &bad).is_err());
        assert!(!p1.has_path());
    }

    #[test]
    fn rejecting_path_clears_rented_edges() {
        let (mut state, mut p1, _) = driving_setup();
        let rent: BTreeSet<EdgeKey> = [key((-2, 0), (-2, 1)), key((-2, 1), (-1, 1)), key((-1, 1), (0, 1)), key((0, 1), (0, 2))]
            .into_iter()
            .collect();
        p1.choose_edges(&state, &rent).unwrap();
        p1.confirm_path(&mut state, false).unwrap();
        assert!(!p1.has_confirmed_path());
        assert!(p1.rented_edges().is_empty());
        assert!(!state.is_driving(P1));
    }

    #[test]
    fn drivable_tiles_use_exact_roll_or_reach_target() {
        let (mut state, mut p1, _) = driving_setup();
        let rent: BTreeSet<EdgeKey> = [key((-2, 0), (-2, 1)), key((-2, 1), (-1, 1)), key((-1, 1), (0, 1)), key((0, 1), (0, 2))]
            .into_iter()
            .collect();
        p1.choose_edges(&state, &rent).unwrap();
        p1.confirm_path(&mut state, true).unwrap();

        state.set_dice_roll(2);
        let tiles = p1.drivable_tiles(&state);
        assert_eq!(
            tiles.keys().copied().collect::<Vec<_>>(),
            vec![pos(-1, 1), pos(0, 0)]
        );
        assert_eq!(tiles[&pos(0, 0)], vec![pos(-2, 0), pos(-1, 0), pos(0, 0)]);

        state.set_dice_roll(6);
        let tiles = p1.drivable_tiles(&state);
        assert_eq!(tiles.len(), 1);
        assert_eq!(tiles[&pos(0, 2)].len(), 5);

        p1.drive(&mut state, pos(0, 2)).unwrap();
        assert_eq!(state.player_position(P1), Some(pos(0, 2)));
        assert_eq!(state.point_surplus().get(&P1), Some(&2));
    }

    #[test]
    fn dead_end_stops_the_train() {
        let (mut state, mut p1, _) = driving_setup();
        p1.choose_edges(&state, &BTreeSet::new()).unwrap();
        // 只有自己的铁轨时无法到达终点
        assert!(!p1.has_path());
        state.add_driving_player(P1);
        state.set_dice_roll(5);
        let tiles = p1.drivable_tiles(&state);
        assert_eq!(tiles.keys().copied().collect::<Vec<_>>(), vec![pos(0, 0)]);
        assert!(p1.drive(&mut state, pos(-1, 0)).is_err());
    }

    #[test]
    fn train_can_stop_before_a_mountain() {
        let (mut state, mut p1, _) = driving_setup();
        state.set_phase(GamePhase::Building);
        p1.build_rails(
            &mut state,
            &[key((0, 0), (1, 0)), key((1, 0), (2, 0)), key((1, 0), (1, 1))],
        )
        .unwrap();
        state.set_phase(GamePhase::Driving);
        state.add_driving_player(P1);
        state.set_player_position(P1, pos(0, 0));
        state.set_dice_roll(2);

        // (1,0)->(2,0) 进山需要 2 点，剩 1 点时可以停在 (1,0)
        let tiles = p1.drivable_tiles(&state);
        assert_eq!(
            tiles.keys().copied().collect::<Vec<_>>(),
            vec![pos(-2, 0), pos(1, 0), pos(1, 1)]
        );
        assert_eq!(tiles[&pos(1, 0)], vec![pos(0, 0), pos(1, 0)]);

        p1.drive(&mut state, pos(1, 0)).unwrap();
        assert_eq!(state.player_position(P1), Some(pos(1, 0)));
    }
}
