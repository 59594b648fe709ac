// ============================================================================
// HexRail - 游戏控制器
// ============================================================================
//
// 文件: src/core/game.rs
// 职责: 一局游戏的回合调度
// 边界:
//   - ✅ 建造阶段与驾驶阶段流程
//   - ✅ 掷骰与选城
//   - ✅ 动作等待、校验与分发
//   - ✅ 胜者判定与结果汇总
//   - ✅ 停止与轮数/非法动作保护
//   - ❌ 不应包含单个玩家的费用规则（由玩家控制器负责）
//   - ❌ 不应包含终端输出
//
// 流程:
// 1. 建造阶段: 轮流掷骰，所有玩家以点数为预算建造，直到未连接城市不超过阈值
// 2. 驾驶阶段: 每隔若干轮所有玩家建造；选城、选路、驾驶、发放奖励
// 3. 信用点最多的玩家获胜（相同时序号小者获胜）
//
// ============================================================================

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::core::actions::{PlayerAction, PlayerObjective};
use crate::core::agent::{create_agent, PlayerAgent};
use crate::core::grid::HexGrid;
use crate::core::mapgen::MapGenerator;
use crate::core::names::NameGenerator;
use crate::core::player_controller::PlayerController;
use crate::core::state::{GamePhase, GameState};
use crate::error::{GameError, GameResult};
use crate::models::config::{Config, ExecutionConfig};
use crate::models::player::{AiKind, PlayerId};
use crate::models::position::TilePosition;
use crate::models::setup::GameSetup;

/// 骰子
pub type Dice = Box<dyn FnMut() -> u32 + Send>;

/// 防止游戏无限进行的限制
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameLimits {
    /// 每个阶段的最大轮数（0 表示不限制）
    pub max_rounds: u32,
    /// 每次等待动作时允许的最大非法动作数
    pub max_illegal_actions: u32,
}

impl Default for GameLimits {
    fn default() -> Self {
        Self::from(&ExecutionConfig::default())
    }
}

impl From<&ExecutionConfig> for GameLimits {
    fn from(execution: &ExecutionConfig) -> Self {
        Self {
            max_rounds: execution.max_rounds,
            max_illegal_actions: execution.max_illegal_actions.max(1),
        }
    }
}

/// 单个玩家的最终成绩
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerStanding {
    pub id: PlayerId,
    pub name: String,
    /// `#rrggbb`
    pub color: String,
    pub ai: Option<AiKind>,
    pub credits: u32,
    pub rails: usize,
}

/// 一局游戏的结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSummary {
    pub winner: Option<PlayerId>,
    /// 按信用点降序排列
    pub standings: Vec<PlayerStanding>,
    pub building_rounds: u32,
    pub driving_rounds: u32,
    pub connected_cities: usize,
    pub total_cities: usize,
}

impl GameSummary {
    pub fn winner_standing(&self) -> Option<&PlayerStanding> {
        let winner = self.winner?;
        self.standings.iter().find(|s| s.id == winner)
    }
}

/// 游戏控制器
pub struct GameController {
    state: GameState,
    controllers: Vec<PlayerController>,
    dice: Dice,
    rng: StdRng,
    limits: GameLimits,
    stopped: Arc<AtomicBool>,
    active: Option<PlayerId>,
    building_rounds: u32,
    driving_rounds: u32,
}

impl GameController {
    /// 创建控制器，AI 玩家自动获得对应代理
    pub fn new(state: GameState, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let sides = state.rules().dice_sides.max(1);
        let mut dice_rng = StdRng::seed_from_u64(rng.gen());
        let dice: Dice = Box::new(move || dice_rng.gen_range(1..=sides));

        let controllers = state
            .players()
            .iter()
            .map(|player| {
                let mut controller = PlayerController::new(player.id());
                if let Some(kind) = player.ai() {
                    controller.set_agent(create_agent(kind, rng.gen()));
                }
                controller
            })
            .collect();

        Self {
            state,
            controllers,
            dice,
            rng,
            limits: GameLimits::default(),
            stopped: Arc::new(AtomicBool::new(false)),
            active: None,
            building_rounds: 0,
            driving_rounds: 0,
        }
    }

    /// 按准备数据和配置生成地图与玩家
    pub fn generate(
        setup: &GameSetup,
        config: &Config,
        names: &NameGenerator,
        seed: u64,
    ) -> GameResult<Self> {
        let mut rng = StdRng::seed_from_u64(seed);
        let grid: HexGrid =
            MapGenerator::new(&config.map, &config.rules).generate(names, &mut rng)?;
        let mut state = GameState::new(grid, Vec::new());
        state.add_players(setup.build_players(config.rules.starting_credits, &mut rng))?;
        Ok(Self::new(state, rng.gen()).with_limits(GameLimits::from(&config.execution)))
    }

    /// 替换骰子
    pub fn with_dice<F>(mut self, dice: F) -> Self
    where
        F: FnMut() -> u32 + Send + 'static,
    {
        self.dice = Box::new(dice);
        self
    }

    pub fn with_limits(mut self, limits: GameLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn active_player(&self) -> Option<PlayerId> {
        self.active
    }

    pub fn controller(&self, player: PlayerId) -> Option<&PlayerController> {
        self.controllers.iter().find(|c| c.player() == player)
    }

    fn index_of(&self, player: PlayerId) -> GameResult<usize> {
        self.controllers
            .iter()
            .position(|c| c.player() == player)
            .ok_or(GameError::UnknownPlayer(player))
    }

    pub fn set_agent(&mut self, player: PlayerId, agent: Box<dyn PlayerAgent>) -> GameResult<()> {
        let index = self.index_of(player)?;
        self.controllers[index].set_agent(agent);
        Ok(())
    }

    /// 为玩家排入一个动作
    pub fn trigger_action(&mut self, player: PlayerId, action: PlayerAction) -> GameResult<()> {
        let index = self.index_of(player)?;
        self.controllers[index].trigger_action(action);
        Ok(())
    }

    // ------------------------------------------------------------------------
    // 停止
    // ------------------------------------------------------------------------

    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    /// 可在其他线程中用于停止游戏的句柄
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stopped)
    }

    /// 使用外部创建的停止句柄
    pub fn with_stop_handle(mut self, stopped: Arc<AtomicBool>) -> Self {
        self.stopped = stopped;
        self
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    fn ensure_running(&self) -> GameResult<()> {
        if self.is_stopped() {
            return Err(GameError::Stopped);
        }
        Ok(())
    }

    fn check_round_limit(&self, phase: GamePhase, round: u32) -> GameResult<()> {
        if self.limits.max_rounds > 0 && round >= self.limits.max_rounds {
            return Err(GameError::RoundLimit {
                phase: phase.to_string(),
                limit: self.limits.max_rounds,
            });
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // 骰子与选城
    // ------------------------------------------------------------------------

    pub fn cast_dice(&mut self) -> u32 {
        let roll = (self.dice)();
        self.state.set_dice_roll(roll);
        debug!(roll, "dice cast");
        roll
    }

    fn unchosen_cities(&self) -> Vec<TilePosition> {
        let chosen = self.state.chosen_cities();
        self.state
            .grid()
            .cities()
            .keys()
            .filter(|p| !chosen.contains(p))
            .copied()
            .collect()
    }

    /// 随机选择两个尚未被选过的不同城市作为起点和终点
    pub fn choose_cities(&mut self) -> GameResult<(TilePosition, TilePosition)> {
        let unchosen = self.unchosen_cities();
        if unchosen.len() < 2 {
            return Err(GameError::illegal("fewer than two cities left to choose"));
        }
        let first = self.rng.gen_range(0..unchosen.len());
        let mut second = self.rng.gen_range(0..unchosen.len() - 1);
        if second >= first {
            second += 1;
        }
        let (start, target) = (unchosen[first], unchosen[second]);
        self.state.add_chosen_city(start);
        self.state.add_chosen_city(target);
        self.state.set_current_cities(Some((start, target)));

        let name = |p: TilePosition| {
            self.state
                .grid()
                .city_at(p)
                .map(|c| c.name.clone())
                .unwrap_or_default()
        };
        info!(start = %name(start), target = %name(target), "cities chosen");
        Ok((start, target))
    }

    // ------------------------------------------------------------------------
    // 游戏流程
    // ------------------------------------------------------------------------

    /// 运行完整的一局游戏
    pub fn start_game(&mut self) -> GameResult<GameSummary> {
        let rules = self.state.rules();
        let found = self.state.players().len();
        if found < rules.min_players {
            return Err(GameError::NotEnoughPlayers {
                found,
                min: rules.min_players,
            });
        }
        info!(players = found, "game started");

        self.state.set_phase(GamePhase::Building);
        self.execute_building_phase()?;

        self.state.set_phase(GamePhase::Driving);
        self.state.set_round(0);
        self.execute_driving_phase()?;

        let winner = self
            .state
            .players()
            .iter()
            .max_by(|a, b| {
                a.credits()
                    .cmp(&b.credits())
                    .then_with(|| b.id().cmp(&a.id()))
            })
            .map(|p| p.id());
        if let Some(winner) = winner {
            self.state.set_winner(winner);
            info!(winner = %winner, "game over");
        }
        Ok(self.summary())
    }

    fn execute_building_phase(&mut self) -> GameResult<()> {
        let threshold = self.state.rules().unconnected_cities_start_threshold;
        let count = self.controllers.len();
        let mut round: u32 = 0;
        self.state.set_round(round);

        while self.state.grid().unconnected_cities().len() > threshold {
            self.check_round_limit(GamePhase::Building, round)?;
            let roller = round as usize % count;
            self.with_active_player(roller, |game| {
                game.wait_for_next_action(roller, Some(PlayerObjective::RollDice))
                    .map(|_| ())
            })?;

            let roll = self.state.dice_roll();
            for offset in 0..count {
                let index = (roller + offset) % count;
                self.controllers[index].set_building_budget(roll);
                self.wait_for_build(index)?;
            }

            round += 1;
            self.state.set_round(round);
        }

        self.building_rounds = round;
        info!(rounds = round, "building phase finished");
        Ok(())
    }

    /// 驾驶阶段中所有玩家按信用点升序建造
    fn building_during_driving_phase(&mut self) -> GameResult<()> {
        let budget = self.state.rules().max_building_budget_driving_phase;
        let mut order: Vec<(u32, usize)> = self
            .controllers
            .iter()
            .enumerate()
            .map(|(index, c)| (self.state.credits(c.player()), index))
            .collect();
        order.sort();

        for (_, index) in order {
            self.controllers[index].set_building_budget(budget);
            self.wait_for_build(index)?;
        }
        Ok(())
    }

    fn execute_driving_phase(&mut self) -> GameResult<()> {
        let count = self.controllers.len();
        let interval = self.state.rules().driving_phase_build_interval.max(1);
        let mut round: u32 = 0;

        while self.unchosen_cities().len() >= 2 {
            self.check_round_limit(GamePhase::Driving, round)?;
            if round % interval == 0 {
                self.building_during_driving_phase()?;
            }

            let chooser = round as usize % count;
            self.with_active_player(chooser, |game| {
                game.wait_for_next_action(chooser, Some(PlayerObjective::ChooseCities))
                    .map(|_| ())
            })?;

            self.let_players_choose_path()?;
            self.handle_driving()?;

            let winners = self.winners();
            let prizes = self.state.rules().winning_credits.clone();
            for (winner, prize) in winners.iter().zip(prizes) {
                if let Some(player) = self.state.player_mut(*winner) {
                    player.add_credits(prize);
                }
            }
            info!(round, winners = ?winners, "driving round finished");

            self.reset_driving_round();
            round += 1;
            self.state.set_round(round);
        }

        self.driving_rounds = round;
        info!(rounds = round, "driving phase finished");
        Ok(())
    }

    fn let_players_choose_path(&mut self) -> GameResult<()> {
        let (start, _) = self
            .state
            .current_cities()
            .ok_or_else(|| GameError::illegal("no cities chosen"))?;
        let max_attempts = self.limits.max_illegal_actions;

        for index in 0..self.controllers.len() {
            let player = self.controllers[index].player();
            self.state.set_player_position(player, start);
            self.with_active_player(index, |game| {
                for _ in 0..max_attempts {
                    game.wait_for_next_action(index, Some(PlayerObjective::ChoosePath))?;
                    game.wait_for_next_action(index, Some(PlayerObjective::ConfirmPath))?;
                    if game.controllers[index].has_confirmed_path() {
                        return Ok(());
                    }
                }
                Err(GameError::TooManyIllegalActions(player, max_attempts))
            })?;
        }
        Ok(())
    }

    fn arrived(&self, drivers: &[PlayerId], target: TilePosition) -> Vec<PlayerId> {
        drivers
            .iter()
            .filter(|p| self.state.player_position(**p) == Some(target))
            .copied()
            .collect()
    }

    fn handle_driving(&mut self) -> GameResult<()> {
        let drivers = self.state.driving_players().to_vec();
        let Some((_, target)) = self.state.current_cities() else {
            return Ok(());
        };
        if drivers.len() == 1 {
            self.state.set_player_position(drivers[0], target);
            return Ok(());
        }

        let places = self.state.rules().winning_credits.len();
        let penalty = self.state.rules().dice_sides as i32;
        let mut turn: u32 = 0;
        loop {
            let arrived = self.arrived(&drivers, target);
            let mut en_route: Vec<PlayerId> = drivers
                .iter()
                .filter(|p| !arrived.contains(p))
                .copied()
                .collect();
            if en_route.is_empty() || arrived.len() >= places {
                break;
            }
            if self.limits.max_rounds > 0 && turn >= self.limits.max_rounds {
                warn!(turns = turn, "driving turn limit reached, ending round");
                break;
            }

            if !arrived.is_empty() {
                for player in &en_route {
                    self.state.add_player_point_surplus(*player, -penalty);
                }
            }

            en_route.sort_by_key(|p| std::cmp::Reverse(self.state.credits(*p)));
            for player in en_route {
                let index = self.index_of(player)?;
                self.with_active_player(index, |game| {
                    game.wait_for_next_action(index, Some(PlayerObjective::RollDice))?;
                    if game.controllers[index].drivable_tiles(&game.state).is_empty() {
                        debug!(player = %player, "no drivable tiles");
                        return Ok(());
                    }
                    game.wait_for_next_action(index, Some(PlayerObjective::Drive))
                        .map(|_| ())
                })?;
            }
            turn += 1;
        }
        Ok(())
    }

    /// 已到达终点的玩家，按盈余降序，最多取奖励名额数
    fn winners(&self) -> Vec<PlayerId> {
        let Some((_, target)) = self.state.current_cities() else {
            return Vec::new();
        };
        let mut arrived = self.arrived(self.state.driving_players(), target);
        arrived.sort_by_key(|p| {
            std::cmp::Reverse(self.state.point_surplus().get(p).copied().unwrap_or(0))
        });
        arrived.truncate(self.state.rules().winning_credits.len());
        arrived
    }

    fn reset_driving_round(&mut self) {
        self.state.reset_player_positions();
        self.state.reset_player_surplus();
        self.state.reset_driving_players();
        self.state.set_current_cities(None);
        for controller in &mut self.controllers {
            controller.reset_driving_phase();
        }
    }

    // ------------------------------------------------------------------------
    // 动作等待与分发
    // ------------------------------------------------------------------------

    fn wait_for_build(&mut self, index: usize) -> GameResult<()> {
        self.with_active_player(index, |game| {
            let mut action = game.wait_for_next_action(index, Some(PlayerObjective::PlaceRail))?;
            while action != PlayerAction::ConfirmBuild {
                action = game.wait_for_next_action(index, None)?;
            }
            Ok(())
        })
    }

    fn with_active_player<F>(&mut self, index: usize, run: F) -> GameResult<()>
    where
        F: FnOnce(&mut Self) -> GameResult<()>,
    {
        self.ensure_running()?;
        self.active = Some(self.controllers[index].player());
        let result = run(self);
        self.controllers[index].set_objective(PlayerObjective::Idle, &self.state);
        self.active = None;
        result
    }

    /// 等待玩家给出一个合法动作并执行
    ///
    /// 非法动作被记录并重新请求，超过上限时返回错误。
    fn wait_for_next_action(
        &mut self,
        index: usize,
        objective: Option<PlayerObjective>,
    ) -> GameResult<PlayerAction> {
        self.ensure_running()?;
        if let Some(objective) = objective {
            self.controllers[index].set_objective(objective, &self.state);
        }
        let player = self.controllers[index].player();
        let mut illegal = 0;

        loop {
            self.controllers[index].update_player_state(&self.state);
            let action = self.controllers[index]
                .next_action(&self.state)
                .ok_or(GameError::NoAction(player))?;
            debug!(player = %player, action = %action, "action received");

            match self.execute_action(index, &action) {
                Ok(()) => return Ok(action),
                Err(error) if error.is_recoverable() => {
                    illegal += 1;
                    warn!(player = %player, action = %action, %error, "action rejected");
                    if illegal >= self.limits.max_illegal_actions {
                        return Err(GameError::TooManyIllegalActions(
                            player,
                            self.limits.max_illegal_actions,
                        ));
                    }
                }
                Err(error) => return Err(error),
            }
        }
    }

    fn execute_action(&mut self, index: usize, action: &PlayerAction) -> GameResult<()> {
        let objective = self.controllers[index].objective();
        if !objective.allows(action) {
            return Err(GameError::illegal(format!(
                "'{}' is not allowed while the objective is '{}'",
                action, objective
            )));
        }

        match action {
            PlayerAction::BuildRails(edges) => {
                self.controllers[index].build_rails(&mut self.state, edges)
            }
            PlayerAction::ConfirmBuild => Ok(()),
            PlayerAction::RollDice => {
                self.cast_dice();
                Ok(())
            }
            PlayerAction::ChooseCities => self.choose_cities().map(|_| ()),
            PlayerAction::ChooseRails(edges) => {
                self.controllers[index].choose_edges(&self.state, edges)
            }
            PlayerAction::ConfirmDrive(accept) => {
                self.controllers[index].confirm_path(&mut self.state, *accept)
            }
            PlayerAction::Drive(tile) => self.controllers[index].drive(&mut self.state, *tile),
        }
    }

    // ------------------------------------------------------------------------
    // 结果
    // ------------------------------------------------------------------------

    pub fn summary(&self) -> GameSummary {
        let grid = self.state.grid();
        let mut standings: Vec<PlayerStanding> = self
            .state
            .players()
            .iter()
            .map(|p| PlayerStanding {
                id: p.id(),
                name: p.name().to_string(),
                color: p.color().to_string(),
                ai: p.ai(),
                credits: p.credits(),
                rails: grid.rails(p.id()).len(),
            })
            .collect();
        standings.sort_by(|a, b| b.credits.cmp(&a.credits).then_with(|| a.id.cmp(&b.id)));

        GameSummary {
            winner: self.state.winner(),
            standings,
            building_rounds: self.building_rounds,
            driving_rounds: self.driving_rounds,
            connected_cities: grid.connected_cities().len(),
            total_cities: grid.cities().len(),
        }
    }
}
