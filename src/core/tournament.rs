// ============================================================================
// HexRail - 锦标赛
// ============================================================================
//
// 文件: src/core/tournament.rs
// 职责: 批量运行带种子的 AI 对局并汇总结果
// 边界:
//   - ✅ 为每局生成种子与任务
//   - ✅ 通过调度器并发运行
//   - ✅ 按座位汇总胜场与平均信用点
//   - ❌ 不应包含进度条与表格渲染（由 UI 负责）
//
// ============================================================================

use serde::Serialize;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::core::game::{GameController, GameSummary};
use crate::core::names::NameGenerator;
use crate::core::scheduler::{GameJob, GameScheduler, ProgressCallback, RunResult, SchedulerConfig};
use crate::models::config::Config;
use crate::models::player::AiKind;
use crate::models::setup::GameSetup;

/// 锦标赛参数
#[derive(Debug, Clone)]
pub struct TournamentOptions {
    pub games: usize,
    /// 每局的 AI 玩家数
    pub players: usize,
    pub ai: AiKind,
    /// 第 i 局使用 `seed + i`
    pub seed: u64,
}

/// 单个座位的统计
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SeatStats {
    /// 从 1 开始
    pub seat: usize,
    pub games: usize,
    pub wins: usize,
    pub total_credits: u64,
}

impl SeatStats {
    pub fn average_credits(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.total_credits as f64 / self.games as f64
        }
    }

    pub fn win_rate(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.wins as f64 / self.games as f64
        }
    }
}

/// 锦标赛结果
#[derive(Debug, Clone, Default, Serialize)]
pub struct TournamentReport {
    pub games: usize,
    pub finished: usize,
    /// (对局 id, 错误信息)
    pub failed: Vec<(String, String)>,
    pub timed_out: usize,
    pub cancelled: usize,
    pub seats: Vec<SeatStats>,
    pub average_building_rounds: f64,
    pub average_driving_rounds: f64,
}

impl TournamentReport {
    /// 汇总各局结果
    pub fn aggregate(players: usize, results: &[(String, RunResult<GameSummary>)]) -> Self {
        let mut report = TournamentReport {
            games: results.len(),
            seats: (1..=players)
                .map(|seat| SeatStats {
                    seat,
                    ..SeatStats::default()
                })
                .collect(),
            ..TournamentReport::default()
        };

        let mut building_rounds = 0u64;
        let mut driving_rounds = 0u64;
        for (id, result) in results {
            match result {
                RunResult::Finished(summary) => {
                    report.finished += 1;
                    building_rounds += u64::from(summary.building_rounds);
                    driving_rounds += u64::from(summary.driving_rounds);
                    for standing in &summary.standings {
                        let index = (standing.id.0 as usize).checked_sub(1);
                        let Some(seat) = index.and_then(|i| report.seats.get_mut(i)) else {
                            continue;
                        };
                        seat.games += 1;
                        seat.total_credits += u64::from(standing.credits);
                        if summary.winner == Some(standing.id) {
                            seat.wins += 1;
                        }
                    }
                }
                RunResult::Failed(error) => report.failed.push((id.clone(), error.clone())),
                RunResult::TimedOut => report.timed_out += 1,
                RunResult::Cancelled => report.cancelled += 1,
            }
        }

        if report.finished > 0 {
            report.average_building_rounds = building_rounds as f64 / report.finished as f64;
            report.average_driving_rounds = driving_rounds as f64 / report.finished as f64;
        }
        report
    }
}

/// 为每局创建任务
pub fn tournament_jobs(
    config: &Config,
    options: &TournamentOptions,
    names: Arc<NameGenerator>,
) -> Vec<GameJob<GameSummary>> {
    let mut setup = GameSetup::new();
    for seat in 0..options.players {
        setup.add_or_update_player(format!("AI {}", seat + 1), Some(options.ai), seat, "");
    }
    let setup = Arc::new(setup);
    let config = Arc::new(config.clone());

    (0..options.games)
        .map(|index| {
            let seed = options.seed.wrapping_add(index as u64);
            let stop = Arc::new(AtomicBool::new(false));
            let handle = Arc::clone(&stop);
            let (setup, config, names) = (Arc::clone(&setup), Arc::clone(&config), Arc::clone(&names));
            GameJob::new(format!("game-{}", index + 1), stop, move || {
                let mut game = GameController::generate(&setup, &config, &names, seed)?
                    .with_stop_handle(handle);
                Ok(game.start_game()?)
            })
        })
        .collect()
}

/// 运行锦标赛
pub async fn run_tournament(
    config: &Config,
    options: &TournamentOptions,
    names: Arc<NameGenerator>,
    progress: Option<ProgressCallback>,
) -> TournamentReport {
    let timeout = match config.execution.game_timeout {
        0 => None,
        seconds => Some(Duration::from_secs(u64::from(seconds))),
    };
    let scheduler_config = SchedulerConfig {
        max_concurrency: config.execution.max_concurrency,
        timeout,
        fail_fast: !config.execution.continue_on_failure,
        verbose: config.output.verbose,
        progress_callback: progress,
    };

    info!(games = options.games, players = options.players, seed = options.seed, "tournament started");
    let scheduler = GameScheduler::new(scheduler_config);
    let results = scheduler
        .execute_batch(tournament_jobs(config, options, names))
        .await;
    TournamentReport::aggregate(options.players, &results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::game::PlayerStanding;
    use crate::models::player::PlayerId;

    fn summary(winner: u8, credits: [u32; 2]) -> GameSummary {
        GameSummary {
            winner: Some(PlayerId(winner)),
            standings: (0..2)
                .map(|i| PlayerStanding {
                    id: PlayerId(i as u8 + 1),
                    name: format!("AI {}", i + 1),
                    color: "#e6194b".to_string(),
                    ai: Some(AiKind::Basic),
                    credits: credits[i],
                    rails: 3,
                })
                .collect(),
            building_rounds: 4,
            driving_rounds: 2,
            connected_cities: 6,
            total_cities: 10,
        }
    }

    #[test]
    fn aggregate_counts_wins_and_credits() {
        let results = vec![
            ("game-1".to_string(), RunResult::Finished(summary(1, [30, 10]))),
            ("game-2".to_string(), RunResult::Finished(summary(2, [10, 20]))),
            ("game-3".to_string(), RunResult::Failed("map".to_string())),
            ("game-4".to_string(), RunResult::TimedOut),
        ];
        let report = TournamentReport::aggregate(2, &results);

        assert_eq!(report.games, 4);
        assert_eq!(report.finished, 2);
        assert_eq!(report.failed, vec![("game-3".to_string(), "map".to_string())]);
        assert_eq!(report.timed_out, 1);
        assert_eq!(report.seats[0].wins, 1);
        assert_eq!(report.seats[0].average_credits(), 20.0);
        assert_eq!(report.seats[1].win_rate(), 0.5);
        assert_eq!(report.average_building_rounds, 4.0);
    }

    #[test]
    fn empty_report_has_zero_averages() {
        let report = TournamentReport::aggregate(3, &[]);
        assert_eq!(report.seats.len(), 3);
        assert_eq!(report.seats[2].average_credits(), 0.0);
        assert_eq!(report.average_driving_rounds, 0.0);
    }

    #[test]
    fn jobs_get_distinct_ids() {
        let options = TournamentOptions {
            games: 3,
            players: 2,
            ai: AiKind::Basic,
            seed: 7,
        };
        let jobs = tournament_jobs(
            &Config::default(),
            &options,
            Arc::new(NameGenerator::with_default_names(3)),
        );
        let ids: Vec<_> = jobs.iter().map(|j| j.id.as_str()).collect();
        assert_eq!(ids, ["game-1", "game-2", "game-3"]);
    }

    #[tokio::test]
    async fn same_seed_same_report() {
        let mut config = Config::default();
        config.execution.game_timeout = 0;
        config.execution.continue_on_failure = true;
        config.output.verbose = false;
        let options = TournamentOptions {
            games: 2,
            players: 2,
            ai: AiKind::Basic,
            seed: 11,
        };
        let names = Arc::new(NameGenerator::with_default_names(3));

        let first = run_tournament(&config, &options, Arc::clone(&names), None).await;
        let second = run_tournament(&config, &options, names, None).await;

        assert_eq!(first.games, 2);
        assert_eq!(
            first.finished + first.failed.len() + first.timed_out + first.cancelled,
            2
        );
        assert_eq!(first.finished, second.finished);
        assert_eq!(first.failed, second.failed);
        assert_eq!(first.seats, second.seats);
        let wins: usize = first.seats.iter().map(|s| s.wins).sum();
        assert_eq!(wins, first.finished);
    }
}
