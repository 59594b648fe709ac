// ============================================================================
// HexRail - 对局命令处理
// ============================================================================
//
// 文件: src/cli/play.rs
// 职责: 运行一局完整游戏
// 边界:
//   - ✅ 玩家参数解析（name 或 name:ai）
//   - ✅ 终端玩家代理（从标准输入读取选择）
//   - ✅ 结果展示与排行榜写入
//   - ❌ 不应包含游戏规则
//
// ============================================================================

use anyhow::{Context, Result};
use clap::Args;
use std::collections::BTreeSet;
use std::io::{self, BufRead, Write};

use crate::cli::resolve_seed;
use crate::core::actions::{PlayerAction, PlayerObjective};
use crate::core::agent::{AgentView, PlayerAgent};
use crate::core::game::GameController;
use crate::core::leaderboard::Leaderboard;
use crate::core::names::NameGenerator;
use crate::models::board::EdgeKey;
use crate::models::config::Config;
use crate::models::player::AiKind;
use crate::models::position::TilePosition;
use crate::models::setup::GameSetup;
use crate::ui::summary::render_game_summary;
use crate::utils::logger::Logger;
use crate::{t, tf};

/// 对局命令参数
#[derive(Debug, Args)]
pub struct PlayArgs {
    /// 玩家，格式为 NAME 或 NAME:AI，可重复；默认两名 AI
    #[arg(short, long = "player", value_name = "NAME[:AI]")]
    pub players: Vec<String>,

    /// 不写入排行榜
    #[arg(long)]
    pub no_save: bool,

    /// 以 JSON 输出结果
    #[arg(long)]
    pub json: bool,
}

/// 解析 `name` 或 `name:ai`
pub fn parse_player_spec(spec: &str) -> Result<(String, Option<AiKind>)> {
    let (name, ai) = match spec.rsplit_once(':') {
        Some((name, kind)) => (name, Some(AiKind::from_str(kind).map_err(anyhow::Error::msg)?)),
        None => (spec, None),
    };
    let name = name.trim();
    if name.is_empty() {
        anyhow::bail!(tf!("play.empty_name", spec));
    }
    Ok((name.to_string(), ai))
}

fn build_setup(specs: &[String]) -> Result<GameSetup> {
    let mut setup = GameSetup::new();
    if specs.is_empty() {
        for index in 0..2 {
            setup.add_or_update_player(format!("AI {}", index + 1), Some(AiKind::Basic), index, "");
        }
        return Ok(setup);
    }
    for (index, spec) in specs.iter().enumerate() {
        let (name, ai) = parse_player_spec(spec)?;
        setup.add_or_update_player(name, ai, index, "");
    }
    Ok(setup)
}

/// 排行榜分数为 i32，超出范围的信用点无法记录
fn leaderboard_score(credits: u32) -> Result<i32> {
    i32::try_from(credits).with_context(|| tf!("play.score_out_of_range", credits))
}

/// 处理对局命令
pub fn handle_play(args: PlayArgs) -> Result<()> {
    let config = Config::snapshot();
    let seed = resolve_seed(&config);
    let setup = build_setup(&args.players)?;
    let names = NameGenerator::from_settings(&config.map)?;

    let mut game = GameController::generate(&setup, &config, &names, seed)
        .with_context(|| t!("play.setup_failed"))?;
    let humans: Vec<_> = game
        .state()
        .players()
        .iter()
        .filter(|p| !p.is_ai())
        .map(|p| p.id())
        .collect();
    for player in humans {
        game.set_agent(player, Box::new(ConsoleAgent::stdin()))?;
    }

    if !args.json {
        Logger::info(tf!("play.start", setup.player_count(), seed));
    }
    let summary = game.start_game().with_context(|| t!("play.game_failed"))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        render_game_summary(&summary, seed);
    }

    if !args.no_save {
        let leaderboard = Leaderboard::new(&config.leaderboard.path);
        for standing in &summary.standings {
            leaderboard.save_player_data(
                &standing.name,
                leaderboard_score(standing.credits)?,
                standing.ai.is_some(),
            )?;
        }
        if !args.json {
            Logger::success(tf!("play.saved", config.leaderboard.path.display()));
        }
    }
    Ok(())
}

// ============================================================================
// 终端玩家
// ============================================================================

/// 从输入流读取选择的玩家代理
///
/// 输入结束时返回 `None`，游戏随之结束。
pub struct ConsoleAgent {
    reader: Box<dyn FnMut(&mut String) -> io::Result<usize> + Send>,
}

impl ConsoleAgent {
    /// 读取共享的标准输入（多个终端玩家轮流输入）
    pub fn stdin() -> Self {
        Self {
            reader: Box::new(|line| io::stdin().read_line(line)),
        }
    }

    pub fn from_reader<R: BufRead + Send + 'static>(mut reader: R) -> Self {
        Self {
            reader: Box::new(move |line| reader.read_line(line)),
        }
    }

    fn read_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match (self.reader)(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim().to_string()),
        }
    }
}

impl PlayerAgent for ConsoleAgent {
    fn next_action(&mut self, view: &AgentView<'_>) -> Option<PlayerAction> {
        let options = ConsoleOptions::from_view(view)?;
        loop {
            options.prompt(view);
            let line = self.read_line()?;
            match options.parse(&line) {
                Some(action) => return Some(action),
                None => Logger::warn(tf!("play.invalid_input", line)),
            }
        }
    }
}

/// 当前目标下可供选择的编号列表
#[derive(Debug, Clone, PartialEq)]
enum ConsoleOptions {
    Confirm(PlayerAction),
    Edges {
        objective: PlayerObjective,
        edges: Vec<EdgeKey>,
    },
    Tiles(Vec<TilePosition>),
    YesNo,
}

impl ConsoleOptions {
    /// 空闲时没有可选项
    fn from_view(view: &AgentView<'_>) -> Option<Self> {
        let state = view.player_state;
        let options = match view.objective() {
            PlayerObjective::RollDice => Self::Confirm(PlayerAction::RollDice),
            PlayerObjective::ChooseCities => Self::Confirm(PlayerAction::ChooseCities),
            PlayerObjective::PlaceRail => Self::Edges {
                objective: PlayerObjective::PlaceRail,
                edges: state.buildable_rails.iter().copied().collect(),
            },
            PlayerObjective::ChoosePath => Self::Edges {
                objective: PlayerObjective::ChoosePath,
                edges: state.choosable_edges.iter().copied().collect(),
            },
            PlayerObjective::ConfirmPath => Self::YesNo,
            PlayerObjective::Drive => Self::Tiles(state.drivable_tiles.keys().copied().collect()),
            PlayerObjective::Idle => return None,
        };
        Some(options)
    }

    fn prompt(&self, view: &AgentView<'_>) {
        let name = view
            .state
            .player(view.player)
            .map(|p| p.name().to_string())
            .unwrap_or_default();
        Logger::info(tf!(
            "play.prompt_header",
            name,
            view.objective(),
            view.state.credits(view.player)
        ));
        match self {
            Self::Confirm(_) => Logger::info(t!("play.prompt_enter")),
            Self::Edges { objective, edges } => {
                for (index, edge) in edges.iter().enumerate() {
                    Logger::info(format!("  [{}] {}", index + 1, edge));
                }
                if *objective == PlayerObjective::PlaceRail {
                    Logger::info(tf!("play.prompt_build", view.player_state.building_budget));
                } else {
                    Logger::info(t!("play.prompt_rent"));
                }
            }
            Self::Tiles(tiles) => {
                for (index, tile) in tiles.iter().enumerate() {
                    Logger::info(format!("  [{}] {}", index + 1, tile));
                }
                Logger::info(tf!("play.prompt_drive", view.state.dice_roll()));
            }
            Self::YesNo => Logger::info(tf!(
                "play.prompt_confirm",
                view.player_state.rented_edges.len(),
                view.player_state.has_path
            )),
        }
        let _ = io::stdout().flush();
    }

    /// 解析一行输入；无效时返回 `None`
    fn parse(&self, line: &str) -> Option<PlayerAction> {
        match self {
            Self::Confirm(action) => Some(action.clone()),
            Self::Edges { objective, edges } => {
                let chosen = parse_indices(line, edges.len())?;
                let picked = chosen.iter().map(|i| edges[*i]);
                match objective {
                    PlayerObjective::PlaceRail if chosen.is_empty() => {
                        Some(PlayerAction::ConfirmBuild)
                    }
                    PlayerObjective::PlaceRail => Some(PlayerAction::BuildRails(picked.collect())),
                    _ => Some(PlayerAction::ChooseRails(picked.collect::<BTreeSet<_>>())),
                }
            }
            Self::Tiles(tiles) => {
                let chosen = parse_indices(line, tiles.len())?;
                match chosen.as_slice() {
                    [index] => Some(PlayerAction::Drive(tiles[*index])),
                    _ => None,
                }
            }
            Self::YesNo => match line.to_lowercase().as_str() {
                "" | "y" | "yes" => Some(PlayerAction::ConfirmDrive(true)),
                "n" | "no" => Some(PlayerAction::ConfirmDrive(false)),
                _ => None,
            },
        }
    }
}

/// 解析以空格或逗号分隔的 1 起编号，返回 0 起下标
fn parse_indices(line: &str, len: usize) -> Option<Vec<usize>> {
    line.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<usize>()
                .ok()
                .filter(|n| (1..=len).contains(n))
                .map(|n| n - 1)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::grid::tests::{key, small_grid};
    use crate::core::player_controller::PlayerState;
    use crate::core::state::GameState;
    use crate::models::player::PlayerId;
    use crate::models::position::TilePosition;
    use std::io::Cursor;

    #[test]
    fn player_specs() {
        assert_eq!(parse_player_spec("Alice").unwrap(), ("Alice".to_string(), None));
        assert_eq!(
            parse_player_spec("Bot:basic").unwrap(),
            ("Bot".to_string(), Some(AiKind::Basic))
        );
        assert!(parse_player_spec("Bot:genius").is_err());
        assert!(parse_player_spec(":basic").is_err());
    }

    #[test]
    fn default_setup_has_two_ai_players() {
        let setup = build_setup(&[]).unwrap();
        assert_eq!(setup.player_count(), 2);
        assert!(setup.is_player_ai(0) && setup.is_player_ai(1));
    }

    #[test]
    fn scores_outside_i32_are_rejected() {
        assert_eq!(leaderboard_score(26).unwrap(), 26);
        assert_eq!(leaderboard_score(i32::MAX as u32).unwrap(), i32::MAX);
        assert!(leaderboard_score(i32::MAX as u32 + 1).is_err());
    }

    #[test]
    fn indices_are_validated() {
        assert_eq!(parse_indices("1 3", 3), Some(vec![0, 2]));
        assert_eq!(parse_indices("2,1", 2), Some(vec![1, 0]));
        assert_eq!(parse_indices("", 2), Some(vec![]));
        assert_eq!(parse_indices("4", 3), None);
        assert_eq!(parse_indices("x", 3), None);
    }

    #[test]
    fn console_agent_reads_choices() {
        let state = GameState::new(small_grid(), Vec::new());
        let edge = key((-2, 0), (-1, 0));
        let mut player_state = PlayerState {
            objective: PlayerObjective::PlaceRail,
            ..PlayerState::default()
        };
        player_state.buildable_rails.insert(edge);
        let view = AgentView {
            state: &state,
            player: PlayerId(1),
            player_state: &player_state,
        };

        // 第一行越界被拒绝，随后选择 1，再以空行结束建造
        let mut agent = ConsoleAgent::from_reader(Cursor::new("7\n1\n\n"));
        assert_eq!(agent.next_action(&view), Some(PlayerAction::BuildRails(vec![edge])));
        assert_eq!(agent.next_action(&view), Some(PlayerAction::ConfirmBuild));
        // 输入结束
        assert_eq!(agent.next_action(&view), None);
    }

    #[test]
    fn console_agent_drives_and_confirms() {
        let state = GameState::new(small_grid(), Vec::new());
        let tile = TilePosition::new(-1, 0);
        let mut player_state = PlayerState {
            objective: PlayerObjective::Drive,
            ..PlayerState::default()
        };
        player_state.drivable_tiles.insert(tile, vec![TilePosition::new(-2, 0), tile]);
        let view = AgentView {
            state: &state,
            player: PlayerId(1),
            player_state: &player_state,
        };
        let mut agent = ConsoleAgent::from_reader(Cursor::new("1 1\n1\nn\n"));
        assert_eq!(agent.next_action(&view), Some(PlayerAction::Drive(tile)));

        player_state.objective = PlayerObjective::ConfirmPath;
        let view = AgentView {
            state: &state,
            player: PlayerId(1),
            player_state: &player_state,
        };
        assert_eq!(agent.next_action(&view), Some(PlayerAction::ConfirmDrive(false)));
    }
}
