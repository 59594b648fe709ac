// ============================================================================
// HexRail - 完整对局集成测试
// ============================================================================
//
// 文件: tests/game_flow.rs
// 职责: 通过公开 API 运行完整的 AI 对局
//
// ============================================================================

use hexrail::core::{GameController, GameState, HexGrid, NameGenerator};
use hexrail::models::board::{City, Tile, TileType};
use hexrail::models::config::{Config, Rules};
use hexrail::models::player::{AiKind, PlayerBuilder};
use hexrail::models::position::TilePosition;
use hexrail::models::setup::GameSetup;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn hand_built_grid() -> HexGrid {
    let mut tiles = Vec::new();
    TilePosition::for_each_spiral(TilePosition::ORIGIN, 4, |position, _| {
        let tile_type = if position == TilePosition::new(2, 0) {
            TileType::Mountain
        } else {
            TileType::Plain
        };
        tiles.push(Tile::new(position, tile_type));
        false
    });
    let cities = vec![
        City::new(TilePosition::new(-2, 0), "Altstadt", true),
        City::new(TilePosition::new(2, -2), "Bergheim", false),
        City::new(TilePosition::new(0, 2), "Seedorf", false),
    ];
    HexGrid::new(tiles, cities, Rules::default())
}

fn two_ai_setup() -> GameSetup {
    let mut setup = GameSetup::new();
    setup.add_or_update_player("AI 1", Some(AiKind::Basic), 0, "");
    setup.add_or_update_player("AI 2", Some(AiKind::Basic), 1, "");
    setup
}

#[test]
fn ai_game_on_hand_built_map_has_richest_winner() {
    let mut rng = StdRng::seed_from_u64(4);
    let players = (1..=2)
        .map(|id| PlayerBuilder::new(id).ai(Some(AiKind::Basic)).build(20, &mut rng))
        .collect();
    let state = GameState::new(hand_built_grid(), players);
    let mut game = GameController::new(state, 21).with_dice(|| 6);

    let summary = game.start_game().unwrap();
    let best = summary.standings.iter().map(|s| s.credits).max().unwrap();
    assert_eq!(summary.winner_standing().unwrap().credits, best);
    assert_eq!(summary.standings.len(), 2);
    assert!(game.state().is_game_over());
}

#[test]
fn generated_games_are_reproducible() {
    let config = Config::default();
    let names = NameGenerator::with_default_names(3);
    let setup = two_ai_setup();

    let run = || {
        GameController::generate(&setup, &config, &names, 2024)
            .and_then(|mut game| game.start_game())
            .map_err(|e| e.to_string())
    };
    let first = run();
    let second = run();
    assert_eq!(first, second);

    let summary = first.expect("default game should finish");
    assert_eq!(summary.total_cities, config.rules.number_of_cities);
    assert!(summary.building_rounds > 0);
    // 每个驾驶回合选出两座城市
    assert_eq!(
        summary.driving_rounds as usize,
        config.rules.number_of_cities / 2
    );
    let best = summary.standings.iter().map(|s| s.credits).max().unwrap();
    assert_eq!(summary.winner_standing().unwrap().credits, best);
}
