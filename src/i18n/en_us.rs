// ============================================================================
// HexRail - English Translation Table
// ============================================================================
//
// 文件: src/i18n/en_us.rs
// 职责: English translation content definition
// 边界:
//   - ✅ English translation strings definition
//   - ❌ Should not contain translation logic
//   - ❌ Should not contain other language translations
//
// ============================================================================

/// English translation table
pub const TRANSLATIONS: &[(&str, &str)] = &[
    // Scheduler related
    ("scheduler.task_start", "Starting game: {}"),
    (
        "scheduler.fail_fast_triggered",
        "Game {} failed, cancelling the remaining games",
    ),
    ("scheduler.task_success", "Game {} finished in {}s"),
    ("scheduler.task_failed", "Game {} failed after {}s: {}"),
    ("scheduler.task_timeout", "Game {} timed out after {}s"),
    ("scheduler.task_cancelled", "Game {} was cancelled"),
    ("scheduler.batch_start", "Scheduling {} games"),
    ("scheduler.task_join_error", "Game worker panicked: {}"),
    ("scheduler.batch_complete", "{} of {} games finished"),
    ("scheduler.stopping_all_tasks", "Stopping all running games..."),
    // Init command related
    ("init.start", "Initializing HexRail configuration..."),
    ("init.config_exists", "Config file already exists: {}"),
    ("init.use_force_hint", "Use --force to overwrite the existing file"),
    ("init.config_created", "Config file created: {}"),
    (
        "init.next_steps",
        "You can now edit the config file to tune rules, map and execution settings",
    ),
    ("init.create_failed", "Failed to create config file: {}"),
    // Map command related
    ("map.generation_failed", "Map generation failed"),
    ("map.generated", "Map generated with seed {}"),
    ("map.summary_title", "Map Overview"),
    ("map.tile_count", "{} tiles, {} mountains"),
    ("map.city_count", "{} cities, {} starting cities"),
    ("map.legend", "{} starting city  {} city  {} mountain  {} plain"),
    // Play command related
    ("play.empty_name", "Player name must not be empty: '{}'"),
    ("play.setup_failed", "Failed to set up the game"),
    ("play.game_failed", "The game was aborted"),
    ("play.start", "Starting a game with {} players, seed {}"),
    ("play.saved", "Results saved to {}"),
    ("play.score_out_of_range", "Credits {} do not fit into a leaderboard score"),
    ("play.invalid_input", "Invalid input: '{}'"),
    ("play.prompt_header", "{} | {} | credits: {}"),
    ("play.prompt_enter", "Press Enter to continue"),
    (
        "play.prompt_build",
        "Select rails to build (e.g. 1 3), budget left: {}; empty input ends the turn",
    ),
    (
        "play.prompt_rent",
        "Select rails to rent (e.g. 1 3); empty input confirms",
    ),
    ("play.prompt_drive", "Dice roll {}: select a tile to drive to"),
    (
        "play.prompt_confirm",
        "Renting {} rails, path complete: {}. Confirm? [y/n]",
    ),
    // Tournament related
    ("tournament.running", "Running games"),
    (
        "tournament.start",
        "Running {} games with {} players each (seed {}, concurrency {})",
    ),
    (
        "tournament.invalid_players",
        "Invalid player count {}: must be between {} and {}",
    ),
    ("tournament.failed_games", "{} games failed"),
    // Summary related
    ("summary.game_title", "Game Summary"),
    ("summary.seed", "Seed: {}"),
    ("summary.rounds", "Building rounds: {}, driving rounds: {}"),
    ("summary.cities", "Connected cities: {}/{}"),
    ("summary.standing", "{} credits, {} rails"),
    ("summary.human", "human"),
    ("summary.winner", "Winner: {} with {} credits"),
    ("summary.no_winner", "No winner"),
    ("summary.tournament_title", "Tournament Summary"),
    ("summary.total_games", "Total games: {}"),
    ("summary.finished_games", "Finished: {}"),
    ("summary.failed_games", "Failed: {}"),
    ("summary.timed_out_games", "Timed out: {}"),
    ("summary.cancelled_games", "Cancelled: {}"),
    (
        "summary.average_rounds",
        "Average rounds: {} building, {} driving",
    ),
    ("summary.seats", "Seats"),
    (
        "summary.seat_line",
        "  Seat {}: {} wins ({}%), average credits {}",
    ),
    ("summary.duration", "Total time: {}s"),
    // Leaderboard related
    ("leaderboard.title", "Leaderboard"),
    ("leaderboard.empty", "No leaderboard entries in {}"),
    ("leaderboard.rank", "#"),
    ("leaderboard.player", "Player"),
    ("leaderboard.ai", "AI"),
    ("leaderboard.time", "Time"),
    ("leaderboard.score", "Score"),
];
