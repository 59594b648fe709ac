// ============================================================================
// HexRail - 结果汇总组件
// ============================================================================
//
// 文件: src/ui/summary.rs
// 职责: 对局、锦标赛、排行榜与地图的终端展示
// 边界:
//   - ✅ 汇总信息格式化输出
//   - ✅ 地图字符画
//   - ✅ 国际化文本支持
//   - ❌ 不应包含游戏规则
//   - ❌ 不应包含文件操作
//
// ============================================================================

use std::io::{self, Write};
use std::time::Duration;

use crate::core::game::{GameSummary, PlayerStanding};
use crate::core::grid::HexGrid;
use crate::core::leaderboard::{LeaderboardEntry, TIMESTAMP_FORMAT};
use crate::core::tournament::TournamentReport;
use crate::models::board::TileType;
use crate::utils::colors::Colors;
use crate::utils::constants::{icons, map_chars};
use crate::utils::logger::Logger;
use crate::utils::styles::TextStyles;
use crate::{t, tf};

const SEPARATOR_WIDTH: usize = 39;
const NAME_WIDTH: usize = 20;

fn header(title: &str) {
    Logger::info("");
    Logger::info(TextStyles::bold(title));
    Logger::info(TextStyles::separator(SEPARATOR_WIDTH));
}

// ============================================================================
// 对局汇总
// ============================================================================

/// 渲染单局结果
pub fn render_game_summary(summary: &GameSummary, seed: u64) {
    header(&t!("summary.game_title"));
    Logger::info(format!("{} {}", icons::INIT, tf!("summary.seed", seed)));
    Logger::info(format!(
        "{} {}",
        icons::STAGE,
        tf!("summary.rounds", summary.building_rounds, summary.driving_rounds)
    ));
    Logger::info(format!(
        "{} {}",
        icons::CITY,
        tf!("summary.cities", summary.connected_cities, summary.total_cities)
    ));
    Logger::info("");

    for (rank, standing) in summary.standings.iter().enumerate() {
        Logger::info(standing_line(rank + 1, standing, summary.winner == Some(standing.id)));
    }

    Logger::info("");
    match summary.winner_standing() {
        Some(winner) => Logger::success(format!(
            "{} {}",
            icons::WINNER,
            tf!("summary.winner", Colors::player(&winner.name, &winner.color), winner.credits)
        )),
        None => Logger::warn(t!("summary.no_winner")),
    }
    let _ = io::stdout().flush();
}

fn standing_line(rank: usize, standing: &PlayerStanding, winner: bool) -> String {
    let icon = if winner {
        icons::WINNER
    } else if standing.ai.is_some() {
        icons::AI
    } else {
        icons::PLAYER
    };
    let name = Colors::player(&TextStyles::pad(&standing.name, NAME_WIDTH), &standing.color);
    let kind = match standing.ai {
        Some(kind) => kind.to_string(),
        None => t!("summary.human"),
    };
    format!(
        "{:>2}. {} {} {} {} {}",
        rank,
        icon,
        name,
        icons::RAIL,
        tf!("summary.standing", standing.credits, standing.rails),
        TextStyles::dimmed(&format!("({})", kind))
    )
}

// ============================================================================
// 锦标赛汇总
// ============================================================================

/// 渲染锦标赛统计
pub fn render_tournament_report(report: &TournamentReport, elapsed: Duration) {
    header(&t!("summary.tournament_title"));
    Logger::info(format!("{} {}", icons::SUMMARY, tf!("summary.total_games", report.games)));
    Logger::info(format!("{} {}", icons::SUCCESS, tf!("summary.finished_games", report.finished)));
    Logger::info(format!("{} {}", icons::ERROR, tf!("summary.failed_games", report.failed.len())));
    if report.timed_out > 0 {
        Logger::info(format!("{} {}", icons::TIME, tf!("summary.timed_out_games", report.timed_out)));
    }
    if report.cancelled > 0 {
        Logger::info(format!("{} {}", icons::SKIP, tf!("summary.cancelled_games", report.cancelled)));
    }
    Logger::info(format!(
        "{} {}",
        icons::STAGE,
        tf!(
            "summary.average_rounds",
            format!("{:.1}", report.average_building_rounds),
            format!("{:.1}", report.average_driving_rounds)
        )
    ));

    if report.finished > 0 {
        Logger::info("");
        Logger::info(TextStyles::underline(&t!("summary.seats")));
        for seat in &report.seats {
            Logger::info(tf!(
                "summary.seat_line",
                seat.seat,
                seat.wins,
                format!("{:.1}", seat.win_rate() * 100.0),
                format!("{:.1}", seat.average_credits())
            ));
        }
    }

    if !report.failed.is_empty() {
        Logger::info("");
        for (id, error) in &report.failed {
            Logger::error(format!("{} {} {}", id, icons::ARROW, error));
        }
    }

    Logger::info("");
    Logger::info(format!(
        "{} {}",
        icons::TIME,
        tf!("summary.duration", format!("{:.2}", elapsed.as_secs_f64()))
    ));
    let _ = io::stdout().flush();
}

// ============================================================================
// 排行榜
// ============================================================================

/// 渲染排行榜表格（条目须已排序）
pub fn render_leaderboard(entries: &[LeaderboardEntry]) {
    Logger::info(TextStyles::bold(&format!(
        "{:>4}  {} {:<4} {:<19} {:>6}",
        t!("leaderboard.rank"),
        TextStyles::pad(&t!("leaderboard.player"), NAME_WIDTH),
        t!("leaderboard.ai"),
        t!("leaderboard.time"),
        t!("leaderboard.score"),
    )));
    Logger::info(TextStyles::separator(SEPARATOR_WIDTH + 20));

    for (index, entry) in entries.iter().enumerate() {
        let ai = if entry.ai { icons::AI } else { icons::PLAYER };
        Logger::info(format!(
            "{:>4}  {} {:<4} {} {:>6}",
            index + 1,
            TextStyles::pad(&entry.player_name, NAME_WIDTH),
            ai,
            TextStyles::dimmed(&entry.timestamp.format(TIMESTAMP_FORMAT).to_string()),
            entry.score
        ));
    }
}

// ============================================================================
// 地图
// ============================================================================

/// 渲染地图概况与城市列表
pub fn render_map_summary(grid: &HexGrid) {
    let mountains = grid
        .tiles()
        .values()
        .filter(|tile| tile.tile_type == TileType::Mountain)
        .count();

    header(&t!("map.summary_title"));
    Logger::info(format!(
        "{} {}",
        icons::SUMMARY,
        tf!("map.tile_count", grid.tiles().len(), mountains)
    ));
    Logger::info(format!(
        "{} {}",
        icons::CITY,
        tf!("map.city_count", grid.cities().len(), grid.starting_cities().len())
    ));

    for city in grid.cities().values() {
        let marker = if city.is_starting_city {
            map_chars::STARTING_CITY
        } else {
            map_chars::CITY
        };
        Logger::info(format!(
            "  {} {} {}",
            marker,
            TextStyles::pad(&city.name, NAME_WIDTH),
            TextStyles::dimmed(&city.position.to_string())
        ));
    }
}

/// 绘制地图字符画
pub fn render_map(grid: &HexGrid) {
    println!();
    for line in map_lines(grid) {
        let colored: String = line.chars().map(colorize_map_char).collect();
        println!("  {}", colored);
    }
    println!();
    Logger::info(TextStyles::dimmed(&tf!(
        "map.legend",
        map_chars::STARTING_CITY,
        map_chars::CITY,
        map_chars::MOUNTAIN,
        map_chars::PLAIN
    )));
}

fn colorize_map_char(c: char) -> String {
    let text = c.to_string();
    match c {
        map_chars::STARTING_CITY => Colors::warn(&text),
        map_chars::CITY => Colors::success(&text),
        map_chars::MOUNTAIN => Colors::secondary(&text),
        _ => text,
    }
}

/// 地图的纯文本行，每个 r 一行，列号为 `2q + r`
pub fn map_lines(grid: &HexGrid) -> Vec<String> {
    let positions = grid.tiles().keys();
    let column = |q: i32, r: i32| 2 * q + r;
    let (Some(min_col), Some(max_col), Some(min_r), Some(max_r)) = (
        positions.clone().map(|p| column(p.q, p.r)).min(),
        positions.clone().map(|p| column(p.q, p.r)).max(),
        positions.clone().map(|p| p.r).min(),
        positions.map(|p| p.r).max(),
    ) else {
        return Vec::new();
    };

    let width = (max_col - min_col + 1) as usize;
    let height = (max_r - min_r + 1) as usize;
    let mut rows = vec![vec![map_chars::EMPTY; width]; height];

    for tile in grid.tiles().values() {
        let p = tile.position;
        let symbol = match grid.city_at(p) {
            Some(city) if city.is_starting_city => map_chars::STARTING_CITY,
            Some(_) => map_chars::CITY,
            None => tile.tile_type.symbol(),
        };
        rows[(p.r - min_r) as usize][(column(p.q, p.r) - min_col) as usize] = symbol;
    }

    rows.into_iter()
        .map(|row| row.into_iter().collect::<String>().trim_end().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::grid::tests::small_grid;

    #[test]
    fn map_lines_offset_rows_by_r() {
        let lines = map_lines(&small_grid());
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[0], "   · · · ·");
        assert_eq!(lines[1], "  · · · ◉ ·");
        assert_eq!(lines[3], "· ★ · · · ▲ ·");
        assert_eq!(lines[5], "  · · · ◉ ·");
        assert_eq!(lines[6], "   · · · ·");
    }

    #[test]
    fn map_lines_of_empty_grid() {
        let grid = HexGrid::new(Vec::new(), Vec::new(), Default::default());
        assert!(map_lines(&grid).is_empty());
    }
}
