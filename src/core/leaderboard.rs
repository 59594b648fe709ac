// ============================================================================
// HexRail - 排行榜
// ============================================================================
//
// 文件: src/core/leaderboard.rs
// 职责: 排行榜 CSV 文件的读写
// 边界:
//   - ✅ 创建带表头的 CSV 文件
//   - ✅ 追加一条玩家成绩
//   - ✅ 读取并跳过表头与格式错误的行
//   - ✅ 排序视图
//   - ❌ 不应包含表格渲染（由 UI 负责）
//
// 文件格式:
//   PlayerName,AI,Timestamp,Score
//   Alice,false,2024-05-01 18:30:00,42
//
// ============================================================================

use chrono::{Local, NaiveDateTime};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{GameError, GameResult};

pub const CSV_HEADER: &str = "PlayerName,AI,Timestamp,Score";
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 排行榜中的一条记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub player_name: String,
    pub ai: bool,
    pub timestamp: NaiveDateTime,
    pub score: i32,
}

impl LeaderboardEntry {
    /// 解析一行 CSV，格式不正确时返回错误
    pub fn parse(line: &str) -> GameResult<Self> {
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        let [name, ai, timestamp, score] = fields.as_slice() else {
            return Err(GameError::Parse(format!("expected 4 fields: {}", line)));
        };
        if name.is_empty() {
            return Err(GameError::Parse(format!("empty player name: {}", line)));
        }
        let ai = ai
            .parse::<bool>()
            .map_err(|e| GameError::Parse(format!("AI flag '{}': {}", ai, e)))?;
        let timestamp = NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT)
            .map_err(|e| GameError::Parse(format!("timestamp '{}': {}", timestamp, e)))?;
        let score = score
            .parse::<i32>()
            .map_err(|e| GameError::Parse(format!("score '{}': {}", score, e)))?;

        Ok(Self {
            player_name: name.to_string(),
            ai,
            timestamp,
            score,
        })
    }

    pub fn to_csv_line(&self) -> String {
        format!(
            "{},{},{},{}",
            sanitize_name(&self.player_name),
            self.ai,
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.score
        )
    }
}

/// 名称中的逗号和换行会破坏行结构
fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| if c == ',' || c == '\n' || c == '\r' { ' ' } else { c })
        .collect::<String>()
        .trim()
        .to_string()
}

/// 排行榜文件
#[derive(Debug, Clone)]
pub struct Leaderboard {
    path: PathBuf,
}

impl Leaderboard {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 文件不存在时创建父目录并写入表头
    pub fn initialize_csv(&self) -> GameResult<()> {
        if self.path.exists() {
            return Ok(());
        }
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, format!("{}\n", CSV_HEADER))?;
        debug!(path = %self.path.display(), "leaderboard created");
        Ok(())
    }

    /// 以当前本地时间追加一条成绩
    pub fn save_player_data(&self, player_name: &str, score: i32, ai: bool) -> GameResult<()> {
        let entry = LeaderboardEntry {
            player_name: player_name.to_string(),
            ai,
            timestamp: Local::now().naive_local(),
            score,
        };
        self.append(&entry)
    }

    /// 追加一条记录；名称清理后为空时拒绝写入
    pub fn append(&self, entry: &LeaderboardEntry) -> GameResult<()> {
        if sanitize_name(&entry.player_name).is_empty() {
            return Err(GameError::InvalidName(entry.player_name.clone()));
        }
        self.initialize_csv()?;
        let mut file = OpenOptions::new().append(true).open(&self.path)?;
        writeln!(file, "{}", entry.to_csv_line())?;
        Ok(())
    }

    /// 读取全部记录（文件顺序），跳过表头和格式错误的行
    pub fn load_leaderboard_data(&self) -> GameResult<Vec<LeaderboardEntry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path)?;
        let entries = content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty() && line.trim() != CSV_HEADER)
            .filter_map(|(number, line)| match LeaderboardEntry::parse(line) {
                Ok(entry) => Some(entry),
                Err(error) => {
                    warn!(line = number + 1, %error, "skipping leaderboard row");
                    None
                }
            })
            .collect();
        Ok(entries)
    }

    /// 按分数降序，分数相同时较早的记录在前
    pub fn sorted_by_score(&self) -> GameResult<Vec<LeaderboardEntry>> {
        let mut entries = self.load_leaderboard_data()?;
        entries.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| a.timestamp.cmp(&b.timestamp))
        });
        Ok(entries)
    }

    pub fn top(&self, count: usize) -> GameResult<Vec<LeaderboardEntry>> {
        let mut entries = self.sorted_by_score()?;
        entries.truncate(count);
        Ok(entries)
    }
}
