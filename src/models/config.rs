// ============================================================================
// HexRail - 配置数据模型
// ============================================================================
//
// 文件: src/models/config.rs
// 职责: 配置文件数据结构定义和操作
// 边界:
//   - ✅ 配置文件数据结构定义（规则、地图、执行、输出、国际化、排行榜）
//   - ✅ 配置序列化/反序列化
//   - ✅ 配置验证和默认值
//   - ✅ 配置文件读写操作
//   - ✅ 全局配置访问
//   - ❌ 不应包含游戏流程逻辑
//   - ❌ 不应包含 CLI 参数处理
//
// ============================================================================

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use crate::models::board::TileType;

/// 全局配置管理器
static GLOBAL_CONFIG: std::sync::OnceLock<Arc<RwLock<Config>>> = std::sync::OnceLock::new();

/// 默认配置文件名
pub const CONFIG_FILE_NAME: &str = "hexrail.toml";

/// HexRail 配置文件结构
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// 游戏规则
    #[serde(default)]
    pub rules: Rules,
    /// 地图生成配置
    #[serde(default)]
    pub map: MapSettings,
    /// 执行配置
    #[serde(default)]
    pub execution: ExecutionConfig,
    /// 输出配置
    #[serde(default)]
    pub output: OutputConfig,
    /// 国际化配置
    #[serde(default)]
    pub i18n: I18nConfig,
    /// 排行榜配置
    #[serde(default)]
    pub leaderboard: LeaderboardConfig,
}

/// 游戏规则常量
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    /// 骰子面数（最大 9）
    pub dice_sides: u32,
    /// 起始城市数量
    pub number_of_starting_cities: usize,
    /// 棋盘上的城市数量（需为偶数）
    pub number_of_cities: usize,
    /// 剩余未连接城市数达到该值时进入驾驶阶段
    pub unconnected_cities_start_threshold: usize,
    /// 最少玩家数
    pub min_players: usize,
    /// 最多玩家数
    pub max_players: usize,
    /// 初始信用点
    pub starting_credits: u32,
    /// 第一个连接城市的玩家获得的奖励
    pub city_connection_bonus: u32,
    /// 最多可租用的铁轨段数
    pub max_rentable_distance: usize,
    /// 驾驶阶段第 i 个到达的玩家获得的信用点
    pub winning_credits: Vec<u32>,
    /// 驾驶阶段的建造预算
    pub max_building_budget_driving_phase: u32,
    /// 驾驶阶段每隔多少轮可以建造一次
    pub driving_phase_build_interval: u32,
    /// 建造费用
    pub building_cost: BuildingCosts,
    /// 驾驶费用
    pub driving_cost: DrivingCosts,
    /// 平行铁轨费用
    pub parallel_cost: ParallelCosts,
}

/// 按两端地块类型集合计算的建造费用
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildingCosts {
    pub plain: u32,
    pub plain_mountain: u32,
    pub mountain: u32,
}

/// 按（出发, 到达）地块类型计算的驾驶费用
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrivingCosts {
    pub plain_to_plain: u32,
    pub plain_to_mountain: u32,
    pub mountain_to_mountain: u32,
    pub mountain_to_plain: u32,
}

/// 在他人铁轨旁建造时需支付的费用
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallelCosts {
    /// 同一条边上已有他人铁轨
    pub same_edge: u32,
    /// 同一条边上已有他人铁轨且一端为城市
    pub same_edge_at_city: u32,
    /// 同一地块上已有他人铁轨
    pub shared_tile: u32,
}

/// 地图生成配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapSettings {
    /// 地图规模，越大地图越大
    pub scale: u32,
    /// 城市基础生成概率
    pub city_base_probability: f64,
    /// 海岸地块的城市生成概率
    pub city_at_coast_probability: f64,
    /// 靠近山地时的城市生成概率
    pub city_near_mountain_probability: f64,
    /// 检查山地的半径
    pub city_near_mountain_radius: i32,
    /// 靠近其他城市时的城市生成概率
    pub city_near_city_probability: f64,
    /// 检查其他城市的半径
    pub city_near_city_radius: i32,
    /// 城市名称最大长度
    pub city_name_length: usize,
    /// 自定义城市名称训练文件（每行一个）
    pub town_names_file: Option<PathBuf>,
    /// 随机种子（不设置则每次随机）
    pub seed: Option<u64>,
}

/// 执行配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// 锦标赛最大并发数
    #[serde(default)]
    pub max_concurrency: usize,
    /// 单局超时时间（秒，0 表示不限制）
    #[serde(default)]
    pub game_timeout: u32,
    /// 单阶段最大轮数
    #[serde(default)]
    pub max_rounds: u32,
    /// 单次等待动作时允许的最大非法动作次数
    #[serde(default)]
    pub max_illegal_actions: u32,
    /// 失败时是否继续
    #[serde(default)]
    pub continue_on_failure: bool,
}

/// 输出配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// 是否显示进度条
    #[serde(default)]
    pub show_progress: bool,
    /// 是否详细输出
    #[serde(default)]
    pub verbose: bool,
    /// 是否彩色输出
    #[serde(default)]
    pub colored: bool,
}

/// 国际化配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct I18nConfig {
    /// 界面语言
    #[serde(default)]
    pub language: String,
}

/// 排行榜配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardConfig {
    /// CSV 文件路径
    #[serde(default)]
    pub path: PathBuf,
}

/// CLI 运行时参数（用于覆盖配置文件）
#[derive(Debug, Clone, Default)]
pub struct RuntimeArgs {
    pub verbose: Option<bool>,
    pub colored: Option<bool>,
    pub show_progress: Option<bool>,
    pub max_concurrency: Option<usize>,
    pub game_timeout: Option<u32>,
    pub continue_on_failure: Option<bool>,
    pub seed: Option<u64>,
    pub language: Option<String>,
    pub leaderboard_path: Option<PathBuf>,
}

impl Rules {
    /// 根据两端地块类型集合获取建造费用
    pub fn building_cost_for(&self, types: &BTreeSet<TileType>) -> u32 {
        let has_plain = types.contains(&TileType::Plain);
        let has_mountain = types.contains(&TileType::Mountain);
        match (has_plain, has_mountain) {
            (true, true) => self.building_cost.plain_mountain,
            (false, true) => self.building_cost.mountain,
            _ => self.building_cost.plain,
        }
    }

    /// 根据（出发, 到达）地块类型获取驾驶费用
    pub fn driving_cost_for(&self, from: TileType, to: TileType) -> u32 {
        match (from, to) {
            (TileType::Plain, TileType::Plain) => self.driving_cost.plain_to_plain,
            (TileType::Plain, TileType::Mountain) => self.driving_cost.plain_to_mountain,
            (TileType::Mountain, TileType::Mountain) => self.driving_cost.mountain_to_mountain,
            (TileType::Mountain, TileType::Plain) => self.driving_cost.mountain_to_plain,
        }
    }

    /// 校验规则的一致性
    pub fn validate(&self) -> Result<(), String> {
        if self.dice_sides == 0 || self.dice_sides > 9 {
            return Err(format!("dice_sides must be in 1..=9, got {}", self.dice_sides));
        }
        if self.number_of_cities % 2 != 0 {
            return Err(format!(
                "number_of_cities must be even, got {}",
                self.number_of_cities
            ));
        }
        if self.number_of_starting_cities == 0
            || self.number_of_starting_cities > self.number_of_cities
        {
            return Err(format!(
                "number_of_starting_cities must be in 1..={}, got {}",
                self.number_of_cities, self.number_of_starting_cities
            ));
        }
        if self.min_players == 0 || self.min_players > self.max_players {
            return Err(format!(
                "invalid player bounds: min {} max {}",
                self.min_players, self.max_players
            ));
        }
        if self.driving_phase_build_interval == 0 {
            return Err("driving_phase_build_interval must be positive".to_string());
        }
        Ok(())
    }
}

/// 配置默认值 trait - 不依赖全局配置初始化
pub trait ConfigDefaults {
    /// 获取默认最大并发数
    fn default_max_concurrency() -> usize {
        num_cpus::get()
    }

    /// 获取默认单局超时时间
    fn default_game_timeout() -> u32 {
        60
    }

    /// 获取默认单阶段最大轮数
    fn default_max_rounds() -> u32 {
        500
    }

    /// 获取默认非法动作上限
    fn default_max_illegal_actions() -> u32 {
        100
    }

    /// 获取默认是否失败时继续
    fn default_continue_on_failure() -> bool {
        true
    }

    /// 获取默认是否显示进度条
    fn default_show_progress() -> bool {
        true
    }

    /// 获取默认是否详细输出
    fn default_verbose() -> bool {
        false
    }

    /// 获取默认是否彩色输出
    fn default_colored() -> bool {
        true
    }

    /// 获取默认语言
    fn default_language() -> String {
        "en_us".to_string()
    }

    /// 获取默认排行榜路径
    fn default_leaderboard_path() -> PathBuf {
        PathBuf::from("leaderboard.csv")
    }
}

impl ConfigDefaults for Config {}

impl Config {
    /// 初始化全局配置（程序启动时调用）
    pub fn initialize() -> anyhow::Result<()> {
        let config = Self::load_config()?;
        GLOBAL_CONFIG
            .set(Arc::new(RwLock::new(config)))
            .map_err(|_| anyhow::anyhow!("Global config already initialized"))?;
        Ok(())
    }

    /// 加载配置文件
    fn load_config() -> anyhow::Result<Self> {
        let config_path = PathBuf::from(CONFIG_FILE_NAME);
        if config_path.exists() {
            Self::load_from_file(&config_path)
        } else {
            // 如果配置文件不存在，使用默认配置
            Ok(Self::default())
        }
    }

    /// 从指定文件加载并校验配置
    pub fn load_from_file(config_path: &PathBuf) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(config_path)?;
        let config: Config = toml::from_str(&content)?;
        config.rules.validate().map_err(|e| anyhow::anyhow!(e))?;
        Ok(config)
    }

    /// 合并运行时参数
    pub fn merge_runtime_args(args: RuntimeArgs) -> anyhow::Result<()> {
        let global_config = GLOBAL_CONFIG
            .get()
            .ok_or_else(|| anyhow::anyhow!("Global config not initialized"))?;

        let mut config = global_config
            .write()
            .map_err(|_| anyhow::anyhow!("Failed to acquire config write lock"))?;

        config.apply_runtime_args(args);
        Ok(())
    }

    /// 将运行时参数应用到当前配置
    pub fn apply_runtime_args(&mut self, args: RuntimeArgs) {
        if let Some(verbose) = args.verbose {
            self.output.verbose = verbose;
        }
        if let Some(colored) = args.colored {
            self.output.colored = colored;
        }
        if let Some(show_progress) = args.show_progress {
            self.output.show_progress = show_progress;
        }
        if let Some(max_concurrency) = args.max_concurrency {
            self.execution.max_concurrency = max_concurrency;
        }
        if let Some(game_timeout) = args.game_timeout {
            self.execution.game_timeout = game_timeout;
        }
        if let Some(continue_on_failure) = args.continue_on_failure {
            self.execution.continue_on_failure = continue_on_failure;
        }
        if let Some(seed) = args.seed {
            self.map.seed = Some(seed);
        }
        if let Some(language) = args.language {
            self.i18n.language = language;
        }
        if let Some(path) = args.leaderboard_path {
            self.leaderboard.path = path;
        }
    }

    /// 保存配置到文件
    pub fn save_to_file(&self, config_path: &PathBuf) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    /// 生成默认配置模板并保存到文件
    pub fn create_default_config_file(config_path: &PathBuf) -> anyhow::Result<()> {
        Self::default().save_to_file(config_path)
    }

    /// 获取当前全局配置的快照（未初始化时为默认配置）
    pub fn snapshot() -> Config {
        GLOBAL_CONFIG
            .get()
            .and_then(|config| config.read().ok().map(|c| c.clone()))
            .unwrap_or_default()
    }

    /// 获取界面语言
    pub fn get_language() -> anyhow::Result<String> {
        let global_config = GLOBAL_CONFIG
            .get()
            .ok_or_else(|| anyhow::anyhow!("Global config not initialized"))?;

        let config = global_config
            .read()
            .map_err(|_| anyhow::anyhow!("Failed to acquire config read lock"))?;

        Ok(config.i18n.language.clone())
    }

    /// 获取是否彩色输出（带默认值）
    pub fn get_colored() -> bool {
        GLOBAL_CONFIG
            .get()
            .and_then(|config| config.read().ok().map(|c| c.output.colored))
            .unwrap_or_else(Self::default_colored)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rules: Rules::default(),
            map: MapSettings::default(),
            execution: ExecutionConfig::default(),
            output: OutputConfig::default(),
            i18n: I18nConfig::default(),
            leaderboard: LeaderboardConfig::default(),
        }
    }
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            dice_sides: 6,
            number_of_starting_cities: 3,
            number_of_cities: 10,
            unconnected_cities_start_threshold: 3,
            min_players: 2,
            max_players: 6,
            starting_credits: 20,
            city_connection_bonus: 6,
            max_rentable_distance: 10,
            winning_credits: vec![20, 10],
            max_building_budget_driving_phase: 10,
            driving_phase_build_interval: 3,
            building_cost: BuildingCosts::default(),
            driving_cost: DrivingCosts::default(),
            parallel_cost: ParallelCosts::default(),
        }
    }
}

impl Default for BuildingCosts {
    fn default() -> Self {
        Self {
            plain: 1,
            plain_mountain: 3,
            mountain: 5,
        }
    }
}

impl Default for DrivingCosts {
    fn default() -> Self {
        Self {
            plain_to_plain: 1,
            plain_to_mountain: 2,
            mountain_to_mountain: 1,
            mountain_to_plain: 1,
        }
    }
}

impl Default for ParallelCosts {
    fn default() -> Self {
        Self {
            same_edge: 5,
            same_edge_at_city: 3,
            shared_tile: 1,
        }
    }
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            scale: 5,
            city_base_probability: 0.3,
            city_at_coast_probability: 0.1,
            city_near_mountain_probability: 0.05,
            city_near_mountain_radius: 1,
            city_near_city_probability: 0.001,
            city_near_city_radius: 3,
            city_name_length: 10,
            town_names_file: None,
            seed: None,
        }
    }
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            max_concurrency: Config::default_max_concurrency(),
            game_timeout: Config::default_game_timeout(),
            max_rounds: Config::default_max_rounds(),
            max_illegal_actions: Config::default_max_illegal_actions(),
            continue_on_failure: Config::default_continue_on_failure(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            show_progress: Config::default_show_progress(),
            verbose: Config::default_verbose(),
            colored: Config::default_colored(),
        }
    }
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            language: Config::default_language(),
        }
    }
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            path: Config::default_leaderboard_path(),
        }
    }
}
