// ============================================================================
// HexRail - 常量定义
// ============================================================================
//
// 文件: src/utils/constants.rs
// 职责: 应用程序常量和终端主题定义
// 边界:
//   - ✅ 应用程序常量定义
//   - ✅ 像素图标字符定义
//   - ✅ 颜色主题定义
//   - ❌ 不应包含动态配置
//   - ❌ 不应包含业务逻辑
//
// ============================================================================

/// 应用名称常量
pub const APP_NAME: &str = "HEXRAIL";

/// 像素风格图标
pub mod icons {
    /// 成功图标
    pub const SUCCESS: &str = "✓";
    /// 错误图标
    pub const ERROR: &str = "✗";
    /// 警告图标
    pub const WARNING: &str = "!";
    /// 玩家图标
    pub const PLAYER: &str = "●";
    /// AI 玩家图标
    pub const AI: &str = "◆";
    /// 阶段图标
    pub const STAGE: &str = "▪";
    /// 城市图标
    pub const CITY: &str = "◉";
    /// 铁轨图标
    pub const RAIL: &str = "═";
    /// 冠军图标
    pub const WINNER: &str = "★";
    /// 初始化图标
    pub const INIT: &str = "◈";
    /// 时间图标
    pub const TIME: &str = "⧖";
    /// 箭头图标
    pub const ARROW: &str = "→";
    /// 汇总图标
    pub const SUMMARY: &str = "◈";
    /// 跳过图标
    pub const SKIP: &str = "○";
}

/// 地图字符
pub mod map_chars {
    pub const PLAIN: char = '·';
    pub const MOUNTAIN: char = '▲';
    pub const CITY: char = '◉';
    pub const STARTING_CITY: char = '★';
    pub const EMPTY: char = ' ';
}

/// 进度条字符
pub mod progress_chars {
    /// 已完成块 + 当前块 + 未完成块（indicatif 格式）
    pub const BAR: &str = "█▓░";
}

/// 加载 spinner 字符
pub mod spinner_chars {
    pub const BASE: &str = "⠋⠙⠹⠸⠼⠴⠦⠧ ";
}

/// 颜色主题
pub mod colors {
    /// 主色调 - 青色
    pub const PRIMARY: &str = "cyan";
    /// 成功色 - 绿色
    pub const SUCCESS: &str = "green";
    /// 错误色 - 红色
    pub const ERROR: &str = "red";
    /// 警告色 - 黄色
    pub const WARNING: &str = "yellow";
    /// 次要色 - 灰色
    pub const SECONDARY: &str = "bright black";
    /// 进度条颜色
    pub const PROGRESS: &str = "cyan";
}
