// ============================================================================
// HexRail - 颜色工具
// ============================================================================
//
// 文件: src/utils/colors.rs
// 职责: 终端颜色输出和主题管理
// 边界:
//   - ✅ 日志级别颜色
//   - ✅ 玩家颜色（#rrggbb）输出
//   - ✅ 全局开关（--no-color）
//   - ❌ 不应包含业务逻辑
//   - ❌ 不应包含文本内容处理
//
// ============================================================================

use colored::{Color, Colorize};

use crate::utils::constants::colors as theme;

/// 颜色工具函数
pub struct Colors;

impl Colors {
    /// 根据配置开启或关闭所有颜色输出
    pub fn set_enabled(enabled: bool) {
        colored::control::set_override(enabled);
    }

    /// 按主题颜色名着色
    pub fn colorize(text: &str, color: &str) -> String {
        let color: Color = color.parse().unwrap_or(Color::White);
        text.color(color).to_string()
    }

    /// 信息颜色
    pub fn info(text: &str) -> String {
        Self::colorize(text, theme::PRIMARY)
    }

    /// 警告颜色
    pub fn warn(text: &str) -> String {
        Self::colorize(text, theme::WARNING)
    }

    /// 错误颜色
    pub fn error(text: &str) -> String {
        Self::colorize(text, theme::ERROR)
    }

    /// 成功颜色
    pub fn success(text: &str) -> String {
        Self::colorize(text, theme::SUCCESS)
    }

    /// 次要信息颜色
    pub fn secondary(text: &str) -> String {
        Self::colorize(text, theme::SECONDARY)
    }

    /// 以玩家颜色（#rrggbb）着色，格式不正确时原样返回
    pub fn player(text: &str, hex: &str) -> String {
        match parse_hex(hex) {
            Some((r, g, b)) => text.truecolor(r, g, b).to_string(),
            None => text.to_string(),
        }
    }
}

fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}
