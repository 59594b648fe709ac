// ============================================================================
// HexRail - 文本样式工具
// ============================================================================
//
// 文件: src/utils/styles.rs
// 职责: 终端文本样式与表格对齐
// 边界:
//   - ✅ 粗体、暗色等样式
//   - ✅ 按显示宽度补齐
//   - ❌ 不应包含颜色相关功能
//   - ❌ 不应包含业务逻辑
//
// ============================================================================

use colored::Colorize;

/// 文本样式工具函数
pub struct TextStyles;

impl TextStyles {
    /// 粗体文本
    pub fn bold(text: &str) -> String {
        text.bold().to_string()
    }

    /// 暗色文本
    pub fn dimmed(text: &str) -> String {
        text.dimmed().to_string()
    }

    /// 下划线文本
    pub fn underline(text: &str) -> String {
        text.underline().to_string()
    }

    /// 以字符数右侧补空格（不计 ANSI 序列）
    pub fn pad(text: &str, width: usize) -> String {
        let len = text.chars().count();
        if len >= width {
            text.to_string()
        } else {
            format!("{}{}", text, " ".repeat(width - len))
        }
    }

    /// 分隔线
    pub fn separator(width: usize) -> String {
        "═".repeat(width)
    }
}
