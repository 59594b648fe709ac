// ============================================================================
// HexRail - 锦标赛进度条
// ============================================================================
//
// 文件: src/ui/progress.rs
// 职责: 终端进度条显示
// 边界:
//   - ✅ 进度条创建与样式
//   - ✅ 调度器进度回调适配
//   - ❌ 不应包含调度逻辑
//
// ============================================================================

use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::time::Duration;

use crate::core::scheduler::ProgressCallback;
use crate::t;
use crate::utils::constants::{colors, progress_chars, spinner_chars};

/// 对局进度条
pub struct GameProgress {
    bar: ProgressBar,
}

impl GameProgress {
    pub fn new(total: usize) -> Self {
        let template = format!(
            "{{spinner:.{color}}} [{{bar:30.{color}}}] {{pos}}/{{len}} {{msg}}",
            color = colors::PROGRESS
        );
        let style = ProgressStyle::with_template(&template)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars(progress_chars::BAR)
            .tick_chars(spinner_chars::BASE);

        let bar = ProgressBar::new(total as u64);
        bar.set_style(style);
        bar.set_message(t!("tournament.running"));
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar }
    }

    /// 供调度器调用的回调，参数为 (已完成, 总数)
    pub fn callback(&self) -> ProgressCallback {
        let bar = self.bar.clone();
        Arc::new(move |completed, total| {
            bar.set_length(total as u64);
            bar.set_position(completed as u64);
        })
    }

    pub fn finish(self) {
        self.bar.finish_and_clear();
    }
}
