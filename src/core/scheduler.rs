// ============================================================================
// HexRail - 对局调度器
// ============================================================================
//
// 文件: src/core/scheduler.rs
// 职责: 并发运行多局游戏
// 边界:
//   - ✅ 在阻塞线程池中运行对局
//   - ✅ 并发数量控制
//   - ✅ 单局超时（超时后通过停止句柄结束对局）
//   - ✅ 失败即停（fail fast）
//   - ✅ 进度回调与结果汇总
//   - ❌ 不包含游戏规则
//   - ❌ 不包含 UI 显示逻辑
//
// ============================================================================

use crate::utils::logger::Logger;
use crate::{t, tf};
use anyhow::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{RwLock, Semaphore};
use tokio::task::JoinHandle;
use tokio::time::timeout;

/// 单局运行结果
#[derive(Debug, Clone)]
pub enum RunResult<T> {
    /// 对局正常结束
    Finished(T),
    /// 对局返回错误
    Failed(String),
    /// 对局超时，已被停止
    TimedOut,
    /// 调度器停止后未开始的对局
    Cancelled,
}

impl<T> RunResult<T> {
    pub fn is_finished(&self) -> bool {
        matches!(self, RunResult::Finished(_))
    }
}

/// 进度回调函数类型 (completed, total)
pub type ProgressCallback = Arc<dyn Fn(usize, usize) + Send + Sync>;

/// 调度器配置
#[derive(Clone)]
pub struct SchedulerConfig {
    /// 最大并发对局数
    pub max_concurrency: usize,
    /// 单局超时时长（None 表示不限制）
    pub timeout: Option<Duration>,
    /// 是否在第一局失败时取消剩余对局
    pub fail_fast: bool,
    /// 是否输出每局的日志
    pub verbose: bool,
    /// 进度回调函数 (completed, total)
    pub progress_callback: Option<ProgressCallback>,
}

impl std::fmt::Debug for SchedulerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchedulerConfig")
            .field("max_concurrency", &self.max_concurrency)
            .field("timeout", &self.timeout)
            .field("fail_fast", &self.fail_fast)
            .field("verbose", &self.verbose)
            .field("has_progress_callback", &self.progress_callback.is_some())
            .finish()
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_concurrency: num_cpus::get(),
            timeout: None,
            fail_fast: false,
            verbose: false,
            progress_callback: None,
        }
    }
}

/// 一个待运行的对局
///
/// `run` 在阻塞线程中执行；超时后调度器置位 `stop`，
/// 对局应在下一次等待动作时以错误结束。
pub struct GameJob<T> {
    pub id: String,
    pub stop: Arc<AtomicBool>,
    pub run: Box<dyn FnOnce() -> Result<T> + Send>,
}

impl<T> GameJob<T> {
    pub fn new<F>(id: impl Into<String>, stop: Arc<AtomicBool>, run: F) -> Self
    where
        F: FnOnce() -> Result<T> + Send + 'static,
    {
        Self {
            id: id.into(),
            stop,
            run: Box::new(run),
        }
    }
}

/// 对局调度器
pub struct GameScheduler {
    config: SchedulerConfig,
    semaphore: Arc<Semaphore>,
    should_stop: Arc<RwLock<bool>>,
    /// (completed, total)
    progress: Arc<RwLock<(usize, usize)>>,
}

impl GameScheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        let semaphore = Arc::new(Semaphore::new(config.max_concurrency.max(1)));
        Self {
            config,
            semaphore,
            should_stop: Arc::new(RwLock::new(false)),
            progress: Arc::new(RwLock::new((0, 0))),
        }
    }

    /// 运行单局
    pub async fn execute_job<T>(&self, job: GameJob<T>) -> RunResult<T>
    where
        T: Send + 'static,
    {
        if *self.should_stop.read().await {
            return RunResult::Cancelled;
        }

        let _permit = match self.semaphore.acquire().await {
            Ok(permit) => permit,
            Err(_) => return RunResult::Cancelled,
        };
        // 等待许可期间可能已触发停止
        if *self.should_stop.read().await {
            return RunResult::Cancelled;
        }

        let GameJob { id, stop, run } = job;
        let start_time = Instant::now();
        if self.config.verbose {
            Logger::info(tf!("scheduler.task_start", &id));
        }

        let mut handle = tokio::task::spawn_blocking(run);
        let result = match self.config.timeout {
            Some(limit) => match timeout(limit, &mut handle).await {
                Ok(joined) => Self::flatten(joined),
                Err(_) => {
                    stop.store(true, Ordering::SeqCst);
                    // 对局在下一次等待动作时结束，结果被丢弃
                    let _ = handle.await;
                    RunResult::TimedOut
                }
            },
            None => Self::flatten(handle.await),
        };

        self.update_progress().await;

        let is_success = result.is_finished();
        if self.config.fail_fast && !is_success {
            *self.should_stop.write().await = true;
            if self.config.verbose {
                Logger::warn(tf!("scheduler.fail_fast_triggered", &id));
            }
        }

        if self.config.verbose {
            let seconds = start_time.elapsed().as_secs_f64();
            match &result {
                RunResult::Finished(_) => Logger::info(tf!("scheduler.task_success", &id, seconds)),
                RunResult::Failed(err) => {
                    Logger::error(tf!("scheduler.task_failed", &id, seconds, err))
                }
                RunResult::TimedOut => Logger::warn(tf!("scheduler.task_timeout", &id, seconds)),
                RunResult::Cancelled => Logger::warn(tf!("scheduler.task_cancelled", &id)),
            }
        }

        result
    }

    fn flatten<T>(joined: std::result::Result<Result<T>, tokio::task::JoinError>) -> RunResult<T> {
        match joined {
            Ok(Ok(value)) => RunResult::Finished(value),
            Ok(Err(e)) => RunResult::Failed(format!("{:#}", e)),
            Err(e) => RunResult::Failed(e.to_string()),
        }
    }

    /// 并发运行多局，结果顺序与输入一致
    pub async fn execute_batch<T>(&self, jobs: Vec<GameJob<T>>) -> Vec<(String, RunResult<T>)>
    where
        T: Send + 'static,
    {
        if jobs.is_empty() {
            return Vec::new();
        }

        if self.config.verbose {
            Logger::info(tf!("scheduler.batch_start", jobs.len()));
        }

        *self.should_stop.write().await = false;
        *self.progress.write().await = (0, jobs.len());

        let mut handles: Vec<(String, JoinHandle<RunResult<T>>)> = Vec::new();
        for job in jobs {
            let scheduler = self.clone_for_job();
            let id = job.id.clone();
            let handle = tokio::spawn(async move { scheduler.execute_job(job).await });
            handles.push((id, handle));
        }

        let mut results = Vec::new();
        for (id, handle) in handles {
            match handle.await {
                Ok(result) => results.push((id, result)),
                Err(e) => {
                    Logger::error(tf!("scheduler.task_join_error", e.to_string()));
                    results.push((id, RunResult::Failed(e.to_string())));
                }
            }
        }

        if self.config.verbose {
            let success_count = results.iter().filter(|(_, r)| r.is_finished()).count();
            Logger::info(tf!("scheduler.batch_complete", success_count, results.len()));
        }

        results
    }

    /// 取消尚未开始的对局
    pub async fn stop_all(&self) {
        *self.should_stop.write().await = true;
        if self.config.verbose {
            Logger::warn(t!("scheduler.stopping_all_tasks"));
        }
    }

    /// 获取当前执行进度 (completed, total)
    pub async fn get_progress(&self) -> (usize, usize) {
        *self.progress.read().await
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.config.progress_callback = Some(callback);
        self
    }

    async fn update_progress(&self) {
        let (completed, total) = {
            let mut progress = self.progress.write().await;
            progress.0 += 1;
            *progress
        };
        if let Some(callback) = &self.config.progress_callback {
            callback(completed, total);
        }
    }

    fn clone_for_job(&self) -> Self {
        Self {
            config: self.config.clone(),
            semaphore: Arc::clone(&self.semaphore),
            should_stop: Arc::clone(&self.should_stop),
            progress: Arc::clone(&self.progress),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn job(id: &str, run: impl FnOnce() -> Result<u32> + Send + 'static) -> GameJob<u32> {
        GameJob::new(id, Arc::new(AtomicBool::new(false)), run)
    }

    #[tokio::test]
    async fn batch_keeps_input_order() {
        let scheduler = GameScheduler::new(SchedulerConfig {
            max_concurrency: 2,
            ..SchedulerConfig::default()
        });
        let jobs = (0..5).map(|i| job(&format!("game-{}", i), move || Ok(i))).collect();
        let results = scheduler.execute_batch(jobs).await;

        let values: Vec<u32> = results
            .iter()
            .map(|(_, r)| match r {
                RunResult::Finished(v) => *v,
                other => panic!("unexpected {:?}", other),
            })
            .collect();
        assert_eq!(values, [0, 1, 2, 3, 4]);
        assert_eq!(scheduler.get_progress().await, (5, 5));
    }

    #[tokio::test]
    async fn failures_are_reported() {
        let scheduler = GameScheduler::new(SchedulerConfig::default());
        let results = scheduler
            .execute_batch(vec![
                job("ok", || Ok(1)),
                job("bad", || Err(anyhow::anyhow!("no players"))),
            ])
            .await;
        assert!(results[0].1.is_finished());
        assert!(matches!(&results[1].1, RunResult::Failed(msg) if msg.contains("no players")));
    }

    #[tokio::test]
    async fn timeout_sets_stop_handle() {
        let scheduler = GameScheduler::new(SchedulerConfig {
            timeout: Some(Duration::from_millis(20)),
            ..SchedulerConfig::default()
        });
        let stop = Arc::new(AtomicBool::new(false));
        let observed = Arc::clone(&stop);
        let result: RunResult<()> = scheduler
            .execute_job(GameJob::new("slow", Arc::clone(&stop), move || {
                while !observed.load(Ordering::SeqCst) {
                    std::thread::sleep(Duration::from_millis(1));
                }
                Err(anyhow::anyhow!("stopped"))
            }))
            .await;
        assert!(matches!(result, RunResult::TimedOut));
        assert!(stop.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn fail_fast_cancels_pending_games() {
        let scheduler = GameScheduler::new(SchedulerConfig {
            max_concurrency: 1,
            fail_fast: true,
            ..SchedulerConfig::default()
        });
        let mut jobs = vec![job("bad", || Err(anyhow::anyhow!("boom")))];
        jobs.extend((0..3).map(|i| job(&format!("later-{}", i), move || Ok(i))));
        let results = scheduler.execute_batch(jobs).await;

        assert!(matches!(results[0].1, RunResult::Failed(_)));
        // 第一局失败后至少有一局未开始
        assert!(results[1..]
            .iter()
            .any(|(_, r)| matches!(r, RunResult::Cancelled)));
    }

    #[tokio::test]
    async fn progress_callback_sees_every_game() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let scheduler = GameScheduler::new(SchedulerConfig::default()).with_progress_callback(
            Arc::new(move |_, total| {
                assert_eq!(total, 3);
                seen.fetch_add(1, Ordering::SeqCst);
            }),
        );
        let jobs = (0..3).map(|i| job("g", move || Ok(i))).collect();
        scheduler.execute_batch(jobs).await;
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
