//! 工作池：有界并发地跑完全部工作项
//!
//! 用 Semaphore 把同时运行的工作单元限制在 `worker_count` 个，每个单元都
//! 裹在超时防护里，结果按完成顺序收集（不是提交顺序）。
//!
//! worker 之间不共享可变状态：每个 worker 任务在启动后做的第一件事就是把
//! 自己的日志句柄绑到中继通道上，之后才开始干活。

use crate::config::Config;
use crate::error::{PipelineError, PipelineResult};
use crate::logging::LogRelay;
use crate::models::ResultRecord;
use crate::orchestrator::timeout_guard::run_with_timeout;
use futures::stream::{FuturesUnordered, StreamExt};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

/// 工作池
pub struct WorkerPool {
    worker_count: usize,
    timeout: Duration,
}

impl WorkerPool {
    pub fn new(worker_count: usize, timeout: Duration) -> Self {
        Self {
            worker_count: worker_count.max(1),
            timeout,
        }
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// 推导有效 worker 数量
    ///
    /// 启用并行且配置数量大于 1 时，取配置值与 `max(1, CPU数 − 2)` 的较小者
    /// （减 2 给主流程和日志监听留出余量）；否则强制串行，返回 1。
    pub fn effective_worker_count(
        parallel_enabled: bool,
        configured_count: usize,
        cpu_count: usize,
    ) -> usize {
        if parallel_enabled && configured_count > 1 {
            configured_count.min(cpu_count.saturating_sub(2).max(1))
        } else {
            1
        }
    }

    /// 按当前机器的 CPU 数为配置推导有效 worker 数量
    pub fn detect_worker_count(config: &Config) -> usize {
        let cpu_count = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self::effective_worker_count(
            config.parallel_enabled,
            config.configured_worker_count,
            cpu_count,
        )
    }

    /// 提交全部工作项，按完成顺序收集结果
    ///
    /// 单项失败（超时、报错、panic）已经由超时防护转成记录，不会让整批
    /// 失败；只有池级基础设施问题（worker 任务意外死亡）才返回错误。
    pub async fn run_all<F, Fut>(
        &self,
        image_paths: Vec<String>,
        work_fn: F,
        relay: &LogRelay,
    ) -> PipelineResult<Vec<ResultRecord>>
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<String>> + Send + 'static,
    {
        let total = image_paths.len();
        let semaphore = Arc::new(Semaphore::new(self.worker_count));
        let work_fn = Arc::new(work_fn);

        let mut tasks = FuturesUnordered::new();
        for (index, image_path) in image_paths.into_iter().enumerate() {
            let semaphore = semaphore.clone();
            let work_fn = work_fn.clone();
            let worker_logger = relay.worker_logger(format!("worker-{}", index + 1));
            let timeout = self.timeout;

            tasks.push(tokio::spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|e| PipelineError::Pool(e.to_string()))?;

                // 先绑定日志，再干活
                worker_logger.info(format!("正在提取图片信息: {}", image_path));

                let record =
                    run_with_timeout(|path| (*work_fn)(path), image_path, timeout).await;

                match (record.is_success(), record.error.as_deref()) {
                    (true, _) => {
                        worker_logger.debug(format!("✓ 处理成功: {}", record.image_path))
                    }
                    (false, error) => worker_logger.warn(format!(
                        "⚠️ 处理失败: {} ({})",
                        record.image_path,
                        error.unwrap_or("未知错误")
                    )),
                }

                Ok::<ResultRecord, PipelineError>(record)
            }));
        }

        let mut records = Vec::with_capacity(total);
        while let Some(joined) = tasks.next().await {
            match joined {
                Ok(Ok(record)) => records.push(record),
                // worker 自身的错误：基础设施失败，整批中止
                Ok(Err(e)) => return Err(e),
                // worker 任务意外死亡（超时防护之外的 panic）
                Err(e) => return Err(PipelineError::Pool(e.to_string())),
            }
        }

        Ok(records)
    }
}
