//! 批处理编排器 - 编排层
//!
//! ## 职责
//!
//! 整个批次的唯一公共入口：
//!
//! 1. **并发定尺**：按配置和 CPU 数推导 worker 数量
//! 2. **日志中继生命周期**：对主日志的文件输出汇启动中继，无论批次成败
//!    都保证停止并汇合监听任务
//! 3. **批量提交**：把全部图片交给工作池，收集结果记录
//! 4. **失败升级**：单项失败已是数据；基础设施失败在中继清理完成后上抛
//!
//! 对调用方的保证：每个输入恰好对应一条记录，集合意义上精确，不承诺顺序。

use crate::config::Config;
use crate::error::{PipelineError, PipelineResult};
use crate::logging::{LogRelay, PipelineLogger};
use crate::models::ResultRecord;
use crate::orchestrator::worker_pool::WorkerPool;
use std::future::Future;

/// 批处理编排器
pub struct BatchProcessor {
    config: Config,
    logger: PipelineLogger,
}

impl BatchProcessor {
    pub fn new(config: Config, logger: PipelineLogger) -> Self {
        Self { config, logger }
    }

    /// 并行处理全部图片，返回与输入一一对应的结果记录
    ///
    /// `work_fn` 是可插拔的工作单元：任意慢的异步调用，可能报错，也可能
    /// 一直不返回。
    pub async fn process_batch<F, Fut>(
        &self,
        image_paths: Vec<String>,
        work_fn: F,
    ) -> PipelineResult<Vec<ResultRecord>>
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<String>> + Send + 'static,
    {
        self.logger.info("🚀 并行处理开始...");

        let worker_count = WorkerPool::detect_worker_count(&self.config);
        self.logger.debug(format!("调用的 worker 数量: {}", worker_count));

        // 中继监听必须与主日志共用同一个文件输出汇；
        // 找不到就在启动任何 worker 之前报错
        let sink = self.logger.sink().ok_or_else(|| {
            PipelineError::LogSetup("主日志没有配置文件输出，无法启动日志中继".to_string())
        })?;

        let relay = LogRelay::start(sink, self.logger.level());

        self.logger
            .info(format!("📷 开始处理 {} 张图片...", image_paths.len()));

        let pool = WorkerPool::new(worker_count, self.config.timeout());
        let outcome = pool.run_all(image_paths, work_fn, &relay).await;

        // 所有退出路径都要停掉中继：入队哨兵、等监听任务退出
        let stopped = relay.stop().await;

        let records = outcome?;
        stopped?;

        self.logger.info("✅ 并行处理完成");
        Ok(records)
    }
}
