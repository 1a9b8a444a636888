//! # Extract Image Info
//!
//! 一个批量提取图片信息的 Rust 管线：扫描目录树中的图片文件，把每张图片
//! 分发给缓慢且不可靠的视觉模型调用，在限定单项延迟、容忍单项失败的前提
//! 下收集结构化结果。
//!
//! ## 架构设计
//!
//! ### ① 业务能力层（Services）
//! - `services::VisionExtractor` - 单张图片的视觉模型调用（可插拔的工作单元）
//!
//! ### ② 日志层（Logging）
//! - `logging::PipelineLogger` - 显式传递的主日志句柄（控制台 + 文件）
//! - `logging::LogRelay` / `WorkerLogger` - 把并发 worker 的日志经单一通道
//!   串行化进同一个日志文件
//!
//! ### ③ 编排层（Orchestration）
//! - `orchestrator::timeout_guard` - 单项截止时间，失败落成数据
//! - `orchestrator::WorkerPool` - 有界并发，按完成顺序收集
//! - `orchestrator::BatchProcessor` - 批次入口，保证中继清理
//!
//! ## 失败语义
//!
//! 单项失败（超时、调用报错、panic）转成 `Failed` 记录，批次继续；
//! 基础设施失败和启动失败对整批致命，在日志中继清理后上抛。

pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod orchestrator;
pub mod scanner;
pub mod services;

// 重新导出常用类型
pub use config::Config;
pub use error::{PipelineError, PipelineResult};
pub use logging::{LogLevel, LogRecord, LogRelay, PipelineLogger, WorkerLogger};
pub use models::{FailureKind, ItemOutcome, ItemStatus, ResultRecord};
pub use orchestrator::{run_with_timeout, BatchProcessor, WorkerPool};
pub use scanner::get_all_image_paths;
pub use services::VisionExtractor;
