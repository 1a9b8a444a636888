//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量调度和资源管理，是整条管线的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批处理编排器
//! - 推导 worker 数量
//! - 启动/停止日志中继（停止在所有退出路径上都保证执行）
//! - 把全部图片提交给工作池，汇总结果记录
//!
//! ### `worker_pool` - 工作池
//! - Semaphore 限制并发数量
//! - 按完成顺序收集结果
//! - 池级基础设施失败上抛
//!
//! ### `timeout_guard` - 超时防护
//! - 单槽执行上下文 + 截止时间
//! - 把挂起 / 报错 / panic 统一转成结果记录
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<图片路径>)
//!     ↓
//! worker_pool (有界并发)
//!     ↓
//! timeout_guard (单项截止时间)
//!     ↓
//! 工作单元（可插拔的慢调用，如 services::VisionExtractor）
//! ```

pub mod batch_processor;
pub mod timeout_guard;
pub mod worker_pool;

pub use batch_processor::BatchProcessor;
pub use timeout_guard::run_with_timeout;
pub use worker_pool::WorkerPool;
