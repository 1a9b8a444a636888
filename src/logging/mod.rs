//! 日志层
//!
//! ## 设计
//!
//! 不做全局日志注册：所有需要打日志的组件都显式接收一个日志句柄。
//!
//! - [`PipelineLogger`] - 主流程日志句柄，同时写控制台和日志文件，两个输出
//!   各自做级别过滤
//! - [`LogRelay`] - 日志中继：一条多生产者/单消费者通道加一个专职监听任务，
//!   把并发 worker 发出的日志串行化进同一个日志文件
//! - [`WorkerLogger`] - worker 日志句柄，只向通道推送记录，从不直接碰文件
//!
//! 日志文件自始至终只有一个打开的句柄（[`LogSink`] 内部持有），主日志和
//! 监听任务写入时都经过它，避免并发写坏文件。

pub mod logger;
pub mod relay;

pub use logger::{LogLevel, LogRecord, LogSink, PipelineLogger};
pub use relay::{LogRelay, RelayMessage, WorkerLogger};
