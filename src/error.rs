//! 管线错误类型
//!
//! 错误分为三类：
//! - **单项失败**（超时、工作单元报错、worker panic）：在工作池内部就地转换为
//!   结果记录，永远不会以错误形式向外传播；
//! - **基础设施失败**（worker 任务意外死亡、结果收集本身出错）：整批中止，
//!   由编排器在停掉日志中继之后原样上抛；
//! - **启动失败**（无法定位/创建日志文件）：在任何 worker 启动之前就报错。

use thiserror::Error;

/// 管线级错误（基础设施与启动类，单项失败不走这里）
#[derive(Debug, Error)]
pub enum PipelineError {
    /// 日志初始化失败：找不到或无法建立日志输出目标
    #[error("日志初始化失败: {0}")]
    LogSetup(String),

    /// 工作池基础设施失败：worker 任务意外死亡或结果收集出错
    #[error("工作池执行失败: {0}")]
    Pool(String),

    /// 日志监听任务汇合失败
    #[error("日志监听任务汇合失败: {0}")]
    RelayJoin(String),

    /// 无法解析的日志级别
    #[error("无效的日志级别: {0}")]
    InvalidLogLevel(String),
}

/// 管线结果类型别名
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
