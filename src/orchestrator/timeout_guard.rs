//! 超时防护：带截止时间地运行单个工作单元
//!
//! 把挂起、报错和 panic 统一转换为 [`ResultRecord`]，本函数自身永不向外
//! 抛错 —— 单项失败全部落成数据。

use crate::models::{FailureKind, ResultRecord};
use std::future::Future;
use std::time::Duration;
use tokio::task::JoinError;

/// 在截止时间内运行 `work_fn(image_path)`
///
/// 工作单元在自己独占的任务（单槽执行上下文）上运行：
/// - 截止时间内返回 `Ok(info)` → 成功记录；
/// - 截止时间内返回 `Err` → 失败记录，错误为其字符串形式；
/// - 工作单元 panic → 失败记录，错误为 panic 内容；
/// - 截止时间先到 → 失败记录 `TimeoutError: Exceeded <N> Secs`。
///
/// 超时后只是放弃等待：底层慢调用仍在后台任务里跑到自然结束，期间会继续
/// 占用资源。极端超时负载下这是已知的资源泄漏口子。
pub async fn run_with_timeout<F, Fut>(
    work_fn: F,
    image_path: String,
    timeout: Duration,
) -> ResultRecord
where
    F: FnOnce(String) -> Fut,
    Fut: Future<Output = anyhow::Result<String>> + Send + 'static,
{
    let timeout_secs = timeout.as_secs_f64();
    let path = image_path.clone();

    let handle = tokio::spawn(work_fn(image_path));

    match tokio::time::timeout(timeout, handle).await {
        Ok(Ok(Ok(info))) => ResultRecord::success(path, info),
        Ok(Ok(Err(e))) => ResultRecord::failed(path, FailureKind::Work, format!("{:#}", e)),
        Ok(Err(join_err)) => {
            ResultRecord::failed(path, FailureKind::Work, describe_join_error(join_err))
        }
        Err(_elapsed) => ResultRecord::timeout(path, timeout_secs),
    }
}

/// 把任务汇合错误转成可读文本，panic 时尽量取出原始消息
fn describe_join_error(err: JoinError) -> String {
    if err.is_panic() {
        let payload = err.into_panic();
        if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "工作单元发生 panic".to_string()
        }
    } else {
        "工作任务被取消".to_string()
    }
}
