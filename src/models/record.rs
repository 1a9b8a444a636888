//! 单项处理结果模型
//!
//! 每张提交的图片恰好产生一条 [`ResultRecord`]（不丢、不重）。失败不以异常形式
//! 跨越 worker 与编排器的边界，而是先落成类型化的 [`ItemOutcome`]，再展平为
//! 可序列化的记录。

use serde::Serialize;

/// 单项状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ItemStatus {
    Success,
    Failed,
}

/// 失败类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// 超过单项截止时间
    Timeout,
    /// 工作单元自身报错（含 panic）
    Work,
}

/// 类型化的单项结果：成功带提取内容，失败带类别和错误文本
#[derive(Debug, Clone, PartialEq)]
pub enum ItemOutcome {
    Success { info: String },
    Failed { kind: FailureKind, error: String },
}

/// 单张图片的结构化处理记录
///
/// 不变式：`status == Success` 当且仅当 `info` 有值、`error` 为空。
/// 只能通过下面的构造函数创建，保证不变式成立。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRecord {
    /// 图片路径（提交时的工作项标识）
    pub image_path: String,
    /// 处理状态
    pub status: ItemStatus,
    /// 失败时的错误文本
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// 成功时提取到的图片信息
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
}

impl ResultRecord {
    /// 从类型化结果展平为记录
    pub fn from_outcome(image_path: impl Into<String>, outcome: ItemOutcome) -> Self {
        match outcome {
            ItemOutcome::Success { info } => Self::success(image_path, info),
            ItemOutcome::Failed { error, .. } => Self {
                image_path: image_path.into(),
                status: ItemStatus::Failed,
                error: Some(error),
                info: None,
            },
        }
    }

    /// 创建成功记录
    pub fn success(image_path: impl Into<String>, info: impl Into<String>) -> Self {
        Self {
            image_path: image_path.into(),
            status: ItemStatus::Success,
            error: None,
            info: Some(info.into()),
        }
    }

    /// 创建失败记录
    pub fn failed(
        image_path: impl Into<String>,
        kind: FailureKind,
        error: impl Into<String>,
    ) -> Self {
        Self::from_outcome(
            image_path,
            ItemOutcome::Failed {
                kind,
                error: error.into(),
            },
        )
    }

    /// 创建超时记录，错误文本格式固定
    pub fn timeout(image_path: impl Into<String>, timeout_secs: f64) -> Self {
        Self::failed(
            image_path,
            FailureKind::Timeout,
            format!("TimeoutError: Exceeded {} Secs", timeout_secs),
        )
    }

    /// 是否成功
    pub fn is_success(&self) -> bool {
        self.status == ItemStatus::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_record_has_info_and_no_error() {
        let record = ResultRecord::success("data/imgs/a.jpg", "一张测试图片");
        assert!(record.is_success());
        assert_eq!(record.info.as_deref(), Some("一张测试图片"));
        assert!(record.error.is_none());
    }

    #[test]
    fn failed_record_has_error_and_no_info() {
        let record = ResultRecord::failed("a.jpg", FailureKind::Work, "bad image");
        assert!(!record.is_success());
        assert_eq!(record.error.as_deref(), Some("bad image"));
        assert!(record.info.is_none());
    }

    #[test]
    fn timeout_record_text_matches_expected_format() {
        let record = ResultRecord::timeout("a.jpg", 60.0);
        assert_eq!(
            record.error.as_deref(),
            Some("TimeoutError: Exceeded 60 Secs")
        );

        let record = ResultRecord::timeout("a.jpg", 0.2);
        assert_eq!(
            record.error.as_deref(),
            Some("TimeoutError: Exceeded 0.2 Secs")
        );
    }

    #[test]
    fn status_serializes_as_plain_string() {
        let record = ResultRecord::success("a.jpg", "信息");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["status"], "Success");
        assert_eq!(json["image_path"], "a.jpg");
    }
}
