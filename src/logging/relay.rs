//! 日志中继：跨 worker 的日志聚合
//!
//! 任意多个并发 worker 把 [`LogRecord`] 推进一条无界 FIFO 通道，唯一的
//! 监听任务把它们逐条写进共享的 [`LogSink`]。worker 从不直接写日志文件。
//!
//! 顺序保证是"监听者观察到的出队顺序"：多个生产者并发入队时，通道本身
//! 不提供跨生产者的全序。这是有意为之的弱保证，不是缺陷。

use crate::error::{PipelineError, PipelineResult};
use crate::logging::logger::{LogLevel, LogRecord, LogSink};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::task::JoinHandle;

/// 通道上的消息：一条日志记录，或停止哨兵
#[derive(Debug)]
pub enum RelayMessage {
    Record(LogRecord),
    /// 停止哨兵，永远是入队的最后一个值
    Shutdown,
}

/// worker 日志句柄
///
/// 只向中继通道推送记录。级别过滤在发送侧做一次，监听侧还会再做一次。
#[derive(Clone)]
pub struct WorkerLogger {
    name: String,
    process: String,
    level: LogLevel,
    tx: UnboundedSender<RelayMessage>,
}

impl WorkerLogger {
    pub fn debug(&self, message: impl Into<String>) {
        self.log(LogLevel::Debug, message);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    pub fn warn(&self, message: impl Into<String>) {
        self.log(LogLevel::Warn, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    fn log(&self, level: LogLevel, message: impl Into<String>) {
        if level < self.level {
            return;
        }
        let record = LogRecord::new(level, self.name.clone(), self.process.clone(), message);
        // 监听任务退出后发送会失败，此时日志只能丢弃
        let _ = self.tx.send(RelayMessage::Record(record));
    }
}

/// 日志中继
///
/// `start` 启动专职监听任务，`stop` 入队哨兵并等待监听任务退出。
/// `stop` 消费 `self`，因此每次 `start` 恰好对应一次 `stop`。
pub struct LogRelay {
    tx: UnboundedSender<RelayMessage>,
    listener: JoinHandle<()>,
    level: LogLevel,
}

impl LogRelay {
    /// 启动监听任务，独占聚合写入
    pub fn start(sink: Arc<LogSink>, level: LogLevel) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel();

        let listener = tokio::spawn(async move {
            // 逐条出队；收到哨兵或所有发送端关闭时退出。
            // 哨兵是最后入队的值，FIFO 保证此前的记录都已写出。
            while let Some(message) = rx.recv().await {
                match message {
                    RelayMessage::Shutdown => break,
                    RelayMessage::Record(record) => {
                        if record.level >= level {
                            sink.write_aggregated(&record);
                        }
                    }
                }
            }
        });

        Self {
            tx,
            listener,
            level,
        }
    }

    /// 为一个 worker 创建绑定到本中继通道的日志句柄
    pub fn worker_logger(&self, process: impl Into<String>) -> WorkerLogger {
        WorkerLogger {
            name: "worker".to_string(),
            process: process.into(),
            level: self.level,
            tx: self.tx.clone(),
        }
    }

    /// 入队停止哨兵并等待监听任务退出
    pub async fn stop(self) -> PipelineResult<()> {
        let _ = self.tx.send(RelayMessage::Shutdown);
        self.listener
            .await
            .map_err(|e| PipelineError::RelayJoin(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::tempdir;

    fn open_sink(dir: &tempfile::TempDir) -> Arc<LogSink> {
        let path = dir.path().join("relay.log");
        Arc::new(LogSink::open(&path, LogLevel::Debug).unwrap())
    }

    #[tokio::test]
    async fn relay_writes_worker_records_in_aggregated_format() {
        let dir = tempdir().unwrap();
        let sink = open_sink(&dir);
        let path = sink.path().to_path_buf();

        let relay = LogRelay::start(sink, LogLevel::Debug);
        let logger = relay.worker_logger("worker-1");
        logger.info("正在提取图片信息: a.jpg");
        relay.stop().await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("worker-1"));
        assert!(content.contains("正在提取图片信息: a.jpg"));
    }

    #[tokio::test]
    async fn stop_terminates_even_without_any_record() {
        let dir = tempdir().unwrap();
        let relay = LogRelay::start(open_sink(&dir), LogLevel::Debug);

        // 从未入队任何记录，stop 也必须在有限时间内返回
        tokio::time::timeout(Duration::from_secs(5), relay.stop())
            .await
            .expect("中继停止不应阻塞")
            .unwrap();
    }

    #[tokio::test]
    async fn relay_filters_below_level() {
        let dir = tempdir().unwrap();
        let sink = open_sink(&dir);
        let path = sink.path().to_path_buf();

        let relay = LogRelay::start(sink, LogLevel::Warn);
        let logger = relay.worker_logger("worker-1");
        logger.debug("调试细节");
        logger.error("出错了");
        relay.stop().await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(!content.contains("调试细节"));
        assert!(content.contains("出错了"));
    }
}
