//! 主流程日志：级别、记录、输出汇与显式日志句柄

use crate::error::{PipelineError, PipelineResult};
use chrono::{DateTime, Local};
use serde::Deserialize;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Arc, Mutex};

/// 日志级别，顺序即严重程度
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(PipelineError::InvalidLogLevel(other.to_string())),
        }
    }
}

/// 单条日志记录
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub timestamp: DateTime<Local>,
    pub level: LogLevel,
    /// 日志来源名称（如 run_pipeline / worker）
    pub source: String,
    /// 产生记录的进程/任务名（如 main / worker-3）
    pub process: String,
    pub message: String,
}

impl LogRecord {
    pub fn new(
        level: LogLevel,
        source: impl Into<String>,
        process: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Local::now(),
            level,
            source: source.into(),
            process: process.into(),
            message: message.into(),
        }
    }

    fn formatted_timestamp(&self) -> String {
        self.timestamp.format("%Y-%m-%d %H:%M:%S%.3f").to_string()
    }

    /// 主流程文件格式：`时间 - 名称 - 级别 - 消息`
    pub fn format_main(&self) -> String {
        format!(
            "{} - {} - {} - {}",
            self.formatted_timestamp(),
            self.source,
            self.level,
            self.message
        )
    }

    /// 主流程控制台格式（不带时间戳）：`名称 - 级别 - 消息`
    pub fn format_console(&self) -> String {
        format!("{} - {} - {}", self.source, self.level, self.message)
    }

    /// 聚合格式（监听任务专用）：`时间 - 进程 - 名称 - 级别 - 消息`
    pub fn format_aggregated(&self) -> String {
        format!(
            "{} - {} - {} - {} - {}",
            self.formatted_timestamp(),
            self.process,
            self.source,
            self.level,
            self.message
        )
    }
}

/// 日志输出汇：一个文件句柄 + 控制台，各自独立做级别过滤
///
/// 整个批次运行期间日志文件只在这里打开一次，主日志和中继监听任务共用
/// 同一个 `LogSink`，写入经由内部互斥锁串行化。
pub struct LogSink {
    console_level: LogLevel,
    file_level: LogLevel,
    file_path: PathBuf,
    file: Mutex<File>,
}

impl LogSink {
    /// 打开（必要时创建）日志文件，两个输出使用同一级别
    pub fn open(path: &Path, level: LogLevel) -> PipelineResult<Self> {
        Self::with_levels(path, level, level)
    }

    /// 打开日志文件，控制台与文件分别指定级别
    pub fn with_levels(
        path: &Path,
        console_level: LogLevel,
        file_level: LogLevel,
    ) -> PipelineResult<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                PipelineError::LogSetup(format!("无法打开日志文件 {}: {}", path.display(), e))
            })?;

        Ok(Self {
            console_level,
            file_level,
            file_path: path.to_path_buf(),
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// 按主流程格式写入（文件带时间戳，控制台不带）
    pub fn write_main(&self, record: &LogRecord) {
        self.write(record, record.format_main(), record.format_console());
    }

    /// 按聚合格式写入，文件与控制台同一行
    pub fn write_aggregated(&self, record: &LogRecord) {
        let line = record.format_aggregated();
        self.write(record, line.clone(), line);
    }

    fn write(&self, record: &LogRecord, file_line: String, console_line: String) {
        if record.level >= self.console_level {
            println!("{}", console_line);
        }
        if record.level >= self.file_level {
            // 日志写失败不应拖垮整条管线，静默吞掉
            if let Ok(mut file) = self.file.lock() {
                let _ = writeln!(file, "{}", file_line);
            }
        }
    }
}

/// 主流程日志句柄
///
/// 显式传入每个需要打日志的组件，不经任何全局查找。克隆开销很小
/// （内部共享同一个 [`LogSink`]）。
#[derive(Clone)]
pub struct PipelineLogger {
    name: String,
    level: LogLevel,
    sink: Option<Arc<LogSink>>,
}

impl PipelineLogger {
    /// 创建带文件输出的主日志
    pub fn new(name: impl Into<String>, log_file: &Path, level: LogLevel) -> PipelineResult<Self> {
        let sink = LogSink::open(log_file, level)?;
        Ok(Self {
            name: name.into(),
            level,
            sink: Some(Arc::new(sink)),
        })
    }

    /// 创建只输出到控制台的日志（没有文件输出汇，无法启动日志中继）
    pub fn console_only(name: impl Into<String>, level: LogLevel) -> Self {
        Self {
            name: name.into(),
            level,
            sink: None,
        }
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    /// 日志文件输出汇；控制台日志则返回 `None`
    pub fn sink(&self) -> Option<Arc<LogSink>> {
        self.sink.clone()
    }

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
        let record = LogRecord::new(level, self.name.clone(), "main", message);
        match &self.sink {
            Some(sink) => sink.write_main(&record),
            None => println!("{}", record.format_console()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn level_ordering_matches_severity() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warn);
        assert!(LogLevel::Warn < LogLevel::Error);
    }

    #[test]
    fn level_parses_from_config_strings() {
        assert_eq!("debug".parse::<LogLevel>().unwrap(), LogLevel::Debug);
        assert_eq!("WARNING".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert!("verbose".parse::<LogLevel>().is_err());
    }

    #[test]
    fn record_formats_contain_all_fields() {
        let record = LogRecord::new(LogLevel::Info, "run_pipeline", "worker-2", "处理开始");

        let main_line = record.format_main();
        assert!(main_line.contains("run_pipeline"));
        assert!(main_line.contains("INFO"));
        assert!(main_line.contains("处理开始"));
        assert!(!main_line.contains("worker-2"));

        let aggregated = record.format_aggregated();
        assert!(aggregated.contains("worker-2"));
    }

    #[test]
    fn logger_writes_to_file_above_level_only() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.log");
        let logger = PipelineLogger::new("test_logger", &path, LogLevel::Info).unwrap();

        logger.debug("不应写入");
        logger.info("应当写入");

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("应当写入"));
        assert!(!content.contains("不应写入"));
    }
}
