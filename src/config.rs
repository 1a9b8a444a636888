//! 程序静态配置
//!
//! 启动时加载一次：工作目录下存在 `config.toml` 则从文件读取，否则使用
//! 默认值。没有命令行参数或环境变量入口。

use crate::logging::LogLevel;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 默认配置文件名
pub const CONFIG_FILE: &str = "config.toml";

/// 程序配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 待扫描的图片根目录
    pub data_root: String,
    /// 识别的图片扩展名（大小写不敏感的后缀匹配）
    pub included_extensions: Vec<String>,
    /// 是否启用并行处理
    pub parallel_enabled: bool,
    /// 配置的 worker 数量上限（实际数量还会按 CPU 数收紧）
    pub configured_worker_count: usize,
    /// 单张图片的处理超时（秒，允许小数）
    pub per_item_timeout_seconds: f64,
    /// 日志目录
    pub log_directory: String,
    /// 日志文件名
    pub log_file_name: String,
    /// 日志级别
    pub log_level: LogLevel,
    // --- 视觉模型配置 ---
    /// Ollama 服务地址
    pub ollama_base_url: String,
    /// 模型名称
    pub model_name: String,
    /// 提示词
    pub prompt: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_root: "data/imgs".to_string(),
            included_extensions: [
                ".jpg", ".jpeg", ".png", ".gif", ".bmp", ".tiff", ".ico", ".webp",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            parallel_enabled: true,
            configured_worker_count: 20,
            per_item_timeout_seconds: 60.0,
            log_directory: "data/logs".to_string(),
            log_file_name: "pipeline_run.log".to_string(),
            log_level: LogLevel::Debug,
            ollama_base_url: "http://localhost:11434".to_string(),
            model_name: "llava".to_string(),
            prompt: "Describe this image. Extract all text information if present.".to_string(),
        }
    }
}

impl Config {
    /// 加载配置：`config.toml` 存在则读取，否则返回默认值
    pub fn load() -> Result<Self> {
        let path = Path::new(CONFIG_FILE);
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// 从 TOML 文件加载配置
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("无法读取配置文件: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("无法解析配置文件: {}", path.display()))?;
        Ok(config)
    }

    /// 单项超时时长
    pub fn timeout(&self) -> Duration {
        Duration::from_secs_f64(self.per_item_timeout_seconds)
    }

    /// 主日志文件完整路径
    pub fn log_file_path(&self) -> PathBuf {
        Path::new(&self.log_directory).join(&self.log_file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;
    use tempfile::tempdir;

    #[test]
    fn defaults_match_expected_values() {
        let config = Config::default();
        assert_eq!(config.data_root, "data/imgs");
        assert_eq!(config.configured_worker_count, 20);
        assert!(config.parallel_enabled);
        assert_eq!(config.per_item_timeout_seconds, 60.0);
        assert_eq!(config.log_level, LogLevel::Debug);
        assert!(config.included_extensions.contains(&".webp".to_string()));
    }

    #[test]
    fn partial_toml_overrides_only_named_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "configured_worker_count = 4\nper_item_timeout_seconds = 0.5\nlog_level = \"warn\""
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.configured_worker_count, 4);
        assert_eq!(config.per_item_timeout_seconds, 0.5);
        assert_eq!(config.log_level, LogLevel::Warn);
        // 未指定的字段保持默认
        assert_eq!(config.model_name, "llava");
    }

    #[test]
    fn log_file_path_joins_directory_and_name() {
        let config = Config::default();
        assert_eq!(
            config.log_file_path(),
            Path::new("data/logs").join("pipeline_run.log")
        );
    }
}
