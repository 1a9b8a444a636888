//! 视觉模型服务 - 业务能力层
//!
//! 封装对 Ollama 视觉模型的单次调用：读图、编码、请求、取回描述文本。
//! 只处理单张图片，不出现 Vec，不关心超时和并发（那是编排层的事）。

use crate::config::Config;
use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

/// 视觉模型客户端
#[derive(Clone)]
pub struct VisionExtractor {
    client: reqwest::Client,
    base_url: String,
    model_name: String,
    prompt: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
    images: Vec<String>,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

impl VisionExtractor {
    /// 从配置创建客户端
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.ollama_base_url.trim_end_matches('/').to_string(),
            model_name: config.model_name.clone(),
            prompt: config.prompt.clone(),
        }
    }

    /// 提取单张图片的信息
    ///
    /// 任何一步失败（读文件、请求、响应解析）都返回错误，由调用方决定
    /// 如何落成结果记录。调用可能很慢，也可能一直阻塞在网络上。
    pub async fn extract(&self, image_path: &str) -> Result<String> {
        let bytes = tokio::fs::read(image_path)
            .await
            .with_context(|| format!("无法读取图片文件: {}", image_path))?;
        let encoded = STANDARD.encode(&bytes);

        let request = ChatRequest {
            model: &self.model_name,
            messages: vec![ChatMessage {
                role: "user",
                content: &self.prompt,
                images: vec![encoded],
            }],
            stream: false,
        };

        let url = format!("{}/api/chat", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .with_context(|| format!("视觉模型请求失败 (模型: {})", self.model_name))?
            .error_for_status()
            .with_context(|| format!("视觉模型返回错误状态 (模型: {})", self.model_name))?;

        let parsed: ChatResponse = response
            .json()
            .await
            .context("无法解析视觉模型响应")?;

        Ok(parsed.message.content.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_to_ollama_chat_shape() {
        let request = ChatRequest {
            model: "llava",
            messages: vec![ChatMessage {
                role: "user",
                content: "描述这张图片",
                images: vec!["aGVsbG8=".to_string()],
            }],
            stream: false,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "llava");
        assert_eq!(json["stream"], false);
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["images"][0], "aGVsbG8=");
    }

    #[tokio::test]
    async fn extract_fails_for_missing_file() {
        let extractor = VisionExtractor::new(&Config::default());
        let result = extractor.extract("不存在的图片.jpg").await;
        assert!(result.is_err());
    }
}
