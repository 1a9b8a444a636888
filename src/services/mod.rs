//! 业务能力层
//!
//! 只描述"我能做什么"，不关心批次和并发。

pub mod vision_service;

pub use vision_service::VisionExtractor;
