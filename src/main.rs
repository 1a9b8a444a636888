use anyhow::{Context, Result};
use extract_image_info::orchestrator::BatchProcessor;
use extract_image_info::services::VisionExtractor;
use extract_image_info::{get_all_image_paths, Config, PipelineLogger};
use std::path::Path;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    // 加载静态配置
    let config = Config::load()?;

    // 确保日志目录存在，并初始化主日志（控制台 + 文件）
    std::fs::create_dir_all(&config.log_directory)
        .with_context(|| format!("无法创建日志目录: {}", config.log_directory))?;
    let log_file = config.log_file_path();
    let logger = PipelineLogger::new("run_pipeline", &log_file, config.log_level)?;

    // 扫描待处理图片
    let image_paths = get_all_image_paths(
        Path::new(&config.data_root),
        &config.included_extensions,
        &logger,
    );

    // 跑批并输出完整结果列表
    let extractor = Arc::new(VisionExtractor::new(&config));
    let processor = BatchProcessor::new(config, logger);

    let results = processor
        .process_batch(image_paths, move |path| {
            let extractor = extractor.clone();
            async move { extractor.extract(&path).await }
        })
        .await?;

    println!("{}", serde_json::to_string_pretty(&results)?);

    Ok(())
}
