//! 图片扫描
//!
//! 递归遍历根目录，按扩展名（大小写不敏感的后缀匹配）收集图片路径。
//! 返回顺序即遍历顺序，不保证排序。

use crate::logging::PipelineLogger;
use std::path::Path;
use walkdir::WalkDir;

/// 扫描根目录下的所有图片文件
///
/// 读不到的目录项会记一条 warn 然后跳过，不会让扫描整体失败。
pub fn get_all_image_paths(
    root: &Path,
    included_extensions: &[String],
    logger: &PipelineLogger,
) -> Vec<String> {
    logger.info(format!("🔍 开始扫描图片目录: {}", root.display()));

    let extensions: Vec<String> = included_extensions
        .iter()
        .map(|ext| ext.to_lowercase())
        .collect();

    let mut image_paths = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                logger.warn(format!("⚠️ 读取目录项失败，跳过: {}", e));
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy().to_lowercase();
        if extensions.iter().any(|ext| file_name.ends_with(ext)) {
            image_paths.push(entry.path().to_string_lossy().to_string());
        }
    }

    logger.info(format!("✓ 找到 {} 张图片", image_paths.len()));
    image_paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogLevel;
    use std::fs::{self, File};
    use tempfile::tempdir;

    fn test_logger() -> PipelineLogger {
        PipelineLogger::console_only("test_scanner", LogLevel::Error)
    }

    fn extensions() -> Vec<String> {
        vec![".jpg".to_string(), ".png".to_string()]
    }

    #[test]
    fn finds_images_recursively_and_case_insensitively() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir(root.join("nested")).unwrap();

        File::create(root.join("a.JPG")).unwrap();
        File::create(root.join("b.png")).unwrap();
        File::create(root.join("nested").join("c.jpg")).unwrap();
        File::create(root.join("notes.txt")).unwrap();

        let paths = get_all_image_paths(root, &extensions(), &test_logger());
        assert_eq!(paths.len(), 3);
        assert!(paths.iter().all(|p| !p.ends_with(".txt")));
    }

    #[test]
    fn missing_root_yields_empty_list() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("不存在的目录");

        let paths = get_all_image_paths(&missing, &extensions(), &test_logger());
        assert!(paths.is_empty());
    }
}
