use crate::error::DraftError;
use crate::models::draft::DraftSet;
use anyhow::Result;
use std::path::{Path, PathBuf};
use tokio::fs;

/// 从 TOML 文件加载一批草稿题目
pub async fn load_draft_set(toml_file_path: &Path) -> Result<DraftSet> {
    let content = fs::read_to_string(toml_file_path)
        .await
        .map_err(|source| DraftError::Read {
            path: toml_file_path.display().to_string(),
            source,
        })?;

    let set: DraftSet = toml::from_str(&content).map_err(|source| DraftError::Parse {
        path: toml_file_path.display().to_string(),
        source,
    })?;

    Ok(set.with_file_path(toml_file_path.to_string_lossy().to_string()))
}

/// 加载目录下所有草稿文件
///
/// 单个文件失败只警告并跳过，不中断整批加载
pub async fn load_all_draft_sets(folder_path: &str) -> Result<Vec<DraftSet>> {
    let folder = PathBuf::from(folder_path);

    if !folder.exists() {
        return Err(DraftError::FolderNotFound {
            path: folder_path.to_string(),
        }
        .into());
    }

    let mut sets = Vec::new();
    let mut entries = fs::read_dir(&folder)
        .await
        .map_err(|source| DraftError::Read {
            path: folder_path.to_string(),
            source,
        })?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("toml") {
            tracing::info!(
                "正在加载: {}",
                path.file_name().unwrap_or_default().to_string_lossy()
            );

            match load_draft_set(&path).await {
                Ok(set) => {
                    tracing::info!("成功加载 {} 个草稿题目", set.questions.len());
                    sets.push(set);
                }
                Err(e) => {
                    tracing::warn!("加载文件失败 {}: {}", path.display(), e);
                }
            }
        }
    }

    Ok(sets)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 建一个带唯一名字的临时草稿目录
    fn setup_temp_folder(tag: &str) -> PathBuf {
        let folder = std::env::temp_dir().join(format!("draft_loader_{}_{}", tag, std::process::id()));
        let _ = std::fs::remove_dir_all(&folder);
        std::fs::create_dir_all(&folder).expect("应能创建临时目录");
        folder
    }

    const VALID_DRAFT: &str = r#"
name = "测试草稿"
course_id = "course_1"

[[questions]]
text = "题干内容足够长吗?"

[[questions.answers]]
text = "是"
is_correct = true

[[questions.answers]]
text = "否"
"#;

    #[tokio::test]
    async fn test_load_folder_skips_broken_files() {
        let folder = setup_temp_folder("skip");
        std::fs::write(folder.join("good.toml"), VALID_DRAFT).expect("写入失败");
        std::fs::write(folder.join("broken.toml"), "name = ").expect("写入失败");
        std::fs::write(folder.join("ignored.txt"), "不是 TOML").expect("写入失败");

        let sets = load_all_draft_sets(&folder.to_string_lossy())
            .await
            .expect("整批加载不应失败");

        // 坏文件与非 TOML 文件都被跳过
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].name, "测试草稿");
        assert!(sets[0].file_path.as_deref().expect("应记录来源路径").ends_with("good.toml"));

        let _ = std::fs::remove_dir_all(&folder);
    }

    #[tokio::test]
    async fn test_missing_folder_is_error() {
        let folder = std::env::temp_dir().join("draft_loader_no_such_folder");
        let result = load_all_draft_sets(&folder.to_string_lossy()).await;
        assert!(result.is_err());
    }
}
