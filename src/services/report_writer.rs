//! 失败记录服务 - 业务能力层
//!
//! 只负责"把导入失败写进 warn.txt"能力，不关心流程

use anyhow::Result;
use std::fs::OpenOptions;
use std::io::Write;
use tracing::debug;

/// 失败记录服务
///
/// 职责：
/// - 把校验或上送失败的草稿题目追加到失败记录文件
/// - 只处理单个题目的记录
/// - 不出现 Vec<DraftQuestion>
/// - 不关心流程顺序
pub struct ReportWriter {
    warn_file_path: String,
}

impl ReportWriter {
    /// 创建新的失败记录服务
    pub fn new() -> Self {
        Self {
            warn_file_path: "warn.txt".to_string(),
        }
    }

    /// 使用自定义文件路径创建
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            warn_file_path: path.into(),
        }
    }

    /// 写入一条失败记录
    ///
    /// # 参数
    /// - `set_name`: 草稿批次名称
    /// - `question_index`: 题目在批次内的序号
    /// - `reason`: 失败原因
    pub async fn write(&self, set_name: &str, question_index: usize, reason: &str) -> Result<()> {
        debug!(
            "写入失败记录: 批次 {} | 题目 {} | {}",
            set_name, question_index, reason
        );

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.warn_file_path)?;

        let warn_msg = format!("批次 {} | 题目 {} | {}\n", set_name, question_index, reason);

        file.write_all(warn_msg.as_bytes())?;

        Ok(())
    }
}

impl Default for ReportWriter {
    fn default() -> Self {
        Self::new()
    }
}
