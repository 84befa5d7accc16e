//! 草稿导入运行器 - 编排层
//!
//! ## 职责
//!
//! 1. **批量加载**：扫描并加载所有待导入的草稿（`Vec<DraftSet>`）
//! 2. **并发控制**：使用 Semaphore 限制并发数量
//! 3. **分批处理**：将草稿分批次导入，每批完成后再开始下一批
//! 4. **文件清理**：整批全部入库的草稿文件才删除，有跳过就保留待修
//! 5. **全局统计**：汇总所有批次的导入结果
//!
//! ## 设计特点
//!
//! - **顶层编排**：不处理单道题目的细节，向下委托 ImportFlow
//! - **并发安全**：ApiTransport 克隆后共享同一令牌槽，Semaphore 限流

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::infrastructure::ApiTransport;
use crate::models::{load_all_draft_sets, DraftSet};
use crate::workflow::ImportFlow;

/// 全局导入统计
#[derive(Debug, Default, Clone, Copy)]
pub struct ImportReport {
    /// 草稿批次总数
    pub sets: usize,
    /// 全部入库的批次数
    pub clean_sets: usize,
    /// 入库题目数
    pub imported: usize,
    /// 跳过题目数
    pub skipped: usize,
}

/// 进入草稿导入模式
pub async fn run(transport: &ApiTransport, config: &Config) -> Result<ImportReport> {
    info!("\n📁 正在扫描待导入的草稿...");
    let all_sets = load_all_draft_sets(&config.toml_folder).await?;

    if all_sets.is_empty() {
        warn!("⚠️ 没有找到待导入的TOML文件，程序结束");
        return Ok(ImportReport::default());
    }

    let total_sets = all_sets.len();
    log_sets_loaded(total_sets, config.max_concurrent_imports);

    let report = process_all_sets(transport, config, all_sets).await?;
    print_final_stats(&report, config);

    Ok(report)
}

/// 分批导入所有草稿
async fn process_all_sets(
    transport: &ApiTransport,
    config: &Config,
    all_sets: Vec<DraftSet>,
) -> Result<ImportReport> {
    let batch_size = config.max_concurrent_imports.max(1);
    let semaphore = Arc::new(Semaphore::new(batch_size));
    let total_sets = all_sets.len();
    let mut report = ImportReport {
        sets: total_sets,
        ..Default::default()
    };

    for batch_start in (0..total_sets).step_by(batch_size) {
        let batch_end = (batch_start + batch_size).min(total_sets);
        let batch_sets = &all_sets[batch_start..batch_end];
        let batch_num = batch_start / batch_size + 1;
        let total_batches = (total_sets + batch_size - 1) / batch_size;

        log_batch_start(batch_num, total_batches, batch_start + 1, batch_end, total_sets);

        let batch_result = process_batch(transport, config, batch_sets, batch_start, semaphore.clone()).await?;

        report.imported += batch_result.imported;
        report.skipped += batch_result.skipped;
        report.clean_sets += batch_result.clean_sets;

        log_batch_complete(batch_num, &batch_result);
    }

    Ok(report)
}

/// 批次处理结果
#[derive(Debug, Default)]
struct BatchResult {
    clean_sets: usize,
    imported: usize,
    skipped: usize,
}

/// 导入单个批次
async fn process_batch(
    transport: &ApiTransport,
    config: &Config,
    batch_sets: &[DraftSet],
    batch_start: usize,
    semaphore: Arc<Semaphore>,
) -> Result<BatchResult> {
    let mut batch_handles = Vec::new();

    // 为本批创建并发任务
    for (idx, set) in batch_sets.iter().enumerate() {
        let set_index = batch_start + idx + 1;
        let question_count = set.questions.len();
        let permit = semaphore.clone().acquire_owned().await?;

        // ApiTransport 内部是 Arc，克隆后共享同一 Cookie 会话与令牌槽
        let task_transport = transport.clone();
        let task_config = config.clone();
        let task_set = set.clone();

        let handle = tokio::spawn(async move {
            let _permit = permit;
            let flow = ImportFlow::new(&task_config);
            match flow.run(&task_transport, &task_set, set_index).await {
                Ok(stats) => {
                    if stats.is_clean() {
                        cleanup_file(task_set.file_path.as_deref(), set_index)?;
                    } else {
                        warn!(
                            "[批次 {}] ⚠️ 有 {} 道题被跳过，保留草稿文件待修",
                            set_index, stats.skipped
                        );
                    }
                    Ok(stats)
                }
                Err(e) => {
                    error!("[批次 {}] ❌ 导入过程中发生错误: {}", set_index, e);
                    Err(e)
                }
            }
        });
        batch_handles.push((set_index, question_count, handle));
    }

    // 等待本批所有任务完成
    let mut result = BatchResult::default();

    for (set_index, question_count, handle) in batch_handles {
        match handle.await {
            Ok(Ok(stats)) => {
                result.imported += stats.imported;
                result.skipped += stats.skipped;
                if stats.is_clean() {
                    result.clean_sets += 1;
                }
            }
            Ok(Err(_)) => {
                result.skipped += question_count;
            }
            Err(e) => {
                error!("[批次 {}] 任务执行失败: {}", set_index, e);
                result.skipped += question_count;
            }
        }
    }

    Ok(result)
}

/// 清理已导入的草稿文件
fn cleanup_file(file_path: Option<&str>, set_index: usize) -> Result<()> {
    info!("[批次 {}] 🗑️ 清理已导入的草稿文件...", set_index);

    if let Some(file_path) = file_path {
        if Path::new(file_path).exists() {
            fs::remove_file(file_path).with_context(|| format!("无法删除文件: {}", file_path))?;
            info!(
                "[批次 {}] ✓ 文件已删除: {}",
                set_index,
                Path::new(file_path)
                    .file_name()
                    .unwrap_or_default()
                    .to_string_lossy()
            );
        } else {
            warn!("[批次 {}] ⚠️ 文件不存在: {}", set_index, file_path);
        }
    } else {
        warn!("[批次 {}] ⚠️ 文件路径未设置", set_index);
    }

    Ok(())
}

// ========== 日志辅助函数 ==========

fn log_sets_loaded(total: usize, max_concurrent: usize) {
    info!("✓ 找到 {} 个待导入的草稿文件", total);
    info!("📋 将以每批 {} 个的方式导入", max_concurrent);
    info!("💡 每批完成后再开始下一批\n");
}

fn log_batch_start(batch_num: usize, total_batches: usize, start: usize, end: usize, total: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📦 开始导入第 {}/{} 批", batch_num, total_batches);
    info!("📄 本批草稿: {}-{} / 共 {} 个", start, end, total);
    info!("{}", "=".repeat(60));
}

fn log_batch_complete(batch_num: usize, result: &BatchResult) {
    info!("\n{}", "─".repeat(60));
    info!(
        "✓ 第 {} 批完成: 入库 {} 道，跳过 {} 道",
        batch_num, result.imported, result.skipped
    );
    info!("{}", "─".repeat(60));
}

fn print_final_stats(report: &ImportReport, config: &Config) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部导入完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 入库题目: {}", report.imported);
    info!("⚠️ 跳过题目: {}", report.skipped);
    info!("🗂️ 干净批次: {}/{}", report.clean_sets, report.sets);
    info!("{}", "=".repeat(60));
    info!("\n日志已保存至: {}", config.output_log_file);
    if report.skipped > 0 {
        info!("跳过明细见: {}", config.warn_file);
    }
}
