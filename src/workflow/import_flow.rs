//! 草稿导入流程 - 流程层
//!
//! 核心职责：定义"一批草稿题目"的完整导入流程
//!
//! 流程顺序：
//! 1. 逐题校验(富文本规范化 + 长度 + 选项约束)
//! 2. 合格的题目逐个上送创建
//! 3. 创建完成后批量挂载到套题(草稿带 package_id 时)
//! 4. 校验或上送失败的题目写入 warn 文件(兜底)

use anyhow::{bail, Result};
use tracing::{info, warn};

use crate::config::Config;
use crate::error::ValidationError;
use crate::infrastructure::ApiTransport;
use crate::models::{DraftQuestion, DraftSet};
use crate::services::richtext::{
    self, ANSWER_TEXT_MAX, ANSWER_TEXT_MIN, EXPLANATION_MAX, QUESTION_TEXT_MAX, QUESTION_TEXT_MIN,
};
use crate::services::{AnswerInput, PackageService, QuestionInput, QuestionService, ReportWriter};

/// 单题导入结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    /// 已创建
    Imported { question_id: String },
    /// 跳过(校验失败或上送失败，已写 warn 文件)
    Skipped,
}

/// 一批草稿的导入统计
#[derive(Debug, Clone, Copy, Default)]
pub struct ImportStats {
    pub imported: usize,
    pub skipped: usize,
}

impl ImportStats {
    pub fn total(&self) -> usize {
        self.imported + self.skipped
    }

    /// 整批全部入库才算干净(干净的草稿文件才允许删除)
    pub fn is_clean(&self) -> bool {
        self.skipped == 0
    }
}

/// 草稿导入流程
///
/// - 编排完整的校验 → 创建 → 挂载流程
/// - 不持有任何资源(传输器由调用方传入)
/// - 只依赖业务能力(services)
pub struct ImportFlow {
    question_service: QuestionService,
    package_service: PackageService,
    report_writer: ReportWriter,
    verbose_logging: bool,
}

impl ImportFlow {
    pub fn new(config: &Config) -> Self {
        Self {
            question_service: QuestionService::new(),
            package_service: PackageService::new(),
            report_writer: ReportWriter::with_path(&config.warn_file),
            verbose_logging: config.verbose_logging,
        }
    }

    /// 导入一批草稿
    ///
    /// # 参数
    /// - `set`: 草稿批次
    /// - `set_index`: 批次序号(只用于日志)
    ///
    /// # 返回
    /// 本批的导入统计；缺 course_id 等结构性问题直接报错
    pub async fn run(
        &self,
        transport: &ApiTransport,
        set: &DraftSet,
        set_index: usize,
    ) -> Result<ImportStats> {
        let Some(course_id) = set.course_id.as_deref() else {
            bail!("草稿批次「{}」缺少 course_id，无法导入", set.name);
        };

        info!(
            "[批次 {}] 🚀 开始导入「{}」({} 道题)",
            set_index,
            set.name,
            set.questions.len()
        );

        let mut stats = ImportStats::default();
        let mut created_ids: Vec<String> = Vec::new();

        for (question_index, draft) in set.questions.iter().enumerate() {
            match self
                .import_question(transport, course_id, set, draft, question_index, set_index)
                .await?
            {
                ImportOutcome::Imported { question_id } => {
                    created_ids.push(question_id);
                    stats.imported += 1;
                }
                ImportOutcome::Skipped => {
                    stats.skipped += 1;
                }
            }
        }

        if let Some(package_id) = set.package_id.as_deref() {
            if created_ids.is_empty() {
                warn!("[批次 {}] ⚠️ 没有成功创建的题目，跳过挂载", set_index);
            } else {
                info!(
                    "[批次 {}] 📤 挂载 {} 道题目到套题 {}...",
                    set_index,
                    created_ids.len(),
                    package_id
                );
                self.package_service
                    .attach_questions(transport, package_id, &created_ids)
                    .await?;
                info!("[批次 {}] ✓ 挂载完成", set_index);
            }
        }

        info!(
            "[批次 {}] 导入结束: 成功 {} 道，跳过 {} 道",
            set_index, stats.imported, stats.skipped
        );
        Ok(stats)
    }

    /// 导入单题，校验失败或上送失败都写 warn 文件并跳过
    async fn import_question(
        &self,
        transport: &ApiTransport,
        course_id: &str,
        set: &DraftSet,
        draft: &DraftQuestion,
        question_index: usize,
        set_index: usize,
    ) -> Result<ImportOutcome> {
        if self.verbose_logging {
            self.log_text_preview(set_index, question_index, &draft.text);
        }

        let input = match validate_draft(draft) {
            Ok(input) => input,
            Err(e) => {
                warn!(
                    "[批次 {}] ⚠️ 题目 {} 校验失败: {}",
                    set_index, question_index, e
                );
                self.report_writer
                    .write(&set.name, question_index, &e.to_string())
                    .await?;
                return Ok(ImportOutcome::Skipped);
            }
        };

        match self
            .question_service
            .create(transport, course_id, &input)
            .await
        {
            Ok(question) => {
                info!(
                    "[批次 {}] ✓ 题目 {} 创建成功 (id: {})",
                    set_index, question_index, question.id
                );
                Ok(ImportOutcome::Imported {
                    question_id: question.id,
                })
            }
            Err(e) => {
                warn!(
                    "[批次 {}] ⚠️ 题目 {} 上送失败: {}",
                    set_index, question_index, e
                );
                self.report_writer
                    .write(&set.name, question_index, &format!("上送失败: {}", e))
                    .await?;
                Ok(ImportOutcome::Skipped)
            }
        }
    }

    fn log_text_preview(&self, set_index: usize, question_index: usize, text: &str) {
        let plain = richtext::normalize(text).plain_text;
        let preview: String = plain.chars().take(60).collect();
        let suffix = if plain.chars().count() > 60 { "..." } else { "" };
        info!(
            "[批次 {}] 题目 {}: {}{}",
            set_index, question_index, preview, suffix
        );
    }
}

/// 校验一道草稿并产出可上送的内容
///
/// 约束: 题干 10~5000 字，选项 1~2000 字且至少两个、至少一个正确，
/// 解析可空但不超过 10000 字。长度都按规范化后的纯文本字符数计。
pub fn validate_draft(draft: &DraftQuestion) -> Result<QuestionInput, ValidationError> {
    let text = richtext::check_length(&draft.text, "题干", QUESTION_TEXT_MIN, QUESTION_TEXT_MAX)?;

    if draft.answers.len() < 2 {
        return Err(ValidationError::new(
            "选项",
            format!("至少需要 2 个选项，实际 {} 个", draft.answers.len()),
        ));
    }
    if !draft.answers.iter().any(|a| a.is_correct) {
        return Err(ValidationError::new("选项", "至少需要一个正确选项"));
    }

    let mut answers = Vec::with_capacity(draft.answers.len());
    for (i, answer) in draft.answers.iter().enumerate() {
        let normalized = richtext::check_length(
            &answer.text,
            &format!("选项 {}", i + 1),
            ANSWER_TEXT_MIN,
            ANSWER_TEXT_MAX,
        )?;
        answers.push(AnswerInput {
            text: normalized.sanitized_html,
            is_correct: answer.is_correct,
        });
    }

    let explanation = match &draft.explanation {
        Some(raw) => {
            let normalized = richtext::check_length(raw, "解析", 0, EXPLANATION_MAX)?;
            // 规范化后没有实际内容就不上送
            if normalized.plain_text.trim().is_empty() {
                None
            } else {
                Some(normalized.sanitized_html)
            }
        }
        None => None,
    };

    Ok(QuestionInput {
        text: text.sanitized_html,
        image_url: draft.image_url.clone(),
        explanation,
        explanation_image_url: draft.explanation_image_url.clone(),
        answers,
    })
}
