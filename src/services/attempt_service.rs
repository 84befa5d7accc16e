//! 答题记录服务 - 业务能力层
//!
//! 只负责答题记录的接口调用，不关心流程

use crate::infrastructure::ApiTransport;
use crate::models::{AttemptResult, AttemptSubmission, AttemptSummary};
use anyhow::Result;
use reqwest::Method;
use tracing::debug;

/// 答题记录服务
///
/// 职责：
/// - 整卷提交，拿回服务端判分结果
/// - 查询本人历史记录与单条成绩
///
/// 一套题只允许一次作答，重复提交由服务端以 409 拒绝，
/// 客户端的提前检查只是少跑一趟加载，不是权威判断。
pub struct AttemptService;

impl AttemptService {
    pub fn new() -> Self {
        Self
    }

    /// 整卷提交
    ///
    /// # 参数
    /// - `submission`: 全部作答位(未作答的题也在内)
    ///
    /// # 返回
    /// 返回服务端判分后的完整成绩
    pub async fn submit(
        &self,
        transport: &ApiTransport,
        submission: &AttemptSubmission,
    ) -> Result<AttemptResult> {
        debug!(
            "提交答卷: 套题 {} | {} 个作答位 | 耗时 {}s",
            submission.package_id,
            submission.answers.len(),
            submission.time_spent
        );
        let body = serde_json::to_value(submission)?;
        let result = transport
            .request_enveloped(
                Method::POST,
                "/api/quiz/attempts",
                transport.options().with_body(body),
            )
            .await?;
        Ok(result)
    }

    /// 本人全部答题记录
    pub async fn mine(&self, transport: &ApiTransport) -> Result<Vec<AttemptSummary>> {
        let attempts = transport
            .request_enveloped(Method::GET, "/api/quiz/attempts/mine", transport.options())
            .await?;
        Ok(attempts)
    }

    /// 单条成绩(含逐题判定)
    pub async fn get(&self, transport: &ApiTransport, attempt_id: &str) -> Result<AttemptResult> {
        let path = format!("/api/quiz/attempts/{}", attempt_id);
        let result = transport
            .request_enveloped(Method::GET, &path, transport.options())
            .await?;
        Ok(result)
    }

    /// 本人在某套题上的已有记录(没有则返回 None)
    pub async fn find_for_package(
        &self,
        transport: &ApiTransport,
        package_id: &str,
    ) -> Result<Option<AttemptSummary>> {
        let attempts = self.mine(transport).await?;
        Ok(attempts.into_iter().find(|a| a.package_id == package_id))
    }
}

impl Default for AttemptService {
    fn default() -> Self {
        Self::new()
    }
}
