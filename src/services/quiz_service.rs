//! 测验服务 - 业务能力层
//!
//! 只负责测验资源的接口调用，不关心流程

use crate::infrastructure::ApiTransport;
use crate::models::Quiz;
use anyhow::Result;
use reqwest::Method;
use serde_json::json;
use tracing::debug;

/// 测验服务
pub struct QuizService;

impl QuizService {
    pub fn new() -> Self {
        Self
    }

    /// 全部测验
    pub async fn list(&self, transport: &ApiTransport) -> Result<Vec<Quiz>> {
        let quizzes = transport
            .request_enveloped(Method::GET, "/api/quizzes", transport.options())
            .await?;
        Ok(quizzes)
    }

    /// 课程下的全部测验
    pub async fn list_for_course(
        &self,
        transport: &ApiTransport,
        course_id: &str,
    ) -> Result<Vec<Quiz>> {
        let path = format!("/api/courses/{}/quizzes", course_id);
        let quizzes = transport
            .request_enveloped(Method::GET, &path, transport.options())
            .await?;
        Ok(quizzes)
    }

    /// 单个测验
    pub async fn get(&self, transport: &ApiTransport, quiz_id: &str) -> Result<Quiz> {
        let path = format!("/api/quizzes/{}", quiz_id);
        let quiz = transport
            .request_enveloped(Method::GET, &path, transport.options())
            .await?;
        Ok(quiz)
    }

    /// 新建测验(管理员)
    pub async fn create(
        &self,
        transport: &ApiTransport,
        course_id: &str,
        name: &str,
        description: Option<&str>,
    ) -> Result<Quiz> {
        debug!("新建测验: {} | 课程 {}", name, course_id);
        let body = json!({
            "courseId": course_id,
            "name": name,
            "description": description,
        });
        let quiz = transport
            .request_enveloped(
                Method::POST,
                "/api/quizzes",
                transport.options().with_body(body),
            )
            .await?;
        Ok(quiz)
    }

    /// 更新测验(管理员)
    pub async fn update(
        &self,
        transport: &ApiTransport,
        quiz_id: &str,
        name: &str,
        description: Option<&str>,
        is_active: bool,
    ) -> Result<Quiz> {
        let path = format!("/api/quizzes/{}", quiz_id);
        let body = json!({
            "name": name,
            "description": description,
            "isActive": is_active,
        });
        let quiz = transport
            .request_enveloped(Method::PUT, &path, transport.options().with_body(body))
            .await?;
        Ok(quiz)
    }

    /// 删除测验(管理员)
    pub async fn delete(&self, transport: &ApiTransport, quiz_id: &str) -> Result<()> {
        debug!("删除测验: {}", quiz_id);
        let path = format!("/api/quizzes/{}", quiz_id);
        transport
            .request_ok(Method::DELETE, &path, transport.options())
            .await?;
        Ok(())
    }
}

impl Default for QuizService {
    fn default() -> Self {
        Self::new()
    }
}
