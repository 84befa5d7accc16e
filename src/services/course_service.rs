//! 课程服务 - 业务能力层
//!
//! 只负责课程资源的接口调用，不关心流程

use crate::infrastructure::ApiTransport;
use crate::models::{Course, CourseQuestionStats, Question};
use anyhow::Result;
use reqwest::Method;
use serde_json::json;
use tracing::debug;

/// 课程服务
///
/// 职责：
/// - 课程的增删改查
/// - 课程题目与统计查询(练习模式的数据源)
pub struct CourseService;

impl CourseService {
    pub fn new() -> Self {
        Self
    }

    /// 全部课程
    pub async fn list(&self, transport: &ApiTransport) -> Result<Vec<Course>> {
        let courses = transport
            .request_enveloped(Method::GET, "/api/courses", transport.options())
            .await?;
        Ok(courses)
    }

    /// 单个课程
    pub async fn get(&self, transport: &ApiTransport, course_id: &str) -> Result<Course> {
        let path = format!("/api/courses/{}", course_id);
        let course = transport
            .request_enveloped(Method::GET, &path, transport.options())
            .await?;
        Ok(course)
    }

    /// 课程下的全部题目
    pub async fn questions(
        &self,
        transport: &ApiTransport,
        course_id: &str,
    ) -> Result<Vec<Question>> {
        let path = format!("/api/courses/{}/questions", course_id);
        let questions = transport
            .request_enveloped(Method::GET, &path, transport.options())
            .await?;
        Ok(questions)
    }

    /// 课程题目统计
    pub async fn question_stats(
        &self,
        transport: &ApiTransport,
        course_id: &str,
    ) -> Result<CourseQuestionStats> {
        let path = format!("/api/courses/{}/questions/stats", course_id);
        let stats = transport
            .request_enveloped(Method::GET, &path, transport.options())
            .await?;
        Ok(stats)
    }

    /// 新建课程(管理员)
    pub async fn create(
        &self,
        transport: &ApiTransport,
        title: &str,
        description: Option<&str>,
        image_url: Option<&str>,
    ) -> Result<Course> {
        debug!("新建课程: {}", title);
        let body = json!({
            "title": title,
            "description": description,
            "imageUrl": image_url,
        });
        let course = transport
            .request_enveloped(
                Method::POST,
                "/api/courses",
                transport.options().with_body(body),
            )
            .await?;
        Ok(course)
    }

    /// 更新课程(管理员)
    pub async fn update(
        &self,
        transport: &ApiTransport,
        course_id: &str,
        title: &str,
        description: Option<&str>,
        image_url: Option<&str>,
        is_active: bool,
    ) -> Result<Course> {
        let path = format!("/api/courses/{}", course_id);
        let body = json!({
            "title": title,
            "description": description,
            "imageUrl": image_url,
            "isActive": is_active,
        });
        let course = transport
            .request_enveloped(Method::PUT, &path, transport.options().with_body(body))
            .await?;
        Ok(course)
    }

    /// 删除课程(管理员)
    pub async fn delete(&self, transport: &ApiTransport, course_id: &str) -> Result<()> {
        debug!("删除课程: {}", course_id);
        let path = format!("/api/courses/{}", course_id);
        transport
            .request_ok(Method::DELETE, &path, transport.options())
            .await?;
        Ok(())
    }
}

impl Default for CourseService {
    fn default() -> Self {
        Self::new()
    }
}
