//! 套题服务 - 业务能力层
//!
//! 只负责套题资源的接口调用，不关心流程

use crate::infrastructure::ApiTransport;
use crate::models::Package;
use anyhow::Result;
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde_json::json;
use tracing::debug;

/// 套题新建/更新的字段
#[derive(Debug, Clone, Default)]
pub struct PackageInput {
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    /// 答题时限(分钟)，None 表示不限时
    pub time_limit: Option<u32>,
    pub is_active: bool,
    pub available_from: Option<DateTime<Utc>>,
    pub available_until: Option<DateTime<Utc>>,
}

/// 套题服务
///
/// 职责：
/// - 套题的增删改查
/// - 套题与题目的挂载/卸载
pub struct PackageService;

impl PackageService {
    pub fn new() -> Self {
        Self
    }

    /// 全部套题
    pub async fn list(&self, transport: &ApiTransport) -> Result<Vec<Package>> {
        let packages = transport
            .request_enveloped(Method::GET, "/api/packages", transport.options())
            .await?;
        Ok(packages)
    }

    /// 单个套题(含全部题目与选项)
    pub async fn get(&self, transport: &ApiTransport, package_id: &str) -> Result<Package> {
        let path = format!("/api/packages/{}", package_id);
        let package = transport
            .request_enveloped(Method::GET, &path, transport.options())
            .await?;
        Ok(package)
    }

    /// 新建套题(管理员)
    pub async fn create(&self, transport: &ApiTransport, input: &PackageInput) -> Result<Package> {
        debug!("新建套题: {}", input.title);
        let package = transport
            .request_enveloped(
                Method::POST,
                "/api/packages",
                transport.options().with_body(Self::build_body(input)),
            )
            .await?;
        Ok(package)
    }

    /// 更新套题(管理员)
    pub async fn update(
        &self,
        transport: &ApiTransport,
        package_id: &str,
        input: &PackageInput,
    ) -> Result<Package> {
        let path = format!("/api/packages/{}", package_id);
        let package = transport
            .request_enveloped(
                Method::PUT,
                &path,
                transport.options().with_body(Self::build_body(input)),
            )
            .await?;
        Ok(package)
    }

    /// 删除套题(管理员)
    pub async fn delete(&self, transport: &ApiTransport, package_id: &str) -> Result<()> {
        debug!("删除套题: {}", package_id);
        let path = format!("/api/packages/{}", package_id);
        transport
            .request_ok(Method::DELETE, &path, transport.options())
            .await?;
        Ok(())
    }

    /// 把一批题目挂载到套题(管理员)，顺序接在现有题目之后
    pub async fn attach_questions(
        &self,
        transport: &ApiTransport,
        package_id: &str,
        question_ids: &[String],
    ) -> Result<()> {
        debug!("挂载题目: 套题 {} | {} 道", package_id, question_ids.len());
        let path = format!("/api/packages/{}/questions", package_id);
        let body = json!({ "questionIds": question_ids });
        transport
            .request_ok(Method::POST, &path, transport.options().with_body(body))
            .await?;
        Ok(())
    }

    /// 从套题卸载一道题目(管理员)
    pub async fn detach_question(
        &self,
        transport: &ApiTransport,
        package_id: &str,
        question_id: &str,
    ) -> Result<()> {
        let path = format!("/api/packages/{}/questions/{}", package_id, question_id);
        transport
            .request_ok(Method::DELETE, &path, transport.options())
            .await?;
        Ok(())
    }

    /// 从课程题库随机抽取 count 道题挂载到套题(管理员)
    pub async fn attach_random_questions(
        &self,
        transport: &ApiTransport,
        package_id: &str,
        course_id: &str,
        count: u32,
    ) -> Result<Package> {
        debug!("随机挂载: 套题 {} | 课程 {} | {} 道", package_id, course_id, count);
        let path = format!("/api/packages/{}/questions/random", package_id);
        let body = json!({ "courseId": course_id, "count": count });
        let package = transport
            .request_enveloped(Method::POST, &path, transport.options().with_body(body))
            .await?;
        Ok(package)
    }

    fn build_body(input: &PackageInput) -> serde_json::Value {
        json!({
            "title": input.title,
            "description": input.description,
            "price": input.price,
            "timeLimit": input.time_limit,
            "isActive": input.is_active,
            "availableFrom": input.available_from,
            "availableUntil": input.available_until,
        })
    }
}

impl Default for PackageService {
    fn default() -> Self {
        Self::new()
    }
}
