//! 套餐服务 - 业务能力层
//!
//! 只负责套餐资源的接口调用，不关心流程

use crate::infrastructure::ApiTransport;
use crate::models::Bundle;
use anyhow::Result;
use reqwest::Method;
use serde_json::json;
use tracing::debug;

/// 套餐新建/更新的字段
#[derive(Debug, Clone, Default)]
pub struct BundleInput {
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    pub discount_percent: Option<f64>,
    pub is_active: bool,
    /// 套餐内的套题
    pub package_ids: Vec<String>,
}

/// 套餐服务
pub struct BundleService;

impl BundleService {
    pub fn new() -> Self {
        Self
    }

    /// 全部套餐
    pub async fn list(&self, transport: &ApiTransport) -> Result<Vec<Bundle>> {
        let bundles = transport
            .request_enveloped(Method::GET, "/api/bundles", transport.options())
            .await?;
        Ok(bundles)
    }

    /// 单个套餐(含套题列表)
    pub async fn get(&self, transport: &ApiTransport, bundle_id: &str) -> Result<Bundle> {
        let path = format!("/api/bundles/{}", bundle_id);
        let bundle = transport
            .request_enveloped(Method::GET, &path, transport.options())
            .await?;
        Ok(bundle)
    }

    /// 新建套餐(管理员)
    pub async fn create(&self, transport: &ApiTransport, input: &BundleInput) -> Result<Bundle> {
        debug!("新建套餐: {} | {} 个套题", input.title, input.package_ids.len());
        let bundle = transport
            .request_enveloped(
                Method::POST,
                "/api/bundles",
                transport.options().with_body(Self::build_body(input)),
            )
            .await?;
        Ok(bundle)
    }

    /// 更新套餐(管理员)，套题列表整组替换
    pub async fn update(
        &self,
        transport: &ApiTransport,
        bundle_id: &str,
        input: &BundleInput,
    ) -> Result<Bundle> {
        let path = format!("/api/bundles/{}", bundle_id);
        let bundle = transport
            .request_enveloped(
                Method::PUT,
                &path,
                transport.options().with_body(Self::build_body(input)),
            )
            .await?;
        Ok(bundle)
    }

    /// 删除套餐(管理员)
    pub async fn delete(&self, transport: &ApiTransport, bundle_id: &str) -> Result<()> {
        debug!("删除套餐: {}", bundle_id);
        let path = format!("/api/bundles/{}", bundle_id);
        transport
            .request_ok(Method::DELETE, &path, transport.options())
            .await?;
        Ok(())
    }

    /// 向套餐追加一个套题(管理员)
    pub async fn add_package(
        &self,
        transport: &ApiTransport,
        bundle_id: &str,
        package_id: &str,
    ) -> Result<()> {
        let path = format!("/api/bundles/{}/packages", bundle_id);
        let body = json!({ "packageId": package_id });
        transport
            .request_ok(Method::POST, &path, transport.options().with_body(body))
            .await?;
        Ok(())
    }

    /// 从套餐移除一个套题(管理员)
    pub async fn remove_package(
        &self,
        transport: &ApiTransport,
        bundle_id: &str,
        package_id: &str,
    ) -> Result<()> {
        let path = format!("/api/bundles/{}/packages/{}", bundle_id, package_id);
        transport
            .request_ok(Method::DELETE, &path, transport.options())
            .await?;
        Ok(())
    }

    fn build_body(input: &BundleInput) -> serde_json::Value {
        json!({
            "title": input.title,
            "description": input.description,
            "price": input.price,
            "discountPercent": input.discount_percent,
            "isActive": input.is_active,
            "packageIds": input.package_ids,
        })
    }
}

impl Default for BundleService {
    fn default() -> Self {
        Self::new()
    }
}
