//! 购买服务 - 业务能力层
//!
//! 只负责购买记录的接口调用，不关心流程

use crate::infrastructure::ApiTransport;
use crate::models::{Purchase, PurchaseItem};
use anyhow::Result;
use reqwest::Method;
use serde_json::json;
use tracing::debug;

/// 购买服务
///
/// 职责：
/// - 发起套题/套餐购买(可带推荐码)
/// - 查询本人购买记录
/// - 管理员查询与确认到账
pub struct PurchaseService;

impl PurchaseService {
    pub fn new() -> Self {
        Self
    }

    /// 购买单个套题
    pub async fn purchase_package(
        &self,
        transport: &ApiTransport,
        package_id: &str,
        referral_code: Option<&str>,
    ) -> Result<Purchase> {
        debug!("购买套题: {}", package_id);
        let body = json!({
            "packageId": package_id,
            "referralCode": referral_code,
        });
        let purchase = transport
            .request_enveloped(
                Method::POST,
                "/api/purchases/package",
                transport.options().with_body(body),
            )
            .await?;
        Ok(purchase)
    }

    /// 购买套餐
    pub async fn purchase_bundle(
        &self,
        transport: &ApiTransport,
        bundle_id: &str,
        referral_code: Option<&str>,
    ) -> Result<Purchase> {
        debug!("购买套餐: {}", bundle_id);
        let body = json!({
            "bundleId": bundle_id,
            "referralCode": referral_code,
        });
        let purchase = transport
            .request_enveloped(
                Method::POST,
                "/api/purchases/bundle",
                transport.options().with_body(body),
            )
            .await?;
        Ok(purchase)
    }

    /// 本人全部购买记录
    pub async fn mine(&self, transport: &ApiTransport) -> Result<Vec<Purchase>> {
        let purchases = transport
            .request_enveloped(Method::GET, "/api/purchases/mine", transport.options())
            .await?;
        Ok(purchases)
    }

    /// 本人是否已购某套题且管理员已确认
    ///
    /// 只看直接购买记录，套餐内含的套题由服务端在访问校验时展开
    pub async fn owns_package(&self, transport: &ApiTransport, package_id: &str) -> Result<bool> {
        let purchases = self.mine(transport).await?;
        Ok(purchases.iter().any(|p| {
            p.approved
                && matches!(
                    &p.item,
                    PurchaseItem::Package { package_id: owned } if owned == package_id
                )
        }))
    }

    /// 全部购买记录(管理员)
    pub async fn list(&self, transport: &ApiTransport) -> Result<Vec<Purchase>> {
        let purchases = transport
            .request_enveloped(Method::GET, "/api/admin/purchases", transport.options())
            .await?;
        Ok(purchases)
    }

    /// 确认到账(管理员)
    pub async fn approve(&self, transport: &ApiTransport, purchase_id: &str) -> Result<Purchase> {
        debug!("确认购买到账: {}", purchase_id);
        let path = format!("/api/admin/purchases/{}", purchase_id);
        let body = json!({ "approved": true });
        let purchase = transport
            .request_enveloped(Method::PATCH, &path, transport.options().with_body(body))
            .await?;
        Ok(purchase)
    }

    /// 删除购买记录(管理员，驳回未到账的订单)
    pub async fn delete(&self, transport: &ApiTransport, purchase_id: &str) -> Result<()> {
        let path = format!("/api/admin/purchases/{}", purchase_id);
        transport
            .request_ok(Method::DELETE, &path, transport.options())
            .await?;
        Ok(())
    }
}

impl Default for PurchaseService {
    fn default() -> Self {
        Self::new()
    }
}
