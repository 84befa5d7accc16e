//! 推荐码服务 - 业务能力层
//!
//! 只负责推荐码资源的接口调用，不关心流程

use crate::infrastructure::ApiTransport;
use crate::models::ReferralCode;
use anyhow::Result;
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde_json::json;
use tracing::debug;

/// 推荐码服务
pub struct ReferralService;

impl ReferralService {
    pub fn new() -> Self {
        Self
    }

    /// 校验推荐码是否可用
    ///
    /// 无效或已失效的码服务端直接给 404/400，调用方据此提示用户
    pub async fn validate(&self, transport: &ApiTransport, code: &str) -> Result<ReferralCode> {
        let body = json!({ "code": code });
        let referral = transport
            .request_enveloped(
                Method::POST,
                "/api/referral-codes/validate",
                transport.options().with_body(body),
            )
            .await?;
        Ok(referral)
    }

    /// 全部推荐码(管理员)
    pub async fn list(&self, transport: &ApiTransport) -> Result<Vec<ReferralCode>> {
        let codes = transport
            .request_enveloped(Method::GET, "/api/referral-codes", transport.options())
            .await?;
        Ok(codes)
    }

    /// 新建推荐码(管理员)
    pub async fn create(
        &self,
        transport: &ApiTransport,
        code: &str,
        discount_percent: f64,
        max_uses: Option<u32>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<ReferralCode> {
        debug!("新建推荐码: {} ({}% 折扣)", code, discount_percent);
        let body = json!({
            "code": code,
            "discountPercent": discount_percent,
            "maxUses": max_uses,
            "expiresAt": expires_at,
        });
        let referral = transport
            .request_enveloped(
                Method::POST,
                "/api/referral-codes",
                transport.options().with_body(body),
            )
            .await?;
        Ok(referral)
    }

    /// 启用/停用推荐码(管理员)
    pub async fn set_active(
        &self,
        transport: &ApiTransport,
        referral_id: &str,
        is_active: bool,
    ) -> Result<ReferralCode> {
        let path = format!("/api/referral-codes/{}", referral_id);
        let body = json!({ "isActive": is_active });
        let referral = transport
            .request_enveloped(Method::PUT, &path, transport.options().with_body(body))
            .await?;
        Ok(referral)
    }

    /// 删除推荐码(管理员)
    pub async fn delete(&self, transport: &ApiTransport, referral_id: &str) -> Result<()> {
        debug!("删除推荐码: {}", referral_id);
        let path = format!("/api/referral-codes/{}", referral_id);
        transport
            .request_ok(Method::DELETE, &path, transport.options())
            .await?;
        Ok(())
    }
}

impl Default for ReferralService {
    fn default() -> Self {
        Self::new()
    }
}
