//! 认证服务 - 业务能力层
//!
//! 只负责账号相关的接口调用，不关心流程

use crate::infrastructure::ApiTransport;
use crate::models::{AdminStatus, SignInData, User};
use anyhow::Result;
use reqwest::Method;
use serde_json::json;
use tracing::{debug, info};

/// 认证服务
///
/// 职责：
/// - 注册 / 登录 / 登出
/// - 查询当前用户与管理员身份
/// - 登录成功后把令牌写入传输器槽位
pub struct AuthService;

impl AuthService {
    pub fn new() -> Self {
        Self
    }

    /// 注册新账号
    ///
    /// 认证接口不走统一信封，响应就是用户数据本身
    pub async fn sign_up(
        &self,
        transport: &ApiTransport,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<SignInData> {
        let body = json!({
            "email": email,
            "password": password,
            "name": name,
        });
        let data: SignInData = transport
            .request(
                Method::POST,
                "/api/auth/sign-up/email",
                transport.options().with_body(body),
            )
            .await?;
        Ok(data)
    }

    /// 登录，成功后把令牌写入传输器槽位
    ///
    /// # 参数
    /// - `email`: 登录邮箱
    /// - `password`: 密码
    ///
    /// # 返回
    /// 返回登录用户
    pub async fn sign_in(
        &self,
        transport: &ApiTransport,
        email: &str,
        password: &str,
    ) -> Result<User> {
        let body = json!({
            "email": email,
            "password": password,
        });
        let data: SignInData = transport
            .request(
                Method::POST,
                "/api/auth/sign-in/email",
                transport.options().with_body(body),
            )
            .await?;

        match &data.token {
            Some(token) => {
                transport.set_token(token.clone());
                debug!("会话令牌已写入槽位");
            }
            // 没有显式令牌的部署靠 Cookie 维持会话
            None => debug!("登录响应未携带令牌，使用 Cookie 会话"),
        }
        info!("✓ 登录成功: {}", data.user.email);
        Ok(data.user)
    }

    /// 登出并清除本地令牌
    pub async fn sign_out(&self, transport: &ApiTransport) -> Result<()> {
        transport
            .request_text(Method::POST, "/api/auth/sign-out", transport.options())
            .await?;
        transport.clear_token();
        info!("已登出");
        Ok(())
    }

    /// 当前登录用户
    pub async fn current_user(&self, transport: &ApiTransport) -> Result<User> {
        let user = transport
            .request_enveloped(Method::GET, "/api/users/me", transport.options())
            .await?;
        Ok(user)
    }

    /// 当前用户是否为管理员
    pub async fn is_admin(&self, transport: &ApiTransport) -> Result<bool> {
        let status: AdminStatus = transport
            .request_enveloped(Method::GET, "/api/users/is-admin", transport.options())
            .await?;
        Ok(status.is_admin)
    }
}

impl Default for AuthService {
    fn default() -> Self {
        Self::new()
    }
}
