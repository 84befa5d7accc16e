use serde::{Deserialize, Serialize};

/// 登录用户
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
}

/// 登录接口返回(认证接口原样返回，不走统一信封)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInData {
    /// 部分部署返回会话令牌，没有时靠 Cookie 维持会话
    pub token: Option<String>,
    pub user: User,
}

/// 管理员身份查询结果
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStatus {
    #[serde(default)]
    pub is_admin: bool,
}
