//! HTTP 传输层 - 基础设施层
//!
//! 持有唯一的 reqwest::Client 资源，只暴露"发请求"的能力

use crate::config::Config;
use crate::error::ApiError;
use crate::models::ResponseEnvelope;
use anyhow::Result;
use reqwest::header::ACCEPT;
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// 单次请求的可选参数
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// 超时时长，None 表示不限制
    pub timeout: Option<Duration>,
    /// 传输层失败后的额外重试次数
    pub retries: u32,
    /// 重试退避基数，第 n 次重试前等待 base * 2^(n-1)
    pub retry_delay: Duration,
    /// 单次请求覆盖会话令牌
    pub token: Option<String>,
    /// JSON 请求体
    pub body: Option<JsonValue>,
}

impl RequestOptions {
    pub fn with_body(mut self, body: JsonValue) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}

/// 平台 API 传输器
///
/// 职责：
/// - 持有唯一的 reqwest::Client(连接池、Cookie)
/// - 持有本实例的会话令牌槽位
/// - 暴露 request() / request_enveloped() 能力
/// - 统一超时、重试、错误分类
/// - 不认识 Course / Package / Question
/// - 不处理业务流程
#[derive(Clone)]
pub struct ApiTransport {
    client: Client,
    base_url: String,
    /// 会话令牌槽位，实例之间互不影响
    token: Arc<RwLock<Option<String>>>,
    default_timeout: Option<Duration>,
    default_retries: u32,
    default_retry_delay: Duration,
}

impl ApiTransport {
    /// 创建新的传输器，默认参数取自配置
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder().cookie_store(true).build()?;
        let default_timeout = if config.request_timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(config.request_timeout_secs))
        };
        Ok(Self {
            client,
            base_url: config.api_base_url.clone(),
            token: Arc::new(RwLock::new(None)),
            default_timeout,
            default_retries: config.request_retries,
            default_retry_delay: Duration::from_millis(config.retry_delay_ms),
        })
    }

    /// 按配置默认值生成一份请求参数
    pub fn options(&self) -> RequestOptions {
        RequestOptions {
            timeout: self.default_timeout,
            retries: self.default_retries,
            retry_delay: self.default_retry_delay,
            token: None,
            body: None,
        }
    }

    /// 写入会话令牌(登录成功后调用)
    pub fn set_token(&self, token: impl Into<String>) {
        let mut slot = match self.token.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *slot = Some(token.into());
    }

    /// 清除会话令牌(登出后调用)
    pub fn clear_token(&self) {
        let mut slot = match self.token.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *slot = None;
    }

    /// 当前会话令牌
    pub fn token(&self) -> Option<String> {
        match self.token.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// 发起请求并把响应体解析为 T
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        let text = self.send_with_retry(method, path, &options).await?;
        serde_json::from_str(&text).map_err(|source| ApiError::Decode {
            path: path.to_string(),
            source,
        })
    }

    /// 发起请求并原样返回响应体文本(用于无响应体或非 JSON 的接口)
    pub async fn request_text(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<String, ApiError> {
        self.send_with_retry(method, path, &options).await
    }

    /// 发起请求，校验统一信封后取出 data
    pub async fn request_enveloped<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        let envelope: ResponseEnvelope<T> = self.request(method, path, options).await?;
        envelope.into_data(path)
    }

    /// 发起请求，只校验信封的 success(用于删除等无返回体的接口)
    pub async fn request_ok(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<(), ApiError> {
        let envelope: ResponseEnvelope<JsonValue> = self.request(method, path, options).await?;
        envelope.ensure_success(path)
    }

    /// 带重试的发送循环
    ///
    /// 只重试传输层错误(超时/网络)，HTTP 错误码是服务端的明确答复，原样返回
    async fn send_with_retry(
        &self,
        method: Method,
        path: &str,
        options: &RequestOptions,
    ) -> Result<String, ApiError> {
        let url = self.build_url(path);
        let mut attempt: u32 = 0;
        loop {
            debug!("{} {}", method, path);
            match self.send_once(method.clone(), &url, path, options).await {
                Ok(text) => return Ok(text),
                Err(e) if e.is_retryable() && attempt < options.retries => {
                    attempt += 1;
                    let delay = backoff_delay(options.retry_delay, attempt);
                    warn!(
                        "请求失败 ({})，{}ms 后进行第 {}/{} 次重试: {}",
                        path,
                        delay.as_millis(),
                        attempt,
                        options.retries,
                        e
                    );
                    sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// 发送一次请求，完成状态码检查并读出响应体
    async fn send_once(
        &self,
        method: Method,
        url: &str,
        path: &str,
        options: &RequestOptions,
    ) -> Result<String, ApiError> {
        let mut request = self
            .client
            .request(method, url)
            .header(ACCEPT, "application/json, text/plain, */*");

        if let Some(body) = &options.body {
            request = request.json(body);
        }
        if let Some(token) = options.token.clone().or_else(|| self.token()) {
            request = request.bearer_auth(token);
        }
        if let Some(timeout) = options.timeout {
            request = request.timeout(timeout);
        }

        let response = request
            .send()
            .await
            .map_err(|e| classify_transport_error(path, options, e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| classify_transport_error(path, options, e))?;

        if !status.is_success() {
            let body = serde_json::from_str::<JsonValue>(&text).ok();
            return Err(ApiError::Http {
                path: path.to_string(),
                status: status.as_u16(),
                message: http_error_message(status, body.as_ref()),
                body,
            });
        }

        Ok(text)
    }

    /// 拼接完整 URL，绝对地址原样放行
    fn build_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        let base = self.base_url.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{}{}", base, path)
        } else {
            format!("{}/{}", base, path)
        }
    }
}

/// 第 attempt 次重试前的等待时长: base * 2^(attempt-1)，无抖动
fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)))
}

/// 把 reqwest 的传输层错误归类为超时或网络错误
fn classify_transport_error(path: &str, options: &RequestOptions, err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::Timeout {
            path: path.to_string(),
            seconds: options.timeout.map(|t| t.as_secs()).unwrap_or(0),
        }
    } else {
        ApiError::Network {
            path: path.to_string(),
            source: err,
        }
    }
}

/// 从响应体里提取错误说明，取不到就用状态码的标准描述
fn http_error_message(status: StatusCode, body: Option<&JsonValue>) -> String {
    body.and_then(|b| {
        b.get("error")
            .and_then(JsonValue::as_str)
            .or_else(|| b.get("message").and_then(JsonValue::as_str))
            .map(|s| s.to_string())
    })
    .unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("未知状态")
            .to_string()
    })
}
