//! 统一错误类型定义
//!
//! 按领域拆分子错误类型，再由 `AppError` 汇总。
//! anyhow 已经为所有实现了 std::error::Error 的类型提供了自动转换，
//! 所以各层可以直接用 `?` 把这些错误抛给上层。

use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 接口调用错误
    #[error("API错误: {0}")]
    Api(#[from] ApiError),
    /// 答题/练习会话错误
    #[error("会话错误: {0}")]
    Session(#[from] SessionError),
    /// 内容校验错误
    #[error("校验错误: {0}")]
    Validation(#[from] ValidationError),
    /// 草稿文件错误
    #[error("草稿错误: {0}")]
    Draft(#[from] DraftError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(String),
}

// ========== 接口调用错误 ==========

/// 接口调用错误
///
/// 按可重试性分类: Timeout / Network 属于传输层失败，可以重试；
/// Http / Decode / Envelope 是服务端明确给出的答复，重试没有意义。
#[derive(Debug, Error)]
pub enum ApiError {
    /// 请求超时
    #[error("请求超时 ({path}): 超过 {seconds} 秒未收到响应")]
    Timeout { path: String, seconds: u64 },

    /// 传输层失败(连接被拒、DNS 解析失败、连接中断等)
    #[error("网络请求失败 ({path}): {source}")]
    Network {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    /// 服务端返回非 2xx 状态码
    #[error("HTTP {status} ({path}): {message}")]
    Http {
        path: String,
        status: u16,
        message: String,
        /// 响应体能解析成 JSON 时原样携带，供上层展示具体原因
        body: Option<serde_json::Value>,
    },

    /// 响应体不是预期的 JSON 结构
    #[error("响应解析失败 ({path}): {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// 响应信封校验失败(success=false 或 data 缺失)
    #[error("接口返回失败 ({path}): {reason}")]
    Envelope { path: String, reason: String },
}

impl ApiError {
    /// 是否属于可重试的传输层错误
    pub fn is_retryable(&self) -> bool {
        matches!(self, ApiError::Timeout { .. } | ApiError::Network { .. })
    }

    /// HTTP 状态码(仅 Http 变体携带)
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// ========== 会话错误 ==========

/// 答题/练习会话错误
#[derive(Debug, Error)]
pub enum SessionError {
    /// 同一套题只允许一次作答(服务端是最终权威，这里只是提前拦截)
    #[error("套题 {package_id} 已有答题记录 {attempt_id}，不能重复作答")]
    AlreadyAttempted {
        package_id: String,
        attempt_id: String,
    },

    /// 套题没有任何题目，无法开始答题
    #[error("套题 {package_id} 没有任何题目")]
    EmptyPackage { package_id: String },

    /// 课程没有任何题目，无法开始练习
    #[error("课程 {course_id} 没有任何练习题目")]
    EmptyCourse { course_id: String },

    /// 已有一次提交在进行中
    #[error("提交正在进行中，不能重复提交")]
    SubmitInProgress,

    /// 会话已经结束
    #[error("答题会话已结束")]
    SessionClosed,
}

// ========== 内容校验错误 ==========

/// 内容校验错误(按字段报告)
#[derive(Debug, Error)]
#[error("{field} 校验失败: {reason}")]
pub struct ValidationError {
    pub field: String,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// 文本长度不足(长度按规范化后的纯文本字符数计算)
    pub fn too_short(field: impl Into<String>, actual: usize, min: usize) -> Self {
        Self {
            field: field.into(),
            reason: format!("长度 {} 小于最小值 {}", actual, min),
        }
    }

    /// 文本长度超限
    pub fn too_long(field: impl Into<String>, actual: usize, max: usize) -> Self {
        Self {
            field: field.into(),
            reason: format!("长度 {} 超过最大值 {}", actual, max),
        }
    }
}

// ========== 草稿文件错误 ==========

/// 草稿文件错误
#[derive(Debug, Error)]
pub enum DraftError {
    /// 草稿目录不存在
    #[error("草稿目录不存在: {path}")]
    FolderNotFound { path: String },

    /// 文件读取失败
    #[error("读取草稿文件 {path} 失败: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// TOML 解析失败
    #[error("解析草稿文件 {path} 失败: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
