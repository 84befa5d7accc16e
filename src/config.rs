/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    /// 运行模式: quiz(限时答题) / practice(自由练习) / import(题目导入)
    pub run_mode: String,
    /// 答题模式使用的套题 ID
    pub package_id: String,
    /// 练习模式使用的课程 ID
    pub course_id: String,
    /// 练习所属测验的名称(以 OSCE 开头时所有题目强制多选)
    pub quiz_name: String,
    /// 草稿 TOML 文件存放目录
    pub toml_folder: String,
    /// 同时导入的草稿文件数量
    pub max_concurrent_imports: usize,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
    /// 校验失败记录文件
    pub warn_file: String,
    // --- 平台 API 配置 ---
    pub api_base_url: String,
    /// 登录邮箱(留空则跳过登录)
    pub account_email: String,
    pub account_password: String,
    // --- 请求参数 ---
    /// 单次请求超时秒数(0 表示不限制)
    pub request_timeout_secs: u64,
    /// 传输层失败后的额外重试次数
    pub request_retries: u32,
    /// 重试退避基数(毫秒)，第 n 次重试前等待 base * 2^(n-1)
    pub retry_delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            run_mode: "quiz".to_string(),
            package_id: String::new(),
            course_id: String::new(),
            quiz_name: String::new(),
            toml_folder: "question_drafts".to_string(),
            max_concurrent_imports: 4,
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
            warn_file: "warn.txt".to_string(),
            api_base_url: "http://localhost:3000".to_string(),
            account_email: String::new(),
            account_password: String::new(),
            request_timeout_secs: 30,
            request_retries: 2,
            retry_delay_ms: 300,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            run_mode: std::env::var("RUN_MODE").unwrap_or(default.run_mode),
            package_id: std::env::var("PACKAGE_ID").unwrap_or(default.package_id),
            course_id: std::env::var("COURSE_ID").unwrap_or(default.course_id),
            quiz_name: std::env::var("QUIZ_NAME").unwrap_or(default.quiz_name),
            toml_folder: std::env::var("TOML_FOLDER").unwrap_or(default.toml_folder),
            max_concurrent_imports: std::env::var("MAX_CONCURRENT_IMPORTS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_concurrent_imports),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
            warn_file: std::env::var("WARN_FILE").unwrap_or(default.warn_file),
            api_base_url: std::env::var("PREP_API_BASE_URL").unwrap_or(default.api_base_url),
            account_email: std::env::var("PREP_EMAIL").unwrap_or(default.account_email),
            account_password: std::env::var("PREP_PASSWORD").unwrap_or(default.account_password),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.request_timeout_secs),
            request_retries: std::env::var("REQUEST_RETRIES").ok().and_then(|v| v.parse().ok()).unwrap_or(default.request_retries),
            retry_delay_ms: std::env::var("RETRY_DELAY_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.retry_delay_ms),
        }
    }
}
