//! 应用入口 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：启动日志、建立传输器、登录平台
//! 2. **模式分发**：按 run_mode 把控制权交给对应的运行器
//! 3. **资源管理**：持有 ApiTransport，确保生命周期正确

use anyhow::{bail, Result};
use tracing::warn;

use crate::config::Config;
use crate::infrastructure::ApiTransport;
use crate::orchestrator::{import_runner, practice_runner, quiz_runner};
use crate::services::AuthService;
use crate::utils::logging;

/// 应用主结构
pub struct App {
    config: Config,
    transport: ApiTransport,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        // 初始化日志文件
        logging::init_log_file(&config.output_log_file)?;
        logging::log_startup(&config.run_mode, &config.api_base_url);

        // 建立传输器(持有 HTTP 客户端与令牌槽)
        let transport = ApiTransport::new(&config)?;

        // 账号齐全就先登录，令牌写进传输器的槽位
        if !config.account_email.is_empty() && !config.account_password.is_empty() {
            AuthService::new()
                .sign_in(&transport, &config.account_email, &config.account_password)
                .await?;
        } else {
            warn!("⚠️ 未配置账号，以游客身份继续(需要登录的操作会被平台拒绝)");
        }

        Ok(Self { config, transport })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<()> {
        match self.config.run_mode.as_str() {
            "quiz" => quiz_runner::run(&self.transport, &self.config).await,
            "practice" => practice_runner::run(&self.transport, &self.config).await,
            "import" => import_runner::run(&self.transport, &self.config)
                .await
                .map(|_| ()),
            other => bail!("未知运行模式: {} (可用: quiz / practice / import)", other),
        }
    }

    pub fn transport(&self) -> &ApiTransport {
        &self.transport
    }
}
