//! # Exam Prep Client
//!
//! 一个面向考试备考平台的 Rust 终端客户端
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（HTTP 客户端与令牌槽），只暴露能力
//! - `ApiTransport` - 唯一的传输器，提供超时 / 重试 / 错误分类的请求能力
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单一资源
//! - `CourseService` / `PackageService` / `QuestionService` ... - 各资源的增删改查
//! - `AttemptService` - 答卷提交与成绩查询能力
//! - `richtext` - 富文本规范化与长度校验能力
//! - `ReportWriter` - 写 warn 文件能力
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义单个业务单元的完整流程
//! - `QuizSession` - 限时整卷作答的状态机（作答 / 计时 / 提交闸门）
//! - `PracticeSession` - 自由练习的状态机（单选覆盖 / 多选切换）
//! - `ImportFlow` - 一批草稿的导入流程（校验 → 创建 → 挂载 → warn）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/app` - 应用入口，按 run_mode 分发
//! - `orchestrator/quiz_runner` - 限时答题的交互循环与到期强制提交
//! - `orchestrator/practice_runner` - 自由练习的交互循环
//! - `orchestrator/import_runner` - 批量草稿导入，管理并发
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{ApiError, AppError, AppResult, SessionError, ValidationError};
pub use infrastructure::{ApiTransport, RequestOptions};
pub use models::{Package, Question, Quiz};
pub use orchestrator::{App, ImportReport};
pub use workflow::{ImportFlow, PracticeSession, QuizSession, TickOutcome};
