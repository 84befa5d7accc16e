//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责模式分发和整场调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `app` - 应用入口
//! - 管理应用生命周期（初始化、登录、分发）
//! - 建立并持有 ApiTransport（唯一的传输器所有者）
//! - 按 run_mode 分发到对应的运行器
//!
//! ### `quiz_runner` - 限时答题运行器
//! - 打开答题会话（已答复检 → 套题加载）
//! - 驱动终端交互循环（命令 + 计时事件）
//! - 到期强制提交，成功后取消倒计时
//! - 展示判分结果
//!
//! ### `practice_runner` - 自由练习运行器
//! - 打开练习会话（课程与题目并发加载）
//! - 驱动终端交互循环（无计时）
//! - 结束时输出本地作答统计
//!
//! ### `import_runner` - 草稿导入运行器
//! - 批量加载草稿文件（Vec<DraftSet>）
//! - 控制并发数量（Semaphore）
//! - 删除已全部入库的草稿文件
//! - 输出全局统计信息
//!
//! ## 层次关系
//!
//! ```text
//! app (模式分发)
//!     ↓
//! quiz_runner / practice_runner / import_runner (整场调度)
//!     ↓
//! workflow (单元流程：会话状态机 / 导入流程)
//!     ↓
//! services (能力层：courses / packages / questions / attempts ...)
//!     ↓
//! infrastructure (基础设施：ApiTransport)
//! ```
//!
//! ## 设计原则
//!
//! 1. **单一职责**：app 管分发，各 runner 管各自的整场调度
//! 2. **资源隔离**：只有编排层持有 ApiTransport
//! 3. **向下依赖**：编排层 → workflow → services → infrastructure
//! 4. **无业务逻辑**：只做调度和统计，不做具体业务判断

pub mod app;
pub mod import_runner;
pub mod practice_runner;
pub mod quiz_runner;

// 重新导出主要类型
pub use app::App;
pub use import_runner::ImportReport;
