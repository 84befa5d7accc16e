//! 流程层 - 单个业务单元的完整流程
//!
//! 定位：组合业务能力(services)完成一个单元的端到端流程，
//! 不做批量调度(那是编排层的职责)，也不直接持有稀缺资源。
//!
//! - `quiz_session`: 限时整卷作答的状态机与装载
//! - `practice_session`: 课程自由练习的状态机与装载
//! - `countdown`: 按秒产生计时事件的后台任务
//! - `import_flow`: 一批草稿题目的校验与导入

pub mod countdown;
pub mod import_flow;
pub mod practice_session;
pub mod quiz_session;

pub use countdown::{Countdown, TimerEvent};
pub use import_flow::{ImportFlow, ImportOutcome, ImportStats};
pub use practice_session::{PracticeLoader, PracticeSession, PracticeSummary, SelectionState};
pub use quiz_session::{
    NavigateTo, QuizSession, QuizSessionLoader, SessionPhase, SubmissionSummary, TickOutcome,
};
