//! 答题会话 - 流程层(状态机)
//!
//! 限时整卷作答的全部状态都收在这里: 作答位、当前题号、剩余时间与提交闸门。
//! 会话本身是纯同步结构，时间推进通过 tick() 注入，
//! 网络提交由编排层执行，失败后用 submit_failed() 回退重试。

use anyhow::Result;
use chrono::{DateTime, Utc};
use std::time::Instant;
use tracing::{debug, info};

use crate::error::SessionError;
use crate::infrastructure::ApiTransport;
use crate::models::{AnswerSlot, AttemptSubmission, Package, Question};
use crate::services::{AttemptService, PackageService};

/// 会话阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// 作答中
    InProgress,
    /// 提交在途，闸门关闭
    Submitting,
    /// 已判分结束
    Completed,
}

/// 导航目标
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigateTo {
    Next,
    Previous,
    /// 跳到指定题(0 起)
    Index(usize),
}

/// 一次 tick 的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// 不限时套题，tick 无效果
    NoTimer,
    /// 计时中，携带剩余秒数
    Counting(i64),
    /// 时间刚耗尽，调用方应立即强制提交(整个会话只出现一次)
    Expired,
    /// 会话不接受计时，tick 被忽略
    Ignored,
}

/// 提交前的作答概况
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionSummary {
    pub answered: usize,
    pub unanswered: usize,
    pub total: usize,
}

/// 答题会话
#[derive(Debug)]
pub struct QuizSession {
    package_id: String,
    package_title: String,
    questions: Vec<Question>,
    answers: Vec<AnswerSlot>,
    current_index: usize,
    phase: SessionPhase,
    /// 剩余秒数，None 表示不限时
    time_remaining: Option<i64>,
    /// 到期只触发一次
    expiry_fired: bool,
    started_at: DateTime<Utc>,
    started_instant: Instant,
}

impl QuizSession {
    /// 从套题建立新会话，题目按 order 排好
    pub fn new(package: &Package) -> Result<Self, SessionError> {
        let questions = package.ordered_questions();
        if questions.is_empty() {
            return Err(SessionError::EmptyPackage {
                package_id: package.id.clone(),
            });
        }
        let answers = questions
            .iter()
            .map(|q| AnswerSlot {
                question_id: q.id.clone(),
                selected_answer_id: None,
            })
            .collect();
        Ok(Self {
            package_id: package.id.clone(),
            package_title: package.title.clone(),
            time_remaining: package.time_limit_secs().map(|secs| secs as i64),
            questions,
            answers,
            current_index: 0,
            phase: SessionPhase::InProgress,
            expiry_fired: false,
            started_at: Utc::now(),
            started_instant: Instant::now(),
        })
    }

    // ========== 作答操作 ==========

    /// 选中某题的某个选项，后选覆盖先选
    ///
    /// 题号或选项不存在、闸门已关时不产生任何效果，返回 false
    pub fn select_answer(&mut self, question_id: &str, answer_id: &str) -> bool {
        if self.phase != SessionPhase::InProgress {
            return false;
        }
        let Some(question) = self.questions.iter().find(|q| q.id == question_id) else {
            return false;
        };
        if question.answer(answer_id).is_none() {
            return false;
        }
        let Some(slot) = self
            .answers
            .iter_mut()
            .find(|s| s.question_id == question_id)
        else {
            return false;
        };
        slot.selected_answer_id = Some(answer_id.to_string());
        true
    }

    /// 题间移动，越界收敛到边界
    pub fn navigate(&mut self, to: NavigateTo) -> usize {
        if self.phase != SessionPhase::InProgress {
            return self.current_index;
        }
        let last = self.questions.len() - 1;
        self.current_index = match to {
            NavigateTo::Next => (self.current_index + 1).min(last),
            NavigateTo::Previous => self.current_index.saturating_sub(1),
            NavigateTo::Index(i) => i.min(last),
        };
        self.current_index
    }

    /// 注入一秒时间
    ///
    /// 返回 Expired 的那一次之后不会再次返回 Expired
    pub fn tick(&mut self) -> TickOutcome {
        if self.phase != SessionPhase::InProgress || self.expiry_fired {
            return TickOutcome::Ignored;
        }
        let Some(remaining) = self.time_remaining.as_mut() else {
            return TickOutcome::NoTimer;
        };
        *remaining -= 1;
        if *remaining <= 0 {
            self.expiry_fired = true;
            debug!("套题 {} 时间耗尽", self.package_id);
            TickOutcome::Expired
        } else {
            TickOutcome::Counting(*remaining)
        }
    }

    // ========== 提交闸门 ==========

    /// 作答概况(提交确认用)
    pub fn summary(&self) -> SubmissionSummary {
        let answered = self
            .answers
            .iter()
            .filter(|s| s.selected_answer_id.is_some())
            .count();
        SubmissionSummary {
            answered,
            unanswered: self.answers.len() - answered,
            total: self.answers.len(),
        }
    }

    /// 关闸并产出提交载荷，未答题以 null 位一并上送
    ///
    /// 同一时刻只允许一次提交在途，重复调用报 SubmitInProgress
    pub fn begin_submit(&mut self) -> Result<AttemptSubmission, SessionError> {
        match self.phase {
            SessionPhase::Submitting => Err(SessionError::SubmitInProgress),
            SessionPhase::Completed => Err(SessionError::SessionClosed),
            SessionPhase::InProgress => {
                self.phase = SessionPhase::Submitting;
                Ok(AttemptSubmission {
                    package_id: self.package_id.clone(),
                    answers: self.answers.clone(),
                    time_spent: self.started_instant.elapsed().as_secs(),
                    started_at: self.started_at,
                })
            }
        }
    }

    /// 提交失败，开闸允许重试(作答与剩余时间保持原样)
    pub fn submit_failed(&mut self) {
        if self.phase == SessionPhase::Submitting {
            self.phase = SessionPhase::InProgress;
        }
    }

    /// 提交成功，会话关闭
    pub fn complete(&mut self) {
        self.phase = SessionPhase::Completed;
    }

    // ========== 读访问 ==========

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn package_id(&self) -> &str {
        &self.package_id
    }

    pub fn package_title(&self) -> &str {
        &self.package_title
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// 当前题目(会话建立后始终存在)
    pub fn current_question(&self) -> &Question {
        &self.questions[self.current_index]
    }

    pub fn question_at(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn time_remaining(&self) -> Option<i64> {
        self.time_remaining
    }

    pub fn has_timer(&self) -> bool {
        self.time_remaining.is_some()
    }

    /// 某题当前选中的选项
    pub fn selected_answer(&self, question_id: &str) -> Option<&str> {
        self.answers
            .iter()
            .find(|s| s.question_id == question_id)
            .and_then(|s| s.selected_answer_id.as_deref())
    }

    pub fn is_answered(&self, index: usize) -> bool {
        self.answers
            .get(index)
            .map(|s| s.selected_answer_id.is_some())
            .unwrap_or(false)
    }
}

/// 答题会话装载器
///
/// 开卷顺序固定: 先查已有答题记录(有则拒绝并携带记录 ID)，再拉整套题目。
/// 服务端同样执行一次一答约束，这里的前置检查只是省一次无效加载。
pub struct QuizSessionLoader {
    attempt_service: AttemptService,
    package_service: PackageService,
}

impl QuizSessionLoader {
    pub fn new() -> Self {
        Self {
            attempt_service: AttemptService::new(),
            package_service: PackageService::new(),
        }
    }

    /// 打开套题答题会话
    pub async fn open(&self, transport: &ApiTransport, package_id: &str) -> Result<QuizSession> {
        info!("🔍 检查套题 {} 的已有答题记录...", package_id);
        if let Some(prior) = self
            .attempt_service
            .find_for_package(transport, package_id)
            .await?
        {
            return Err(SessionError::AlreadyAttempted {
                package_id: package_id.to_string(),
                attempt_id: prior.id,
            }
            .into());
        }

        info!("加载套题 {}...", package_id);
        let package = self.package_service.get(transport, package_id).await?;
        let session = QuizSession::new(&package)?;
        match session.time_remaining() {
            Some(secs) => info!(
                "✓ 套题就绪: {} ({} 道题，限时 {} 分钟)",
                session.package_title(),
                session.len(),
                secs / 60
            ),
            None => info!(
                "✓ 套题就绪: {} ({} 道题，不限时)",
                session.package_title(),
                session.len()
            ),
        }
        Ok(session)
    }
}

impl Default for QuizSessionLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Answer, PackageQuestion};

    fn make_question(id: &str, answer_ids: &[&str]) -> Question {
        Question {
            id: id.to_string(),
            text: format!("题目 {}", id),
            image_url: None,
            explanation: None,
            explanation_image_url: None,
            answers: answer_ids
                .iter()
                .enumerate()
                .map(|(i, aid)| Answer {
                    id: aid.to_string(),
                    text: format!("选项 {}", aid),
                    is_correct: i == 0,
                })
                .collect(),
        }
    }

    fn make_package(time_limit_minutes: Option<u32>, question_count: usize) -> Package {
        Package {
            id: "pkg-1".to_string(),
            title: "模拟卷".to_string(),
            description: None,
            price: 99.0,
            time_limit: time_limit_minutes,
            is_active: true,
            available_from: None,
            available_until: None,
            package_questions: (0..question_count)
                .map(|i| PackageQuestion {
                    order: Some(i as i32),
                    question: make_question(
                        &format!("q{}", i + 1),
                        &[&format!("q{}a", i + 1), &format!("q{}b", i + 1)],
                    ),
                })
                .collect(),
        }
    }

    #[test]
    fn test_empty_package_rejected() {
        let package = make_package(None, 0);
        match QuizSession::new(&package) {
            Err(SessionError::EmptyPackage { package_id }) => assert_eq!(package_id, "pkg-1"),
            other => panic!("空套题应被拒绝: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_select_answer_overwrites() {
        let package = make_package(None, 1);
        let mut session = QuizSession::new(&package).expect("会话建立失败");

        assert!(session.select_answer("q1", "q1a"));
        assert_eq!(session.selected_answer("q1"), Some("q1a"));

        // 后选覆盖先选
        assert!(session.select_answer("q1", "q1b"));
        assert_eq!(session.selected_answer("q1"), Some("q1b"));

        // 同题同选项重复点击是幂等的
        assert!(session.select_answer("q1", "q1b"));
        assert_eq!(session.selected_answer("q1"), Some("q1b"));
        assert_eq!(session.summary().answered, 1);
    }

    #[test]
    fn test_select_answer_rejects_unknown_ids() {
        let package = make_package(None, 1);
        let mut session = QuizSession::new(&package).expect("会话建立失败");

        assert!(!session.select_answer("q99", "q1a"), "未知题目应被拒绝");
        assert!(!session.select_answer("q1", "q99x"), "未知选项应被拒绝");
        assert!(
            !session.select_answer("q1", "q2a"),
            "别题的选项不能记到这题上"
        );
        assert_eq!(session.selected_answer("q1"), None);
    }

    #[test]
    fn test_navigate_clamps_at_bounds() {
        let package = make_package(None, 3);
        let mut session = QuizSession::new(&package).expect("会话建立失败");

        assert_eq!(session.navigate(NavigateTo::Previous), 0, "起点不能再往前");
        assert_eq!(session.navigate(NavigateTo::Next), 1);
        assert_eq!(session.navigate(NavigateTo::Next), 2);
        assert_eq!(session.navigate(NavigateTo::Next), 2, "末题不能再往后");
        assert_eq!(session.navigate(NavigateTo::Index(99)), 2, "越界跳转收敛到末题");
        assert_eq!(session.navigate(NavigateTo::Index(0)), 0);
    }

    #[test]
    fn test_no_time_limit_never_expires() {
        let package = make_package(None, 1);
        let mut session = QuizSession::new(&package).expect("会话建立失败");

        assert!(!session.has_timer());
        for _ in 0..10_000 {
            assert_eq!(session.tick(), TickOutcome::NoTimer);
        }
        assert_eq!(session.phase(), SessionPhase::InProgress);
    }

    #[test]
    fn test_countdown_expires_exactly_once() {
        // 1 分钟限时: 第 60 次 tick 到期，之后永不再报
        let package = make_package(Some(1), 1);
        let mut session = QuizSession::new(&package).expect("会话建立失败");

        for i in 1..60 {
            assert_eq!(session.tick(), TickOutcome::Counting(60 - i));
        }
        assert_eq!(session.tick(), TickOutcome::Expired);

        for _ in 0..100 {
            assert_eq!(session.tick(), TickOutcome::Ignored, "到期只能触发一次");
        }
    }

    #[test]
    fn test_expiry_survives_submit_failure() {
        let package = make_package(Some(1), 1);
        let mut session = QuizSession::new(&package).expect("会话建立失败");

        for _ in 0..60 {
            session.tick();
        }
        let _ = session.begin_submit().expect("到期后应可提交");
        session.submit_failed();

        // 回到作答中，但计时不会复活再报一次到期
        assert_eq!(session.phase(), SessionPhase::InProgress);
        assert_eq!(session.tick(), TickOutcome::Ignored);
    }

    #[test]
    fn test_summary_counts_answered_and_unanswered() {
        let package = make_package(None, 3);
        let mut session = QuizSession::new(&package).expect("会话建立失败");

        session.select_answer("q1", "q1a");
        session.select_answer("q3", "q3b");

        let summary = session.summary();
        assert_eq!(summary.answered, 2);
        assert_eq!(summary.unanswered, 1);
        assert_eq!(summary.total, 3);
    }

    #[test]
    fn test_begin_submit_locks_gate() {
        let package = make_package(None, 2);
        let mut session = QuizSession::new(&package).expect("会话建立失败");
        session.select_answer("q1", "q1a");

        let submission = session.begin_submit().expect("首次提交应放行");
        assert_eq!(session.phase(), SessionPhase::Submitting);

        // 在途期间一切操作都被闸住
        assert!(matches!(
            session.begin_submit(),
            Err(SessionError::SubmitInProgress)
        ));
        assert!(!session.select_answer("q2", "q2a"));
        assert_eq!(session.navigate(NavigateTo::Next), 0);
        assert_eq!(session.tick(), TickOutcome::Ignored);

        // 载荷包含全部作答位，未答的是显式 null
        assert_eq!(submission.package_id, "pkg-1");
        assert_eq!(submission.answers.len(), 2);
        assert_eq!(submission.answers[0].selected_answer_id.as_deref(), Some("q1a"));
        assert_eq!(submission.answers[1].selected_answer_id, None);
    }

    #[test]
    fn test_submit_failed_reopens_gate() {
        let package = make_package(None, 1);
        let mut session = QuizSession::new(&package).expect("会话建立失败");

        let _ = session.begin_submit().expect("首次提交应放行");
        session.submit_failed();

        assert_eq!(session.phase(), SessionPhase::InProgress);
        assert!(session.select_answer("q1", "q1a"), "失败回退后应可继续作答");
        let retry = session.begin_submit().expect("回退后应可重试");
        assert_eq!(retry.answers[0].selected_answer_id.as_deref(), Some("q1a"));
    }

    #[test]
    fn test_complete_closes_session() {
        let package = make_package(Some(5), 1);
        let mut session = QuizSession::new(&package).expect("会话建立失败");

        let _ = session.begin_submit().expect("提交应放行");
        session.complete();

        assert_eq!(session.phase(), SessionPhase::Completed);
        assert!(matches!(
            session.begin_submit(),
            Err(SessionError::SessionClosed)
        ));
        assert!(!session.select_answer("q1", "q1a"));
        assert_eq!(session.tick(), TickOutcome::Ignored);
    }

    #[test]
    fn test_questions_follow_package_order() {
        // order 倒序的套题，会话里按 order 升序展示
        let mut package = make_package(None, 2);
        package.package_questions[0].order = Some(2);
        package.package_questions[1].order = Some(1);

        let session = QuizSession::new(&package).expect("会话建立失败");
        assert_eq!(session.current_question().id, "q2");
        assert_eq!(
            session.question_at(1).map(|q| q.id.as_str()),
            Some("q1")
        );

        // 作答位与题目顺序一致
        let submission_order: Vec<&str> = session
            .answers
            .iter()
            .map(|s| s.question_id.as_str())
            .collect();
        assert_eq!(submission_order, vec!["q2", "q1"]);
    }
}
