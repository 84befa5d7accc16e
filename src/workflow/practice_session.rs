//! 练习会话 - 流程层(状态机)
//!
//! 课程自由练习: 不计时、不上送、可反复重做。
//! 单选题后选覆盖先选，多选题反复点击切换勾选；
//! 测验名称以 OSCE 开头时整场强制多选。

use anyhow::Result;
use futures::future;
use std::collections::BTreeSet;
use tracing::info;

use crate::error::SessionError;
use crate::infrastructure::ApiTransport;
use crate::models::{Course, Question, Quiz};
use crate::services::CourseService;

use super::quiz_session::NavigateTo;

/// 单题的选中状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionState {
    /// 单选: 至多一个选项
    Single(Option<String>),
    /// 多选: 选项集合
    Multi(BTreeSet<String>),
}

impl SelectionState {
    pub fn has_selection(&self) -> bool {
        match self {
            SelectionState::Single(slot) => slot.is_some(),
            SelectionState::Multi(set) => !set.is_empty(),
        }
    }

    /// 当前选中的选项 ID，单选至多一个
    pub fn selected_ids(&self) -> Vec<&str> {
        match self {
            SelectionState::Single(slot) => slot.as_deref().into_iter().collect(),
            SelectionState::Multi(set) => set.iter().map(|s| s.as_str()).collect(),
        }
    }
}

/// 练习概况
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PracticeSummary {
    pub answered: usize,
    pub total: usize,
}

/// 练习会话
pub struct PracticeSession {
    course_id: String,
    questions: Vec<Question>,
    selections: Vec<SelectionState>,
    current_index: usize,
    force_multi: bool,
}

impl PracticeSession {
    /// 建立练习会话
    ///
    /// # 参数
    /// - `force_multi`: 全场强制多选(OSCE 规则)
    pub fn new(
        course_id: &str,
        questions: Vec<Question>,
        force_multi: bool,
    ) -> Result<Self, SessionError> {
        if questions.is_empty() {
            return Err(SessionError::EmptyCourse {
                course_id: course_id.to_string(),
            });
        }
        let selections = questions
            .iter()
            .map(|q| Self::empty_selection(q, force_multi))
            .collect();
        Ok(Self {
            course_id: course_id.to_string(),
            questions,
            selections,
            current_index: 0,
            force_multi,
        })
    }

    fn empty_selection(question: &Question, force_multi: bool) -> SelectionState {
        if question.is_multi_select(force_multi) {
            SelectionState::Multi(BTreeSet::new())
        } else {
            SelectionState::Single(None)
        }
    }

    /// 点击选项: 单选覆盖，多选切换勾选
    ///
    /// 题号或选项不存在时不产生任何效果，返回 false
    pub fn toggle_answer(&mut self, question_id: &str, answer_id: &str) -> bool {
        let Some(index) = self.questions.iter().position(|q| q.id == question_id) else {
            return false;
        };
        if self.questions[index].answer(answer_id).is_none() {
            return false;
        }
        match &mut self.selections[index] {
            SelectionState::Single(slot) => {
                *slot = Some(answer_id.to_string());
            }
            SelectionState::Multi(set) => {
                if !set.remove(answer_id) {
                    set.insert(answer_id.to_string());
                }
            }
        }
        true
    }

    /// 题间移动，越界收敛到边界
    pub fn navigate(&mut self, to: NavigateTo) -> usize {
        let last = self.questions.len() - 1;
        self.current_index = match to {
            NavigateTo::Next => (self.current_index + 1).min(last),
            NavigateTo::Previous => self.current_index.saturating_sub(1),
            NavigateTo::Index(i) => i.min(last),
        };
        self.current_index
    }

    /// 清空全部作答并回到第一题
    pub fn restart(&mut self) {
        for (selection, question) in self.selections.iter_mut().zip(&self.questions) {
            *selection = Self::empty_selection(question, self.force_multi);
        }
        self.current_index = 0;
    }

    /// 已作答题数(本地统计，不上送)
    pub fn summary(&self) -> PracticeSummary {
        let answered = self
            .selections
            .iter()
            .filter(|s| s.has_selection())
            .count();
        PracticeSummary {
            answered,
            total: self.questions.len(),
        }
    }

    // ========== 读访问 ==========

    pub fn course_id(&self) -> &str {
        &self.course_id
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

    /// 当前题是否按多选处理
    pub fn current_is_multi(&self) -> bool {
        self.questions[self.current_index].is_multi_select(self.force_multi)
    }

    /// 某题的选中状态
    pub fn selection(&self, question_id: &str) -> Option<&SelectionState> {
        self.questions
            .iter()
            .position(|q| q.id == question_id)
            .and_then(|i| self.selections.get(i))
    }
}

/// 练习装载器
///
/// 课程信息与题目并发拉取，二者都齐了才建会话
pub struct PracticeLoader {
    course_service: CourseService,
}

impl PracticeLoader {
    pub fn new() -> Self {
        Self {
            course_service: CourseService::new(),
        }
    }

    /// 打开课程练习会话
    ///
    /// # 参数
    /// - `quiz_name`: 练习所属测验名称，空串表示无测验上下文
    pub async fn open(
        &self,
        transport: &ApiTransport,
        course_id: &str,
        quiz_name: &str,
    ) -> Result<(Course, PracticeSession)> {
        info!("加载课程 {} 的练习...", course_id);
        let (course, questions) = future::try_join(
            self.course_service.get(transport, course_id),
            self.course_service.questions(transport, course_id),
        )
        .await?;

        let force_multi = Quiz::name_forces_multi_select(quiz_name);
        if force_multi {
            info!("测验「{}」触发全场多选", quiz_name);
        }
        let session = PracticeSession::new(course_id, questions, force_multi)?;
        info!("✓ 练习就绪: {} ({} 道题)", course.title, session.len());
        Ok((course, session))
    }
}

impl Default for PracticeLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Answer;

    fn make_question(id: &str, correct_count: usize, answer_count: usize) -> Question {
        Question {
            id: id.to_string(),
            text: format!("题目 {}", id),
            image_url: None,
            explanation: None,
            explanation_image_url: None,
            answers: (0..answer_count)
                .map(|i| Answer {
                    id: format!("{}-a{}", id, i + 1),
                    text: format!("选项 {}", i + 1),
                    is_correct: i < correct_count,
                })
                .collect(),
        }
    }

    #[test]
    fn test_empty_course_rejected() {
        match PracticeSession::new("course-1", Vec::new(), false) {
            Err(SessionError::EmptyCourse { course_id }) => assert_eq!(course_id, "course-1"),
            other => panic!("空课程应被拒绝: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_single_select_replaces() {
        let questions = vec![make_question("q1", 1, 4)];
        let mut session = PracticeSession::new("c1", questions, false).expect("会话建立失败");

        assert!(!session.current_is_multi());
        assert!(session.toggle_answer("q1", "q1-a1"));
        assert!(session.toggle_answer("q1", "q1-a3"));

        let selected = session.selection("q1").expect("应有选中状态").selected_ids();
        assert_eq!(selected, vec!["q1-a3"], "单选后选覆盖先选");
    }

    #[test]
    fn test_multi_select_toggles() {
        // 两个正确选项的题自动按多选处理
        let questions = vec![make_question("q1", 2, 4)];
        let mut session = PracticeSession::new("c1", questions, false).expect("会话建立失败");

        assert!(session.current_is_multi());
        session.toggle_answer("q1", "q1-a1");
        session.toggle_answer("q1", "q1-a2");
        assert_eq!(
            session.selection("q1").expect("应有选中状态").selected_ids(),
            vec!["q1-a1", "q1-a2"]
        );

        // 再点一次取消勾选
        session.toggle_answer("q1", "q1-a1");
        assert_eq!(
            session.selection("q1").expect("应有选中状态").selected_ids(),
            vec!["q1-a2"]
        );
    }

    #[test]
    fn test_force_multi_upgrades_single() {
        // 单正确选项的题在强制多选下也按多选处理
        let questions = vec![make_question("q1", 1, 4)];
        let mut session = PracticeSession::new("c1", questions, true).expect("会话建立失败");

        assert!(session.current_is_multi());
        session.toggle_answer("q1", "q1-a1");
        session.toggle_answer("q1", "q1-a2");
        let selected = session.selection("q1").expect("应有选中状态").selected_ids();
        assert_eq!(selected.len(), 2, "强制多选下可同时勾选多个");
    }

    #[test]
    fn test_unknown_ids_rejected() {
        let questions = vec![make_question("q1", 1, 2)];
        let mut session = PracticeSession::new("c1", questions, false).expect("会话建立失败");

        assert!(!session.toggle_answer("q9", "q1-a1"));
        assert!(!session.toggle_answer("q1", "nope"));
        assert_eq!(session.summary().answered, 0);
    }

    #[test]
    fn test_restart_clears_everything() {
        let questions = vec![make_question("q1", 1, 2), make_question("q2", 2, 3)];
        let mut session = PracticeSession::new("c1", questions, false).expect("会话建立失败");

        session.toggle_answer("q1", "q1-a1");
        session.toggle_answer("q2", "q2-a1");
        session.navigate(NavigateTo::Next);
        assert_eq!(session.summary().answered, 2);

        session.restart();
        assert_eq!(session.summary().answered, 0);
        assert_eq!(session.current_index(), 0);
        assert!(!session
            .selection("q2")
            .expect("应有选中状态")
            .has_selection());
    }

    #[test]
    fn test_navigate_clamps_at_bounds() {
        let questions = vec![
            make_question("q1", 1, 2),
            make_question("q2", 1, 2),
            make_question("q3", 1, 2),
        ];
        let mut session = PracticeSession::new("c1", questions, false).expect("会话建立失败");

        assert_eq!(session.navigate(NavigateTo::Previous), 0);
        assert_eq!(session.navigate(NavigateTo::Index(2)), 2);
        assert_eq!(session.navigate(NavigateTo::Next), 2);
    }
}
