use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::question::Question;

/// 一道题的作答位，selected_answer_id 为 None 表示未作答
///
/// 提交时所有作答位都会上送，未作答的题以 null 表示，
/// 服务端据此判零分而不是忽略该题。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerSlot {
    pub question_id: String,
    pub selected_answer_id: Option<String>,
}

/// 整卷提交的请求体
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptSubmission {
    pub package_id: String,
    pub answers: Vec<AnswerSlot>,
    /// 实际作答耗时(秒)
    pub time_spent: u64,
    pub started_at: DateTime<Utc>,
}

/// 答题记录摘要(历史列表接口返回)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptSummary {
    pub id: String,
    pub package_id: String,
    pub score: f64,
    pub completed_at: DateTime<Utc>,
}

/// 单题判定明细
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptAnswerDetail {
    pub question: Question,
    pub selected_answer_id: Option<String>,
    #[serde(default)]
    pub is_correct: bool,
}

/// 服务端判分后的完整成绩
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptResult {
    pub id: String,
    pub package_id: String,
    /// 得分(百分制)
    pub score: f64,
    pub correct_answers: u32,
    pub total_questions: u32,
    #[serde(default)]
    pub time_spent: u64,
    pub completed_at: DateTime<Utc>,
    #[serde(default)]
    pub answers: Vec<AttemptAnswerDetail>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_submission_keeps_unanswered_slots() {
        let submission = AttemptSubmission {
            package_id: "pkg_1".to_string(),
            answers: vec![
                AnswerSlot {
                    question_id: "q1".to_string(),
                    selected_answer_id: Some("a2".to_string()),
                },
                AnswerSlot {
                    question_id: "q2".to_string(),
                    selected_answer_id: None,
                },
            ],
            time_spent: 125,
            started_at: Utc.with_ymd_and_hms(2024, 10, 2, 9, 0, 0).unwrap(),
        };

        let json = serde_json::to_value(&submission).expect("应能序列化");
        assert_eq!(json["packageId"], "pkg_1");
        assert_eq!(json["answers"][0]["selectedAnswerId"], "a2");
        // 未作答的题必须显式上送 null，不能整项省略
        assert!(json["answers"][1]["selectedAnswerId"].is_null());
        assert_eq!(json["timeSpent"], 125);
    }

    #[test]
    fn test_result_deserialize() {
        let json = r#"{
            "id": "att_1",
            "packageId": "pkg_1",
            "score": 66.7,
            "correctAnswers": 2,
            "totalQuestions": 3,
            "timeSpent": 321,
            "completedAt": "2024-10-02T09:05:21Z",
            "answers": [
                {
                    "question": {"id": "q1", "text": "A", "answers": []},
                    "selectedAnswerId": "a1",
                    "isCorrect": true
                }
            ]
        }"#;
        let result: AttemptResult = serde_json::from_str(json).expect("应能解析");
        assert_eq!(result.correct_answers, 2);
        assert!(result.answers[0].is_correct);
    }
}
