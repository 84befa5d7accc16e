use serde::{Deserialize, Serialize};

/// 题目选项
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub id: String,
    /// 选项内容(受控 HTML)
    pub text: String,
    #[serde(default)]
    pub is_correct: bool,
}

/// 题目
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    /// 题干内容(受控 HTML)
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// 答案解析(受控 HTML)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation_image_url: Option<String>,
    #[serde(default)]
    pub answers: Vec<Answer>,
}

impl Question {
    /// 正确选项数量
    pub fn correct_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_correct).count()
    }

    /// 是否按多选处理(正确选项超过一个，或被测验整体强制多选)
    pub fn is_multi_select(&self, force_multi: bool) -> bool {
        force_multi || self.correct_count() > 1
    }

    /// 按选项 ID 查找选项
    pub fn answer(&self, answer_id: &str) -> Option<&Answer> {
        self.answers.iter().find(|a| a.id == answer_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_question(correct_flags: &[bool]) -> Question {
        Question {
            id: "q1".to_string(),
            text: "题干".to_string(),
            image_url: None,
            explanation: None,
            explanation_image_url: None,
            answers: correct_flags
                .iter()
                .enumerate()
                .map(|(i, &is_correct)| Answer {
                    id: format!("a{}", i),
                    text: format!("选项{}", i),
                    is_correct,
                })
                .collect(),
        }
    }

    #[test]
    fn test_single_correct_is_single_select() {
        let q = make_question(&[true, false, false]);
        assert_eq!(q.correct_count(), 1);
        assert!(!q.is_multi_select(false));
    }

    #[test]
    fn test_multiple_correct_is_multi_select() {
        let q = make_question(&[true, true, false]);
        assert!(q.is_multi_select(false));
    }

    #[test]
    fn test_force_multi_overrides() {
        // 测验级强制多选对单选题同样生效
        let q = make_question(&[true, false]);
        assert!(q.is_multi_select(true));
    }

    #[test]
    fn test_camel_case_json_shape() {
        let json = r#"{
            "id": "q9",
            "text": "<b>心脏</b>的瓣膜有几个?",
            "imageUrl": "https://cdn.example.com/heart.png",
            "answers": [{"id": "a1", "text": "4", "isCorrect": true}]
        }"#;
        let q: Question = serde_json::from_str(json).expect("应能解析");
        assert_eq!(q.image_url.as_deref(), Some("https://cdn.example.com/heart.png"));
        assert!(q.answer("a1").expect("选项应存在").is_correct);
        assert!(q.answer("a2").is_none());
    }
}
