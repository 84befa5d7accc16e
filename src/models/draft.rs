use serde::{Deserialize, Serialize};

/// 草稿选项
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftAnswer {
    pub text: String,
    #[serde(default)]
    pub is_correct: bool,
}

/// 草稿题目(导入前的本地形态，字段与平台题目一一对应)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftQuestion {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation_image_url: Option<String>,
    #[serde(default)]
    pub answers: Vec<DraftAnswer>,
}

/// 一个草稿文件对应的一批题目
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftSet {
    pub name: String,
    /// 题目归属的课程
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_id: Option<String>,
    /// 导入成功后挂载到的套题(可选)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_id: Option<String>,
    pub questions: Vec<DraftQuestion>,
    #[serde(skip_serializing, skip_deserializing)]
    pub file_path: Option<String>,
}

impl DraftSet {
    pub fn with_file_path(mut self, file_path: String) -> Self {
        self.file_path = Some(file_path);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_draft_toml() {
        let toml_text = r#"
name = "解剖学第三章草稿"
course_id = "course_anatomy"
package_id = "pkg_midterm"

[[questions]]
text = "<b>股骨</b>属于哪类骨?"
explanation = "长骨的典型代表。"

[[questions.answers]]
text = "长骨"
is_correct = true

[[questions.answers]]
text = "短骨"
"#;
        let set: DraftSet = toml::from_str(toml_text).expect("应能解析");
        assert_eq!(set.name, "解剖学第三章草稿");
        assert_eq!(set.course_id.as_deref(), Some("course_anatomy"));
        assert_eq!(set.questions.len(), 1);
        assert_eq!(set.questions[0].answers.len(), 2);
        assert!(set.questions[0].answers[0].is_correct);
        assert!(!set.questions[0].answers[1].is_correct);
        assert!(set.file_path.is_none());
    }
}
