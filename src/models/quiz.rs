use serde::{Deserialize, Serialize};

/// 测验(课程下的一组练习题)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_id: Option<String>,
    #[serde(default)]
    pub is_active: bool,
}

impl Quiz {
    /// 名称以 OSCE 开头(不区分大小写)的测验，练习时所有题目强制多选
    pub fn forces_multi_select(&self) -> bool {
        Self::name_forces_multi_select(&self.name)
    }

    pub fn name_forces_multi_select(name: &str) -> bool {
        let prefix: String = name.trim_start().chars().take(4).collect();
        prefix.eq_ignore_ascii_case("osce")
    }
}
