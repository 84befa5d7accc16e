use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::question::Question;

/// 套题中的一道题(带排序序号)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageQuestion {
    /// 排序序号，缺省按 0 处理
    pub order: Option<i32>,
    pub question: Question,
}

impl PackageQuestion {
    pub fn effective_order(&self) -> i32 {
        self.order.unwrap_or(0)
    }
}

/// 套题(一组整卷限时作答的题目)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: f64,
    /// 答题时限(分钟)，None 表示不限时
    pub time_limit: Option<u32>,
    #[serde(default)]
    pub is_active: bool,
    /// 售卖窗口起点
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_from: Option<DateTime<Utc>>,
    /// 售卖窗口终点
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_until: Option<DateTime<Utc>>,
    #[serde(default)]
    pub package_questions: Vec<PackageQuestion>,
}

impl Package {
    /// 按 order 升序返回题目，order 相同保持服务端原始顺序
    pub fn ordered_questions(&self) -> Vec<Question> {
        let mut items: Vec<&PackageQuestion> = self.package_questions.iter().collect();
        items.sort_by_key(|pq| pq.effective_order());
        items.into_iter().map(|pq| pq.question.clone()).collect()
    }

    /// 答题时限换算成秒
    pub fn time_limit_secs(&self) -> Option<u64> {
        self.time_limit.map(|minutes| minutes as u64 * 60)
    }

    /// 指定时刻是否可购买(启用且在售卖窗口内)
    pub fn is_available_at(&self, now: DateTime<Utc>) -> bool {
        if !self.is_active {
            return false;
        }
        if let Some(from) = self.available_from {
            if now < from {
                return false;
            }
        }
        if let Some(until) = self.available_until {
            if now > until {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn make_question(id: &str) -> Question {
        Question {
            id: id.to_string(),
            text: format!("题目 {}", id),
            image_url: None,
            explanation: None,
            explanation_image_url: None,
            answers: Vec::new(),
        }
    }

    fn make_package(entries: &[(Option<i32>, &str)]) -> Package {
        Package {
            id: "p1".to_string(),
            title: "解剖学模拟卷".to_string(),
            description: None,
            price: 99.0,
            time_limit: None,
            is_active: true,
            available_from: None,
            available_until: None,
            package_questions: entries
                .iter()
                .map(|(order, id)| PackageQuestion {
                    order: *order,
                    question: make_question(id),
                })
                .collect(),
        }
    }

    #[test]
    fn test_questions_sorted_by_order() {
        let package = make_package(&[(Some(2), "q_a"), (Some(1), "q_b")]);
        let ordered = package.ordered_questions();
        assert_eq!(ordered[0].id, "q_b");
        assert_eq!(ordered[1].id, "q_a");
    }

    #[test]
    fn test_equal_order_keeps_server_order() {
        // 排序必须稳定: order 相同的题目保持服务端返回顺序
        let package = make_package(&[(Some(1), "first"), (Some(1), "second"), (Some(0), "zero")]);
        let ordered = package.ordered_questions();
        assert_eq!(ordered[0].id, "zero");
        assert_eq!(ordered[1].id, "first");
        assert_eq!(ordered[2].id, "second");
    }

    #[test]
    fn test_missing_order_defaults_to_zero() {
        let package = make_package(&[(Some(1), "one"), (None, "implicit_zero")]);
        let ordered = package.ordered_questions();
        assert_eq!(ordered[0].id, "implicit_zero");
    }

    #[test]
    fn test_time_limit_in_seconds() {
        let mut package = make_package(&[]);
        assert_eq!(package.time_limit_secs(), None);
        package.time_limit = Some(25);
        assert_eq!(package.time_limit_secs(), Some(1500));
    }

    #[test]
    fn test_availability_window() {
        let mut package = make_package(&[]);
        package.available_from = Some(Utc.with_ymd_and_hms(2024, 9, 1, 0, 0, 0).unwrap());
        package.available_until = Some(Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 59).unwrap());

        let before = Utc.with_ymd_and_hms(2024, 8, 1, 0, 0, 0).unwrap();
        let inside = Utc.with_ymd_and_hms(2024, 10, 15, 12, 0, 0).unwrap();
        let after = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();

        assert!(!package.is_available_at(before));
        assert!(package.is_available_at(inside));
        assert!(!package.is_available_at(after));

        package.is_active = false;
        assert!(!package.is_available_at(inside));
    }

    #[test]
    fn test_deserialize_nested_shape() {
        let json = r#"{
            "id": "pkg_1",
            "title": "生理学冲刺卷",
            "price": 49.5,
            "timeLimit": 60,
            "isActive": true,
            "packageQuestions": [
                {"order": 2, "question": {"id": "q2", "text": "B", "answers": []}},
                {"order": 1, "question": {"id": "q1", "text": "A", "answers": []}}
            ]
        }"#;
        let package: Package = serde_json::from_str(json).expect("应能解析");
        assert_eq!(package.time_limit_secs(), Some(3600));
        assert_eq!(package.ordered_questions()[0].id, "q1");
    }
}
