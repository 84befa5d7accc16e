//! 题目服务 - 业务能力层
//!
//! 只负责单个题目资源的接口调用，不出现 Vec<DraftQuestion>，不关心流程

use crate::infrastructure::ApiTransport;
use crate::models::Question;
use anyhow::Result;
use reqwest::Method;
use serde_json::json;
use tracing::debug;

/// 新建/更新题目的内容(文本字段都应是规范化后的受控 HTML)
#[derive(Debug, Clone)]
pub struct QuestionInput {
    pub text: String,
    pub image_url: Option<String>,
    pub explanation: Option<String>,
    pub explanation_image_url: Option<String>,
    pub answers: Vec<AnswerInput>,
}

#[derive(Debug, Clone)]
pub struct AnswerInput {
    pub text: String,
    pub is_correct: bool,
}

/// 题目服务
pub struct QuestionService;

impl QuestionService {
    pub fn new() -> Self {
        Self
    }

    /// 单个题目
    pub async fn get(&self, transport: &ApiTransport, question_id: &str) -> Result<Question> {
        let path = format!("/api/questions/{}", question_id);
        let question = transport
            .request_enveloped(Method::GET, &path, transport.options())
            .await?;
        Ok(question)
    }

    /// 新建题目(管理员)
    ///
    /// # 参数
    /// - `course_id`: 题目归属的课程
    /// - `input`: 题目内容，选项连同正确标记一起上送
    ///
    /// # 返回
    /// 返回服务端生成的完整题目(含各选项 ID)
    pub async fn create(
        &self,
        transport: &ApiTransport,
        course_id: &str,
        input: &QuestionInput,
    ) -> Result<Question> {
        debug!("新建题目: 课程 {} | 选项 {} 个", course_id, input.answers.len());
        let path = format!("/api/courses/{}/questions", course_id);
        let question = transport
            .request_enveloped(
                Method::POST,
                &path,
                transport.options().with_body(Self::build_body(input)),
            )
            .await?;
        Ok(question)
    }

    /// 更新题目(管理员)，选项整组替换
    pub async fn update(
        &self,
        transport: &ApiTransport,
        question_id: &str,
        input: &QuestionInput,
    ) -> Result<Question> {
        let path = format!("/api/questions/{}", question_id);
        let question = transport
            .request_enveloped(
                Method::PUT,
                &path,
                transport.options().with_body(Self::build_body(input)),
            )
            .await?;
        Ok(question)
    }

    /// 删除题目(管理员)
    pub async fn delete(&self, transport: &ApiTransport, question_id: &str) -> Result<()> {
        debug!("删除题目: {}", question_id);
        let path = format!("/api/questions/{}", question_id);
        transport
            .request_ok(Method::DELETE, &path, transport.options())
            .await?;
        Ok(())
    }

    fn build_body(input: &QuestionInput) -> serde_json::Value {
        let answers: Vec<serde_json::Value> = input
            .answers
            .iter()
            .map(|a| {
                json!({
                    "text": a.text,
                    "isCorrect": a.is_correct,
                })
            })
            .collect();

        json!({
            "text": input.text,
            "imageUrl": input.image_url,
            "explanation": input.explanation,
            "explanationImageUrl": input.explanation_image_url,
            "answers": answers,
        })
    }
}

impl Default for QuestionService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_body_shape() {
        let input = QuestionInput {
            text: "<b>股骨</b>属于哪类骨?".to_string(),
            image_url: None,
            explanation: Some("长骨的典型代表。".to_string()),
            explanation_image_url: None,
            answers: vec![
                AnswerInput {
                    text: "长骨".to_string(),
                    is_correct: true,
                },
                AnswerInput {
                    text: "短骨".to_string(),
                    is_correct: false,
                },
            ],
        };

        let body = QuestionService::build_body(&input);
        assert_eq!(body["text"], "<b>股骨</b>属于哪类骨?");
        assert_eq!(body["answers"][0]["isCorrect"], true);
        assert_eq!(body["answers"][1]["text"], "短骨");
        // 课程归属走 URL 路径，请求体里不应出现 courseId
        assert!(body.get("courseId").is_none());
    }
}
