use serde::Deserialize;

use crate::error::ApiError;

/// 平台接口的统一响应信封
///
/// 大部分业务接口返回 `{"success": true, "data": ...}`，
/// 失败时 success=false 并在 message / error 里给出原因。
/// 认证类接口不走信封，直接返回资源本身。
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub error: Option<String>,
}

impl<T> ResponseEnvelope<T> {
    /// 校验信封并取出 data，失败时带上请求路径便于定位
    pub fn into_data(self, path: &str) -> Result<T, ApiError> {
        if !self.success {
            let reason = self
                .error
                .or(self.message)
                .unwrap_or_else(|| "success=false".to_string());
            return Err(ApiError::Envelope {
                path: path.to_string(),
                reason,
            });
        }
        self.data.ok_or_else(|| ApiError::Envelope {
            path: path.to_string(),
            reason: "data 字段缺失".to_string(),
        })
    }

    /// 只校验 success，不要求 data(删除类接口没有返回体)
    pub fn ensure_success(self, path: &str) -> Result<(), ApiError> {
        if self.success {
            Ok(())
        } else {
            let reason = self
                .error
                .or(self.message)
                .unwrap_or_else(|| "success=false".to_string());
            Err(ApiError::Envelope {
                path: path.to_string(),
                reason,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope_yields_data() {
        let envelope: ResponseEnvelope<Vec<u32>> =
            serde_json::from_str(r#"{"success": true, "data": [1, 2, 3]}"#).expect("应能解析");
        assert_eq!(envelope.into_data("/api/test").expect("应有数据"), vec![1, 2, 3]);
    }

    #[test]
    fn test_failure_envelope_reports_reason() {
        let envelope: ResponseEnvelope<Vec<u32>> =
            serde_json::from_str(r#"{"success": false, "error": "课程不存在"}"#).expect("应能解析");
        let err = envelope.into_data("/api/test").expect_err("应失败");
        assert!(err.to_string().contains("课程不存在"));
    }

    #[test]
    fn test_missing_data_is_failure() {
        let envelope: ResponseEnvelope<Vec<u32>> =
            serde_json::from_str(r#"{"success": true}"#).expect("应能解析");
        let err = envelope.into_data("/api/test").expect_err("应失败");
        assert!(err.to_string().contains("data"));
    }

    #[test]
    fn test_missing_success_is_failure() {
        // 不带信封的响应误走信封解析时不能当成成功
        let envelope: ResponseEnvelope<Vec<u32>> =
            serde_json::from_str(r#"{"data": [1]}"#).expect("应能解析");
        assert!(envelope.into_data("/api/test").is_err());
    }

    #[test]
    fn test_ensure_success_tolerates_missing_data() {
        let envelope: ResponseEnvelope<serde_json::Value> =
            serde_json::from_str(r#"{"success": true}"#).expect("应能解析");
        assert!(envelope.ensure_success("/api/test").is_ok());

        let envelope: ResponseEnvelope<serde_json::Value> =
            serde_json::from_str(r#"{"success": false, "message": "没有权限"}"#).expect("应能解析");
        let err = envelope.ensure_success("/api/test").expect_err("应失败");
        assert!(err.to_string().contains("没有权限"));
    }
}
