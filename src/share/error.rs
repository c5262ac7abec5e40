// 查询错误类型

use thiserror::Error;

/// 单个解析策略可能产生的错误
///
/// 编排器对所有错误一视同仁：记录消息后尝试下一个策略
#[derive(Error, Debug)]
pub enum LookupError {
    /// 无法从链接中提取分享 ID
    #[error("Invalid share link: {0}")]
    InvalidLink(String),

    /// 上游 JSON 缺少可识别的字段
    #[error("Unrecognized response format")]
    UnrecognizedResponse,

    /// 网盘接口返回非零 errno
    #[error("Upstream error (errno={code}): {message}")]
    Upstream { code: i64, message: String },

    /// 分享列表为空
    #[error("No files found in share")]
    NoFiles,

    /// 分享页面要求人机验证
    #[error("Verification required by share page")]
    VerificationRequired,

    /// 页面中提取不到文件信息
    #[error("Failed to extract file data from share page")]
    ScrapeFailed,

    /// 网络错误或超时
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// 响应不是合法 JSON
    #[error("Invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),

    /// 上游返回非 2xx 状态码
    #[error("HTTP status {0}")]
    HttpStatus(u16),
}

impl LookupError {
    /// 根据 errno 构造上游错误，errmsg 缺失时使用已知错误码的说明
    pub fn upstream(code: i64, errmsg: Option<&str>) -> Self {
        let message = match errmsg.filter(|m| !m.is_empty()) {
            Some(m) => m.to_string(),
            None => match code {
                -1 => "missing errno in response".to_string(),
                -7 => "share deleted or cancelled".to_string(),
                -9 => "file not found".to_string(),
                -12 => "wrong access password".to_string(),
                -19 | -62 => "captcha required".to_string(),
                105 => "share link malformed".to_string(),
                132 => "account security verification required".to_string(),
                4000020 => "share does not exist".to_string(),
                _ => format!("unknown error code {}", code),
            },
        };
        LookupError::Upstream { code, message }
    }

    /// 是否为网络层超时
    pub fn is_timeout(&self) -> bool {
        matches!(self, LookupError::Http(e) if e.is_timeout())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_prefers_errmsg() {
        let err = LookupError::upstream(2, Some("share expired"));
        assert_eq!(err.to_string(), "Upstream error (errno=2): share expired");
    }

    #[test]
    fn test_upstream_falls_back_to_known_codes() {
        let err = LookupError::upstream(-9, None);
        assert_eq!(err.to_string(), "Upstream error (errno=-9): file not found");

        let err = LookupError::upstream(77, Some(""));
        assert_eq!(err.to_string(), "Upstream error (errno=77): unknown error code 77");
    }

    #[test]
    fn test_json_error_converts() {
        let parse: Result<serde_json::Value, _> = serde_json::from_str("<html>");
        let err: LookupError = parse.unwrap_err().into();
        assert!(matches!(err, LookupError::Json(_)));
        assert!(!err.is_timeout());
    }
}
