//! Typed views of Scrappey API responses.
//!
//! Every field carries a serde default: the API omits fields freely, and an
//! absent field decodes to its zero value rather than failing. Only a body
//! that is not a JSON object at all is a decode error.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Top-level reply to any command.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScrappeyResponse {
    pub solution: Solution,

    /// Wall-clock time the remote side spent, in milliseconds.
    pub time_elapsed: u64,

    /// Short status string, `"success"` or `"error"`.
    pub data: String,

    /// Session identifier; non-empty only when a session was created or
    /// reused. Pass it back via `RequestOptions::session` to keep the
    /// remote browser tab alive.
    pub session: String,

    /// Application-level error message. A non-empty value means the
    /// operation failed even if the HTTP exchange succeeded; the client
    /// never turns this into an `Err`, callers must check it.
    pub error: String,

    /// Browser fingerprint, returned by `sessions.create`.
    pub fingerprint: Option<Value>,
}

impl ScrappeyResponse {
    /// True when the response carries an application-level error.
    pub fn is_error(&self) -> bool {
        !self.error.is_empty()
    }

    /// The application-level error message, if any.
    pub fn error(&self) -> Option<&str> {
        if self.error.is_empty() {
            None
        } else {
            Some(&self.error)
        }
    }
}

/// Result of the remote fetch/browser run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Solution {
    /// Whether the request was verified (and billed) as successful.
    pub verified: bool,

    /// Raw response body (HTML for page loads).
    pub response: String,

    /// HTTP status code of the underlying fetch.
    pub status_code: u16,

    /// Final URL after redirects.
    pub current_url: String,

    /// User agent the remote browser presented.
    pub user_agent: String,

    pub cookies: Vec<Cookie>,

    /// Cookies joined into a single `name=value; ...` string.
    pub cookie_string: String,

    pub response_headers: HashMap<String, Value>,

    /// Text content of the page, stripped of markup.
    pub inner_text: String,

    /// Base64-encoded screenshot, when requested.
    pub screenshot: Option<String>,

    pub screenshot_url: Option<String>,

    pub video_url: Option<String>,

    /// Results of `execute_js` browser actions, in the order the actions
    /// were requested.
    pub javascript_return: Vec<JsReturn>,
}

/// A browser cookie. Typed core attributes plus whatever else the remote
/// browser reports (`expires`, `httpOnly`, `sameSite`, ...).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub domain: String,
    pub path: String,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// One JavaScript execution result, tagged by its runtime type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JsReturn {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    /// Arrays and objects, kept as raw JSON.
    Structured(Value),
}

impl Default for JsReturn {
    fn default() -> Self {
        JsReturn::Null
    }
}

impl JsReturn {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            JsReturn::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            JsReturn::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            JsReturn::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

/// Reply to `sessions.list`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionList {
    pub sessions: Vec<Value>,
    pub count: u64,

    /// Short status string, `"success"` or `"error"`.
    pub data: String,

    /// Application-level error message; non-empty means the operation
    /// failed even though the HTTP exchange succeeded.
    pub error: String,
}

impl SessionList {
    /// True when the response carries an application-level error.
    pub fn is_error(&self) -> bool {
        !self.error.is_empty()
    }

    /// The application-level error message, if any.
    pub fn error(&self) -> Option<&str> {
        if self.error.is_empty() {
            None
        } else {
            Some(&self.error)
        }
    }
}

/// Reply to `sessions.active`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionActive {
    pub active: bool,

    /// Short status string, `"success"` or `"error"`.
    pub data: String,

    /// Application-level error message; non-empty means the operation
    /// failed and `active` is meaningless.
    pub error: String,
}

impl SessionActive {
    /// True when the response carries an application-level error.
    pub fn is_error(&self) -> bool {
        !self.error.is_empty()
    }

    /// The application-level error message, if any.
    pub fn error(&self) -> Option<&str> {
        if self.error.is_empty() {
            None
        } else {
            Some(&self.error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_full_response() {
        let body = r#"{
            "solution": {
                "verified": true,
                "response": "<html></html>",
                "statusCode": 200,
                "currentUrl": "https://example.com/",
                "userAgent": "Mozilla/5.0",
                "cookies": [{"name": "token", "value": "abc", "domain": ".example.com", "path": "/", "httpOnly": true}],
                "cookieString": "token=abc",
                "innerText": "Example Domain"
            },
            "timeElapsed": 1234,
            "data": "success",
            "session": "s1"
        }"#;

        let response: ScrappeyResponse = serde_json::from_str(body).unwrap();
        assert!(response.solution.verified);
        assert_eq!(response.solution.status_code, 200);
        assert_eq!(response.solution.current_url, "https://example.com/");
        assert_eq!(response.solution.cookies.len(), 1);
        assert_eq!(response.solution.cookies[0].name, "token");
        assert_eq!(
            response.solution.cookies[0].extra.get("httpOnly"),
            Some(&serde_json::json!(true))
        );
        assert_eq!(response.time_elapsed, 1234);
        assert_eq!(response.data, "success");
        assert_eq!(response.session, "s1");
        assert!(!response.is_error());
        assert_eq!(response.error(), None);
    }

    #[test]
    fn test_missing_fields_decode_to_zero_values() {
        let response: ScrappeyResponse = serde_json::from_str("{}").unwrap();
        assert!(!response.solution.verified);
        assert_eq!(response.solution.status_code, 0);
        assert_eq!(response.session, "");
        assert_eq!(response.time_elapsed, 0);
        assert!(response.solution.javascript_return.is_empty());
        assert!(response.fingerprint.is_none());
    }

    #[test]
    fn test_error_body_decodes_without_failing() {
        let body = r#"{"data": "error", "error": "invalid key"}"#;
        let response: ScrappeyResponse = serde_json::from_str(body).unwrap();
        assert!(response.is_error());
        assert_eq!(response.error(), Some("invalid key"));
        assert_eq!(response.data, "error");
    }

    #[test]
    fn test_javascript_return_is_heterogeneous_and_ordered() {
        let body = r#"{
            "solution": {
                "javascriptReturn": ["Example Domain", 42.5, true, null, {"k": [1, 2]}]
            }
        }"#;

        let response: ScrappeyResponse = serde_json::from_str(body).unwrap();
        let results = &response.solution.javascript_return;
        assert_eq!(results.len(), 5);
        assert_eq!(results[0].as_str(), Some("Example Domain"));
        assert_eq!(results[1].as_f64(), Some(42.5));
        assert_eq!(results[2].as_bool(), Some(true));
        assert_eq!(results[3], JsReturn::Null);
        match &results[4] {
            JsReturn::Structured(value) => assert_eq!(value["k"][1], 2),
            other => panic!("expected structured value, got {:?}", other),
        }
    }

    #[test]
    fn test_session_create_fingerprint() {
        let body = r#"{"session": "test", "fingerprint": {"userAgent": "UA"}}"#;
        let response: ScrappeyResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.session, "test");
        assert_eq!(
            response.fingerprint.as_ref().unwrap()["userAgent"],
            "UA"
        );
    }

    #[test]
    fn test_session_active_decode() {
        let active: SessionActive = serde_json::from_str(r#"{"active": true}"#).unwrap();
        assert!(active.active);
        assert!(!active.is_error());
    }

    #[test]
    fn test_session_active_error_body() {
        let active: SessionActive =
            serde_json::from_str(r#"{"data": "error", "error": "invalid key"}"#).unwrap();
        assert!(active.is_error());
        assert_eq!(active.error(), Some("invalid key"));
        assert!(!active.active);
    }

    #[test]
    fn test_session_list_error_body() {
        let sessions: SessionList =
            serde_json::from_str(r#"{"data": "error", "error": "invalid key"}"#).unwrap();
        assert!(sessions.is_error());
        assert_eq!(sessions.error(), Some("invalid key"));
        assert_eq!(sessions.count, 0);
    }
}
