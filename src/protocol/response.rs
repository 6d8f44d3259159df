//! Response bodies.
//!
//! Fields are optional on purpose: which ones are required depends on the
//! reported outcome, and the client turns absences into typed errors.

use serde::Deserialize;
use serde_json::Value;

/// `status` value that marks a successful refresh.
pub const SUCCESS_STATUS: &str = "success";

#[derive(Debug, Clone, Deserialize)]
pub struct RefreshResponse {
    pub status: String,
    #[serde(default, alias = "voices")]
    pub voice_names: Option<Vec<String>>,
    /// Advisory only; kept loose so an odd value never fails a refresh.
    #[serde(default)]
    pub count: Option<Value>,
    #[serde(default)]
    pub error: Option<Value>,
}

impl RefreshResponse {
    pub fn is_success(&self) -> bool {
        self.status == SUCCESS_STATUS
    }

    /// `count` as a number, when it reads as one.
    pub fn reported_count(&self) -> Option<u64> {
        match self.count.as_ref()? {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<String> {
        server_error_message(self.error.as_ref())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PreviewResponse {
    #[serde(default)]
    pub audio: Option<String>,
    #[serde(default)]
    pub error: Option<Value>,
}

impl PreviewResponse {
    /// Server-side failure message, if `error` is set to anything truthy.
    pub fn error_message(&self) -> Option<String> {
        server_error_message(self.error.as_ref())
    }
}

/// Reads an `error` field the way the editor UI does: `null`, `false`, `0`
/// and blank strings mean no error; any other value is a failure.
fn server_error_message(error: Option<&Value>) -> Option<String> {
    match error? {
        Value::Null | Value::Bool(false) => None,
        Value::Bool(true) => Some("server reported an error".to_string()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => match map.get("message") {
            Some(Value::String(m)) if !m.trim().is_empty() => Some(m.clone()),
            _ => Some(Value::Object(map.clone()).to_string()),
        },
        other => Some(other.to_string()),
    }
}
