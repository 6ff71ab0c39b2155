//! Result envelope returned by every RPC call.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultCode {
    Success,
    Forbidden,
    Duplicate,
    Unknown,
}

/// `{ code, message, content }` where `content` is a serialized payload or empty.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RpcResult {
    pub code: ResultCode,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub content: String,
}

impl RpcResult {
    #[must_use]
    pub const fn success() -> Self {
        Self {
            code: ResultCode::Success,
            message: String::new(),
            content: String::new(),
        }
    }

    /// Success carrying a JSON payload.
    ///
    /// A payload that cannot be serialized is reported as `Unknown`.
    pub fn success_with<T: Serialize>(payload: &T) -> Self {
        match serde_json::to_string(payload) {
            Ok(content) => Self {
                code: ResultCode::Success,
                message: String::new(),
                content,
            },
            Err(err) => Self::unknown(&err),
        }
    }

    pub fn failure(code: ResultCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            content: String::new(),
        }
    }

    pub fn unknown(cause: &impl std::fmt::Display) -> Self {
        Self::failure(
            ResultCode::Unknown,
            format!("Unknown error occurred: {cause}"),
        )
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.code == ResultCode::Success
    }
}
