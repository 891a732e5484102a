//! JSON envelopes shared by every route.
//!
//! Success bodies are `{ success: true, message?, data? }`; failures are always
//! `{ success: false, message }`.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
        }
    }
}

impl Envelope<()> {
    /// A success acknowledgement without a payload.
    pub fn done(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Always `false`.
    pub success: bool,
    pub message: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelopes_render_expected_shapes() {
        assert_eq!(
            serde_json::to_value(Envelope::with_message(vec![1], "done")).expect("ok"),
            json!({"success": true, "message": "done", "data": [1]})
        );
        assert_eq!(
            serde_json::to_value(Envelope::done("Deleted")).expect("done"),
            json!({"success": true, "message": "Deleted"})
        );
        assert_eq!(
            serde_json::to_value(ErrorBody::new("nope")).expect("err"),
            json!({"success": false, "message": "nope"})
        );
    }
}
