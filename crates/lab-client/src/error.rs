use lims_core::constants::UPSTREAM_FALLBACK_MESSAGE;
use lims_core::LimsError;
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum LabClientError {
    #[error("upstream returned {status}: {message}")]
    Upstream { status: u16, message: String },
    #[error("upstream transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid upstream response: {0}")]
    InvalidResponse(String),
    #[error("invalid client configuration: {0}")]
    Config(String),
}

pub type LabClientResult<T> = std::result::Result<T, LabClientError>;

impl From<LabClientError> for LimsError {
    fn from(err: LabClientError) -> Self {
        match err {
            LabClientError::Upstream { status, message } => LimsError::Upstream { status, message },
            LabClientError::Transport(e) => LimsError::Transport(e.to_string()),
            LabClientError::InvalidResponse(msg) => LimsError::Transport(msg),
            LabClientError::Config(msg) => LimsError::Config(msg),
        }
    }
}

/// Picks the most specific message out of an upstream error body.
///
/// Looks at `message`, then `error`, then `detail`; anything else (including a body that is
/// not JSON) yields the generic fallback.
pub fn upstream_message(body: &[u8]) -> String {
    let Ok(value) = serde_json::from_slice::<Value>(body) else {
        return UPSTREAM_FALLBACK_MESSAGE.to_string();
    };

    ["message", "error", "detail"]
        .iter()
        .filter_map(|key| value.get(key))
        .find_map(|field| match field {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Object(inner) => inner
                .get("message")
                .and_then(Value::as_str)
                .filter(|s| !s.trim().is_empty())
                .map(|s| s.trim().to_string()),
            _ => None,
        })
        .unwrap_or_else(|| UPSTREAM_FALLBACK_MESSAGE.to_string())
}
