use lims_types::TextError;

#[derive(Debug, thiserror::Error)]
pub enum LimsError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("a non-empty reason is required")]
    ReasonRequired,
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },
    #[error("{kind} already exists: {id}")]
    AlreadyExists { kind: &'static str, id: String },
    #[error("cannot {action} a record in status '{from}'")]
    InvalidTransition { from: String, action: String },
    #[error("action '{action}' is not available for status '{status}'")]
    ActionNotAllowed { action: String, status: String },
    #[error("a dialog is already open for row {0}")]
    DialogAlreadyOpen(String),
    #[error("no dialog is open")]
    DialogNotOpen,
    #[error("upstream returned {status}: {message}")]
    Upstream { status: u16, message: String },
    #[error("upstream transport failure: {0}")]
    Transport(String),
    #[error("failed to serialize record: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialize record: {0}")]
    Deserialization(serde_json::Error),
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl From<TextError> for LimsError {
    fn from(err: TextError) -> Self {
        LimsError::InvalidInput(err.to_string())
    }
}

impl From<validator::ValidationErrors> for LimsError {
    fn from(errors: validator::ValidationErrors) -> Self {
        LimsError::InvalidInput(errors.to_string())
    }
}

pub type LimsResult<T> = std::result::Result<T, LimsError>;
