//! Mapping of domain, auth and extraction failures onto HTTP responses.
//!
//! Every failure renders as `{ "success": false, "message": ... }`:
//! - session problems are `401`,
//! - malformed or invalid input is `400`, rejected before any repository or upstream call,
//! - upstream failures keep the upstream status and message,
//! - anything else is `500 Internal server error`, with the cause logged but not exposed.

use api_shared::{AuthError, ErrorBody};
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use lims_core::LimsError;

pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Debug)]
pub enum ApiError {
    Auth(AuthError),
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Upstream { status: u16, message: String },
    Internal,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Auth(_) => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::Auth(err) => err.message(),
            ApiError::BadRequest(msg) | ApiError::NotFound(msg) | ApiError::Conflict(msg) => msg,
            ApiError::Upstream { message, .. } => message,
            ApiError::Internal => INTERNAL_ERROR_MESSAGE,
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::Auth(err)
    }
}

impl From<LimsError> for ApiError {
    fn from(err: LimsError) -> Self {
        match err {
            LimsError::InvalidInput(msg) => ApiError::BadRequest(msg),
            LimsError::ReasonRequired => ApiError::BadRequest(err.to_string()),
            LimsError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            LimsError::AlreadyExists { .. }
            | LimsError::InvalidTransition { .. }
            | LimsError::ActionNotAllowed { .. }
            | LimsError::DialogAlreadyOpen(_)
            | LimsError::DialogNotOpen => ApiError::Conflict(err.to_string()),
            LimsError::Upstream { status, message } => ApiError::Upstream { status, message },
            LimsError::Transport(_)
            | LimsError::Serialization(_)
            | LimsError::Deserialization(_)
            | LimsError::Config(_) => {
                tracing::error!("Unexpected error: {:?}", err);
                ApiError::Internal
            }
        }
    }
}

impl From<lab_client::LabClientError> for ApiError {
    fn from(err: lab_client::LabClientError) -> Self {
        LimsError::from(err).into()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{} {}", status, self.message());
        }
        (status, Json(ErrorBody::new(self.message()))).into_response()
    }
}
