//! Session and caller identity for incoming requests.
//!
//! Session issuance happens elsewhere; this service only needs the access token to forward
//! upstream. Two distinct failures are reported:
//! - no `Authorization` header at all: there is no session,
//! - a header without a usable bearer token: the session carries no access token.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use lims_core::constants::SYSTEM_ACTOR;

use crate::envelope::ErrorBody;

pub const NO_SESSION_MESSAGE: &str = "No active session found";
pub const NO_ACCESS_TOKEN_MESSAGE: &str = "No access token found";

/// Header naming the user on whose behalf a request is made.
pub const ACTOR_HEADER: &str = "x-lims-user";

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("No active session found")]
    NoSession,
    #[error("No access token found")]
    NoAccessToken,
}

impl AuthError {
    pub fn message(self) -> &'static str {
        match self {
            AuthError::NoSession => NO_SESSION_MESSAGE,
            AuthError::NoAccessToken => NO_ACCESS_TOKEN_MESSAGE,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        tracing::warn!("rejected request: {}", self.message());
        (
            StatusCode::UNAUTHORIZED,
            Json(ErrorBody::new(self.message())),
        )
            .into_response()
    }
}

/// The caller's access token, forwarded unchanged to the laboratory API.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BearerToken(***)")
    }
}

/// Parses an `Authorization` header value.
///
/// The scheme is matched case-insensitively and surrounding whitespace is ignored.
pub fn bearer_token_from_header(value: Option<&str>) -> Result<BearerToken, AuthError> {
    let value = value.ok_or(AuthError::NoSession)?.trim();
    let (scheme, token) = value.split_once(' ').ok_or(AuthError::NoAccessToken)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::NoAccessToken);
    }
    let token = token.trim();
    if token.is_empty() || token.eq_ignore_ascii_case("undefined") || token == "null" {
        return Err(AuthError::NoAccessToken);
    }
    Ok(BearerToken(token.to_string()))
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for BearerToken {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = match parts.headers.get(AUTHORIZATION) {
            None => None,
            Some(value) => Some(value.to_str().map_err(|_| AuthError::NoAccessToken)?),
        };
        bearer_token_from_header(header)
    }
}

/// Who is acting, for audit entries. Defaults to `system`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor(pub String);

impl Actor {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Actor {
    fn default() -> Self {
        Actor(SYSTEM_ACTOR.to_string())
    }
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Actor {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let actor = parts
            .headers
            .get(ACTOR_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(|v| Actor(v.to_string()))
            .unwrap_or_default();
        Ok(actor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts(headers: &[(&str, &str)]) -> Parts {
        let mut builder = Request::builder().uri("/");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).expect("request").into_parts().0
    }

    #[test]
    fn header_parsing() {
        assert_eq!(bearer_token_from_header(None), Err(AuthError::NoSession));
        for value in ["", "Bearer", "Bearer   ", "Basic abc", "Bearer undefined", "tok"] {
            assert_eq!(
                bearer_token_from_header(Some(value)),
                Err(AuthError::NoAccessToken),
                "{value}"
            );
        }
        let token = bearer_token_from_header(Some("  bearer abc.def  ")).expect("token");
        assert_eq!(token.as_str(), "abc.def");
        assert_eq!(format!("{token:?}"), "BearerToken(***)");
    }

    #[tokio::test]
    async fn extractor_distinguishes_missing_session_from_missing_token() {
        let mut none = parts(&[]);
        let err = BearerToken::from_request_parts(&mut none, &())
            .await
            .expect_err("no header");
        assert_eq!(err.message(), "No active session found");

        let mut empty = parts(&[("authorization", "Bearer ")]);
        let err = BearerToken::from_request_parts(&mut empty, &())
            .await
            .expect_err("no token");
        assert_eq!(err.message(), "No access token found");
        assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn actor_defaults_to_system() {
        let mut anonymous = parts(&[]);
        let actor = Actor::from_request_parts(&mut anonymous, &()).await;
        assert_eq!(actor, Ok(Actor::default()));

        let mut named = parts(&[("x-lims-user", " qa.lead ")]);
        let actor = Actor::from_request_parts(&mut named, &()).await;
        assert_eq!(actor, Ok(Actor("qa.lead".into())));
    }
}
