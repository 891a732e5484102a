//! Extractors whose rejections render as [`ApiError`] (`400` with the JSON error envelope)
//! instead of axum's plain-text defaults.

use axum::extract::{FromRequest, FromRequestParts};
use serde_json::{Map, Value};

use crate::error::ApiError;

#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

/// Splits an update body `{ ...payload, reason }` into its payload and reason.
///
/// # Errors
///
/// Returns [`ApiError::BadRequest`] when the body is not an object or `reason` is not a string.
pub fn split_reason(body: Value) -> Result<(Map<String, Value>, Option<String>), ApiError> {
    let Value::Object(mut map) = body else {
        return Err(ApiError::BadRequest("request body must be a JSON object".into()));
    };
    let reason = match map.remove("reason") {
        None | Some(Value::Null) => None,
        Some(Value::String(reason)) => Some(reason),
        Some(_) => return Err(ApiError::BadRequest("reason must be a string".into())),
    };
    Ok((map, reason))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reason_is_lifted_out_of_the_payload() {
        let (payload, reason) =
            split_reason(json!({"name": "Wistar", "reason": "typo"})).expect("split");
        assert_eq!(reason.as_deref(), Some("typo"));
        assert_eq!(Value::Object(payload), json!({"name": "Wistar"}));

        let (_, reason) = split_reason(json!({"name": "Wistar"})).expect("split");
        assert_eq!(reason, None);

        assert!(split_reason(json!({"reason": 5})).is_err());
        assert!(split_reason(json!(["reason"])).is_err());
    }
}
