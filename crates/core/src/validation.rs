//! Input validation utilities.
//!
//! This module contains functions for validating user inputs to ensure they meet
//! safety and correctness requirements before being used in operations.

use crate::{LimsError, LimsResult};

/// Maximum accepted length of a record id.
pub const MAX_RECORD_ID_LEN: usize = 128;

/// Validates that a record id is safe to embed in a URL path segment.
///
/// Ids are interpolated into upstream paths such as `/v1/species/{id}` and used as audit
/// keys, so they are restricted to a conservative ASCII set:
/// - Rejects empty or whitespace-only strings
/// - Bounds the length to avoid pathological inputs
/// - Allows only alphanumerics, `.`, `-` and `_`, and never `..`
///
/// # Errors
///
/// Returns a `LimsError::InvalidInput` if the id is invalid.
pub fn validate_record_id(id: &str) -> LimsResult<()> {
    if id.trim().is_empty() {
        return Err(LimsError::InvalidInput("id cannot be empty".into()));
    }

    if id.len() > MAX_RECORD_ID_LEN {
        return Err(LimsError::InvalidInput(format!(
            "id exceeds maximum length of {} characters",
            MAX_RECORD_ID_LEN
        )));
    }

    let ok = id
        .bytes()
        .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'z' | b'A'..=b'Z' | b'.' | b'-' | b'_'));

    if !ok || id.contains("..") {
        return Err(LimsError::InvalidInput(
            "id contains invalid characters (only alphanumeric, '.', '-', '_' allowed)".into(),
        ));
    }

    Ok(())
}

/// Validates an upstream base URL: absolute `http`/`https` with a host.
///
/// # Errors
///
/// Returns a `LimsError::Config` describing the problem.
pub fn validate_base_url(url: &str) -> LimsResult<()> {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .ok_or_else(|| LimsError::Config(format!("base URL must use http or https: {url}")))?;

    let host = rest.split('/').next().unwrap_or_default();
    if host.is_empty() || host.chars().any(char::is_whitespace) {
        return Err(LimsError::Config(format!("base URL has no host: {url}")));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_typical_ids() {
        for id in ["7", "SP-001", "d6a1f0c2-3a1b-4c2e-9f00-123456789abc", "lot_2025.1"] {
            assert!(validate_record_id(id).is_ok(), "{id}");
        }
    }

    #[test]
    fn rejects_unsafe_ids() {
        for id in ["", "  ", "a/b", "..", "a..b", "a b", "id?x=1", "ümlaut"] {
            assert!(validate_record_id(id).is_err(), "{id}");
        }
        assert!(validate_record_id(&"x".repeat(MAX_RECORD_ID_LEN + 1)).is_err());
    }

    #[test]
    fn base_url_requires_http_scheme_and_host() {
        assert!(validate_base_url("https://lims.example.org").is_ok());
        assert!(validate_base_url("http://localhost:8080/api").is_ok());
        assert!(validate_base_url("ftp://lims.example.org").is_err());
        assert!(validate_base_url("https://").is_err());
        assert!(validate_base_url("lims.example.org").is_err());
    }
}
