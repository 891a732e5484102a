//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into core services. The intent is to avoid reading process-wide environment variables
//! during request handling, which can lead to inconsistent behaviour in multi-threaded runtimes
//! and test harnesses.

use std::net::SocketAddr;
use std::time::Duration;

use crate::constants::{DEFAULT_PAGE_SIZE, DEFAULT_REST_ADDR, DEFAULT_UPSTREAM_TIMEOUT_SECS};
use crate::validation::validate_base_url;
use crate::{LimsError, LimsResult};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct LimsConfig {
    api_base_url: String,
    rest_addr: SocketAddr,
    upstream_timeout: Option<Duration>,
    page_size: usize,
}

impl LimsConfig {
    /// Create a new `LimsConfig`.
    ///
    /// A trailing slash on `api_base_url` is dropped so paths can be appended verbatim.
    pub fn new(
        api_base_url: String,
        rest_addr: SocketAddr,
        upstream_timeout: Option<Duration>,
        page_size: usize,
    ) -> LimsResult<Self> {
        let api_base_url = api_base_url.trim().trim_end_matches('/').to_string();
        validate_base_url(&api_base_url)?;

        if page_size == 0 {
            return Err(LimsError::Config("page size must be at least 1".into()));
        }

        Ok(Self {
            api_base_url,
            rest_addr,
            upstream_timeout,
            page_size,
        })
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    pub fn rest_addr(&self) -> SocketAddr {
        self.rest_addr
    }

    /// `None` means upstream calls never time out.
    pub fn upstream_timeout(&self) -> Option<Duration> {
        self.upstream_timeout
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Resolve the upstream base URL from `LIMS_API_URL`, falling back to `NEXT_PUBLIC_API_URL`.
pub fn api_base_url_from_env_values(
    primary: Option<String>,
    fallback: Option<String>,
) -> LimsResult<String> {
    non_blank(primary)
        .or_else(|| non_blank(fallback))
        .ok_or_else(|| {
            LimsError::Config("LIMS_API_URL (or NEXT_PUBLIC_API_URL) must be set".into())
        })
}

pub fn rest_addr_from_env_value(value: Option<String>) -> LimsResult<SocketAddr> {
    let value = non_blank(value).unwrap_or_else(|| DEFAULT_REST_ADDR.to_string());
    value
        .parse()
        .map_err(|e| LimsError::Config(format!("invalid LIMS_REST_ADDR '{value}': {e}")))
}

/// Parse `LIMS_UPSTREAM_TIMEOUT_SECS`; `0` disables the timeout.
pub fn upstream_timeout_from_env_value(value: Option<String>) -> LimsResult<Option<Duration>> {
    let secs = match non_blank(value) {
        Some(v) => v.parse::<u64>().map_err(|e| {
            LimsError::Config(format!("invalid LIMS_UPSTREAM_TIMEOUT_SECS '{v}': {e}"))
        })?,
        None => DEFAULT_UPSTREAM_TIMEOUT_SECS,
    };

    Ok((secs > 0).then(|| Duration::from_secs(secs)))
}

pub fn page_size_from_env_value(value: Option<String>) -> LimsResult<usize> {
    let Some(v) = non_blank(value) else {
        return Ok(DEFAULT_PAGE_SIZE);
    };
    match v.parse::<usize>() {
        Ok(size) if size > 0 => Ok(size),
        _ => Err(LimsError::Config(format!(
            "invalid LIMS_PAGE_SIZE '{v}': expected a positive integer"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_prefers_primary_and_trims_slash() {
        let url = api_base_url_from_env_values(
            Some("  ".into()),
            Some("https://lims.example.org/".into()),
        )
        .expect("fallback");
        let cfg = LimsConfig::new(
            url,
            rest_addr_from_env_value(None).expect("addr"),
            None,
            DEFAULT_PAGE_SIZE,
        )
        .expect("config");
        assert_eq!(cfg.api_base_url(), "https://lims.example.org");

        let url = api_base_url_from_env_values(
            Some("http://primary:8080".into()),
            Some("https://fallback".into()),
        )
        .expect("primary");
        assert_eq!(url, "http://primary:8080");

        assert!(api_base_url_from_env_values(None, None).is_err());
    }

    #[test]
    fn timeout_defaults_and_zero_disables() {
        assert_eq!(
            upstream_timeout_from_env_value(None).expect("default"),
            Some(Duration::from_secs(DEFAULT_UPSTREAM_TIMEOUT_SECS))
        );
        assert_eq!(upstream_timeout_from_env_value(Some("0".into())).expect("zero"), None);
        assert_eq!(
            upstream_timeout_from_env_value(Some("5".into())).expect("five"),
            Some(Duration::from_secs(5))
        );
        assert!(upstream_timeout_from_env_value(Some("soon".into())).is_err());
    }

    #[test]
    fn page_size_and_addr_parsing() {
        assert_eq!(page_size_from_env_value(None).expect("default"), 10);
        assert_eq!(page_size_from_env_value(Some("25".into())).expect("25"), 25);
        assert!(page_size_from_env_value(Some("0".into())).is_err());
        assert_eq!(
            rest_addr_from_env_value(Some("127.0.0.1:9000".into()))
                .expect("addr")
                .port(),
            9000
        );
        assert!(rest_addr_from_env_value(Some("nowhere".into())).is_err());
    }

    #[test]
    fn config_rejects_non_http_url() {
        let addr = rest_addr_from_env_value(None).expect("addr");
        assert!(LimsConfig::new("ftp://x".into(), addr, None, 10).is_err());
    }
}
