//! Authenticated calls to the laboratory API.
//!
//! Every request forwards the caller's bearer token unchanged. Non-2xx responses become
//! [`LabClientError::Upstream`] carrying the upstream status and the message extracted from the
//! body, so the route layer can relay both.

use std::time::Duration;

use lims_core::models::{
    BarcodeRequest, ExportFormat, ReceiveStatusChange, RemarkUpdate, ResultStatusChange,
    TestResultQuery,
};
use lims_core::LimsConfig;
use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use crate::error::{upstream_message, LabClientError, LabClientResult};

/// An upstream response body passed through without interpretation.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub content_disposition: Option<String>,
    pub body: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct LabApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl LabApiClient {
    /// `timeout` of `None` leaves requests unbounded.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> LabClientResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| LabClientError::Config(e.to_string()))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn from_config(cfg: &LimsConfig) -> LabClientResult<Self> {
        Self::new(cfg.api_base_url(), cfg.upstream_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends a request and returns the body untouched.
    pub async fn send_raw<B>(
        &self,
        method: Method,
        token: &str,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> LabClientResult<RawResponse>
    where
        B: Serialize + ?Sized,
    {
        let mut request = self
            .http
            .request(method.clone(), format!("{}{}", self.base_url, path))
            .bearer_auth(token);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            tracing::error!("{} {} transport failure: {:?}", method, path, e);
            LabClientError::Transport(e)
        })?;

        let status = response.status();
        let header = |name| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        let content_type = header(CONTENT_TYPE);
        let content_disposition = header(CONTENT_DISPOSITION);
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let message = upstream_message(&bytes);
            tracing::error!("{} {} failed with {}: {}", method, path, status, message);
            return Err(LabClientError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        Ok(RawResponse {
            status: status.as_u16(),
            content_type,
            content_disposition,
            body: bytes.to_vec(),
        })
    }

    /// Sends a request and parses the body as JSON. An empty body is `null`.
    pub async fn send_json<B>(
        &self,
        method: Method,
        token: &str,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> LabClientResult<Value>
    where
        B: Serialize + ?Sized,
    {
        let raw = self.send_raw(method, token, path, query, body).await?;
        if raw.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&raw.body).map_err(|e| {
            LabClientError::InvalidResponse(format!("{path} returned a non-JSON body: {e}"))
        })
    }

    pub async fn get_json(
        &self,
        token: &str,
        path: &str,
        query: &[(&str, String)],
    ) -> LabClientResult<Value> {
        self.send_json(Method::GET, token, path, query, None::<&Value>)
            .await
    }
}

// ============================================================================
// Receive
// ============================================================================

impl LabApiClient {
    pub async fn received_samples(&self, token: &str) -> LabClientResult<Value> {
        self.get_json(token, "/v1/receive/all", &[]).await
    }

    pub async fn update_receive_status(
        &self,
        token: &str,
        change: &ReceiveStatusChange,
    ) -> LabClientResult<Value> {
        self.send_json(Method::PUT, token, "/v1/receive/update-status", &[], Some(change))
            .await
    }

    pub async fn update_receive_remark(
        &self,
        token: &str,
        update: &RemarkUpdate,
    ) -> LabClientResult<Value> {
        self.send_json(Method::PUT, token, "/v1/receive/update-remark", &[], Some(update))
            .await
    }

    pub async fn print_barcodes(
        &self,
        token: &str,
        request: &BarcodeRequest,
    ) -> LabClientResult<Value> {
        self.send_json(Method::POST, token, "/v1/receive/print-barcode", &[], Some(request))
            .await
    }

    pub async fn download_received(
        &self,
        token: &str,
        format: ExportFormat,
    ) -> LabClientResult<RawResponse> {
        self.send_raw(
            Method::POST,
            token,
            "/v1/receive/download",
            &[("fileType", format.as_str().to_string())],
            None::<&Value>,
        )
        .await
    }
}

// ============================================================================
// Test results
// ============================================================================

impl LabApiClient {
    pub async fn test_results(
        &self,
        token: &str,
        query: &TestResultQuery,
    ) -> LabClientResult<Value> {
        self.get_json(token, "/v1/testresults/all", &query.to_pairs())
            .await
    }

    pub async fn update_result_status(
        &self,
        token: &str,
        change: &ResultStatusChange,
    ) -> LabClientResult<Value> {
        self.send_json(Method::PUT, token, "/v1/testresults/update-status", &[], Some(change))
            .await
    }

    pub async fn update_result_remark(
        &self,
        token: &str,
        update: &RemarkUpdate,
    ) -> LabClientResult<Value> {
        self.send_json(Method::PUT, token, "/v1/testresults/update-remark", &[], Some(update))
            .await
    }
}

// ============================================================================
// Personal
// ============================================================================

impl LabApiClient {
    pub async fn permissions(&self, token: &str, user_type_id: &str) -> LabClientResult<Value> {
        self.get_json(
            token,
            "/v1/personal/permissions",
            &[("userTypeId", user_type_id.to_string())],
        )
        .await
    }

    pub async fn duty_delegation(&self, token: &str) -> LabClientResult<Value> {
        self.get_json(token, "/v1/personal/getdutydelegation", &[])
            .await
    }

    pub async fn set_study(&self, token: &str, body: &Value) -> LabClientResult<Value> {
        self.send_json(Method::POST, token, "/v1/personal/setstudy", &[], Some(body))
            .await
    }
}
