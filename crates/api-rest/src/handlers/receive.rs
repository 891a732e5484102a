//! Sample receipt routes, proxied to the laboratory API.
//!
//! Successful upstream bodies are relayed unchanged; validation happens before any call.

use api_shared::{BearerToken, ErrorBody};
use axum::extract::State;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use lims_core::models::{
    BarcodeRequest, DownloadParams, ReceiveStatusChange, RemarkUpdate,
};
use lims_core::status::{annotate_status_chips, StatusDomain};
use serde_json::Value;

use crate::extract::{ApiJson, ApiQuery};
use crate::handlers::ApiResult;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/apps/lims/receive",
    responses(
        (status = 200, description = "Received samples as returned upstream, each with a `statusChip`", body = Object),
        (status = 401, description = "No session or access token", body = ErrorBody)
    )
)]
/// List received samples
#[axum::debug_handler]
pub async fn list_received(
    State(state): State<AppState>,
    token: BearerToken,
) -> ApiResult<Json<Value>> {
    let mut body = state.lab.received_samples(token.as_str()).await?;
    annotate_status_chips(&mut body, StatusDomain::Sample, &["status", "Status"]);
    Ok(Json(body))
}

#[utoipa::path(
    put,
    path = "/api/apps/lims/receive/update-status",
    request_body = ReceiveStatusChange,
    responses(
        (status = 200, description = "Upstream acknowledgement", body = Object),
        (status = 400, description = "Missing ids or reason", body = ErrorBody)
    )
)]
/// Change the status of received samples; a reason is always required
#[axum::debug_handler]
pub async fn update_status(
    State(state): State<AppState>,
    token: BearerToken,
    ApiJson(change): ApiJson<ReceiveStatusChange>,
) -> ApiResult<Json<Value>> {
    let change = change.validated()?;
    let body = state
        .lab
        .update_receive_status(token.as_str(), &change)
        .await?;
    Ok(Json(body))
}

#[utoipa::path(
    put,
    path = "/api/apps/lims/receive/update-remark",
    request_body = RemarkUpdate,
    responses(
        (status = 200, description = "Upstream acknowledgement", body = Object),
        (status = 400, description = "Missing ids or remark", body = ErrorBody)
    )
)]
/// Attach a remark to received samples
#[axum::debug_handler]
pub async fn update_remark(
    State(state): State<AppState>,
    token: BearerToken,
    ApiJson(update): ApiJson<RemarkUpdate>,
) -> ApiResult<Json<Value>> {
    let update = update.validated()?;
    let body = state
        .lab
        .update_receive_remark(token.as_str(), &update)
        .await?;
    Ok(Json(body))
}

#[utoipa::path(
    post,
    path = "/api/apps/lims/receive/print-barcode",
    request_body = BarcodeRequest,
    responses(
        (status = 200, description = "Upstream barcode payload", body = Object),
        (status = 400, description = "Missing ids", body = ErrorBody)
    )
)]
/// Request barcodes for received samples
#[axum::debug_handler]
pub async fn print_barcode(
    State(state): State<AppState>,
    token: BearerToken,
    ApiJson(request): ApiJson<BarcodeRequest>,
) -> ApiResult<Json<Value>> {
    let request = request.validated()?;
    let body = state.lab.print_barcodes(token.as_str(), &request).await?;
    Ok(Json(body))
}

#[utoipa::path(
    post,
    path = "/api/apps/lims/receive/download",
    params(DownloadParams),
    responses(
        (status = 200, description = "CSV or PDF file passed through from upstream"),
        (status = 400, description = "Unknown file type", body = ErrorBody)
    )
)]
/// Download the received sample list as CSV or PDF
#[axum::debug_handler]
pub async fn download(
    State(state): State<AppState>,
    token: BearerToken,
    ApiQuery(params): ApiQuery<DownloadParams>,
) -> ApiResult<Response> {
    let format = params.file_type;
    let raw = state
        .lab
        .download_received(token.as_str(), format)
        .await?;

    let content_type = raw
        .content_type
        .unwrap_or_else(|| format.content_type().to_string());
    let disposition = raw.content_disposition.unwrap_or_else(|| {
        format!(
            "attachment; filename=\"{}\"",
            format.file_name("received-samples")
        )
    });

    Ok((
        StatusCode::OK,
        [(CONTENT_TYPE, content_type), (CONTENT_DISPOSITION, disposition)],
        raw.body,
    )
        .into_response())
}
