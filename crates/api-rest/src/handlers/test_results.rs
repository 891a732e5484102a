//! Test result routes, proxied to the laboratory API.

use api_shared::{BearerToken, ErrorBody};
use axum::extract::State;
use axum::response::Json;
use lims_core::models::{RemarkUpdate, ResultStatusChange, TestResult, TestResultQuery};
use lims_core::status::{annotate_status_chips, StatusDomain};
use serde_json::Value;

use crate::extract::{ApiJson, ApiQuery};
use crate::handlers::ApiResult;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/apps/lims/test-results",
    params(TestResultQuery),
    responses(
        (status = 200, description = "Results as returned upstream, each with a `statusChip`", body = [TestResult]),
        (status = 400, description = "fromDate after toDate", body = ErrorBody)
    )
)]
/// List test results, optionally filtered
#[axum::debug_handler]
pub async fn list_results(
    State(state): State<AppState>,
    token: BearerToken,
    ApiQuery(query): ApiQuery<TestResultQuery>,
) -> ApiResult<Json<Value>> {
    query.validate_range()?;
    let mut body = state.lab.test_results(token.as_str(), &query).await?;
    annotate_status_chips(&mut body, StatusDomain::Result, &["StatusID", "statusId"]);
    Ok(Json(body))
}

#[utoipa::path(
    put,
    path = "/api/apps/lims/test-results/update-status",
    request_body = ResultStatusChange,
    responses(
        (status = 200, description = "Upstream acknowledgement", body = Object),
        (status = 400, description = "Rejection without a reason, or missing ids", body = ErrorBody)
    )
)]
/// Change result status; rejecting requires a reason
#[axum::debug_handler]
pub async fn update_status(
    State(state): State<AppState>,
    token: BearerToken,
    ApiJson(change): ApiJson<ResultStatusChange>,
) -> ApiResult<Json<Value>> {
    let change = change.validated()?;
    let body = state
        .lab
        .update_result_status(token.as_str(), &change)
        .await?;
    Ok(Json(body))
}

#[utoipa::path(
    put,
    path = "/api/apps/lims/test-results/update-remark",
    request_body = RemarkUpdate,
    responses(
        (status = 200, description = "Upstream acknowledgement", body = Object),
        (status = 400, description = "Missing ids or remark", body = ErrorBody)
    )
)]
/// Attach a remark to results
#[axum::debug_handler]
pub async fn update_remark(
    State(state): State<AppState>,
    token: BearerToken,
    ApiJson(update): ApiJson<RemarkUpdate>,
) -> ApiResult<Json<Value>> {
    let update = update.validated()?;
    let body = state
        .lab
        .update_result_remark(token.as_str(), &update)
        .await?;
    Ok(Json(body))
}
