//! Requisition approval workflow, kept in memory.

use api_shared::{Actor, Envelope, ErrorBody};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use lims_core::models::{Requisition, RequisitionRow};
use lims_core::Reason;

use crate::extract::{ApiJson, ApiPath};
use crate::handlers::{ApiResult, ReasonBody, CREATED_MESSAGE};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/apps/lims/requisitions",
    responses(
        (status = 200, description = "Requisitions with status chip and enabled actions", body = [RequisitionRow])
    )
)]
/// List requisitions
#[axum::debug_handler]
pub async fn list_requisitions(
    State(state): State<AppState>,
) -> ApiResult<Json<Envelope<Vec<RequisitionRow>>>> {
    let rows = state.requisitions.list_rows().await?;
    Ok(Json(Envelope::ok(rows)))
}

#[utoipa::path(
    post,
    path = "/api/apps/lims/requisitions",
    request_body = Requisition,
    responses(
        (status = 201, description = "Created requisition, pending approval", body = RequisitionRow),
        (status = 400, description = "No tests or panels requested", body = ErrorBody)
    )
)]
/// Raise a requisition
#[axum::debug_handler]
pub async fn create_requisition(
    State(state): State<AppState>,
    actor: Actor,
    ApiJson(requisition): ApiJson<Requisition>,
) -> ApiResult<(StatusCode, Json<Envelope<RequisitionRow>>)> {
    let row = state
        .requisitions
        .create(requisition, actor.as_str())
        .await
        .map_err(|e| {
            tracing::error!("Create requisition error: {:?}", e);
            e
        })?;
    Ok((
        StatusCode::CREATED,
        Json(Envelope::with_message(row, CREATED_MESSAGE)),
    ))
}

#[utoipa::path(
    post,
    path = "/api/apps/lims/requisitions/{id}/approve",
    params(("id" = String, Path, description = "Requisition id")),
    responses(
        (status = 200, description = "Approved requisition", body = RequisitionRow),
        (status = 404, description = "Not found", body = ErrorBody),
        (status = 409, description = "Not pending approval", body = ErrorBody)
    )
)]
/// Approve a pending requisition
#[axum::debug_handler]
pub async fn approve(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
    actor: Actor,
) -> ApiResult<Json<Envelope<RequisitionRow>>> {
    let row = state.requisitions.approve(&id, actor.as_str())?;
    Ok(Json(Envelope::with_message(row, "Requisition approved")))
}

#[utoipa::path(
    post,
    path = "/api/apps/lims/requisitions/{id}/cancel",
    params(("id" = String, Path, description = "Requisition id")),
    request_body = ReasonBody,
    responses(
        (status = 200, description = "Cancelled requisition", body = RequisitionRow),
        (status = 400, description = "Missing reason", body = ErrorBody),
        (status = 409, description = "Not pending approval", body = ErrorBody)
    )
)]
/// Cancel a pending requisition with a reason
#[axum::debug_handler]
pub async fn cancel(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
    actor: Actor,
    ApiJson(body): ApiJson<ReasonBody>,
) -> ApiResult<Json<Envelope<RequisitionRow>>> {
    let reason = Reason::parse(body.reason.as_deref().unwrap_or_default())?;
    let row = state.requisitions.cancel(&id, &reason, actor.as_str())?;
    Ok(Json(Envelope::with_message(row, "Requisition cancelled")))
}
