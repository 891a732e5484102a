//! Auto-approval rules, kept in memory.

use api_shared::{Actor, Envelope, ErrorBody};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use lims_core::models::AutoApprovalRule;
use lims_core::ListView;
use serde_json::Value;

use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::handlers::{create_record, delete_record, update_record, ApiResult, ReasonParams};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/apps/lims/auto-approval",
    responses(
        (status = 200, description = "All rules; empty when the store cannot be read", body = [AutoApprovalRule])
    )
)]
/// List auto-approval rules
#[axum::debug_handler]
pub async fn list_rules(State(state): State<AppState>) -> Json<Envelope<Vec<AutoApprovalRule>>> {
    let mut view: ListView<AutoApprovalRule> = ListView::with_page_size(state.page_size);
    if let Some(notice) = view.refresh(&*state.auto_approval).await {
        tracing::warn!("{}", notice.message);
    }
    Json(Envelope::ok(view.rows().to_vec()))
}

#[utoipa::path(
    post,
    path = "/api/apps/lims/auto-approval",
    request_body = AutoApprovalRule,
    responses(
        (status = 201, description = "Created rule", body = AutoApprovalRule),
        (status = 400, description = "Invalid limits", body = ErrorBody)
    )
)]
/// Create an auto-approval rule
#[axum::debug_handler]
pub async fn create_rule(
    State(state): State<AppState>,
    actor: Actor,
    ApiJson(rule): ApiJson<AutoApprovalRule>,
) -> ApiResult<(StatusCode, Json<Envelope<AutoApprovalRule>>)> {
    create_record(&*state.auto_approval, rule, actor.as_str()).await
}

#[utoipa::path(
    put,
    path = "/api/apps/lims/auto-approval/{id}",
    params(("id" = String, Path, description = "Rule id")),
    request_body(content = Object, description = "Rule fields plus a non-empty `reason`"),
    responses(
        (status = 200, description = "Updated rule", body = AutoApprovalRule),
        (status = 400, description = "Missing reason or invalid limits", body = ErrorBody)
    )
)]
/// Update an auto-approval rule
#[axum::debug_handler]
pub async fn update_rule(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
    actor: Actor,
    ApiJson(body): ApiJson<Value>,
) -> ApiResult<Json<Envelope<AutoApprovalRule>>> {
    update_record(&*state.auto_approval, id, body, actor.as_str()).await
}

#[utoipa::path(
    delete,
    path = "/api/apps/lims/auto-approval/{id}",
    params(("id" = String, Path, description = "Rule id"), ReasonParams),
    responses(
        (status = 200, description = "Deleted"),
        (status = 400, description = "Missing reason", body = ErrorBody)
    )
)]
/// Delete an auto-approval rule
#[axum::debug_handler]
pub async fn delete_rule(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
    actor: Actor,
    ApiQuery(params): ApiQuery<ReasonParams>,
) -> ApiResult<Json<Envelope<()>>> {
    delete_record::<AutoApprovalRule, _>(
        &*state.auto_approval,
        id,
        params.reason,
        actor.as_str(),
    )
    .await
}
