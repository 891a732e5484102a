//! NABL and CAP accreditation details, kept in memory.

use api_shared::{Actor, Envelope, ErrorBody};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use lims_core::models::AccreditationDetail;
use serde_json::Value;

use crate::extract::{ApiJson, ApiPath};
use crate::handlers::{create_record, list_records, update_record, ApiResult};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/apps/lims/accreditation",
    responses(
        (status = 200, description = "All accreditation details", body = [AccreditationDetail])
    )
)]
/// List accreditation details
#[axum::debug_handler]
pub async fn list_accreditation(
    State(state): State<AppState>,
) -> ApiResult<Json<Envelope<Vec<AccreditationDetail>>>> {
    list_records(&*state.accreditation).await
}

#[utoipa::path(
    post,
    path = "/api/apps/lims/accreditation",
    request_body = AccreditationDetail,
    responses(
        (status = 201, description = "Created detail with stamped tests", body = AccreditationDetail),
        (status = 400, description = "fromDate after toDate or missing fields", body = ErrorBody)
    )
)]
/// Record an accreditation
#[axum::debug_handler]
pub async fn create_accreditation(
    State(state): State<AppState>,
    actor: Actor,
    ApiJson(detail): ApiJson<AccreditationDetail>,
) -> ApiResult<(StatusCode, Json<Envelope<AccreditationDetail>>)> {
    create_record(&*state.accreditation, detail, actor.as_str()).await
}

#[utoipa::path(
    put,
    path = "/api/apps/lims/accreditation/{id}",
    params(("id" = String, Path, description = "Accreditation id")),
    request_body(content = Object, description = "Detail fields plus a non-empty `reason`"),
    responses(
        (status = 200, description = "Updated detail", body = AccreditationDetail),
        (status = 400, description = "Missing reason or invalid dates", body = ErrorBody),
        (status = 404, description = "Not found", body = ErrorBody)
    )
)]
/// Update an accreditation
#[axum::debug_handler]
pub async fn update_accreditation(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
    actor: Actor,
    ApiJson(body): ApiJson<Value>,
) -> ApiResult<Json<Envelope<AccreditationDetail>>> {
    update_record(&*state.accreditation, id, body, actor.as_str()).await
}
