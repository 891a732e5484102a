use api_shared::Envelope;
use axum::extract::State;
use axum::response::Json;
use lims_core::models::AuditEntry;

use crate::extract::ApiPath;
use crate::handlers::ApiResult;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/apps/lims/audit-trail/{record_id}",
    params(("record_id" = String, Path, description = "Id of the audited record")),
    responses(
        (status = 200, description = "Audit entries, oldest first, under `data`", body = [AuditEntry])
    )
)]
/// Audit trail of one record
///
/// Covers every create, update, delete and workflow transition applied by the in-memory
/// modules. An unknown id has an empty trail.
#[axum::debug_handler]
pub async fn audit_trail(
    State(state): State<AppState>,
    ApiPath(record_id): ApiPath<String>,
) -> ApiResult<Json<Envelope<Vec<AuditEntry>>>> {
    Ok(Json(Envelope::ok(state.audit.for_record(&record_id))))
}
