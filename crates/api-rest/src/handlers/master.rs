//! Master data routes.
//!
//! Instruments, species, strains and analyte codes live in the laboratory API and are reached
//! with the caller's token; methods are kept in memory and need no session.

use std::sync::Arc;

use api_shared::{Actor, AuthError, BearerToken, Envelope, ErrorBody};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use lab_client::HttpMasterRepository;
use lims_core::models::{MasterRecord, MasterResource};
use lims_core::Repository;
use serde_json::Value;

use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::handlers::{create_record, delete_record, update_record, ApiResult, ReasonParams};
use crate::state::AppState;

fn repository(
    state: &AppState,
    resource: MasterResource,
    token: Result<BearerToken, AuthError>,
) -> ApiResult<Arc<dyn Repository<MasterRecord>>> {
    if resource.upstream_path().is_none() {
        let methods: Arc<dyn Repository<MasterRecord>> = state.methods.clone();
        return Ok(methods);
    }
    let token = token?;
    let repo = HttpMasterRepository::new(state.lab.clone(), token.as_str(), resource)?;
    Ok(Arc::new(repo))
}

#[utoipa::path(
    get,
    path = "/api/apps/lims/master/{resource}",
    params(("resource" = MasterResource, Path, description = "Master resource")),
    responses(
        (status = 200, description = "All rows under `data`, each with a `statusChip`", body = [MasterRecord]),
        (status = 401, description = "No session or access token", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
/// List every row of a master resource
#[axum::debug_handler]
pub async fn list_master(
    State(state): State<AppState>,
    ApiPath(resource): ApiPath<MasterResource>,
    token: Result<BearerToken, AuthError>,
) -> ApiResult<Json<Envelope<Vec<MasterRecord>>>> {
    let repo = repository(&state, resource, token)?;
    let rows = repo.list().await.map_err(|e| {
        tracing::error!("List {} error: {:?}", resource, e);
        e
    })?;
    let rows = rows.into_iter().map(MasterRecord::with_status_chip).collect();
    Ok(Json(Envelope::ok(rows)))
}

#[utoipa::path(
    get,
    path = "/api/apps/lims/master/{resource}/{id}",
    params(
        ("resource" = MasterResource, Path, description = "Master resource"),
        ("id" = String, Path, description = "Row id")
    ),
    responses(
        (status = 200, description = "The row under `data`", body = MasterRecord),
        (status = 404, description = "Not found", body = ErrorBody)
    )
)]
/// Fetch one master row
#[axum::debug_handler]
pub async fn get_master(
    State(state): State<AppState>,
    ApiPath((resource, id)): ApiPath<(MasterResource, String)>,
    token: Result<BearerToken, AuthError>,
) -> ApiResult<Json<Envelope<MasterRecord>>> {
    let repo = repository(&state, resource, token)?;
    let record = repo.get(&id).await.map_err(|e| {
        tracing::error!("Get {} {} error: {:?}", resource, id, e);
        e
    })?;
    Ok(Json(Envelope::ok(record.with_status_chip())))
}

#[utoipa::path(
    post,
    path = "/api/apps/lims/master/{resource}",
    params(("resource" = MasterResource, Path, description = "Master resource")),
    request_body = MasterRecord,
    responses(
        (status = 201, description = "Created row under `data`", body = MasterRecord),
        (status = 400, description = "Bad request", body = ErrorBody)
    )
)]
/// Create a master row
#[axum::debug_handler]
pub async fn create_master(
    State(state): State<AppState>,
    ApiPath(resource): ApiPath<MasterResource>,
    token: Result<BearerToken, AuthError>,
    actor: Actor,
    ApiJson(body): ApiJson<Value>,
) -> ApiResult<(StatusCode, Json<Envelope<MasterRecord>>)> {
    let repo = repository(&state, resource, token)?;
    let record = MasterRecord::from_value(body)?.without_derived();
    create_record(&*repo, record, actor.as_str()).await
}

#[utoipa::path(
    put,
    path = "/api/apps/lims/master/{resource}/{id}",
    params(
        ("resource" = MasterResource, Path, description = "Master resource"),
        ("id" = String, Path, description = "Row id")
    ),
    request_body(content = Object, description = "Row fields plus a non-empty `reason`"),
    responses(
        (status = 200, description = "Updated row under `data`", body = MasterRecord),
        (status = 400, description = "Missing reason or invalid body", body = ErrorBody)
    )
)]
/// Update a master row; the body must carry a non-empty `reason`
#[axum::debug_handler]
pub async fn update_master(
    State(state): State<AppState>,
    ApiPath((resource, id)): ApiPath<(MasterResource, String)>,
    token: Result<BearerToken, AuthError>,
    actor: Actor,
    ApiJson(body): ApiJson<Value>,
) -> ApiResult<Json<Envelope<MasterRecord>>> {
    let repo = repository(&state, resource, token)?;
    let body = MasterRecord::from_value(body)?.without_derived().into_value();
    update_record(&*repo, id, body, actor.as_str()).await
}

#[utoipa::path(
    delete,
    path = "/api/apps/lims/master/{resource}/{id}",
    params(
        ("resource" = MasterResource, Path, description = "Master resource"),
        ("id" = String, Path, description = "Row id"),
        ReasonParams
    ),
    responses(
        (status = 200, description = "Deleted"),
        (status = 400, description = "Missing reason", body = ErrorBody)
    )
)]
/// Delete a master row; `?reason=` is required
#[axum::debug_handler]
pub async fn delete_master(
    State(state): State<AppState>,
    ApiPath((resource, id)): ApiPath<(MasterResource, String)>,
    token: Result<BearerToken, AuthError>,
    actor: Actor,
    ApiQuery(params): ApiQuery<ReasonParams>,
) -> ApiResult<Json<Envelope<()>>> {
    let repo = repository(&state, resource, token)?;
    delete_record::<MasterRecord, _>(&*repo, id, params.reason, actor.as_str()).await
}
