//! Sample registration and dispatch, kept in memory.

use api_shared::{Actor, Envelope, ErrorBody};
use axum::extract::State;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use lims_core::constants::SAMPLE_SENT_MESSAGE;
use lims_core::models::{Sample, SampleRow, SampleSendRequest, SentSample};
use lims_core::repositories::send_samples;
use lims_core::{ListView, Repository};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::handlers::{
    create_record, delete_record, update_record, ApiResult, ReasonParams,
};
use crate::state::AppState;

/// Filter, sort and page controls for the registration table.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SampleListParams {
    /// Fuzzy filter applied to every column.
    pub q: Option<String>,
    /// Column header to sort by, e.g. `Name`.
    pub sort: Option<String>,
    /// `asc` (default) or `desc`.
    pub order: Option<String>,
    /// Zero-based page index.
    pub page: Option<usize>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ExportParams {
    /// Accepted for parity with the table; the export always covers every loaded row.
    pub q: Option<String>,
}

/// One page of the registration table.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SamplePage {
    pub rows: Vec<SampleRow>,
    pub page: usize,
    pub page_size: usize,
    pub page_count: usize,
    /// Rows passing the filter, across all pages.
    pub total: usize,
}

#[utoipa::path(
    get,
    path = "/api/apps/lims/sample-registration",
    params(SampleListParams),
    responses(
        (status = 200, description = "One page of registered samples", body = SamplePage),
        (status = 400, description = "Unknown sort column", body = ErrorBody)
    )
)]
/// List registered samples
#[axum::debug_handler]
pub async fn list_samples(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<SampleListParams>,
) -> ApiResult<Json<Envelope<SamplePage>>> {
    let mut view: ListView<Sample> = ListView::with_page_size(state.page_size);
    if let Some(notice) = view.refresh(&*state.samples).await {
        tracing::warn!("{}", notice.message);
    }

    if let Some(q) = params.q {
        view.set_filter(q);
    }
    if let Some(column) = params.sort.as_deref() {
        view.sort_by(column)?;
        if params.order.as_deref() == Some("desc") {
            view.sort_by(column)?;
        }
    }
    view.set_page(params.page.unwrap_or_default());

    let page = SamplePage {
        rows: view
            .page_rows()
            .into_iter()
            .cloned()
            .map(SampleRow::from)
            .collect(),
        page: view.page(),
        page_size: view.page_size(),
        page_count: view.page_count(),
        total: view.visible().len(),
    };
    Ok(Json(Envelope::ok(page)))
}

#[utoipa::path(
    post,
    path = "/api/apps/lims/sample-registration",
    request_body = Sample,
    responses(
        (status = 201, description = "Registered sample under `data`", body = Sample),
        (status = 400, description = "Invalid sample", body = ErrorBody),
        (status = 409, description = "Duplicate sample id", body = ErrorBody)
    )
)]
/// Register a sample
#[axum::debug_handler]
pub async fn create_sample(
    State(state): State<AppState>,
    actor: Actor,
    ApiJson(sample): ApiJson<Sample>,
) -> ApiResult<(StatusCode, Json<Envelope<Sample>>)> {
    create_record(&*state.samples, sample, actor.as_str()).await
}

#[utoipa::path(
    put,
    path = "/api/apps/lims/sample-registration/{id}",
    params(("id" = String, Path, description = "Sample id")),
    request_body(content = Object, description = "Sample fields plus a non-empty `reason`"),
    responses(
        (status = 200, description = "Updated sample under `data`", body = Sample),
        (status = 400, description = "Missing reason or invalid body", body = ErrorBody),
        (status = 404, description = "Not found", body = ErrorBody)
    )
)]
/// Update a registered sample
#[axum::debug_handler]
pub async fn update_sample(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
    actor: Actor,
    ApiJson(body): ApiJson<Value>,
) -> ApiResult<Json<Envelope<Sample>>> {
    update_record(&*state.samples, id, body, actor.as_str()).await
}

#[utoipa::path(
    delete,
    path = "/api/apps/lims/sample-registration/{id}",
    params(("id" = String, Path, description = "Sample id"), ReasonParams),
    responses(
        (status = 200, description = "Deleted"),
        (status = 400, description = "Missing reason", body = ErrorBody),
        (status = 404, description = "Not found", body = ErrorBody)
    )
)]
/// Delete a registered sample
#[axum::debug_handler]
pub async fn delete_sample(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
    actor: Actor,
    ApiQuery(params): ApiQuery<ReasonParams>,
) -> ApiResult<Json<Envelope<()>>> {
    delete_record::<Sample, _>(&*state.samples, id, params.reason, actor.as_str()).await
}

#[utoipa::path(
    get,
    path = "/api/apps/lims/sample-registration/export",
    params(ExportParams),
    responses(
        (status = 200, description = "CSV of every registered sample", content_type = "text/csv")
    )
)]
/// Export every registered sample as CSV
#[axum::debug_handler]
pub async fn export_samples(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ExportParams>,
) -> ApiResult<Response> {
    let rows = state.samples.list().await?;
    let mut view: ListView<Sample> = ListView::with_page_size(state.page_size);
    view.load(rows);
    if let Some(q) = params.q {
        view.set_filter(q);
    }

    Ok((
        StatusCode::OK,
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                CONTENT_DISPOSITION,
                "attachment; filename=\"sample-registration.csv\"",
            ),
        ],
        view.export_csv(),
    )
        .into_response())
}

#[utoipa::path(
    post,
    path = "/api/apps/lims/sample-send",
    request_body = SampleSendRequest,
    responses(
        (status = 200, description = "One acknowledgement per distinct id", body = [SentSample]),
        (status = 400, description = "Missing or empty sampleIds", body = ErrorBody),
        (status = 409, description = "A registered sample cannot be sent", body = ErrorBody)
    )
)]
/// Dispatch samples to a laboratory
#[axum::debug_handler]
pub async fn send(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<SampleSendRequest>,
) -> ApiResult<Json<Envelope<Vec<SentSample>>>> {
    let sent = send_samples(&state.samples, &request).map_err(|e| {
        tracing::error!("Sample send error: {:?}", e);
        e
    })?;
    tracing::info!("sent {} sample(s) to {}", sent.len(), request.lab_id);
    Ok(Json(Envelope::with_message(sent, SAMPLE_SENT_MESSAGE)))
}
