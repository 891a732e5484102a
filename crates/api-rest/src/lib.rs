//! # API REST
//!
//! REST surface of the LIMS gateway.
//!
//! Handles:
//! - HTTP endpoints with axum, all under `/api/apps/lims`
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON envelopes, error mapping, CORS, request tracing)
//!
//! Uses `api-shared` for auth primitives and envelopes, and `lab-client` for upstream calls.

#![warn(rust_2018_idioms)]

pub mod error;
pub mod extract;
pub mod handlers;
pub mod state;

use axum::routing::{get, post, put};
use axum::Router;
use lims_core::config::{
    api_base_url_from_env_values, page_size_from_env_value, rest_addr_from_env_value,
    upstream_timeout_from_env_value,
};
use lims_core::LimsConfig;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use handlers::{
    accreditation, audit, auto_approval, health, master, personal, receive, requisitions,
    samples, test_results,
};

pub use error::ApiError;
pub use state::AppState;

/// Prefix shared by every service route.
pub const ROUTE_PREFIX: &str = "/api/apps/lims";

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        master::list_master,
        master::get_master,
        master::create_master,
        master::update_master,
        master::delete_master,
        receive::list_received,
        receive::update_status,
        receive::update_remark,
        receive::print_barcode,
        receive::download,
        test_results::list_results,
        test_results::update_status,
        test_results::update_remark,
        personal::permissions,
        personal::duty_delegation,
        personal::set_study,
        samples::list_samples,
        samples::create_sample,
        samples::update_sample,
        samples::delete_sample,
        samples::export_samples,
        samples::send,
        requisitions::list_requisitions,
        requisitions::create_requisition,
        requisitions::approve,
        requisitions::cancel,
        auto_approval::list_rules,
        auto_approval::create_rule,
        auto_approval::update_rule,
        auto_approval::delete_rule,
        accreditation::list_accreditation,
        accreditation::create_accreditation,
        accreditation::update_accreditation,
        audit::audit_trail,
    ),
    components(schemas(
        api_shared::HealthRes,
        api_shared::ErrorBody,
        handlers::ReasonBody,
        samples::SamplePage,
        lims_core::models::MasterResource,
        lims_core::models::MasterRecord,
        lims_core::models::ReceiveStatusChange,
        lims_core::models::RemarkUpdate,
        lims_core::models::BarcodeRequest,
        lims_core::models::ExportFormat,
        lims_core::models::TestResult,
        lims_core::models::ResultStatusChange,
        lims_core::models::TestResultQuery,
        lims_core::models::Sample,
        lims_core::models::SampleRow,
        lims_core::models::SampleSendRequest,
        lims_core::models::SentSample,
        lims_core::models::Requisition,
        lims_core::models::RequisitionRow,
        lims_core::models::AutoApprovalRule,
        lims_core::models::AccreditationBody,
        lims_core::models::AccreditationTest,
        lims_core::models::AccreditationDetail,
        lims_core::models::AuditEntry,
        lims_core::StatusChip,
        lims_core::ChipColor,
        lims_core::RowAction,
    ))
)]
pub struct ApiDoc;

fn service_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route(
            "/master/:resource",
            get(master::list_master).post(master::create_master),
        )
        .route(
            "/master/:resource/:id",
            get(master::get_master)
                .put(master::update_master)
                .delete(master::delete_master),
        )
        .route("/receive", get(receive::list_received))
        .route("/receive/update-status", put(receive::update_status))
        .route("/receive/update-remark", put(receive::update_remark))
        .route("/receive/print-barcode", post(receive::print_barcode))
        .route("/receive/download", post(receive::download))
        .route("/test-results", get(test_results::list_results))
        .route("/test-results/update-status", put(test_results::update_status))
        .route("/test-results/update-remark", put(test_results::update_remark))
        .route("/personal/permissions", get(personal::permissions))
        .route("/personal/duty-delegation", get(personal::duty_delegation))
        .route("/personal/set-study", post(personal::set_study))
        .route(
            "/sample-registration",
            get(samples::list_samples).post(samples::create_sample),
        )
        .route("/sample-registration/export", get(samples::export_samples))
        .route(
            "/sample-registration/:id",
            put(samples::update_sample).delete(samples::delete_sample),
        )
        .route("/sample-send", post(samples::send))
        .route(
            "/requisitions",
            get(requisitions::list_requisitions).post(requisitions::create_requisition),
        )
        .route("/requisitions/:id/approve", post(requisitions::approve))
        .route("/requisitions/:id/cancel", post(requisitions::cancel))
        .route(
            "/auto-approval",
            get(auto_approval::list_rules).post(auto_approval::create_rule),
        )
        .route(
            "/auto-approval/:id",
            put(auto_approval::update_rule).delete(auto_approval::delete_rule),
        )
        .route(
            "/accreditation",
            get(accreditation::list_accreditation).post(accreditation::create_accreditation),
        )
        .route(
            "/accreditation/:id",
            put(accreditation::update_accreditation),
        )
        .route("/audit-trail/:record_id", get(audit::audit_trail))
}

/// Builds the full application: service routes, Swagger UI, CORS and request tracing.
pub fn router(state: AppState) -> Router {
    Router::new()
        .nest(ROUTE_PREFIX, service_routes())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Resolves [`LimsConfig`] from the process environment.
///
/// # Environment Variables
/// - `LIMS_API_URL` (fallback `NEXT_PUBLIC_API_URL`): upstream base URL, required
/// - `LIMS_REST_ADDR`: listen address (default: "0.0.0.0:3000")
/// - `LIMS_UPSTREAM_TIMEOUT_SECS`: upstream timeout, `0` disables (default: 30)
/// - `LIMS_PAGE_SIZE`: list page size (default: 10)
///
/// # Errors
///
/// Returns an error if any variable is present but malformed, or no upstream URL is set.
pub fn config_from_env() -> anyhow::Result<LimsConfig> {
    let api_base_url = api_base_url_from_env_values(
        std::env::var("LIMS_API_URL").ok(),
        std::env::var("NEXT_PUBLIC_API_URL").ok(),
    )?;
    let rest_addr = rest_addr_from_env_value(std::env::var("LIMS_REST_ADDR").ok())?;
    let upstream_timeout =
        upstream_timeout_from_env_value(std::env::var("LIMS_UPSTREAM_TIMEOUT_SECS").ok())?;
    let page_size = page_size_from_env_value(std::env::var("LIMS_PAGE_SIZE").ok())?;

    Ok(LimsConfig::new(
        api_base_url,
        rest_addr,
        upstream_timeout,
        page_size,
    )?)
}
