//! Route handlers, grouped by screen.
//!
//! Handlers for rows owned by the laboratory API require a bearer token and forward it. The
//! in-memory modules need no token; their writes are attributed to the `X-Lims-User` actor.

pub mod accreditation;
pub mod audit;
pub mod auto_approval;
pub mod health;
pub mod master;
pub mod personal;
pub mod receive;
pub mod requisitions;
pub mod samples;
pub mod test_results;

use axum::http::StatusCode;
use axum::Json;
use api_shared::Envelope;
use lims_core::{Mutation, Record, Repository};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::IntoParams;

use crate::error::ApiError;
use crate::extract::split_reason;

pub type ApiResult<T> = Result<T, ApiError>;

pub const CREATED_MESSAGE: &str = "Created successfully";
pub const UPDATED_MESSAGE: &str = "Updated successfully";
pub const DELETED_MESSAGE: &str = "Deleted successfully";

/// Reason carried on the query string of a delete.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReasonParams {
    /// Non-empty justification for the deletion.
    pub reason: Option<String>,
}

/// Body of a reason-only action such as cancelling a requisition.
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct ReasonBody {
    #[serde(default)]
    pub reason: Option<String>,
}

pub(crate) async fn list_records<T, R>(repo: &R) -> ApiResult<Json<Envelope<Vec<T>>>>
where
    T: Record + Serialize,
    R: Repository<T> + ?Sized,
{
    let rows = repo.list().await.map_err(|e| {
        tracing::error!("List {} error: {:?}", T::KIND, e);
        ApiError::from(e)
    })?;
    Ok(Json(Envelope::ok(rows)))
}

pub(crate) async fn create_record<T, R>(
    repo: &R,
    record: T,
    actor: &str,
) -> ApiResult<(StatusCode, Json<Envelope<T>>)>
where
    T: Record + Serialize,
    R: Repository<T> + ?Sized,
{
    let applied = repo.apply(Mutation::Create(record), actor).await.map_err(|e| {
        tracing::error!("Create {} error: {:?}", T::KIND, e);
        ApiError::from(e)
    })?;
    let created = applied.into_record().ok_or(ApiError::Internal)?;
    Ok((
        StatusCode::CREATED,
        Json(Envelope::with_message(created, CREATED_MESSAGE)),
    ))
}

/// Applies an update body `{ ...payload, reason }`.
///
/// The reason is checked first; a blank reason never reaches the repository.
pub(crate) async fn update_record<T, R>(
    repo: &R,
    id: String,
    body: Value,
    actor: &str,
) -> ApiResult<Json<Envelope<T>>>
where
    T: Record + Serialize + DeserializeOwned,
    R: Repository<T> + ?Sized,
{
    let (payload, reason) = split_reason(body)?;
    let reason = lims_core::Reason::parse(reason.as_deref().unwrap_or_default())?;
    let payload: T = serde_json::from_value(Value::Object(payload))
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let mutation = Mutation::Update {
        id,
        payload,
        reason,
    };
    let applied = repo.apply(mutation, actor).await.map_err(|e| {
        tracing::error!("Update {} error: {:?}", T::KIND, e);
        ApiError::from(e)
    })?;
    let updated = applied.into_record().ok_or(ApiError::Internal)?;
    Ok(Json(Envelope::with_message(updated, UPDATED_MESSAGE)))
}

pub(crate) async fn delete_record<T, R>(
    repo: &R,
    id: String,
    reason: Option<String>,
    actor: &str,
) -> ApiResult<Json<Envelope<()>>>
where
    T: Record,
    R: Repository<T> + ?Sized,
{
    let mutation = Mutation::<T>::delete(id, reason.as_deref().unwrap_or_default())?;
    repo.apply(mutation, actor).await.map_err(|e| {
        tracing::error!("Delete {} error: {:?}", T::KIND, e);
        ApiError::from(e)
    })?;
    Ok(Json(Envelope::done(DELETED_MESSAGE)))
}
