//! Current-user routes: navigation permissions, duty delegation and study context.

use api_shared::{BearerToken, ErrorBody};
use axum::extract::State;
use axum::response::Json;
use serde::Deserialize;
use serde_json::Value;
use utoipa::IntoParams;

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiQuery};
use crate::handlers::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PermissionParams {
    #[serde(rename = "userTypeId")]
    pub user_type_id: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/apps/lims/personal/permissions",
    params(PermissionParams),
    responses(
        (status = 200, description = "Permissions as returned upstream", body = Object),
        (status = 400, description = "Missing userTypeId", body = ErrorBody)
    )
)]
/// Navigation permissions for a user type
#[axum::debug_handler]
pub async fn permissions(
    State(state): State<AppState>,
    token: BearerToken,
    ApiQuery(params): ApiQuery<PermissionParams>,
) -> ApiResult<Json<Value>> {
    let user_type_id = params
        .user_type_id
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::BadRequest("userTypeId is required".into()))?;
    let body = state.lab.permissions(token.as_str(), user_type_id).await?;
    Ok(Json(body))
}

#[utoipa::path(
    get,
    path = "/api/apps/lims/personal/duty-delegation",
    responses(
        (status = 200, description = "Delegations as returned upstream", body = Object),
        (status = 401, description = "No session or access token", body = ErrorBody)
    )
)]
/// Duty delegations of the current user
#[axum::debug_handler]
pub async fn duty_delegation(
    State(state): State<AppState>,
    token: BearerToken,
) -> ApiResult<Json<Value>> {
    let body = state.lab.duty_delegation(token.as_str()).await?;
    Ok(Json(body))
}

#[utoipa::path(
    post,
    path = "/api/apps/lims/personal/set-study",
    request_body(content = Object, description = "Study context to switch to"),
    responses(
        (status = 200, description = "Upstream acknowledgement", body = Object),
        (status = 400, description = "Body is not an object", body = ErrorBody)
    )
)]
/// Switch the current study context
#[axum::debug_handler]
pub async fn set_study(
    State(state): State<AppState>,
    token: BearerToken,
    ApiJson(body): ApiJson<Value>,
) -> ApiResult<Json<Value>> {
    if !body.is_object() {
        return Err(ApiError::BadRequest(
            "request body must be a JSON object".into(),
        ));
    }
    let ack = state.lab.set_study(token.as_str(), &body).await?;
    Ok(Json(ack))
}
