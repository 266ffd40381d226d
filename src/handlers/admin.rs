use crate::{
    errors::ServiceError,
    handlers::{common::success_response, require_admin_password, AppServices},
};
use axum::{extract::State, response::Response, routing::post, Json, Router};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

pub fn routes() -> Router<Arc<AppServices>> {
    Router::new().route("/reset", post(reset_transactional_data))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ResetRequest {
    pub password: String,
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/reset",
    request_body = ResetRequest,
    responses(
        (status = 200, description = "Sales and movements wiped, balances zeroed"),
        (status = 401, description = "Wrong admin password"),
        (status = 403, description = "Admin password not configured")
    ),
    tag = "admin"
)]
pub async fn reset_transactional_data(
    State(state): State<Arc<AppServices>>,
    Json(payload): Json<ResetRequest>,
) -> Result<Response, ServiceError> {
    require_admin_password(&state.config, &payload.password)?;
    let outcome = state.admin.reset_transactional_data().await?;
    Ok(success_response(outcome))
}
