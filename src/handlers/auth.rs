use crate::{
    errors::ServiceError,
    handlers::{
        common::{created_response, success_response, validate_input},
        AppServices,
    },
};
use axum::{extract::State, response::Response, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use validator::Validate;

pub fn routes() -> Router<Arc<AppServices>> {
    Router::new()
        .route("/login", post(login))
        .route("/users", post(create_user))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CredentialsRequest {
    #[validate(length(min = 1, max = 100))]
    pub username: String,
    #[validate(length(min = 1, max = 200))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Credentials accepted", body = UserResponse),
        (status = 401, description = "Unknown user or wrong password")
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<Arc<AppServices>>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<Response, ServiceError> {
    validate_input(&payload)?;
    let user = state.auth.login(&payload.username, &payload.password).await?;
    Ok(success_response(UserResponse {
        id: user.id,
        username: user.username,
    }))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/users",
    request_body = CredentialsRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Username already taken")
    ),
    tag = "auth"
)]
pub async fn create_user(
    State(state): State<Arc<AppServices>>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<Response, ServiceError> {
    validate_input(&payload)?;
    let user = state
        .auth
        .create_user(&payload.username, &payload.password)
        .await?;
    Ok(created_response(UserResponse {
        id: user.id,
        username: user.username,
    }))
}
