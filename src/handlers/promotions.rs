use crate::{
    errors::ServiceError,
    handlers::{
        common::{created_response, no_content_response, success_response, validate_input},
        AppServices,
    },
    services::promotions::{NewPromotion, PromotionUpdate},
};
use axum::{
    extract::{Path, Query, State},
    response::Response,
    routing::{post, put},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

pub fn routes() -> Router<Arc<AppServices>> {
    Router::new()
        .route("/", post(create_promotion).get(list_promotions))
        .route("/:id", put(update_promotion).delete(delete_promotion))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePromotionRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    pub discount: Decimal,
    pub active: Option<bool>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdatePromotionRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    pub discount: Option<Decimal>,
    pub active: Option<bool>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct PromotionFilter {
    /// When true, only promotions currently switched on.
    pub active: Option<bool>,
}

#[utoipa::path(
    post,
    path = "/api/v1/promotions",
    request_body = CreatePromotionRequest,
    responses(
        (status = 201, description = "Promotion created"),
        (status = 400, description = "Invalid input")
    ),
    tag = "promotions"
)]
pub async fn create_promotion(
    State(state): State<Arc<AppServices>>,
    Json(payload): Json<CreatePromotionRequest>,
) -> Result<Response, ServiceError> {
    validate_input(&payload)?;

    let promotion = state
        .promotions
        .create_promotion(NewPromotion {
            title: payload.title,
            description: payload.description,
            discount: payload.discount,
            active: payload.active,
        })
        .await?;

    Ok(created_response(promotion))
}

#[utoipa::path(
    get,
    path = "/api/v1/promotions",
    params(PromotionFilter),
    responses((status = 200, description = "Promotions, newest first")),
    tag = "promotions"
)]
pub async fn list_promotions(
    State(state): State<Arc<AppServices>>,
    Query(filter): Query<PromotionFilter>,
) -> Result<Response, ServiceError> {
    let promotions = if filter.active.unwrap_or(false) {
        state.promotions.list_active_promotions().await?
    } else {
        state.promotions.list_promotions().await?
    };
    Ok(success_response(promotions))
}

#[utoipa::path(
    put,
    path = "/api/v1/promotions/{id}",
    params(("id" = i64, Path, description = "Promotion id")),
    request_body = UpdatePromotionRequest,
    responses(
        (status = 200, description = "Updated promotion"),
        (status = 400, description = "Invalid or empty update"),
        (status = 404, description = "Unknown promotion")
    ),
    tag = "promotions"
)]
pub async fn update_promotion(
    State(state): State<Arc<AppServices>>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdatePromotionRequest>,
) -> Result<Response, ServiceError> {
    validate_input(&payload)?;

    let promotion = state
        .promotions
        .update_promotion(
            id,
            PromotionUpdate {
                title: payload.title,
                description: payload.description.map(Some),
                discount: payload.discount,
                active: payload.active,
            },
        )
        .await?;

    Ok(success_response(promotion))
}

#[utoipa::path(
    delete,
    path = "/api/v1/promotions/{id}",
    params(("id" = i64, Path, description = "Promotion id")),
    responses(
        (status = 204, description = "Promotion removed"),
        (status = 404, description = "Unknown promotion")
    ),
    tag = "promotions"
)]
pub async fn delete_promotion(
    State(state): State<Arc<AppServices>>,
    Path(id): Path<i64>,
) -> Result<Response, ServiceError> {
    state.promotions.delete_promotion(id).await?;
    Ok(no_content_response())
}
