use crate::{
    errors::ServiceError,
    handlers::{
        common::{created_response, no_content_response, success_response, validate_input},
        AppServices,
    },
    services::inventory::{NewStockItem, StockItemView},
};
use axum::{
    extract::{Path, Query, State},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

pub fn routes() -> Router<Arc<AppServices>> {
    Router::new()
        .route("/", post(create_stock_item).get(list_stock_items))
        .route("/movements", get(list_movements))
        .route("/:id", get(get_stock_item).delete(delete_stock_item))
        .route("/:id/entries", post(record_entry))
        .route("/:id/exits", post(record_exit))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateStockItemRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 20))]
    pub unit: String,
    pub initial_balance: Option<Decimal>,
    pub minimum_threshold: Option<Decimal>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct MovementRequest {
    pub quantity: Decimal,
    #[validate(length(max = 500))]
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct MovementFilter {
    /// Restrict the history to a single stock item.
    pub item_id: Option<i64>,
}

#[utoipa::path(
    post,
    path = "/api/v1/stock",
    request_body = CreateStockItemRequest,
    responses(
        (status = 201, description = "Stock item created", body = StockItemView),
        (status = 400, description = "Invalid input")
    ),
    tag = "stock"
)]
pub async fn create_stock_item(
    State(state): State<Arc<AppServices>>,
    Json(payload): Json<CreateStockItemRequest>,
) -> Result<Response, ServiceError> {
    validate_input(&payload)?;

    let item = state
        .inventory
        .create_item(NewStockItem {
            name: payload.name,
            unit: payload.unit,
            initial_balance: payload.initial_balance,
            minimum_threshold: payload.minimum_threshold,
        })
        .await?;

    Ok(created_response(StockItemView::from(item)))
}

#[utoipa::path(
    get,
    path = "/api/v1/stock",
    responses((status = 200, description = "All stock items, sorted by name", body = [StockItemView])),
    tag = "stock"
)]
pub async fn list_stock_items(
    State(state): State<Arc<AppServices>>,
) -> Result<Response, ServiceError> {
    let items = state.inventory.list_items().await?;
    let views: Vec<StockItemView> = items.into_iter().map(StockItemView::from).collect();
    Ok(success_response(views))
}

#[utoipa::path(
    get,
    path = "/api/v1/stock/{id}",
    params(("id" = i64, Path, description = "Stock item id")),
    responses(
        (status = 200, description = "Stock item", body = StockItemView),
        (status = 404, description = "Unknown stock item")
    ),
    tag = "stock"
)]
pub async fn get_stock_item(
    State(state): State<Arc<AppServices>>,
    Path(id): Path<i64>,
) -> Result<Response, ServiceError> {
    let item = state.inventory.get_item(id).await?;
    Ok(success_response(StockItemView::from(item)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/stock/{id}",
    params(("id" = i64, Path, description = "Stock item id")),
    responses(
        (status = 204, description = "Item and its movement history removed"),
        (status = 404, description = "Unknown stock item")
    ),
    tag = "stock"
)]
pub async fn delete_stock_item(
    State(state): State<Arc<AppServices>>,
    Path(id): Path<i64>,
) -> Result<Response, ServiceError> {
    state.inventory.delete_item(id).await?;
    Ok(no_content_response())
}

#[utoipa::path(
    post,
    path = "/api/v1/stock/{id}/entries",
    params(("id" = i64, Path, description = "Stock item id")),
    request_body = MovementRequest,
    responses(
        (status = 200, description = "Updated stock item", body = StockItemView),
        (status = 400, description = "Invalid quantity"),
        (status = 404, description = "Unknown stock item")
    ),
    tag = "stock"
)]
pub async fn record_entry(
    State(state): State<Arc<AppServices>>,
    Path(id): Path<i64>,
    Json(payload): Json<MovementRequest>,
) -> Result<Response, ServiceError> {
    validate_input(&payload)?;
    let item = state
        .inventory
        .record_entry(id, payload.quantity, payload.reason)
        .await?;
    Ok(success_response(StockItemView::from(item)))
}

#[utoipa::path(
    post,
    path = "/api/v1/stock/{id}/exits",
    params(("id" = i64, Path, description = "Stock item id")),
    request_body = MovementRequest,
    responses(
        (status = 200, description = "Updated stock item", body = StockItemView),
        (status = 400, description = "Invalid quantity"),
        (status = 404, description = "Unknown stock item"),
        (status = 422, description = "Insufficient stock")
    ),
    tag = "stock"
)]
pub async fn record_exit(
    State(state): State<Arc<AppServices>>,
    Path(id): Path<i64>,
    Json(payload): Json<MovementRequest>,
) -> Result<Response, ServiceError> {
    validate_input(&payload)?;
    let item = state
        .inventory
        .record_exit(id, payload.quantity, payload.reason)
        .await?;
    Ok(success_response(StockItemView::from(item)))
}

#[utoipa::path(
    get,
    path = "/api/v1/stock/movements",
    params(MovementFilter),
    responses((status = 200, description = "Movement history, newest first")),
    tag = "stock"
)]
pub async fn list_movements(
    State(state): State<Arc<AppServices>>,
    Query(filter): Query<MovementFilter>,
) -> Result<Response, ServiceError> {
    let movements = state.inventory.list_movements(filter.item_id).await?;
    Ok(success_response(movements))
}
