use crate::{
    entities::sale::PaymentMethod,
    errors::ServiceError,
    handlers::{
        common::{created_response, success_response, validate_input},
        require_admin_password, AppServices,
    },
    services::sales::{NewSale, NewSaleItem},
};
use axum::{
    extract::{Query, State},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

pub fn routes() -> Router<Arc<AppServices>> {
    Router::new()
        .route("/", post(record_sale).get(list_sales))
        .route("/today", get(list_today))
        .route("/archive", post(archive_today))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SaleItemRequest {
    pub product_name: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateSaleRequest {
    #[validate(length(min = 1, max = 100))]
    pub id: String,
    pub sold_at: Option<DateTime<Utc>>,
    pub total: Decimal,
    pub payment_method: PaymentMethod,
    pub discount: Option<Decimal>,
    pub items: Vec<SaleItemRequest>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct SalesRangeQuery {
    /// Inclusive start date (defaults to the first day of the current month).
    pub from: Option<NaiveDate>,
    /// Inclusive end date (defaults to today).
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ArchiveRequest {
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ArchiveResponse {
    pub archived: u64,
}

#[utoipa::path(
    post,
    path = "/api/v1/sales",
    request_body = CreateSaleRequest,
    responses(
        (status = 201, description = "Sale recorded"),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Sale id already recorded")
    ),
    tag = "sales"
)]
pub async fn record_sale(
    State(state): State<Arc<AppServices>>,
    Json(payload): Json<CreateSaleRequest>,
) -> Result<Response, ServiceError> {
    validate_input(&payload)?;

    let sale = state
        .sales
        .record_sale(NewSale {
            id: payload.id,
            sold_at: payload.sold_at,
            total: payload.total,
            payment_method: payload.payment_method,
            discount: payload.discount,
            items: payload
                .items
                .into_iter()
                .map(|item| NewSaleItem {
                    product_name: item.product_name,
                    quantity: item.quantity,
                    unit_price: item.unit_price,
                })
                .collect(),
        })
        .await?;

    Ok(created_response(sale))
}

#[utoipa::path(
    get,
    path = "/api/v1/sales/today",
    responses((status = 200, description = "Active sales of the current day")),
    tag = "sales"
)]
pub async fn list_today(State(state): State<Arc<AppServices>>) -> Result<Response, ServiceError> {
    let sales = state.sales.list_today().await?;
    Ok(success_response(sales))
}

#[utoipa::path(
    get,
    path = "/api/v1/sales",
    params(SalesRangeQuery),
    responses(
        (status = 200, description = "Sales in the range, archived included"),
        (status = 400, description = "Invalid range")
    ),
    tag = "sales"
)]
pub async fn list_sales(
    State(state): State<Arc<AppServices>>,
    Query(range): Query<SalesRangeQuery>,
) -> Result<Response, ServiceError> {
    let sales = state.sales.list_range(range.from, range.to).await?;
    Ok(success_response(sales))
}

#[utoipa::path(
    post,
    path = "/api/v1/sales/archive",
    request_body = ArchiveRequest,
    responses(
        (status = 200, description = "Today's sales archived", body = ArchiveResponse),
        (status = 401, description = "Wrong admin password"),
        (status = 403, description = "Admin password not configured")
    ),
    tag = "sales"
)]
pub async fn archive_today(
    State(state): State<Arc<AppServices>>,
    Json(payload): Json<ArchiveRequest>,
) -> Result<Response, ServiceError> {
    require_admin_password(&state.config, &payload.password)?;
    let archived = state.sales.archive_today().await?;
    Ok(success_response(ArchiveResponse { archived }))
}
