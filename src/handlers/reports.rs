use crate::{
    errors::ServiceError,
    handlers::{common::success_response, AppServices},
};
use axum::{
    extract::{Query, State},
    response::Response,
    routing::get,
    Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;

pub fn routes() -> Router<Arc<AppServices>> {
    Router::new()
        .route("/products", get(product_totals))
        .route("/summary", get(summary))
        .route("/categories", get(category_breakdown))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ReportRangeQuery {
    /// Inclusive start date (defaults to the first day of the current month).
    pub from: Option<NaiveDate>,
    /// Inclusive end date (defaults to today).
    pub to: Option<NaiveDate>,
}

#[utoipa::path(
    get,
    path = "/api/v1/reports/products",
    params(ReportRangeQuery),
    responses((status = 200, description = "Per-product totals, best sellers first")),
    tag = "reports"
)]
pub async fn product_totals(
    State(state): State<Arc<AppServices>>,
    Query(range): Query<ReportRangeQuery>,
) -> Result<Response, ServiceError> {
    let totals = state.reports.product_totals(range.from, range.to).await?;
    Ok(success_response(totals))
}

#[utoipa::path(
    get,
    path = "/api/v1/reports/summary",
    params(ReportRangeQuery),
    responses((status = 200, description = "Headline totals and per-payment-method breakdown")),
    tag = "reports"
)]
pub async fn summary(
    State(state): State<Arc<AppServices>>,
    Query(range): Query<ReportRangeQuery>,
) -> Result<Response, ServiceError> {
    let summary = state.reports.summary(range.from, range.to).await?;
    Ok(success_response(summary))
}

#[utoipa::path(
    get,
    path = "/api/v1/reports/categories",
    params(ReportRangeQuery),
    responses((status = 200, description = "Totals folded into menu categories")),
    tag = "reports"
)]
pub async fn category_breakdown(
    State(state): State<Arc<AppServices>>,
    Query(range): Query<ReportRangeQuery>,
) -> Result<Response, ServiceError> {
    let breakdown = state
        .reports
        .category_breakdown(range.from, range.to)
        .await?;
    Ok(success_response(breakdown))
}
