use crate::{
    errors::ServiceError,
    handlers::{
        common::{created_response, no_content_response, success_response, validate_input},
        AppServices,
    },
    services::products::{NewProduct, ProductUpdate},
};
use axum::{
    extract::{Path, State},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use validator::Validate;

pub fn routes() -> Router<Arc<AppServices>> {
    Router::new()
        .route("/", post(create_product).get(list_products))
        .route(
            "/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub price: Decimal,
    #[validate(length(max = 100))]
    pub category: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub price: Option<Decimal>,
    #[validate(length(max = 100))]
    pub category: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/v1/products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created"),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Product name already taken")
    ),
    tag = "products"
)]
pub async fn create_product(
    State(state): State<Arc<AppServices>>,
    Json(payload): Json<CreateProductRequest>,
) -> Result<Response, ServiceError> {
    validate_input(&payload)?;

    let product = state
        .products
        .create_product(NewProduct {
            name: payload.name,
            price: payload.price,
            category: payload.category.unwrap_or_default(),
        })
        .await?;

    Ok(created_response(product))
}

#[utoipa::path(
    get,
    path = "/api/v1/products",
    responses((status = 200, description = "All products, grouped by category")),
    tag = "products"
)]
pub async fn list_products(State(state): State<Arc<AppServices>>) -> Result<Response, ServiceError> {
    let products = state.products.list_products().await?;
    Ok(success_response(products))
}

#[utoipa::path(
    get,
    path = "/api/v1/products/{id}",
    params(("id" = i64, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product"),
        (status = 404, description = "Unknown product")
    ),
    tag = "products"
)]
pub async fn get_product(
    State(state): State<Arc<AppServices>>,
    Path(id): Path<i64>,
) -> Result<Response, ServiceError> {
    let product = state.products.get_product(id).await?;
    Ok(success_response(product))
}

#[utoipa::path(
    put,
    path = "/api/v1/products/{id}",
    params(("id" = i64, Path, description = "Product id")),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Updated product"),
        (status = 400, description = "Invalid or empty update"),
        (status = 404, description = "Unknown product"),
        (status = 409, description = "Product name already taken")
    ),
    tag = "products"
)]
pub async fn update_product(
    State(state): State<Arc<AppServices>>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateProductRequest>,
) -> Result<Response, ServiceError> {
    validate_input(&payload)?;

    let product = state
        .products
        .update_product(
            id,
            ProductUpdate {
                name: payload.name,
                price: payload.price,
                category: payload.category,
            },
        )
        .await?;

    Ok(success_response(product))
}

#[utoipa::path(
    delete,
    path = "/api/v1/products/{id}",
    params(("id" = i64, Path, description = "Product id")),
    responses(
        (status = 204, description = "Product removed"),
        (status = 404, description = "Unknown product")
    ),
    tag = "products"
)]
pub async fn delete_product(
    State(state): State<Arc<AppServices>>,
    Path(id): Path<i64>,
) -> Result<Response, ServiceError> {
    state.products.delete_product(id).await?;
    Ok(no_content_response())
}
