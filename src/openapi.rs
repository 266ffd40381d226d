use crate::handlers;
use axum::{response::Json, routing::get, Router};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "cantina-api",
        description = "Inventory ledger, sales and reporting backend for a small restaurant"
    ),
    paths(
        handlers::inventory::create_stock_item,
        handlers::inventory::list_stock_items,
        handlers::inventory::get_stock_item,
        handlers::inventory::delete_stock_item,
        handlers::inventory::record_entry,
        handlers::inventory::record_exit,
        handlers::inventory::list_movements,
        handlers::sales::record_sale,
        handlers::sales::list_today,
        handlers::sales::list_sales,
        handlers::sales::archive_today,
        handlers::reports::product_totals,
        handlers::reports::summary,
        handlers::reports::category_breakdown,
        handlers::products::create_product,
        handlers::products::list_products,
        handlers::products::get_product,
        handlers::products::update_product,
        handlers::products::delete_product,
        handlers::promotions::create_promotion,
        handlers::promotions::list_promotions,
        handlers::promotions::update_promotion,
        handlers::promotions::delete_promotion,
        handlers::auth::login,
        handlers::auth::create_user,
        handlers::admin::reset_transactional_data,
    ),
    components(schemas(
        crate::errors::ErrorResponse,
        crate::entities::sale::PaymentMethod,
        crate::services::inventory::MovementRecord,
        crate::services::inventory::StockItemView,
        crate::services::sales::SaleWithItems,
        crate::services::sales::SaleItemView,
        crate::services::reports::ProductTotals,
        crate::services::reports::PaymentMethodTotals,
        crate::services::reports::SalesSummary,
        crate::services::reports::CategoryTotals,
        crate::services::reports::MenuCategory,
        crate::services::admin::ResetOutcome,
        handlers::inventory::CreateStockItemRequest,
        handlers::inventory::MovementRequest,
        handlers::sales::CreateSaleRequest,
        handlers::sales::SaleItemRequest,
        handlers::sales::ArchiveRequest,
        handlers::sales::ArchiveResponse,
        handlers::products::CreateProductRequest,
        handlers::products::UpdateProductRequest,
        handlers::promotions::CreatePromotionRequest,
        handlers::promotions::UpdatePromotionRequest,
        handlers::auth::CredentialsRequest,
        handlers::auth::UserResponse,
        handlers::admin::ResetRequest,
    )),
    tags(
        (name = "stock", description = "Inventory ledger"),
        (name = "sales", description = "Sale recording and day archiving"),
        (name = "reports", description = "Aggregations over recorded sales"),
        (name = "products", description = "Menu catalog"),
        (name = "promotions", description = "Promotions"),
        (name = "auth", description = "Back-office users"),
        (name = "admin", description = "Destructive maintenance")
    )
)]
pub struct ApiDoc;

/// Serves the raw OpenAPI document.
pub fn routes<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route(
        "/api-docs/openapi.json",
        get(|| async { Json(ApiDoc::openapi()) }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_document_builds() {
        let doc = ApiDoc::openapi();
        let json = serde_json::to_string(&doc).unwrap();
        assert!(json.contains("/api/v1/stock"));
        assert!(json.contains("/api/v1/sales/archive"));
    }
}
