//! Cantina API Library
//!
//! REST backend for a small restaurant back office: an inventory ledger,
//! sale recording with end-of-day archiving, sales reports, a menu catalog,
//! promotions and back-office users.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod migrator;
pub mod openapi;
pub mod services;

use axum::{extract::State, response::Json, routing::get, Router};
use handlers::AppServices;
use serde_json::{json, Value};
use std::sync::Arc;

/// Builds the full v1 API surface. The caller supplies the shared
/// `AppServices` state and wraps the router in its middleware layers.
pub fn api_v1_routes() -> Router<Arc<AppServices>> {
    Router::new()
        .route("/status", get(api_status))
        .route("/health", get(health_check))
        .nest("/stock", handlers::inventory::routes())
        .nest("/sales", handlers::sales::routes())
        .nest("/reports", handlers::reports::routes())
        .nest("/products", handlers::products::routes())
        .nest("/promotions", handlers::promotions::routes())
        .nest("/auth", handlers::auth::routes())
        .nest("/admin", handlers::admin::routes())
}

async fn api_status(State(state): State<Arc<AppServices>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "cantina-api",
        "version": env!("CARGO_PKG_VERSION"),
        "environment": state.config.environment,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

async fn health_check(State(state): State<Arc<AppServices>>) -> Json<Value> {
    let db_status = match state.db.ping().await {
        Ok(_) => "healthy",
        Err(_) => "unhealthy",
    };

    Json(json!({
        "status": db_status,
        "checks": {
            "database": db_status,
        },
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
