pub mod admin;
pub mod auth;
pub mod common;
pub mod inventory;
pub mod products;
pub mod promotions;
pub mod reports;
pub mod sales;

use crate::{
    config::AppConfig,
    db::DbPool,
    errors::ServiceError,
    events::EventSender,
    services::{
        admin::AdminService, auth::AuthService, inventory::InventoryService,
        products::ProductService, promotions::PromotionService, reports::ReportsService,
        sales::SalesService,
    },
};
use std::sync::Arc;
use subtle::ConstantTimeEq;

/// Everything the handlers need, shared as router state.
#[derive(Clone)]
pub struct AppServices {
    pub db: Arc<DbPool>,
    pub config: Arc<AppConfig>,
    pub inventory: InventoryService,
    pub sales: SalesService,
    pub reports: ReportsService,
    pub products: ProductService,
    pub promotions: PromotionService,
    pub auth: AuthService,
    pub admin: AdminService,
}

impl AppServices {
    pub fn new(db: Arc<DbPool>, event_sender: EventSender, config: Arc<AppConfig>) -> Self {
        Self {
            db: db.clone(),
            config,
            inventory: InventoryService::new(db.clone(), event_sender.clone()),
            sales: SalesService::new(db.clone(), event_sender.clone()),
            reports: ReportsService::new(db.clone()),
            products: ProductService::new(db.clone()),
            promotions: PromotionService::new(db.clone()),
            auth: AuthService::new(db.clone()),
            admin: AdminService::new(db, event_sender),
        }
    }
}

/// Gate for destructive endpoints. Forbidden when no admin password is
/// configured at all, unauthorized when the supplied one does not match.
/// The comparison is constant-time so response timing leaks nothing about
/// how much of the password matched.
pub(crate) fn require_admin_password(
    config: &AppConfig,
    supplied: &str,
) -> Result<(), ServiceError> {
    match config.admin_password.as_deref() {
        None => Err(ServiceError::Forbidden(
            "administrative actions are disabled".into(),
        )),
        Some(expected) if bool::from(expected.as_bytes().ct_eq(supplied.as_bytes())) => Ok(()),
        Some(_) => Err(ServiceError::Unauthorized("invalid admin password".into())),
    }
}
