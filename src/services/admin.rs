use crate::{
    db::DbPool,
    entities::{
        sale::Entity as Sales, sale_item::Entity as SaleItems, stock_item,
        stock_item::Entity as StockItems, stock_movement::Entity as StockMovements,
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::unwrap_transaction_error,
};
use rust_decimal::Decimal;
use sea_orm::{sea_query::Expr, EntityTrait, TransactionTrait};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;

/// Row counts touched by a transactional-data reset.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ResetOutcome {
    pub sales_removed: u64,
    pub sale_items_removed: u64,
    pub movements_removed: u64,
    pub items_zeroed: u64,
}

/// Destructive maintenance operations. Every caller must already have been
/// authorized by the handler layer.
#[derive(Clone)]
pub struct AdminService {
    db: Arc<DbPool>,
    event_sender: EventSender,
}

impl AdminService {
    pub fn new(db: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    /// Wipes sales, sale items and the movement log, and zeroes every stock
    /// balance, all in one transaction. Item definitions, the product
    /// catalog, promotions and users survive.
    #[instrument(skip(self))]
    pub async fn reset_transactional_data(&self) -> Result<ResetOutcome, ServiceError> {
        let outcome = self
            .db
            .transaction::<_, ResetOutcome, ServiceError>(|txn| {
                Box::pin(async move {
                    let sale_items = SaleItems::delete_many().exec(txn).await?;
                    let sales = Sales::delete_many().exec(txn).await?;
                    let movements = StockMovements::delete_many().exec(txn).await?;
                    let items = StockItems::update_many()
                        .col_expr(
                            stock_item::Column::CurrentBalance,
                            Expr::value(Decimal::ZERO),
                        )
                        .exec(txn)
                        .await?;

                    Ok(ResetOutcome {
                        sales_removed: sales.rows_affected,
                        sale_items_removed: sale_items.rows_affected,
                        movements_removed: movements.rows_affected,
                        items_zeroed: items.rows_affected,
                    })
                })
            })
            .await
            .map_err(unwrap_transaction_error)?;

        info!(
            sales_removed = outcome.sales_removed,
            movements_removed = outcome.movements_removed,
            "transactional data reset"
        );
        if let Err(err) = self.event_sender.send(Event::TransactionalDataReset).await {
            warn!(error = %err, "failed to publish domain event");
        }

        Ok(outcome)
    }
}
