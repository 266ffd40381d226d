use crate::{
    db::DbPool,
    entities::{
        stock_item::{self, Entity as StockItems},
        stock_movement::{self, Entity as StockMovements, MovementKind},
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::unwrap_transaction_error,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, EntityTrait, FromQueryResult, JoinType,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;

/// Movement history reads are capped at the most recent entries.
pub const MOVEMENT_HISTORY_LIMIT: u64 = 1000;

/// Reason recorded on the seed movement created alongside a new item.
pub const INITIAL_STOCK_REASON: &str = "estoque inicial";

/// Payload for creating a stock item.
#[derive(Debug, Clone)]
pub struct NewStockItem {
    pub name: String,
    pub unit: String,
    pub initial_balance: Option<Decimal>,
    pub minimum_threshold: Option<Decimal>,
}

/// Movement log row enriched with the owning item's name (joined at query
/// time, never denormalized).
#[derive(Debug, Clone, PartialEq, FromQueryResult, Serialize, ToSchema)]
pub struct MovementRecord {
    pub id: i64,
    pub stock_item_id: i64,
    pub item_name: String,
    pub kind: String,
    pub quantity: Decimal,
    pub reason: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// Stock item as returned by the API, carrying the derived `low_stock`
/// flag so clients never re-implement the threshold comparison.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct StockItemView {
    pub id: i64,
    pub name: String,
    pub unit: String,
    pub current_balance: Decimal,
    pub minimum_threshold: Decimal,
    pub low_stock: bool,
    pub created_at: DateTime<Utc>,
}

impl From<stock_item::Model> for StockItemView {
    fn from(item: stock_item::Model) -> Self {
        Self {
            low_stock: item.is_low_stock(),
            id: item.id,
            name: item.name,
            unit: item.unit,
            current_balance: item.current_balance,
            minimum_threshold: item.minimum_threshold,
            created_at: item.created_at,
        }
    }
}

/// The inventory ledger. This service is the only path by which
/// `current_balance` changes, and every balance change commits in the same
/// transaction as its movement log entry.
#[derive(Clone)]
pub struct InventoryService {
    db: Arc<DbPool>,
    event_sender: EventSender,
}

impl InventoryService {
    pub fn new(db: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    /// Creates a stock item. A positive initial balance also seeds the
    /// movement log with an entry, in the same transaction as the insert.
    #[instrument(skip(self))]
    pub async fn create_item(&self, req: NewStockItem) -> Result<stock_item::Model, ServiceError> {
        let name = req.name.trim().to_owned();
        let unit = req.unit.trim().to_owned();
        if name.is_empty() {
            return Err(ServiceError::ValidationError("name is required".into()));
        }
        if unit.is_empty() {
            return Err(ServiceError::ValidationError("unit is required".into()));
        }

        let initial = req.initial_balance.unwrap_or(Decimal::ZERO);
        let threshold = req.minimum_threshold.unwrap_or(Decimal::ZERO);
        if initial < Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "initial balance cannot be negative".into(),
            ));
        }
        if threshold < Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "minimum threshold cannot be negative".into(),
            ));
        }

        let item = self
            .db
            .transaction::<_, stock_item::Model, ServiceError>(move |txn| {
                Box::pin(async move {
                    let now = Utc::now();
                    let item = stock_item::ActiveModel {
                        name: Set(name),
                        unit: Set(unit),
                        current_balance: Set(initial),
                        minimum_threshold: Set(threshold),
                        created_at: Set(now),
                        ..Default::default()
                    }
                    .insert(txn)
                    .await?;

                    if initial > Decimal::ZERO {
                        stock_movement::ActiveModel {
                            stock_item_id: Set(item.id),
                            kind: Set(MovementKind::Entry.as_str().to_owned()),
                            quantity: Set(initial),
                            reason: Set(Some(INITIAL_STOCK_REASON.to_owned())),
                            occurred_at: Set(now),
                            ..Default::default()
                        }
                        .insert(txn)
                        .await?;
                    }

                    Ok(item)
                })
            })
            .await
            .map_err(unwrap_transaction_error)?;

        info!(item_id = item.id, "stock item created");
        if let Err(err) = self
            .event_sender
            .send(Event::StockItemCreated { item_id: item.id })
            .await
        {
            warn!(error = %err, "failed to publish domain event");
        }

        Ok(item)
    }

    /// Lists all stock items sorted by name ascending (contractual ordering
    /// assumed by the front end).
    #[instrument(skip(self))]
    pub async fn list_items(&self) -> Result<Vec<stock_item::Model>, ServiceError> {
        StockItems::find()
            .order_by_asc(stock_item::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self))]
    pub async fn get_item(&self, item_id: i64) -> Result<stock_item::Model, ServiceError> {
        StockItems::find_by_id(item_id)
            .one(self.db.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("stock item {item_id} not found")))
    }

    /// Hard-deletes an item together with its whole movement history. The
    /// movement cleanup runs first so the item delete never trips the
    /// foreign key; not-found is detected on the item delete's row count.
    #[instrument(skip(self))]
    pub async fn delete_item(&self, item_id: i64) -> Result<(), ServiceError> {
        let movements_removed = self
            .db
            .transaction::<_, u64, ServiceError>(move |txn| {
                Box::pin(async move {
                    let movements = StockMovements::delete_many()
                        .filter(stock_movement::Column::StockItemId.eq(item_id))
                        .exec(txn)
                        .await?;

                    let items = StockItems::delete_by_id(item_id).exec(txn).await?;
                    if items.rows_affected == 0 {
                        return Err(ServiceError::NotFound(format!(
                            "stock item {item_id} not found"
                        )));
                    }

                    Ok(movements.rows_affected)
                })
            })
            .await
            .map_err(unwrap_transaction_error)?;

        info!(item_id, movements_removed, "stock item deleted");
        if let Err(err) = self
            .event_sender
            .send(Event::StockItemDeleted {
                item_id,
                movements_removed,
            })
            .await
        {
            warn!(error = %err, "failed to publish domain event");
        }

        Ok(())
    }

    /// Records an inbound movement. The balance has no upper bound.
    #[instrument(skip(self))]
    pub async fn record_entry(
        &self,
        item_id: i64,
        quantity: Decimal,
        reason: Option<String>,
    ) -> Result<stock_item::Model, ServiceError> {
        let item = self
            .apply_movement(item_id, quantity, reason, MovementKind::Entry)
            .await?;

        if let Err(err) = self
            .event_sender
            .send(Event::StockEntryRecorded { item_id, quantity })
            .await
        {
            warn!(error = %err, "failed to publish domain event");
        }

        Ok(item)
    }

    /// Records an outbound movement. Rejected with `InsufficientStock` when
    /// the requested quantity exceeds the current balance; in that case
    /// neither the balance nor the log changes.
    #[instrument(skip(self))]
    pub async fn record_exit(
        &self,
        item_id: i64,
        quantity: Decimal,
        reason: Option<String>,
    ) -> Result<stock_item::Model, ServiceError> {
        let item = self
            .apply_movement(item_id, quantity, reason, MovementKind::Exit)
            .await?;

        if let Err(err) = self
            .event_sender
            .send(Event::StockExitRecorded { item_id, quantity })
            .await
        {
            warn!(error = %err, "failed to publish domain event");
        }

        Ok(item)
    }

    /// Movement history, newest first, capped at `MOVEMENT_HISTORY_LIMIT`
    /// rows, each joined with the owning item's name.
    #[instrument(skip(self))]
    pub async fn list_movements(
        &self,
        item_id: Option<i64>,
    ) -> Result<Vec<MovementRecord>, ServiceError> {
        let mut query = StockMovements::find()
            .select_only()
            .columns([
                stock_movement::Column::Id,
                stock_movement::Column::StockItemId,
                stock_movement::Column::Kind,
                stock_movement::Column::Quantity,
                stock_movement::Column::Reason,
                stock_movement::Column::OccurredAt,
            ])
            .column_as(stock_item::Column::Name, "item_name")
            .join(JoinType::InnerJoin, stock_movement::Relation::StockItem.def())
            .order_by_desc(stock_movement::Column::OccurredAt)
            .order_by_desc(stock_movement::Column::Id)
            .limit(MOVEMENT_HISTORY_LIMIT);

        if let Some(id) = item_id {
            query = query.filter(stock_movement::Column::StockItemId.eq(id));
        }

        query
            .into_model::<MovementRecord>()
            .all(self.db.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// Applies a signed balance change and appends the movement record, both
    /// in one transaction. Exits are expressed as a single conditional
    /// update (`current_balance >= quantity` in the WHERE clause) so two
    /// concurrent exits can never drive the balance below zero.
    async fn apply_movement(
        &self,
        item_id: i64,
        quantity: Decimal,
        reason: Option<String>,
        kind: MovementKind,
    ) -> Result<stock_item::Model, ServiceError> {
        if quantity <= Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "quantity must be greater than zero".into(),
            ));
        }

        self.db
            .transaction::<_, stock_item::Model, ServiceError>(move |txn| {
                Box::pin(async move {
                    let balance_expr = match kind {
                        MovementKind::Entry => {
                            Expr::col(stock_item::Column::CurrentBalance).add(quantity)
                        }
                        MovementKind::Exit => {
                            Expr::col(stock_item::Column::CurrentBalance).sub(quantity)
                        }
                    };

                    let mut update = StockItems::update_many()
                        .col_expr(stock_item::Column::CurrentBalance, balance_expr)
                        .filter(stock_item::Column::Id.eq(item_id));
                    if kind == MovementKind::Exit {
                        update =
                            update.filter(stock_item::Column::CurrentBalance.gte(quantity));
                    }

                    let result = update.exec(txn).await?;
                    if result.rows_affected == 0 {
                        // Zero rows on an exit can mean a missing item or an
                        // insufficient balance; a read inside the same
                        // transaction tells the two apart.
                        return match StockItems::find_by_id(item_id).one(txn).await? {
                            Some(item) => Err(ServiceError::InsufficientStock {
                                available: item.current_balance,
                            }),
                            None => Err(ServiceError::NotFound(format!(
                                "stock item {item_id} not found"
                            ))),
                        };
                    }

                    stock_movement::ActiveModel {
                        stock_item_id: Set(item_id),
                        kind: Set(kind.as_str().to_owned()),
                        quantity: Set(quantity),
                        reason: Set(reason),
                        occurred_at: Set(Utc::now()),
                        ..Default::default()
                    }
                    .insert(txn)
                    .await?;

                    StockItems::find_by_id(item_id)
                        .one(txn)
                        .await?
                        .ok_or_else(|| {
                            ServiceError::NotFound(format!("stock item {item_id} not found"))
                        })
                })
            })
            .await
            .map_err(unwrap_transaction_error)
    }
}
