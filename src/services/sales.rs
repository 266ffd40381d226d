use crate::{
    db::DbPool,
    entities::{
        sale::{self, Entity as Sales, PaymentMethod},
        sale_item::{self, Entity as SaleItems},
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::{resolve_date_range, unwrap_transaction_error},
};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, EntityTrait, LoaderTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;

/// Range listings are capped at the most recent entries.
pub const SALES_HISTORY_LIMIT: u64 = 1000;

/// Payload for recording a sale. The id comes from the point-of-sale front
/// end so receipts printed there match what the back office stores.
#[derive(Debug, Clone)]
pub struct NewSale {
    pub id: String,
    pub sold_at: Option<DateTime<Utc>>,
    pub total: Decimal,
    pub payment_method: PaymentMethod,
    pub discount: Option<Decimal>,
    pub items: Vec<NewSaleItem>,
}

#[derive(Debug, Clone)]
pub struct NewSaleItem {
    pub product_name: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SaleItemView {
    pub product_name: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
}

/// A sale together with its line items, the shape every read endpoint
/// returns.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SaleWithItems {
    pub id: String,
    pub sold_at: DateTime<Utc>,
    pub total: Decimal,
    pub payment_method: String,
    pub discount: Decimal,
    pub active: bool,
    pub items: Vec<SaleItemView>,
}

impl SaleWithItems {
    fn from_models(sale: sale::Model, items: Vec<sale_item::Model>) -> Self {
        Self {
            id: sale.id,
            sold_at: sale.sold_at,
            total: sale.total,
            payment_method: sale.payment_method,
            discount: sale.discount,
            active: sale.active,
            items: items
                .into_iter()
                .map(|item| SaleItemView {
                    product_name: item.product_name,
                    quantity: item.quantity,
                    unit_price: item.unit_price,
                })
                .collect(),
        }
    }
}

#[derive(Clone)]
pub struct SalesService {
    db: Arc<DbPool>,
    event_sender: EventSender,
}

impl SalesService {
    pub fn new(db: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    /// Records a sale and its line items in one transaction. Replaying the
    /// same id is rejected with `Conflict` so front-end retries stay
    /// idempotent.
    #[instrument(skip(self, req), fields(sale_id = %req.id))]
    pub async fn record_sale(&self, req: NewSale) -> Result<SaleWithItems, ServiceError> {
        let id = req.id.trim().to_owned();
        if id.is_empty() {
            return Err(ServiceError::ValidationError("sale id is required".into()));
        }
        if req.total < Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "total cannot be negative".into(),
            ));
        }
        let discount = req.discount.unwrap_or(Decimal::ZERO);
        if discount < Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "discount cannot be negative".into(),
            ));
        }
        if req.items.is_empty() {
            return Err(ServiceError::ValidationError(
                "a sale needs at least one item".into(),
            ));
        }
        for item in &req.items {
            if item.product_name.trim().is_empty() {
                return Err(ServiceError::ValidationError(
                    "item product name is required".into(),
                ));
            }
            if item.quantity <= Decimal::ZERO {
                return Err(ServiceError::ValidationError(
                    "item quantity must be greater than zero".into(),
                ));
            }
            if item.unit_price < Decimal::ZERO {
                return Err(ServiceError::ValidationError(
                    "item unit price cannot be negative".into(),
                ));
            }
        }

        let sold_at = req.sold_at.unwrap_or_else(Utc::now);
        let payment_method = req.payment_method.as_str().to_owned();
        let total = req.total;
        let items = req.items;

        let (sale, inserted_items) = self
            .db
            .transaction::<_, (sale::Model, Vec<sale_item::Model>), ServiceError>(move |txn| {
                Box::pin(async move {
                    if Sales::find_by_id(&id).one(txn).await?.is_some() {
                        return Err(ServiceError::Conflict(format!(
                            "sale {id} already recorded"
                        )));
                    }

                    let sale = sale::ActiveModel {
                        id: Set(id.clone()),
                        sold_at: Set(sold_at),
                        total: Set(total),
                        payment_method: Set(payment_method),
                        discount: Set(discount),
                        active: Set(true),
                    }
                    .insert(txn)
                    .await?;

                    let mut inserted = Vec::with_capacity(items.len());
                    for item in items {
                        let row = sale_item::ActiveModel {
                            sale_id: Set(id.clone()),
                            product_name: Set(item.product_name.trim().to_owned()),
                            quantity: Set(item.quantity),
                            unit_price: Set(item.unit_price),
                            ..Default::default()
                        }
                        .insert(txn)
                        .await?;
                        inserted.push(row);
                    }

                    Ok((sale, inserted))
                })
            })
            .await
            .map_err(unwrap_transaction_error)?;

        info!(sale_id = %sale.id, total = %sale.total, "sale recorded");
        if let Err(err) = self
            .event_sender
            .send(Event::SaleRecorded {
                sale_id: sale.id.clone(),
                total: sale.total,
            })
            .await
        {
            warn!(error = %err, "failed to publish domain event");
        }

        Ok(SaleWithItems::from_models(sale, inserted_items))
    }

    /// Active sales of the current UTC day, newest first.
    #[instrument(skip(self))]
    pub async fn list_today(&self) -> Result<Vec<SaleWithItems>, ServiceError> {
        let (start, end) = today_bounds();
        let sales = Sales::find()
            .filter(sale::Column::Active.eq(true))
            .filter(sale::Column::SoldAt.gte(start))
            .filter(sale::Column::SoldAt.lt(end))
            .order_by_desc(sale::Column::SoldAt)
            .order_by_desc(sale::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)?;

        self.attach_items(sales).await
    }

    /// Sales in a date range, archived ones included so historical reports
    /// line up with what was sold. Defaults to the current month.
    #[instrument(skip(self))]
    pub async fn list_range(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<SaleWithItems>, ServiceError> {
        let (start, end) = resolve_date_range(from, to)?;

        let sales = Sales::find()
            .filter(sale::Column::SoldAt.gte(start))
            .filter(sale::Column::SoldAt.lt(end))
            .order_by_desc(sale::Column::SoldAt)
            .order_by_desc(sale::Column::Id)
            .limit(SALES_HISTORY_LIMIT)
            .all(self.db.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)?;

        self.attach_items(sales).await
    }

    /// Clears the day by flipping `active` off on today's sales. Rows stay
    /// in place for reporting. Returns how many sales were archived.
    #[instrument(skip(self))]
    pub async fn archive_today(&self) -> Result<u64, ServiceError> {
        let (start, end) = today_bounds();
        let result = Sales::update_many()
            .col_expr(sale::Column::Active, Expr::value(false))
            .filter(sale::Column::Active.eq(true))
            .filter(sale::Column::SoldAt.gte(start))
            .filter(sale::Column::SoldAt.lt(end))
            .exec(self.db.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)?;

        info!(count = result.rows_affected, "today's sales archived");
        if let Err(err) = self
            .event_sender
            .send(Event::SalesArchived {
                count: result.rows_affected,
            })
            .await
        {
            warn!(error = %err, "failed to publish domain event");
        }

        Ok(result.rows_affected)
    }

    async fn attach_items(
        &self,
        sales: Vec<sale::Model>,
    ) -> Result<Vec<SaleWithItems>, ServiceError> {
        let items = sales
            .load_many(SaleItems, self.db.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok(sales
            .into_iter()
            .zip(items)
            .map(|(sale, items)| SaleWithItems::from_models(sale, items))
            .collect())
    }
}

fn today_bounds() -> (DateTime<Utc>, DateTime<Utc>) {
    let start = Utc::now().date_naive().and_time(NaiveTime::MIN).and_utc();
    (start, start + Duration::days(1))
}
