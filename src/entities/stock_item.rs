use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Stock item tracked by the inventory ledger. `current_balance` is only
/// ever mutated through `InventoryService` so the movement log stays
/// consistent with it.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stock_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub unit: String,
    pub current_balance: Decimal,
    pub minimum_threshold: Decimal,
    pub created_at: DateTime<Utc>,
}

impl Model {
    /// Derived low-stock condition: balance at or below the configured minimum.
    pub fn is_low_stock(&self) -> bool {
        self.current_balance <= self.minimum_threshold
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::stock_movement::Entity")]
    StockMovement,
}

impl Related<super::stock_movement::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StockMovement.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
