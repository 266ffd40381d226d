use crate::{
    db::DbPool,
    entities::promotion::{self, Entity as Promotions},
    errors::ServiceError,
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, Unchanged,
};
use std::sync::Arc;
use tracing::{info, instrument};

#[derive(Debug, Clone)]
pub struct NewPromotion {
    pub title: String,
    pub description: Option<String>,
    pub discount: Decimal,
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct PromotionUpdate {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub discount: Option<Decimal>,
    pub active: Option<bool>,
}

#[derive(Clone)]
pub struct PromotionService {
    db: Arc<DbPool>,
}

impl PromotionService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn create_promotion(
        &self,
        req: NewPromotion,
    ) -> Result<promotion::Model, ServiceError> {
        let title = req.title.trim().to_owned();
        if title.is_empty() {
            return Err(ServiceError::ValidationError("title is required".into()));
        }
        if req.discount < Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "discount cannot be negative".into(),
            ));
        }

        let promotion = promotion::ActiveModel {
            title: Set(title),
            description: Set(req.description),
            discount: Set(req.discount),
            active: Set(req.active.unwrap_or(true)),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db.as_ref())
        .await?;

        info!(promotion_id = promotion.id, "promotion created");
        Ok(promotion)
    }

    /// All promotions, newest first. The front end filters on `active`.
    #[instrument(skip(self))]
    pub async fn list_promotions(&self) -> Result<Vec<promotion::Model>, ServiceError> {
        Promotions::find()
            .order_by_desc(promotion::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// Only promotions currently switched on.
    #[instrument(skip(self))]
    pub async fn list_active_promotions(&self) -> Result<Vec<promotion::Model>, ServiceError> {
        Promotions::find()
            .filter(promotion::Column::Active.eq(true))
            .order_by_desc(promotion::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self))]
    pub async fn update_promotion(
        &self,
        promotion_id: i64,
        update: PromotionUpdate,
    ) -> Result<promotion::Model, ServiceError> {
        if update.title.is_none()
            && update.description.is_none()
            && update.discount.is_none()
            && update.active.is_none()
        {
            return Err(ServiceError::ValidationError("nothing to update".into()));
        }

        let existing = Promotions::find_by_id(promotion_id)
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("promotion {promotion_id} not found"))
            })?;

        let mut model = promotion::ActiveModel {
            id: Unchanged(existing.id),
            ..Default::default()
        };

        if let Some(title) = update.title {
            let title = title.trim().to_owned();
            if title.is_empty() {
                return Err(ServiceError::ValidationError("title is required".into()));
            }
            model.title = Set(title);
        }
        if let Some(description) = update.description {
            model.description = Set(description);
        }
        if let Some(discount) = update.discount {
            if discount < Decimal::ZERO {
                return Err(ServiceError::ValidationError(
                    "discount cannot be negative".into(),
                ));
            }
            model.discount = Set(discount);
        }
        if let Some(active) = update.active {
            model.active = Set(active);
        }

        let promotion = model.update(self.db.as_ref()).await?;
        info!(promotion_id, "promotion updated");
        Ok(promotion)
    }

    #[instrument(skip(self))]
    pub async fn delete_promotion(&self, promotion_id: i64) -> Result<(), ServiceError> {
        let result = Promotions::delete_by_id(promotion_id)
            .exec(self.db.as_ref())
            .await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!(
                "promotion {promotion_id} not found"
            )));
        }

        info!(promotion_id, "promotion deleted");
        Ok(())
    }
}
