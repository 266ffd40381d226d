use crate::{
    db::DbPool,
    entities::product::{self, Entity as Products},
    errors::ServiceError,
};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, Unchanged,
};
use std::sync::Arc;
use tracing::{info, instrument};

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub price: Decimal,
    pub category: String,
}

/// Partial update for a product. At least one field must be present.
#[derive(Debug, Clone, Default)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub category: Option<String>,
}

/// Menu catalog CRUD. The catalog is independent of both the inventory
/// ledger and sale line items.
#[derive(Clone)]
pub struct ProductService {
    db: Arc<DbPool>,
}

impl ProductService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn create_product(&self, req: NewProduct) -> Result<product::Model, ServiceError> {
        let name = req.name.trim().to_owned();
        if name.is_empty() {
            return Err(ServiceError::ValidationError("name is required".into()));
        }
        if req.price < Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "price cannot be negative".into(),
            ));
        }

        self.ensure_name_available(&name, None).await?;

        let product = product::ActiveModel {
            name: Set(name),
            price: Set(req.price),
            category: Set(req.category.trim().to_owned()),
            ..Default::default()
        }
        .insert(self.db.as_ref())
        .await?;

        info!(product_id = product.id, "product created");
        Ok(product)
    }

    /// Lists the catalog grouped by category, alphabetical within each.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<product::Model>, ServiceError> {
        Products::find()
            .order_by_asc(product::Column::Category)
            .order_by_asc(product::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self))]
    pub async fn get_product(&self, product_id: i64) -> Result<product::Model, ServiceError> {
        Products::find_by_id(product_id)
            .one(self.db.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("product {product_id} not found")))
    }

    #[instrument(skip(self))]
    pub async fn update_product(
        &self,
        product_id: i64,
        update: ProductUpdate,
    ) -> Result<product::Model, ServiceError> {
        if update.name.is_none() && update.price.is_none() && update.category.is_none() {
            return Err(ServiceError::ValidationError(
                "nothing to update".into(),
            ));
        }

        let existing = self.get_product(product_id).await?;

        let mut model = product::ActiveModel {
            id: Unchanged(existing.id),
            ..Default::default()
        };

        if let Some(name) = update.name {
            let name = name.trim().to_owned();
            if name.is_empty() {
                return Err(ServiceError::ValidationError("name is required".into()));
            }
            if name != existing.name {
                self.ensure_name_available(&name, Some(product_id)).await?;
            }
            model.name = Set(name);
        }
        if let Some(price) = update.price {
            if price < Decimal::ZERO {
                return Err(ServiceError::ValidationError(
                    "price cannot be negative".into(),
                ));
            }
            model.price = Set(price);
        }
        if let Some(category) = update.category {
            model.category = Set(category.trim().to_owned());
        }

        let product = model.update(self.db.as_ref()).await?;
        info!(product_id, "product updated");
        Ok(product)
    }

    #[instrument(skip(self))]
    pub async fn delete_product(&self, product_id: i64) -> Result<(), ServiceError> {
        let result = Products::delete_by_id(product_id)
            .exec(self.db.as_ref())
            .await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!(
                "product {product_id} not found"
            )));
        }

        info!(product_id, "product deleted");
        Ok(())
    }

    async fn ensure_name_available(
        &self,
        name: &str,
        exclude_id: Option<i64>,
    ) -> Result<(), ServiceError> {
        let mut query = Products::find().filter(product::Column::Name.eq(name));
        if let Some(id) = exclude_id {
            query = query.filter(product::Column::Id.ne(id));
        }

        if query.one(self.db.as_ref()).await?.is_some() {
            return Err(ServiceError::Conflict(format!(
                "product {name} already exists"
            )));
        }
        Ok(())
    }
}
