use crate::{db::DbPool, errors::ServiceError, services::resolve_date_range};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{ConnectionTrait, FromQueryResult, Statement};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::instrument;
use utoipa::ToSchema;

/// Menu categories the breakdown report buckets products into. Products are
/// matched by name keywords since sale line items carry no category of
/// their own; anything unmatched lands in `Other` rather than being guessed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MenuCategory {
    Drinks,
    Sides,
    Mains,
    Desserts,
    Other,
}

const DRINK_KEYWORDS: &[&str] = &[
    "suco", "refri", "refrigerante", "agua", "água", "cerveja", "bebida", "cafe", "café",
];
const SIDE_KEYWORDS: &[&str] = &["porcao", "porção", "batata", "fritas", "petisco"];
const MAIN_KEYWORDS: &[&str] = &[
    "prato",
    "marmita",
    "almoco",
    "almoço",
    "lanche",
    "burger",
    "hamburguer",
    "hambúrguer",
    "pastel",
];
const DESSERT_KEYWORDS: &[&str] = &[
    "doce",
    "sobremesa",
    "pudim",
    "sorvete",
    "acai",
    "açaí",
    "bolo",
];

impl MenuCategory {
    /// Classifies a product name. Buckets are checked in a fixed order so a
    /// name matching several keywords always lands in the same category.
    pub fn classify(product_name: &str) -> Self {
        let name = product_name.to_lowercase();
        let matches = |keywords: &[&str]| keywords.iter().any(|kw| name.contains(kw));

        if matches(DRINK_KEYWORDS) {
            MenuCategory::Drinks
        } else if matches(SIDE_KEYWORDS) {
            MenuCategory::Sides
        } else if matches(MAIN_KEYWORDS) {
            MenuCategory::Mains
        } else if matches(DESSERT_KEYWORDS) {
            MenuCategory::Desserts
        } else {
            MenuCategory::Other
        }
    }
}

/// Per-product totals over a range, best sellers (by quantity) first.
#[derive(Debug, Clone, PartialEq, FromQueryResult, Serialize, ToSchema)]
pub struct ProductTotals {
    pub product_name: String,
    pub total_quantity: Decimal,
    pub total_revenue: Decimal,
    /// Number of distinct sales the product appeared in.
    pub sales_count: i64,
}

#[derive(Debug, Clone, PartialEq, FromQueryResult, Serialize, ToSchema)]
pub struct PaymentMethodTotals {
    pub payment_method: String,
    pub sales_count: i64,
    pub total: Decimal,
}

/// Headline numbers for a range.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SalesSummary {
    pub sales_count: i64,
    pub gross_total: Decimal,
    pub total_discount: Decimal,
    pub average_ticket: Decimal,
    pub by_payment_method: Vec<PaymentMethodTotals>,
}

#[derive(Debug, FromQueryResult)]
struct SummaryRow {
    sales_count: i64,
    gross_total: Decimal,
    total_discount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CategoryTotals {
    pub category: MenuCategory,
    pub total_quantity: Decimal,
    pub total_revenue: Decimal,
}

/// Read-only aggregations over recorded sales. Archived sales are included;
/// clearing the day never changes what the reports say.
#[derive(Clone)]
pub struct ReportsService {
    db: Arc<DbPool>,
}

impl ReportsService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    /// Per-product quantity, revenue and distinct sale count, best sellers
    /// first. Defaults to the current month.
    #[instrument(skip(self))]
    pub async fn product_totals(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<ProductTotals>, ServiceError> {
        let (start, end) = resolve_date_range(from, to)?;

        let stmt = Statement::from_sql_and_values(
            self.db.get_database_backend(),
            r#"
            SELECT si.product_name AS product_name,
                   SUM(si.quantity) AS total_quantity,
                   SUM(si.quantity * si.unit_price) AS total_revenue,
                   COUNT(DISTINCT si.sale_id) AS sales_count
            FROM sale_items si
            INNER JOIN sales s ON s.id = si.sale_id
            WHERE s.sold_at >= ? AND s.sold_at < ?
            GROUP BY si.product_name
            ORDER BY total_quantity DESC
            "#,
            [start.into(), end.into()],
        );

        ProductTotals::find_by_statement(stmt)
            .all(self.db.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// Sale count, gross total, summed discounts, average ticket and a
    /// per-payment-method breakdown for a range.
    #[instrument(skip(self))]
    pub async fn summary(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<SalesSummary, ServiceError> {
        let (start, end) = resolve_date_range(from, to)?;

        let stmt = Statement::from_sql_and_values(
            self.db.get_database_backend(),
            r#"
            SELECT COUNT(*) AS sales_count,
                   COALESCE(SUM(total), 0.0) AS gross_total,
                   COALESCE(SUM(discount), 0.0) AS total_discount
            FROM sales
            WHERE sold_at >= ? AND sold_at < ?
            "#,
            [start.into(), end.into()],
        );

        let row = SummaryRow::find_by_statement(stmt)
            .one(self.db.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::InternalError("summary query returned no row".into()))?;

        let by_method_stmt = Statement::from_sql_and_values(
            self.db.get_database_backend(),
            r#"
            SELECT payment_method AS payment_method,
                   COUNT(*) AS sales_count,
                   COALESCE(SUM(total), 0) AS total
            FROM sales
            WHERE sold_at >= ? AND sold_at < ?
            GROUP BY payment_method
            ORDER BY total DESC
            "#,
            [start.into(), end.into()],
        );

        let by_payment_method = PaymentMethodTotals::find_by_statement(by_method_stmt)
            .all(self.db.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)?;

        let average_ticket = if row.sales_count > 0 {
            row.gross_total / Decimal::from(row.sales_count)
        } else {
            Decimal::ZERO
        };

        Ok(SalesSummary {
            sales_count: row.sales_count,
            gross_total: row.gross_total,
            total_discount: row.total_discount,
            average_ticket,
            by_payment_method,
        })
    }

    /// Product totals folded into menu categories, in fixed category order.
    /// Every bucket is present even when empty.
    #[instrument(skip(self))]
    pub async fn category_breakdown(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<CategoryTotals>, ServiceError> {
        let totals = self.product_totals(from, to).await?;

        let mut buckets: BTreeMap<MenuCategory, (Decimal, Decimal)> = [
            MenuCategory::Drinks,
            MenuCategory::Sides,
            MenuCategory::Mains,
            MenuCategory::Desserts,
            MenuCategory::Other,
        ]
        .into_iter()
        .map(|category| (category, (Decimal::ZERO, Decimal::ZERO)))
        .collect();

        for row in totals {
            let entry = buckets
                .entry(MenuCategory::classify(&row.product_name))
                .or_insert((Decimal::ZERO, Decimal::ZERO));
            entry.0 += row.total_quantity;
            entry.1 += row.total_revenue;
        }

        Ok(buckets
            .into_iter()
            .map(|(category, (total_quantity, total_revenue))| CategoryTotals {
                category,
                total_quantity,
                total_revenue,
            })
            .collect())
    }
}
