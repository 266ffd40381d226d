mod common;

use cantina_api::{
    entities::sale::PaymentMethod,
    errors::ServiceError,
    services::{
        reports::{MenuCategory, ReportsService},
        sales::{NewSale, NewSaleItem, SalesService},
    },
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn item(name: &str, quantity: Decimal, unit_price: Decimal) -> NewSaleItem {
    NewSaleItem {
        product_name: name.to_string(),
        quantity,
        unit_price,
    }
}

fn sale(id: &str, total: Decimal, items: Vec<NewSaleItem>) -> NewSale {
    NewSale {
        id: id.to_string(),
        sold_at: None,
        total,
        payment_method: PaymentMethod::Cash,
        discount: None,
        items,
    }
}

async fn setup_services() -> (SalesService, ReportsService) {
    let db = common::setup_db().await;
    (
        SalesService::new(db.clone(), common::event_sender()),
        ReportsService::new(db),
    )
}

#[tokio::test]
async fn recording_a_sale_persists_its_items() {
    let (sales, _) = setup_services().await;

    let recorded = sales
        .record_sale(sale(
            "pedido-1",
            dec!(30),
            vec![
                item("Marmita grande", dec!(1), dec!(20)),
                item("Suco de laranja", dec!(2), dec!(5)),
            ],
        ))
        .await
        .expect("record failed");

    assert_eq!(recorded.id, "pedido-1");
    assert_eq!(recorded.total, dec!(30));
    assert_eq!(recorded.payment_method, "cash");
    assert!(recorded.active);
    assert_eq!(recorded.items.len(), 2);

    let today = sales.list_today().await.unwrap();
    assert_eq!(today.len(), 1);
    assert_eq!(today[0].items.len(), 2);
}

#[tokio::test]
async fn replaying_a_sale_id_is_a_conflict() {
    let (sales, _) = setup_services().await;

    sales
        .record_sale(sale("pedido-1", dec!(10), vec![item("Pastel", dec!(1), dec!(10))]))
        .await
        .unwrap();

    let err = sales
        .record_sale(sale("pedido-1", dec!(10), vec![item("Pastel", dec!(1), dec!(10))]))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));

    // The original stayed as recorded.
    assert_eq!(sales.list_today().await.unwrap().len(), 1);
}

#[tokio::test]
async fn a_sale_needs_items_and_a_non_negative_total() {
    let (sales, _) = setup_services().await;

    let err = sales
        .record_sale(sale("pedido-1", dec!(10), vec![]))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::ValidationError(_)));

    let err = sales
        .record_sale(sale("pedido-2", dec!(-1), vec![item("Pastel", dec!(1), dec!(10))]))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::ValidationError(_)));

    let err = sales
        .record_sale(sale("pedido-3", dec!(10), vec![item("Pastel", dec!(0), dec!(10))]))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::ValidationError(_)));
}

#[tokio::test]
async fn archiving_hides_sales_from_today_but_not_from_ranges() {
    let (sales, _) = setup_services().await;

    sales
        .record_sale(sale("pedido-1", dec!(10), vec![item("Pastel", dec!(1), dec!(10))]))
        .await
        .unwrap();
    sales
        .record_sale(sale("pedido-2", dec!(20), vec![item("Marmita", dec!(1), dec!(20))]))
        .await
        .unwrap();

    let archived = sales.archive_today().await.expect("archive failed");
    assert_eq!(archived, 2);

    assert!(sales.list_today().await.unwrap().is_empty());

    // Range listings keep the archived rows.
    let ranged = sales.list_range(None, None).await.unwrap();
    assert_eq!(ranged.len(), 2);
    assert!(ranged.iter().all(|s| !s.active));

    // Nothing left to archive.
    assert_eq!(sales.archive_today().await.unwrap(), 0);
}

#[tokio::test]
async fn same_instant_sales_come_back_in_a_stable_order() {
    let (sales, _) = setup_services().await;

    // Identical timestamps, so ordering falls back to the id tiebreaker.
    let at = chrono::Utc::now();
    for id in ["pedido-a", "pedido-b", "pedido-c"] {
        sales
            .record_sale(NewSale {
                sold_at: Some(at),
                ..sale(id, dec!(10), vec![item("Pastel", dec!(1), dec!(10))])
            })
            .await
            .unwrap();
    }

    let today = sales.list_today().await.unwrap();
    let ids: Vec<&str> = today.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["pedido-c", "pedido-b", "pedido-a"]);

    let ranged = sales.list_range(None, None).await.unwrap();
    let ranged_ids: Vec<&str> = ranged.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ranged_ids, ids);
}

#[tokio::test]
async fn summary_counts_sales_and_sums_totals() {
    let (sales, reports) = setup_services().await;

    sales
        .record_sale(sale("pedido-1", dec!(30), vec![item("Marmita", dec!(1), dec!(30))]))
        .await
        .unwrap();
    sales
        .record_sale(NewSale {
            discount: Some(dec!(5)),
            ..sale("pedido-2", dec!(20), vec![item("Pastel", dec!(2), dec!(10))])
        })
        .await
        .unwrap();

    let summary = reports.summary(None, None).await.expect("summary failed");
    assert_eq!(summary.sales_count, 2);
    assert_eq!(summary.gross_total, dec!(50));
    assert_eq!(summary.total_discount, dec!(5));
    assert_eq!(summary.average_ticket, dec!(25));

    // Both sales paid in cash, so one method bucket.
    assert_eq!(summary.by_payment_method.len(), 1);
    assert_eq!(summary.by_payment_method[0].payment_method, "cash");
    assert_eq!(summary.by_payment_method[0].sales_count, 2);
    assert_eq!(summary.by_payment_method[0].total, dec!(50));
}

#[tokio::test]
async fn an_empty_range_summarizes_to_zero() {
    let (_, reports) = setup_services().await;

    let summary = reports.summary(None, None).await.unwrap();
    assert_eq!(summary.sales_count, 0);
    assert_eq!(summary.gross_total, Decimal::ZERO);
    assert_eq!(summary.average_ticket, Decimal::ZERO);
    assert!(summary.by_payment_method.is_empty());
}

#[tokio::test]
async fn product_totals_aggregate_across_sales() {
    let (sales, reports) = setup_services().await;

    sales
        .record_sale(sale(
            "pedido-1",
            dec!(30),
            vec![
                item("Suco de laranja", dec!(2), dec!(5)),
                item("Marmita grande", dec!(1), dec!(20)),
            ],
        ))
        .await
        .unwrap();
    sales
        .record_sale(sale(
            "pedido-2",
            dec!(5),
            vec![item("Suco de laranja", dec!(1), dec!(5))],
        ))
        .await
        .unwrap();

    let totals = reports.product_totals(None, None).await.unwrap();
    assert_eq!(totals.len(), 2);

    // Quantity descending: three juices beat one marmita.
    assert_eq!(totals[0].product_name, "Suco de laranja");
    assert_eq!(totals[0].total_quantity, dec!(3));
    assert_eq!(totals[0].total_revenue, dec!(15));
    assert_eq!(totals[0].sales_count, 2);
    assert_eq!(totals[1].product_name, "Marmita grande");
    assert_eq!(totals[1].total_revenue, dec!(20));
    assert_eq!(totals[1].sales_count, 1);
}

#[tokio::test]
async fn category_breakdown_buckets_by_name_keywords() {
    let (sales, reports) = setup_services().await;

    sales
        .record_sale(sale(
            "pedido-1",
            dec!(35),
            vec![
                item("Suco de laranja", dec!(3), dec!(5)),
                item("Marmita grande", dec!(1), dec!(20)),
            ],
        ))
        .await
        .unwrap();

    // Every bucket is present, in fixed order, even with no sales in it.
    let breakdown = reports.category_breakdown(None, None).await.unwrap();
    assert_eq!(breakdown.len(), 5);
    assert_eq!(breakdown[0].category, MenuCategory::Drinks);
    assert_eq!(breakdown[4].category, MenuCategory::Other);

    let drinks = &breakdown[0];
    assert_eq!(drinks.total_quantity, dec!(3));
    assert_eq!(drinks.total_revenue, dec!(15));

    let mains = breakdown
        .iter()
        .find(|b| b.category == MenuCategory::Mains)
        .expect("missing mains bucket");
    assert_eq!(mains.total_revenue, dec!(20));

    let desserts = breakdown
        .iter()
        .find(|b| b.category == MenuCategory::Desserts)
        .expect("missing desserts bucket");
    assert_eq!(desserts.total_quantity, Decimal::ZERO);
    assert_eq!(desserts.total_revenue, Decimal::ZERO);
}

#[tokio::test]
async fn inverted_ranges_are_rejected() {
    let (sales, reports) = setup_services().await;

    let from = chrono::NaiveDate::from_ymd_opt(2026, 2, 10).unwrap();
    let to = chrono::NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();

    let err = sales.list_range(Some(from), Some(to)).await.unwrap_err();
    assert!(matches!(err, ServiceError::ValidationError(_)));

    let err = reports.summary(Some(from), Some(to)).await.unwrap_err();
    assert!(matches!(err, ServiceError::ValidationError(_)));
}
