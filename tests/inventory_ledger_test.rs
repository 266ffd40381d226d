mod common;

use cantina_api::{
    entities::stock_movement::{self, MovementKind},
    errors::ServiceError,
    services::inventory::{
        InventoryService, NewStockItem, INITIAL_STOCK_REASON, MOVEMENT_HISTORY_LIMIT,
    },
};
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{EntityTrait, Set};

fn new_item(name: &str, initial: Option<Decimal>, threshold: Option<Decimal>) -> NewStockItem {
    NewStockItem {
        name: name.to_string(),
        unit: "kg".to_string(),
        initial_balance: initial,
        minimum_threshold: threshold,
    }
}

async fn setup_service() -> InventoryService {
    let db = common::setup_db().await;
    InventoryService::new(db, common::event_sender())
}

#[tokio::test]
async fn creating_an_item_with_initial_balance_seeds_the_movement_log() {
    let service = setup_service().await;

    let item = service
        .create_item(new_item("Arroz", Some(dec!(10)), Some(dec!(2))))
        .await
        .expect("create failed");

    assert_eq!(item.name, "Arroz");
    assert_eq!(item.current_balance, dec!(10));
    assert_eq!(item.minimum_threshold, dec!(2));

    let movements = service.list_movements(None).await.expect("list failed");
    assert_eq!(movements.len(), 1);
    assert_eq!(movements[0].kind, "entrada");
    assert_eq!(movements[0].quantity, dec!(10));
    assert_eq!(movements[0].item_name, "Arroz");
    assert_eq!(movements[0].reason.as_deref(), Some(INITIAL_STOCK_REASON));
}

#[tokio::test]
async fn creating_an_item_without_initial_balance_leaves_the_log_empty() {
    let service = setup_service().await;

    let item = service
        .create_item(new_item("Feijao", None, None))
        .await
        .expect("create failed");

    assert_eq!(item.current_balance, Decimal::ZERO);
    assert!(service.list_movements(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn blank_name_or_unit_is_rejected() {
    let service = setup_service().await;

    let err = service
        .create_item(new_item("   ", None, None))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::ValidationError(_)));

    let err = service
        .create_item(NewStockItem {
            name: "Arroz".into(),
            unit: "".into(),
            initial_balance: None,
            minimum_threshold: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::ValidationError(_)));
}

#[tokio::test]
async fn balance_equals_initial_plus_entries_minus_exits() {
    let service = setup_service().await;

    let item = service
        .create_item(new_item("Arroz", Some(dec!(10)), None))
        .await
        .unwrap();

    service
        .record_entry(item.id, dec!(5), Some("compra semanal".into()))
        .await
        .unwrap();
    service.record_exit(item.id, dec!(3), None).await.unwrap();
    let updated = service.record_exit(item.id, dec!(2), None).await.unwrap();

    assert_eq!(updated.current_balance, dec!(10));

    // The log replays to the same balance.
    let movements = service.list_movements(Some(item.id)).await.unwrap();
    let replayed = movements.iter().fold(Decimal::ZERO, |acc, m| match m.kind.as_str() {
        "entrada" => acc + m.quantity,
        "saida" => acc - m.quantity,
        other => panic!("unexpected movement kind {other}"),
    });
    assert_eq!(replayed, updated.current_balance);
    assert_eq!(movements.len(), 4);
}

#[tokio::test]
async fn an_exit_larger_than_the_balance_changes_nothing() {
    let service = setup_service().await;

    let item = service
        .create_item(new_item("Carne", Some(dec!(5)), None))
        .await
        .unwrap();

    let err = service.record_exit(item.id, dec!(8), None).await.unwrap_err();
    match err {
        ServiceError::InsufficientStock { available } => assert_eq!(available, dec!(5)),
        other => panic!("expected InsufficientStock, got {other:?}"),
    }

    // Neither the balance nor the log moved.
    let unchanged = service.get_item(item.id).await.unwrap();
    assert_eq!(unchanged.current_balance, dec!(5));
    assert_eq!(service.list_movements(Some(item.id)).await.unwrap().len(), 1);
}

#[tokio::test]
async fn non_positive_quantities_are_rejected() {
    let service = setup_service().await;

    let item = service
        .create_item(new_item("Arroz", Some(dec!(10)), None))
        .await
        .unwrap();

    let err = service.record_entry(item.id, dec!(0), None).await.unwrap_err();
    assert!(matches!(err, ServiceError::ValidationError(_)));

    let err = service.record_exit(item.id, dec!(-1), None).await.unwrap_err();
    assert!(matches!(err, ServiceError::ValidationError(_)));
}

#[tokio::test]
async fn movements_against_unknown_items_are_not_found() {
    let service = setup_service().await;

    let err = service.record_entry(9999, dec!(1), None).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));

    let err = service.record_exit(9999, dec!(1), None).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn deleting_an_item_removes_its_movement_history() {
    let service = setup_service().await;

    let item = service
        .create_item(new_item("Arroz", Some(dec!(10)), None))
        .await
        .unwrap();
    service.record_entry(item.id, dec!(5), None).await.unwrap();

    service.delete_item(item.id).await.expect("delete failed");

    let err = service.get_item(item.id).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
    assert!(service.list_movements(None).await.unwrap().is_empty());

    // Deleting again reports the missing item.
    let err = service.delete_item(item.id).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn items_are_listed_alphabetically() {
    let service = setup_service().await;

    for name in ["feijao", "arroz", "carne"] {
        service.create_item(new_item(name, None, None)).await.unwrap();
    }

    let names: Vec<String> = service
        .list_items()
        .await
        .unwrap()
        .into_iter()
        .map(|item| item.name)
        .collect();
    assert_eq!(names, vec!["arroz", "carne", "feijao"]);
}

#[tokio::test]
async fn movement_history_is_newest_first_and_filterable() {
    let service = setup_service().await;

    let rice = service
        .create_item(new_item("Arroz", Some(dec!(10)), None))
        .await
        .unwrap();
    let beans = service
        .create_item(new_item("Feijao", Some(dec!(20)), None))
        .await
        .unwrap();
    service.record_exit(rice.id, dec!(4), None).await.unwrap();

    let all = service.list_movements(None).await.unwrap();
    assert_eq!(all.len(), 3);
    // The exit was recorded last, so it comes back first.
    assert_eq!(all[0].kind, "saida");
    assert_eq!(all[0].stock_item_id, rice.id);

    let only_beans = service.list_movements(Some(beans.id)).await.unwrap();
    assert_eq!(only_beans.len(), 1);
    assert!(only_beans.iter().all(|m| m.stock_item_id == beans.id));
}

#[tokio::test]
async fn movement_history_keeps_only_the_newest_rows_past_the_cap() {
    let db = common::setup_db().await;
    let service = InventoryService::new(db.clone(), common::event_sender());

    let item = service
        .create_item(new_item("Arroz", Some(dec!(1)), None))
        .await
        .unwrap();

    // Bulk-insert log rows well past the cap, with strictly increasing
    // timestamps so "newest" is unambiguous.
    let base = Utc::now();
    let rows: Vec<stock_movement::ActiveModel> = (0..1100)
        .map(|i| stock_movement::ActiveModel {
            stock_item_id: Set(item.id),
            kind: Set(MovementKind::Entry.as_str().to_owned()),
            quantity: Set(dec!(1)),
            reason: Set(Some(format!("lote {i}"))),
            occurred_at: Set(base + Duration::seconds(i)),
            ..Default::default()
        })
        .collect();
    for chunk in rows.chunks(200) {
        stock_movement::Entity::insert_many(chunk.to_vec())
            .exec(db.as_ref())
            .await
            .unwrap();
    }

    let movements = service.list_movements(None).await.unwrap();
    assert_eq!(movements.len() as u64, MOVEMENT_HISTORY_LIMIT);

    // Newest row first, the cap drops the oldest rows.
    assert_eq!(movements[0].reason.as_deref(), Some("lote 1099"));
    assert_eq!(movements.last().unwrap().reason.as_deref(), Some("lote 100"));
    assert!(movements
        .iter()
        .all(|m| m.reason.as_deref() != Some(INITIAL_STOCK_REASON)));
}

#[tokio::test]
async fn reads_are_idempotent_without_intervening_writes() {
    let service = setup_service().await;

    let rice = service
        .create_item(new_item("Arroz", Some(dec!(10)), Some(dec!(2))))
        .await
        .unwrap();
    service
        .create_item(new_item("Feijao", Some(dec!(5)), None))
        .await
        .unwrap();
    service.record_entry(rice.id, dec!(3), None).await.unwrap();
    service.record_exit(rice.id, dec!(1), None).await.unwrap();

    let items_first = service.list_items().await.unwrap();
    let items_second = service.list_items().await.unwrap();
    assert_eq!(items_first, items_second);

    let movements_first = service.list_movements(None).await.unwrap();
    let movements_second = service.list_movements(None).await.unwrap();
    assert_eq!(movements_first, movements_second);
    assert_eq!(movements_first.len(), 4);
}

#[tokio::test]
async fn low_stock_flag_follows_the_threshold() {
    let service = setup_service().await;

    let item = service
        .create_item(new_item("Oleo", Some(dec!(10)), Some(dec!(5))))
        .await
        .unwrap();
    assert!(!item.is_low_stock());

    let updated = service.record_exit(item.id, dec!(6), None).await.unwrap();
    assert_eq!(updated.current_balance, dec!(4));
    assert!(updated.is_low_stock());
}
