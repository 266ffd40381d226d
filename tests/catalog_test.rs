mod common;

use cantina_api::{
    errors::ServiceError,
    services::{
        products::{NewProduct, ProductService, ProductUpdate},
        promotions::{NewPromotion, PromotionService, PromotionUpdate},
    },
};
use rust_decimal_macros::dec;

async fn setup_products() -> ProductService {
    ProductService::new(common::setup_db().await)
}

async fn setup_promotions() -> PromotionService {
    PromotionService::new(common::setup_db().await)
}

#[tokio::test]
async fn products_are_created_listed_and_deleted() {
    let products = setup_products().await;

    let marmita = products
        .create_product(NewProduct {
            name: "Marmita grande".into(),
            price: dec!(20),
            category: "pratos".into(),
        })
        .await
        .unwrap();
    products
        .create_product(NewProduct {
            name: "Agua mineral".into(),
            price: dec!(3),
            category: "bebidas".into(),
        })
        .await
        .unwrap();

    let listed = products.list_products().await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].name, "Agua mineral");

    products.delete_product(marmita.id).await.unwrap();
    assert_eq!(products.list_products().await.unwrap().len(), 1);

    let err = products.delete_product(marmita.id).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn product_names_are_unique() {
    let products = setup_products().await;

    let first = products
        .create_product(NewProduct {
            name: "Pastel".into(),
            price: dec!(8),
            category: "lanches".into(),
        })
        .await
        .unwrap();

    let err = products
        .create_product(NewProduct {
            name: "Pastel".into(),
            price: dec!(9),
            category: "lanches".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));

    // Renaming onto a taken name is also a conflict.
    products
        .create_product(NewProduct {
            name: "Coxinha".into(),
            price: dec!(7),
            category: "lanches".into(),
        })
        .await
        .unwrap();
    let err = products
        .update_product(
            first.id,
            ProductUpdate {
                name: Some("Coxinha".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));
}

#[tokio::test]
async fn product_updates_are_partial_but_never_empty() {
    let products = setup_products().await;

    let pastel = products
        .create_product(NewProduct {
            name: "Pastel".into(),
            price: dec!(8),
            category: "lanches".into(),
        })
        .await
        .unwrap();

    let err = products
        .update_product(pastel.id, ProductUpdate::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::ValidationError(_)));

    let updated = products
        .update_product(
            pastel.id,
            ProductUpdate {
                price: Some(dec!(9)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.price, dec!(9));
    assert_eq!(updated.name, "Pastel");
    assert_eq!(updated.category, "lanches");
}

#[tokio::test]
async fn promotions_can_be_toggled_and_filtered() {
    let promotions = setup_promotions().await;

    let promo = promotions
        .create_promotion(NewPromotion {
            title: "Terca da marmita".into(),
            description: Some("Desconto nas marmitas".into()),
            discount: dec!(10),
            active: None,
        })
        .await
        .unwrap();
    assert!(promo.active);

    promotions
        .create_promotion(NewPromotion {
            title: "Promo encerrada".into(),
            description: None,
            discount: dec!(5),
            active: Some(false),
        })
        .await
        .unwrap();

    assert_eq!(promotions.list_promotions().await.unwrap().len(), 2);
    let active = promotions.list_active_promotions().await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, promo.id);

    let toggled = promotions
        .update_promotion(
            promo.id,
            PromotionUpdate {
                active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(!toggled.active);
    assert!(promotions.list_active_promotions().await.unwrap().is_empty());
}

#[tokio::test]
async fn negative_discounts_are_rejected() {
    let promotions = setup_promotions().await;

    let err = promotions
        .create_promotion(NewPromotion {
            title: "Promo quebrada".into(),
            description: None,
            discount: dec!(-1),
            active: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::ValidationError(_)));
}
