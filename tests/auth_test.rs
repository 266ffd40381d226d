mod common;

use cantina_api::{errors::ServiceError, services::auth::AuthService};

async fn setup_service() -> AuthService {
    AuthService::new(common::setup_db().await)
}

#[tokio::test]
async fn created_users_can_log_in() {
    let auth = setup_service().await;

    let created = auth.create_user("maria", "segredo-forte").await.unwrap();
    assert_eq!(created.username, "maria");
    assert_ne!(created.password_hash, "segredo-forte");

    let logged_in = auth.login("maria", "segredo-forte").await.unwrap();
    assert_eq!(logged_in.id, created.id);
}

#[tokio::test]
async fn wrong_password_and_unknown_user_look_the_same() {
    let auth = setup_service().await;
    auth.create_user("maria", "segredo-forte").await.unwrap();

    let err = auth.login("maria", "senha-errada").await.unwrap_err();
    assert!(matches!(err, ServiceError::Unauthorized(_)));
    let wrong_password_msg = err.response_message();

    let err = auth.login("ninguem", "qualquer-coisa").await.unwrap_err();
    assert!(matches!(err, ServiceError::Unauthorized(_)));
    assert_eq!(err.response_message(), wrong_password_msg);
}

#[tokio::test]
async fn usernames_are_unique() {
    let auth = setup_service().await;
    auth.create_user("maria", "segredo-forte").await.unwrap();

    let err = auth.create_user("maria", "outro-segredo").await.unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));
}

#[tokio::test]
async fn short_passwords_are_rejected() {
    let auth = setup_service().await;

    let err = auth.create_user("maria", "curta").await.unwrap_err();
    assert!(matches!(err, ServiceError::ValidationError(_)));

    let err = auth.create_user("   ", "segredo-forte").await.unwrap_err();
    assert!(matches!(err, ServiceError::ValidationError(_)));
}
