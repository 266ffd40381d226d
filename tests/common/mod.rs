use cantina_api::{
    db::{establish_connection_with_config, run_migrations, DbConfig, DbPool},
    events::EventSender,
};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Fresh in-memory database with the full schema applied. A single
/// connection keeps every query on the same in-memory instance.
pub async fn setup_db() -> Arc<DbPool> {
    let config = DbConfig {
        url: "sqlite::memory:".into(),
        max_connections: 1,
        min_connections: 1,
        ..Default::default()
    };

    let pool = establish_connection_with_config(&config)
        .await
        .expect("failed to open in-memory database");
    run_migrations(&pool).await.expect("failed to migrate");
    Arc::new(pool)
}

/// Event sender with no consumer; services only log delivery failures.
pub fn event_sender() -> EventSender {
    let (tx, _rx) = mpsc::channel(100);
    EventSender::new(tx)
}
