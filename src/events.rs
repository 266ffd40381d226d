use rust_decimal::Decimal;
use tokio::sync::mpsc;
use tracing::info;

/// Domain events emitted after successful mutations. Delivery is
/// observability only; failures never affect the originating operation.
#[derive(Debug, Clone)]
pub enum Event {
    StockItemCreated {
        item_id: i64,
    },
    StockItemDeleted {
        item_id: i64,
        movements_removed: u64,
    },
    StockEntryRecorded {
        item_id: i64,
        quantity: Decimal,
    },
    StockExitRecorded {
        item_id: i64,
        quantity: Decimal,
    },
    SaleRecorded {
        sale_id: String,
        total: Decimal,
    },
    SalesArchived {
        count: u64,
    },
    TransactionalDataReset,
}

#[derive(Clone)]
pub struct EventSender {
    tx: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(tx: mpsc::Sender<Event>) -> Self {
        Self { tx }
    }

    pub async fn send(&self, event: Event) -> Result<(), mpsc::error::SendError<Event>> {
        self.tx.send(event).await
    }
}

/// Drains the event channel and logs every event. Runs until the last
/// sender is dropped.
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    while let Some(event) = rx.recv().await {
        info!(event = ?event, "domain event");
    }
}
