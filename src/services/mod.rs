pub mod admin;
pub mod auth;
pub mod inventory;
pub mod products;
pub mod promotions;
pub mod reports;
pub mod sales;

use crate::errors::ServiceError;
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use sea_orm::TransactionError;

/// Unwraps sea-orm's transaction error wrapper back into our error type.
pub(crate) fn unwrap_transaction_error(err: TransactionError<ServiceError>) -> ServiceError {
    match err {
        TransactionError::Connection(e) => ServiceError::DatabaseError(e),
        TransactionError::Transaction(e) => e,
    }
}

/// Resolves an optional date range to half-open UTC timestamp bounds.
/// Defaults to the current month (first day through today).
pub(crate) fn resolve_date_range(
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<(DateTime<Utc>, DateTime<Utc>), ServiceError> {
    let today = Utc::now().date_naive();
    let from = from.unwrap_or_else(|| today.with_day(1).unwrap_or(today));
    let to = to.unwrap_or(today);
    if from > to {
        return Err(ServiceError::ValidationError(
            "range start is after range end".into(),
        ));
    }

    let start = from.and_time(NaiveTime::MIN).and_utc();
    let end = to.and_time(NaiveTime::MIN).and_utc() + Duration::days(1);
    Ok((start, end))
}
