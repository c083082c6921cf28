use log::trace;
use sqlx::{types::Json, SqliteConnection};

use crate::{
    db_types::{EmailAddress, NewPaymentRecord, PaymentRecord},
    traits::SettlementStoreError,
};

const PAYMENT_COLUMNS: &str =
    "id, owner_email, fees, settled_item_ids, gateway_reference, idempotency_key, removed_count, created_at";

/// Inserts the payment record for one settlement. `captured_ids` is the set of cart item ids that
/// were actually deleted in the surrounding transaction. A unique-key conflict on the idempotency
/// column means another writer settled this attempt first.
pub async fn insert_payment(
    payment: NewPaymentRecord,
    captured_ids: Vec<i64>,
    conn: &mut SqliteConnection,
) -> Result<PaymentRecord, SettlementStoreError> {
    let removed_count = captured_ids.len() as i64;
    let result = sqlx::query_as::<_, PaymentRecord>(&format!(
        "INSERT INTO payments (owner_email, fees, settled_item_ids, gateway_reference, idempotency_key, \
         removed_count) VALUES ($1, $2, $3, $4, $5, $6) RETURNING {PAYMENT_COLUMNS}"
    ))
    .bind(payment.owner_email.as_str())
    .bind(payment.fees)
    .bind(Json(captured_ids))
    .bind(payment.gateway_reference)
    .bind(&payment.idempotency_key)
    .bind(removed_count)
    .fetch_one(conn)
    .await;
    match result {
        Ok(record) => {
            trace!("💰️ Payment #{} recorded for {}", record.id, record.owner_email);
            Ok(record)
        },
        Err(e) if e.as_database_error().map(|d| d.is_unique_violation()).unwrap_or(false) => {
            Err(SettlementStoreError::DuplicateIdempotencyKey)
        },
        Err(e) => Err(e.into()),
    }
}

pub async fn payment_by_idempotency_key(
    key: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<PaymentRecord>, SettlementStoreError> {
    let record = sqlx::query_as::<_, PaymentRecord>(&format!(
        "SELECT {PAYMENT_COLUMNS} FROM payments WHERE idempotency_key = $1"
    ))
    .bind(key)
    .fetch_optional(conn)
    .await?;
    Ok(record)
}

pub async fn payments_for_owner(
    owner: &EmailAddress,
    conn: &mut SqliteConnection,
) -> Result<Vec<PaymentRecord>, sqlx::Error> {
    sqlx::query_as::<_, PaymentRecord>(&format!(
        "SELECT {PAYMENT_COLUMNS} FROM payments WHERE owner_email = $1 ORDER BY id DESC"
    ))
    .bind(owner.as_str())
    .fetch_all(conn)
    .await
}
