use thiserror::Error;

use crate::db_types::{NewPaymentRecord, PaymentRecord, SettlementOutcome};

#[derive(Debug, Clone, Error)]
pub enum SettlementStoreError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Cart item {0} belongs to a different owner")]
    CrossOwnerItem(i64),
    #[error("A payment with this idempotency key already exists")]
    DuplicateIdempotencyKey,
}

impl From<sqlx::Error> for SettlementStoreError {
    fn from(e: sqlx::Error) -> Self {
        Self::DatabaseError(e.to_string())
    }
}

/// The transactional backend for checkout settlement.
///
/// Implementations must uphold the atomicity contract: after [`settle_cart_items`] returns
/// successfully, every captured cart item is gone and exactly one payment record referencing the
/// captured set exists. A failure at any point leaves neither the record nor any partial deletion
/// behind.
///
/// [`settle_cart_items`]: SettlementStore::settle_cart_items
#[allow(async_fn_in_trait)]
pub trait SettlementStore {
    /// In a single atomic transaction:
    /// * loads every cart item referenced by `payment.settled_item_ids`;
    /// * rejects the whole settlement with [`SettlementStoreError::CrossOwnerItem`] if any item
    ///   belongs to someone other than `payment.owner_email`, before anything is deleted;
    /// * deletes the items that still exist (ids already removed by a concurrent caller simply
    ///   reduce the captured set, they are not an error);
    /// * inserts the payment record with the captured id set and count.
    ///
    /// A second writer racing on the same idempotency key fails with
    /// [`SettlementStoreError::DuplicateIdempotencyKey`] and must be answered with the first
    /// writer's record.
    async fn settle_cart_items(&self, payment: NewPaymentRecord) -> Result<SettlementOutcome, SettlementStoreError>;

    async fn payment_by_idempotency_key(&self, key: &str) -> Result<Option<PaymentRecord>, SettlementStoreError>;
}
