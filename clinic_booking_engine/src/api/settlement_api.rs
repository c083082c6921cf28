//! Orchestrates one checkout settlement from validation through gateway authorization to the
//! atomic storage write.

use std::fmt::Debug;

use log::{debug, trace, warn};

use crate::{
    api::errors::SettlementError,
    db_types::{NewPaymentRecord, PaymentRecord, SettlementOutcome, SettlementRequest},
    traits::{PaymentGateway, SettlementStore, SettlementStoreError},
};

pub struct SettlementApi<B, G> {
    db: B,
    gateway: G,
}

impl<B: Debug, G> Debug for SettlementApi<B, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SettlementApi ({:?})", self.db)
    }
}

impl<B, G> SettlementApi<B, G>
where
    B: SettlementStore,
    G: PaymentGateway,
{
    pub fn new(db: B, gateway: G) -> Self {
        Self { db, gateway }
    }

    /// Settles one checkout attempt.
    ///
    /// The ordering here is the contract: validation, then idempotency replay, then gateway
    /// authorization, and only once the gateway has authorised the charge does any persistent
    /// write happen. The write itself is a single transaction in the store, so a fault after
    /// authorization surfaces as [`SettlementError::Storage`] with no partial state left behind,
    /// and the retry (same idempotency key) reconciles against the gateway rather than
    /// re-charging.
    pub async fn settle(&self, request: SettlementRequest) -> Result<SettlementOutcome, SettlementError> {
        if request.cart_item_ids.is_empty() {
            return Err(SettlementError::Validation("The cart item id list is empty".into()));
        }
        if !request.fees.is_positive() {
            return Err(SettlementError::Validation(format!("Fees must be positive, got {}", request.fees)));
        }
        if request.idempotency_key.trim().is_empty() {
            return Err(SettlementError::Validation("An idempotency key is required".into()));
        }
        if let Some(original) = self.db.payment_by_idempotency_key(&request.idempotency_key).await? {
            debug!(
                "💰️ Settlement replay for key {} returns payment #{}",
                request.idempotency_key, original.id
            );
            return replayed_outcome(original, &request);
        }
        trace!("💰️ Requesting gateway authorization for {} ({})", request.fees, request.currency);
        let authorization = self
            .gateway
            .authorize(request.fees.minor_units(), &request.currency, &request.idempotency_key)
            .await?;
        let payment = NewPaymentRecord {
            owner_email: request.owner_email.clone(),
            fees: request.fees,
            settled_item_ids: request.cart_item_ids.clone(),
            gateway_reference: authorization.reference,
            idempotency_key: request.idempotency_key.clone(),
        };
        match self.db.settle_cart_items(payment).await {
            Ok(outcome) => {
                if (outcome.removed_count as usize) < request.cart_item_ids.len() {
                    warn!(
                        "💰️ Settlement #{} captured {} of {} requested cart items. A concurrent removal got \
                         there first.",
                        outcome.payment.id,
                        outcome.removed_count,
                        request.cart_item_ids.len()
                    );
                }
                Ok(outcome)
            },
            Err(SettlementStoreError::DuplicateIdempotencyKey) => {
                // Lost the race on the key. The first writer's record is the answer.
                let original = self
                    .db
                    .payment_by_idempotency_key(&request.idempotency_key)
                    .await?
                    .ok_or_else(|| SettlementError::Storage("Duplicate key with no matching payment".into()))?;
                replayed_outcome(original, &request)
            },
            Err(e) => Err(e.into()),
        }
    }
}

// An idempotency key only replays for its original owner. A key that already belongs to a
// different account is a foreign resource, not a retry, and revealing its record would leak that
// account's payment history.
fn replayed_outcome(
    original: PaymentRecord,
    request: &SettlementRequest,
) -> Result<SettlementOutcome, SettlementError> {
    if original.owner_email != request.owner_email {
        warn!(
            "💰️ {} presented idempotency key {}, which belongs to another account",
            request.owner_email, request.idempotency_key
        );
        return Err(SettlementError::Forbidden("The idempotency key belongs to another account".into()));
    }
    let removed_count = original.removed_count as u64;
    Ok(SettlementOutcome { payment: original, removed_count })
}
