use thiserror::Error;

use crate::traits::{GatewayError, SettlementStoreError};

/// The failure modes of one settlement attempt, in the order the engine can hit them.
#[derive(Debug, Error)]
pub enum SettlementError {
    #[error("Invalid settlement request. {0}")]
    Validation(String),
    #[error("Insufficient permissions. {0}")]
    Forbidden(String),
    #[error("Payment gateway failure. {0}")]
    Gateway(#[from] GatewayError),
    #[error("Storage failure during settlement. {0}")]
    Storage(String),
}

impl From<SettlementStoreError> for SettlementError {
    fn from(e: SettlementStoreError) -> Self {
        match e {
            SettlementStoreError::CrossOwnerItem(id) => {
                Self::Forbidden(format!("Cart item {id} belongs to a different owner"))
            },
            SettlementStoreError::DuplicateIdempotencyKey | SettlementStoreError::DatabaseError(_) => {
                Self::Storage(e.to_string())
            },
        }
    }
}
