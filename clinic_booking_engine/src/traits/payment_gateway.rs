use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    #[error("The gateway declined the authorization ({status}): {message}")]
    Declined { status: u16, message: String },
    #[error("The gateway did not respond in time")]
    Timeout,
    #[error("Could not reach the payment gateway: {0}")]
    Unreachable(String),
    #[error("Could not parse the gateway response: {0}")]
    MalformedResponse(String),
    #[error("Could not initialize the gateway client: {0}")]
    Initialization(String),
}

/// A successful charge authorization from the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayAuthorization {
    /// The gateway's reference for this charge. Stored on the payment record.
    pub reference: String,
    /// An opaque value the client needs to complete the charge on its side, if the gateway
    /// issues one.
    pub client_secret: Option<String>,
}

/// The external service that authorises charges.
///
/// Implementations must bound their request time; a timeout is an *ambiguous* outcome (the charge
/// may or may not have been created on the gateway's side) and is reported as
/// [`GatewayError::Timeout`] so the caller can reconcile via the idempotency key rather than
/// blindly retry.
#[allow(async_fn_in_trait)]
pub trait PaymentGateway {
    /// Requests authorization for `amount` minor units in the given currency. The idempotency
    /// key scopes the attempt: re-sending it must not create a second charge.
    async fn authorize(
        &self,
        amount: i64,
        currency: &str,
        idempotency_key: &str,
    ) -> Result<GatewayAuthorization, GatewayError>;
}
