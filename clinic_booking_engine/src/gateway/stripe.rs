use std::{sync::Arc, time::Duration};

use cbs_common::Secret;
use log::{debug, trace};
use reqwest::Client;
use serde::Deserialize;

use crate::traits::{GatewayAuthorization, GatewayError, PaymentGateway};

pub const DEFAULT_GATEWAY_URL: &str = "https://api.stripe.com";
pub const DEFAULT_GATEWAY_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone, Debug)]
pub struct GatewayConfig {
    /// The gateway API secret key, e.g. `sk_test_...`.
    pub secret_key: Secret<String>,
    /// Base URL of the gateway API. Overridable so tests can point at a local stand-in.
    pub base_url: String,
    /// Hard ceiling on any single gateway call. On expiry the outcome is ambiguous and is
    /// reported as [`GatewayError::Timeout`].
    pub timeout: Option<Duration>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            secret_key: Secret::default(),
            base_url: DEFAULT_GATEWAY_URL.to_string(),
            timeout: None,
        }
    }
}

/// A Stripe-compatible payment-intent client.
///
/// The only operation the settlement flow needs is charge authorization: create a payment intent
/// for an amount in minor units and hand back its reference. Everything else Stripe offers is
/// out of scope.
#[derive(Clone)]
pub struct StripeGateway {
    config: GatewayConfig,
    client: Arc<Client>,
}

#[derive(Debug, Deserialize)]
struct PaymentIntent {
    id: String,
    client_secret: Option<String>,
}

impl StripeGateway {
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        let timeout = config.timeout.unwrap_or(DEFAULT_GATEWAY_TIMEOUT);
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url.trim_end_matches('/'))
    }
}

impl PaymentGateway for StripeGateway {
    async fn authorize(
        &self,
        amount: i64,
        currency: &str,
        idempotency_key: &str,
    ) -> Result<GatewayAuthorization, GatewayError> {
        trace!("💳️ Requesting authorization for {amount} minor units ({currency})");
        let params = [("amount", amount.to_string()), ("currency", currency.to_string())];
        let response = self
            .client
            .post(self.url("/v1/payment_intents"))
            .bearer_auth(self.config.secret_key.reveal())
            .header("Idempotency-Key", idempotency_key)
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GatewayError::Timeout
                } else {
                    GatewayError::Unreachable(e.to_string())
                }
            })?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            debug!("💳️ Gateway declined the authorization ({status}): {message}");
            return Err(GatewayError::Declined { status: status.as_u16(), message });
        }
        let intent = response
            .json::<PaymentIntent>()
            .await
            .map_err(|e| GatewayError::MalformedResponse(e.to_string()))?;
        debug!("💳️ Gateway authorized charge {}", intent.id);
        Ok(GatewayAuthorization { reference: intent.id, client_secret: intent.client_secret })
    }
}
