use cbs_common::Fee;
use clinic_booking_engine::db_types::EmailAddress;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct CredentialRequest {
    pub email: EmailAddress,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub email: EmailAddress,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoleResponse {
    pub admin: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewCartItemRequest {
    pub treatment_id: i64,
    pub fees: Fee,
}

#[derive(Debug, Clone, Serialize)]
pub struct RemovalResponse {
    pub removed: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutRequest {
    pub fees: Fee,
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckoutResponse {
    pub gateway_reference: String,
    pub client_secret: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SettleRequest {
    pub owner_email: EmailAddress,
    pub fees: Fee,
    pub cart_item_ids: Vec<i64>,
    pub currency: Option<String>,
    pub idempotency_key: String,
}
