use std::{fmt::Display, str::FromStr};

use cbs_common::Fee;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;

pub use sqlx::types::Json;

//--------------------------------------      Role       ---------------------------------------------------------------

/// The access level assigned to an account. Stored as lowercase text in the database and matched
/// exhaustively everywhere; there is deliberately no catch-all conversion from arbitrary strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid role: {0}")]
pub struct RoleParseError(String);

impl FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            s => Err(RoleParseError(s.to_string())),
        }
    }
}

//--------------------------------------   EmailAddress   --------------------------------------------------------------

/// A normalised email address. Parsing trims surrounding whitespace, lowercases the address and
/// requires a single `@` with a non-empty mailbox and domain. Account identity is keyed on this
/// value, so normalisation happens here and nowhere else.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Type)]
#[serde(try_from = "String", into = "String")]
#[sqlx(transparent)]
pub struct EmailAddress(String);

#[derive(Debug, Clone, Error)]
#[error("Not a valid email address: {0}")]
pub struct EmailAddressError(String);

impl EmailAddress {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for EmailAddress {
    type Err = EmailAddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalised = s.trim().to_lowercase();
        let mut parts = normalised.split('@');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(mailbox), Some(domain), None) if !mailbox.is_empty() && !domain.is_empty() => {
                Ok(Self(normalised))
            },
            _ => Err(EmailAddressError(s.to_string())),
        }
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = EmailAddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl Display for EmailAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

//--------------------------------------     Account      --------------------------------------------------------------

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Account {
    pub id: i64,
    pub email: EmailAddress,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------    Treatment     --------------------------------------------------------------

/// A catalog entry. Beyond "write what was sent" there are no invariants on these records.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Treatment {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub fees: Fee,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewTreatment {
    pub name: String,
    pub description: Option<String>,
    pub fees: Fee,
}

//--------------------------------------     CartItem     --------------------------------------------------------------

/// A cart entry awaiting settlement. Cart items are deleted either by an explicit removal or by a
/// successful settlement; both paths treat an already-absent item as a no-op rather than an error.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CartItem {
    pub id: i64,
    pub owner_email: EmailAddress,
    pub treatment_id: i64,
    pub fees: Fee,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewCartItem {
    pub owner_email: EmailAddress,
    pub treatment_id: i64,
    pub fees: Fee,
}

//--------------------------------------   PaymentRecord  --------------------------------------------------------------

/// The immutable record of one settled checkout. `settled_item_ids` holds the cart item ids that
/// were actually captured by this settlement, and `removed_count` their number; a value below the
/// requested count indicates a concurrent removal, which is reported rather than hidden.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PaymentRecord {
    pub id: i64,
    pub owner_email: EmailAddress,
    pub fees: Fee,
    pub settled_item_ids: Json<Vec<i64>>,
    pub gateway_reference: String,
    pub idempotency_key: String,
    pub removed_count: i64,
    pub created_at: DateTime<Utc>,
}

/// A payment record ready to be written, after the gateway has authorised the charge.
/// `settled_item_ids` here is the *requested* id set; the store narrows it to the captured set.
#[derive(Debug, Clone)]
pub struct NewPaymentRecord {
    pub owner_email: EmailAddress,
    pub fees: Fee,
    pub settled_item_ids: Vec<i64>,
    pub gateway_reference: String,
    pub idempotency_key: String,
}

//--------------------------------------    Settlement    --------------------------------------------------------------

/// One checkout attempt. The idempotency key identifies the logical attempt; retries carrying the
/// same key collapse into the original result instead of re-charging.
#[derive(Debug, Clone)]
pub struct SettlementRequest {
    pub owner_email: EmailAddress,
    pub fees: Fee,
    pub cart_item_ids: Vec<i64>,
    pub currency: String,
    pub idempotency_key: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SettlementOutcome {
    pub payment: PaymentRecord,
    pub removed_count: u64,
}
