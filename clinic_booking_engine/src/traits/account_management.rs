use thiserror::Error;

use crate::db_types::{Account, EmailAddress, PaymentRecord, Role};

#[derive(Debug, Clone, Error)]
pub enum AccountApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Account not found")]
    AccountNotFound,
}

impl From<sqlx::Error> for AccountApiError {
    fn from(e: sqlx::Error) -> Self {
        Self::DatabaseError(e.to_string())
    }
}

/// Behaviour for managing the identity store.
///
/// Authentication itself is stateless (the bearer credential carries everything needed to verify
/// it), so this trait is only consulted to *authorise*: looking up the role for an authenticated
/// subject, and maintaining the account records those lookups run against.
#[allow(async_fn_in_trait)]
pub trait AccountManagement {
    /// Creates an account for the given email with the `user` role, or returns the existing one
    /// unchanged. Registration is an idempotent no-op for known addresses.
    async fn upsert_account(&self, email: &EmailAddress) -> Result<Account, AccountApiError>;

    async fn fetch_account_by_email(&self, email: &EmailAddress) -> Result<Option<Account>, AccountApiError>;

    async fn fetch_account_by_id(&self, id: i64) -> Result<Option<Account>, AccountApiError>;

    async fn fetch_all_accounts(&self) -> Result<Vec<Account>, AccountApiError>;

    /// Assigns a new role to an existing account. Fails with [`AccountApiError::AccountNotFound`]
    /// if no account has the given id.
    async fn assign_role(&self, account_id: i64, role: Role) -> Result<Account, AccountApiError>;

    /// Fetches the payment history for the given owner, newest first.
    async fn fetch_payments_for_email(&self, email: &EmailAddress) -> Result<Vec<PaymentRecord>, AccountApiError>;
}
