//! Unified API for the identity store.

use std::fmt::Debug;

use log::trace;

use crate::{
    db_types::{Account, EmailAddress, PaymentRecord, Role},
    traits::{AccountApiError, AccountManagement},
};

pub struct AccountApi<B> {
    db: B,
}

impl<B: Debug> Debug for AccountApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AccountApi ({:?})", self.db)
    }
}

impl<B> AccountApi<B>
where B: AccountManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// Registers the email if it is new; otherwise returns the existing account untouched.
    pub async fn register(&self, email: &EmailAddress) -> Result<Account, AccountApiError> {
        trace!("🧑️ Registering account for {email}");
        self.db.upsert_account(email).await
    }

    pub async fn account_by_email(&self, email: &EmailAddress) -> Result<Option<Account>, AccountApiError> {
        self.db.fetch_account_by_email(email).await
    }

    pub async fn all_accounts(&self) -> Result<Vec<Account>, AccountApiError> {
        self.db.fetch_all_accounts().await
    }

    /// Promotes the account with the given id to admin. Fails with
    /// [`AccountApiError::AccountNotFound`] for unknown ids.
    pub async fn promote_to_admin(&self, account_id: i64) -> Result<Account, AccountApiError> {
        self.db.assign_role(account_id, Role::Admin).await
    }

    /// Returns the role for the email, or `None` if no such account exists.
    pub async fn role_for_email(&self, email: &EmailAddress) -> Result<Option<Role>, AccountApiError> {
        let account = self.db.fetch_account_by_email(email).await?;
        Ok(account.map(|a| a.role))
    }

    pub async fn payments_for(&self, email: &EmailAddress) -> Result<Vec<PaymentRecord>, AccountApiError> {
        self.db.fetch_payments_for_email(email).await
    }
}
