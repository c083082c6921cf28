//! `SqliteDatabase` is the concrete SQLite implementation of the clinic booking storage backend.
//!
//! It implements every storage trait in the [`traits`](crate::traits) module. Settlement is the
//! one place with a real atomicity contract, and it is carried entirely by a SQLite transaction:
//! either the payment record and all cart-item deletions commit together, or none of them do.
use std::fmt::Debug;

use log::{debug, trace};
use sqlx::SqlitePool;

use super::db::{accounts, cart, catalog, new_pool, payments};
use crate::{
    db_types::{
        Account,
        CartItem,
        EmailAddress,
        NewCartItem,
        NewPaymentRecord,
        NewTreatment,
        PaymentRecord,
        Role,
        SettlementOutcome,
        Treatment,
    },
    traits::{
        AccountApiError,
        AccountManagement,
        CartApiError,
        CartManagement,
        CatalogApiError,
        CatalogManagement,
        SettlementStore,
        SettlementStoreError,
    },
};

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./src/sqlite/db/migrations");

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    /// Connects to (creating if necessary) the database at `url` and brings the schema up to
    /// date.
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = new_pool(url, max_connections).await?;
        MIGRATOR.run(&pool).await?;
        debug!("🗃️ Connected to database at {url}");
        Ok(Self { url: url.to_string(), pool })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl AccountManagement for SqliteDatabase {
    async fn upsert_account(&self, email: &EmailAddress) -> Result<Account, AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        accounts::upsert_account(email, &mut conn).await
    }

    async fn fetch_account_by_email(&self, email: &EmailAddress) -> Result<Option<Account>, AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        accounts::account_by_email(email, &mut conn).await
    }

    async fn fetch_account_by_id(&self, id: i64) -> Result<Option<Account>, AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        accounts::account_by_id(id, &mut conn).await
    }

    async fn fetch_all_accounts(&self) -> Result<Vec<Account>, AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        accounts::all_accounts(&mut conn).await
    }

    async fn assign_role(&self, account_id: i64, role: Role) -> Result<Account, AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        accounts::assign_role(account_id, role, &mut conn).await
    }

    async fn fetch_payments_for_email(&self, email: &EmailAddress) -> Result<Vec<PaymentRecord>, AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        let records = payments::payments_for_owner(email, &mut conn).await?;
        Ok(records)
    }
}

impl CatalogManagement for SqliteDatabase {
    async fn insert_treatment(&self, treatment: NewTreatment) -> Result<Treatment, CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        catalog::insert_treatment(treatment, &mut conn).await
    }

    async fn fetch_treatments(&self) -> Result<Vec<Treatment>, CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        catalog::all_treatments(&mut conn).await
    }
}

impl CartManagement for SqliteDatabase {
    async fn insert_cart_item(&self, item: NewCartItem) -> Result<CartItem, CartApiError> {
        let mut conn = self.pool.acquire().await?;
        cart::insert_cart_item(item, &mut conn).await
    }

    async fn cart_items_for_owner(&self, owner: &EmailAddress) -> Result<Vec<CartItem>, CartApiError> {
        let mut conn = self.pool.acquire().await?;
        cart::cart_items_for_owner(owner, &mut conn).await
    }

    async fn remove_cart_item(&self, id: i64, owner: &EmailAddress) -> Result<bool, CartApiError> {
        let mut conn = self.pool.acquire().await?;
        let removed = cart::delete_cart_item_for_owner(id, owner, &mut conn).await?;
        trace!("🛒️ Cart item #{id} removal for {owner}: {removed} row(s)");
        Ok(removed > 0)
    }
}

impl SettlementStore for SqliteDatabase {
    /// Takes an authorised payment, and in a single atomic transaction,
    /// * checks that every referenced cart item that still exists belongs to the payment's owner.
    ///   A foreign item aborts the settlement before anything is deleted.
    /// * deletes the surviving items. Ids that a concurrent caller already removed reduce the
    ///   captured set; they do not fail the settlement.
    /// * inserts the payment record with the captured id set.
    async fn settle_cart_items(&self, payment: NewPaymentRecord) -> Result<SettlementOutcome, SettlementStoreError> {
        let mut tx = self.pool.begin().await?;
        let mut existing = Vec::with_capacity(payment.settled_item_ids.len());
        for id in &payment.settled_item_ids {
            match cart::cart_item_by_id(*id, &mut tx).await? {
                Some(item) if item.owner_email != payment.owner_email => {
                    debug!(
                        "🗃️ Settlement for {} references cart item #{id} owned by {}. Rolling back.",
                        payment.owner_email, item.owner_email
                    );
                    return Err(SettlementStoreError::CrossOwnerItem(*id));
                },
                Some(item) => existing.push(item.id),
                // Already removed by a concurrent settlement or an explicit delete.
                None => trace!("🗃️ Cart item #{id} is already gone. Skipping."),
            }
        }
        let mut captured = Vec::with_capacity(existing.len());
        for id in existing {
            if cart::delete_cart_item(id, &mut tx).await? > 0 {
                captured.push(id);
            }
        }
        let removed_count = captured.len() as u64;
        let record = payments::insert_payment(payment, captured, &mut tx).await?;
        tx.commit().await?;
        debug!("🗃️ Settlement #{} committed, {removed_count} cart item(s) removed", record.id);
        Ok(SettlementOutcome { payment: record, removed_count })
    }

    async fn payment_by_idempotency_key(&self, key: &str) -> Result<Option<PaymentRecord>, SettlementStoreError> {
        let mut conn = self.pool.acquire().await?;
        payments::payment_by_idempotency_key(key, &mut conn).await
    }
}
