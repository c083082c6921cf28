use log::trace;
use sqlx::SqliteConnection;

use crate::{
    db_types::{Account, EmailAddress, Role},
    traits::AccountApiError,
};

pub async fn account_by_email(
    email: &EmailAddress,
    conn: &mut SqliteConnection,
) -> Result<Option<Account>, AccountApiError> {
    let account = sqlx::query_as::<_, Account>(
        "SELECT id, email, role, created_at, updated_at FROM accounts WHERE email = $1",
    )
    .bind(email.as_str())
    .fetch_optional(conn)
    .await?;
    Ok(account)
}

pub async fn account_by_id(id: i64, conn: &mut SqliteConnection) -> Result<Option<Account>, AccountApiError> {
    let account = sqlx::query_as::<_, Account>(
        "SELECT id, email, role, created_at, updated_at FROM accounts WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(conn)
    .await?;
    Ok(account)
}

/// Inserts a new `user` account for the email, or leaves an existing account untouched.
/// Registration must never demote or otherwise modify an account that is already present.
pub async fn upsert_account(email: &EmailAddress, conn: &mut SqliteConnection) -> Result<Account, AccountApiError> {
    sqlx::query("INSERT INTO accounts (email, role) VALUES ($1, $2) ON CONFLICT (email) DO NOTHING")
        .bind(email.as_str())
        .bind(Role::User)
        .execute(&mut *conn)
        .await?;
    trace!("🧑️ Account for {email} is present");
    account_by_email(email, conn).await?.ok_or(AccountApiError::AccountNotFound)
}

pub async fn all_accounts(conn: &mut SqliteConnection) -> Result<Vec<Account>, AccountApiError> {
    let accounts = sqlx::query_as::<_, Account>(
        "SELECT id, email, role, created_at, updated_at FROM accounts ORDER BY id",
    )
    .fetch_all(conn)
    .await?;
    Ok(accounts)
}

/// Sets the role on an existing account. Fails with [`AccountApiError::AccountNotFound`] if the
/// id does not exist.
pub async fn assign_role(account_id: i64, role: Role, conn: &mut SqliteConnection) -> Result<Account, AccountApiError> {
    let result = sqlx::query("UPDATE accounts SET role = $1, updated_at = CURRENT_TIMESTAMP WHERE id = $2")
        .bind(role)
        .bind(account_id)
        .execute(&mut *conn)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AccountApiError::AccountNotFound);
    }
    trace!("🧑️ Account #{account_id} role set to {role}");
    account_by_id(account_id, conn).await?.ok_or(AccountApiError::AccountNotFound)
}
