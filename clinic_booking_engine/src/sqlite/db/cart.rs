use log::trace;
use sqlx::SqliteConnection;

use crate::{
    db_types::{CartItem, EmailAddress, NewCartItem},
    traits::CartApiError,
};

pub async fn insert_cart_item(item: NewCartItem, conn: &mut SqliteConnection) -> Result<CartItem, CartApiError> {
    let row = sqlx::query_as::<_, CartItem>(
        "INSERT INTO cart_items (owner_email, treatment_id, fees) VALUES ($1, $2, $3) \
         RETURNING id, owner_email, treatment_id, fees, created_at",
    )
    .bind(item.owner_email.as_str())
    .bind(item.treatment_id)
    .bind(item.fees)
    .fetch_one(conn)
    .await?;
    trace!("🛒️ Cart item #{} added for {}", row.id, row.owner_email);
    Ok(row)
}

pub async fn cart_items_for_owner(
    owner: &EmailAddress,
    conn: &mut SqliteConnection,
) -> Result<Vec<CartItem>, CartApiError> {
    let rows = sqlx::query_as::<_, CartItem>(
        "SELECT id, owner_email, treatment_id, fees, created_at FROM cart_items \
         WHERE owner_email = $1 ORDER BY id",
    )
    .bind(owner.as_str())
    .fetch_all(conn)
    .await?;
    Ok(rows)
}

pub async fn cart_item_by_id(id: i64, conn: &mut SqliteConnection) -> Result<Option<CartItem>, sqlx::Error> {
    sqlx::query_as::<_, CartItem>(
        "SELECT id, owner_email, treatment_id, fees, created_at FROM cart_items WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(conn)
    .await
}

/// Deletes one cart item by id. Returns the number of rows removed (0 or 1); deleting an
/// already-absent item is not an error.
pub async fn delete_cart_item(id: i64, conn: &mut SqliteConnection) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM cart_items WHERE id = $1").bind(id).execute(conn).await?;
    Ok(result.rows_affected())
}

/// Deletes one cart item by id, but only if it belongs to `owner`. Used by the direct removal
/// endpoint so that a crafted request can never delete someone else's entry.
pub async fn delete_cart_item_for_owner(
    id: i64,
    owner: &EmailAddress,
    conn: &mut SqliteConnection,
) -> Result<u64, CartApiError> {
    let result = sqlx::query("DELETE FROM cart_items WHERE id = $1 AND owner_email = $2")
        .bind(id)
        .bind(owner.as_str())
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}
