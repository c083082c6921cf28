use thiserror::Error;

use crate::db_types::{CartItem, EmailAddress, NewCartItem};

#[derive(Debug, Clone, Error)]
pub enum CartApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for CartApiError {
    fn from(e: sqlx::Error) -> Self {
        Self::DatabaseError(e.to_string())
    }
}

/// Behaviour for the cart collection.
///
/// Cart items have two deleters (explicit removal and settlement), so removal is idempotent:
/// deleting an id that is already gone reports `false` rather than failing.
#[allow(async_fn_in_trait)]
pub trait CartManagement {
    async fn insert_cart_item(&self, item: NewCartItem) -> Result<CartItem, CartApiError>;

    async fn cart_items_for_owner(&self, owner: &EmailAddress) -> Result<Vec<CartItem>, CartApiError>;

    /// Removes a single cart item, filtered by owner so that one user can never delete another
    /// user's entries. Returns whether a row was actually deleted.
    async fn remove_cart_item(&self, id: i64, owner: &EmailAddress) -> Result<bool, CartApiError>;
}
