use std::fmt::Debug;

use crate::{
    db_types::{CartItem, EmailAddress, NewCartItem},
    traits::{CartApiError, CartManagement},
};

pub struct CartApi<B> {
    db: B,
}

impl<B: Debug> Debug for CartApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CartApi ({:?})", self.db)
    }
}

impl<B> CartApi<B>
where B: CartManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    pub async fn add_item(&self, item: NewCartItem) -> Result<CartItem, CartApiError> {
        self.db.insert_cart_item(item).await
    }

    pub async fn items_for(&self, owner: &EmailAddress) -> Result<Vec<CartItem>, CartApiError> {
        self.db.cart_items_for_owner(owner).await
    }

    /// Removes one of `owner`'s cart items. Returns `false` when the item was already gone,
    /// which callers treat as success.
    pub async fn remove_item(&self, id: i64, owner: &EmailAddress) -> Result<bool, CartApiError> {
        self.db.remove_cart_item(id, owner).await
    }
}
