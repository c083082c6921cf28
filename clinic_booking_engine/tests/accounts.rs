//! Identity store, cart and catalog behaviour against a real SQLite database.
mod support;

use cbs_common::Fee;
use clinic_booking_engine::{
    db_types::{NewTreatment, Role},
    traits::{AccountApiError, AccountManagement, CartManagement, CatalogManagement},
};
use support::{add_cart_item, email, new_test_db};

#[tokio::test]
async fn registration_is_an_idempotent_no_op() {
    let db = new_test_db().await;
    let alice = email("alice@example.com");
    let first = db.upsert_account(&alice).await.unwrap();
    assert_eq!(first.role, Role::User);

    // Promote, then re-register. The existing account must come back unchanged.
    db.assign_role(first.id, Role::Admin).await.unwrap();
    let second = db.upsert_account(&alice).await.unwrap();
    assert_eq!(second.id, first.id);
    assert_eq!(second.role, Role::Admin);
    assert_eq!(db.fetch_all_accounts().await.unwrap().len(), 1);
}

#[tokio::test]
async fn role_promotion_requires_an_existing_account() {
    let db = new_test_db().await;
    let bob = email("bob@example.com");
    let account = db.upsert_account(&bob).await.unwrap();

    let promoted = db.assign_role(account.id, Role::Admin).await.unwrap();
    assert_eq!(promoted.role, Role::Admin);

    let err = db.assign_role(9999, Role::Admin).await.unwrap_err();
    assert!(matches!(err, AccountApiError::AccountNotFound), "was: {err}");
}

#[tokio::test]
async fn account_lookups_by_email_are_case_insensitive_via_normalisation() {
    let db = new_test_db().await;
    db.upsert_account(&email("Carol@Example.com")).await.unwrap();
    let found = db.fetch_account_by_email(&email("carol@example.com")).await.unwrap();
    assert!(found.is_some());
    assert!(db.fetch_account_by_email(&email("nobody@example.com")).await.unwrap().is_none());
}

#[tokio::test]
async fn cart_removal_is_idempotent_and_owner_scoped() {
    let db = new_test_db().await;
    let owner = email("u@example.com");
    let other = email("v@example.com");
    let item = add_cart_item(&db, &owner, 1, 20.0).await;

    // A different owner cannot remove the item, even with the right id.
    assert!(!db.remove_cart_item(item.id, &other).await.unwrap());
    assert_eq!(db.cart_items_for_owner(&owner).await.unwrap().len(), 1);

    assert!(db.remove_cart_item(item.id, &owner).await.unwrap());
    assert!(!db.remove_cart_item(item.id, &owner).await.unwrap());
    assert!(db.cart_items_for_owner(&owner).await.unwrap().is_empty());
}

#[tokio::test]
async fn catalog_entries_round_trip() {
    let db = new_test_db().await;
    let treatment = db
        .insert_treatment(NewTreatment {
            name: "Dental cleaning".into(),
            description: Some("Routine scale and polish".into()),
            fees: Fee::from_major(80.0).unwrap(),
        })
        .await
        .unwrap();
    let listed = db.fetch_treatments().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, treatment.id);
    assert_eq!(listed[0].fees, Fee::from_minor(8000));
}
