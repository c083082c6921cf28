#![allow(dead_code)]

use std::str::FromStr;

use cbs_common::Fee;
use clinic_booking_engine::{
    db_types::{CartItem, EmailAddress, NewCartItem},
    traits::CartManagement,
    SqliteDatabase,
};

pub fn random_db_url() -> String {
    let path = std::env::temp_dir().join(format!("cbs_test_store_{}.db", rand::random::<u64>()));
    format!("sqlite://{}", path.display())
}

pub async fn new_test_db() -> SqliteDatabase {
    let _ = env_logger::try_init();
    SqliteDatabase::new_with_url(&random_db_url(), 5).await.expect("Error creating test database")
}

pub fn email(s: &str) -> EmailAddress {
    EmailAddress::from_str(s).expect("invalid test email")
}

pub async fn add_cart_item(db: &SqliteDatabase, owner: &EmailAddress, treatment_id: i64, fees: f64) -> CartItem {
    let item = NewCartItem {
        owner_email: owner.clone(),
        treatment_id,
        fees: Fee::from_major(fees).expect("invalid test fee"),
    };
    db.insert_cart_item(item).await.expect("could not seed cart item")
}
