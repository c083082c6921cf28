//! Role and self-ownership authorization on the account routes.

use std::str::FromStr;

use actix_web::{test::TestRequest, web, web::ServiceConfig};
use chrono::Utc;
use clinic_booking_engine::{
    db_types::{Account, EmailAddress, Role},
    traits::AccountApiError,
    AccountApi,
};
use log::info;

use super::{
    helpers::{get_request, send_request, valid_token},
    mocks::MockAccountManager,
};
use crate::routes::{AccountRoleRoute, AccountsRoute, PromoteAccountRoute};

fn account(id: i64, email: &str, role: Role) -> Account {
    Account {
        id,
        email: EmailAddress::from_str(email).unwrap(),
        role,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn configure_with(manager: MockAccountManager) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(AccountApi::new(manager)))
            .service(AccountsRoute::<MockAccountManager>::new())
            .service(PromoteAccountRoute::<MockAccountManager>::new())
            .service(AccountRoleRoute::<MockAccountManager>::new());
    }
}

#[actix_web::test]
async fn admins_may_list_accounts() {
    let _ = env_logger::try_init().ok();
    let mut manager = MockAccountManager::new();
    manager.expect_fetch_account_by_email().returning(|e| Ok(Some(account(1, e.as_str(), Role::Admin))));
    manager
        .expect_fetch_all_accounts()
        .returning(|| Ok(vec![account(1, "root@clinic.test", Role::Admin), account(2, "u@clinic.test", Role::User)]));
    let token = valid_token("root@clinic.test");
    let (status, body) = get_request(&token, "/accounts", configure_with(manager)).await;
    info!("Response body: {body}");
    assert!(status.is_success());
    assert!(body.contains("u@clinic.test"), "was: {body}");
}

#[actix_web::test]
async fn ordinary_users_may_not_list_accounts() {
    let _ = env_logger::try_init().ok();
    let mut manager = MockAccountManager::new();
    manager.expect_fetch_account_by_email().returning(|e| Ok(Some(account(2, e.as_str(), Role::User))));
    let token = valid_token("u@clinic.test");
    let (status, body) = get_request(&token, "/accounts", configure_with(manager)).await;
    assert_eq!(status.as_u16(), 403);
    assert!(body.contains("requires the admin role"), "was: {body}");
}

#[actix_web::test]
async fn promoting_an_unknown_account_is_not_found() {
    let _ = env_logger::try_init().ok();
    let mut manager = MockAccountManager::new();
    manager.expect_fetch_account_by_email().returning(|e| Ok(Some(account(1, e.as_str(), Role::Admin))));
    manager.expect_assign_role().returning(|_, _| Err(AccountApiError::AccountNotFound));
    let token = valid_token("root@clinic.test");
    let req = TestRequest::patch().uri("/accounts/role/999");
    let (status, body) = send_request(req, &token, configure_with(manager)).await;
    assert_eq!(status.as_u16(), 404);
    assert!(body.contains("Account not found"), "was: {body}");
}

#[actix_web::test]
async fn promotion_reports_the_new_role() {
    let _ = env_logger::try_init().ok();
    let mut manager = MockAccountManager::new();
    manager.expect_fetch_account_by_email().returning(|e| Ok(Some(account(1, e.as_str(), Role::Admin))));
    manager.expect_assign_role().returning(|id, role| Ok(account(id, "u@clinic.test", role)));
    let token = valid_token("root@clinic.test");
    let req = TestRequest::patch().uri("/accounts/role/2");
    let (status, body) = send_request(req, &token, configure_with(manager)).await;
    assert!(status.is_success());
    assert!(body.contains(r#""role":"admin""#), "was: {body}");
}

#[actix_web::test]
async fn the_role_lookup_is_self_scoped() {
    let _ = env_logger::try_init().ok();
    // Valid credential, but for a different subject than the path names.
    let manager = MockAccountManager::new();
    let token = valid_token("mallory@clinic.test");
    let (status, body) = get_request(&token, "/accounts/role/alice@clinic.test", configure_with(manager)).await;
    assert_eq!(status.as_u16(), 403);
    assert!(body.contains("your own resources"), "was: {body}");
}

#[actix_web::test]
async fn the_role_lookup_reports_admin_membership() {
    let _ = env_logger::try_init().ok();
    let mut manager = MockAccountManager::new();
    manager.expect_fetch_account_by_email().returning(|e| Ok(Some(account(1, e.as_str(), Role::User))));
    let token = valid_token("alice@clinic.test");
    let (status, body) = get_request(&token, "/accounts/role/alice@clinic.test", configure_with(manager)).await;
    assert!(status.is_success());
    assert_eq!(body, r#"{"admin":false}"#);
}

#[actix_web::test]
async fn unregistered_emails_are_simply_not_admins() {
    let _ = env_logger::try_init().ok();
    let mut manager = MockAccountManager::new();
    manager.expect_fetch_account_by_email().returning(|_| Ok(None));
    let token = valid_token("ghost@clinic.test");
    let (status, body) = get_request(&token, "/accounts/role/ghost@clinic.test", configure_with(manager)).await;
    assert!(status.is_success());
    assert_eq!(body, r#"{"admin":false}"#);
}
