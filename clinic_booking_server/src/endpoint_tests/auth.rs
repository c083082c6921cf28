//! Authentication behaviour at the HTTP boundary: the credential endpoint itself, and how the
//! bearer middleware answers missing, garbled and expired credentials on a guarded route.

use actix_web::{test::TestRequest, web, web::ServiceConfig};
use chrono::{Duration, Utc};
use clinic_booking_engine::AccountApi;
use log::info;
use serde_json::json;

use super::{
    helpers::{get_auth_config, get_request, issue_token, send_request, valid_token},
    mocks::MockAccountManager,
};
use crate::{
    auth::{TokenIssuer, TokenVerifier},
    data_objects::TokenResponse,
    routes::{issue_credential, AccountsRoute},
};

fn configure(cfg: &mut ServiceConfig) {
    // The guarded route only exists to exercise the middleware; no expectation is set on the
    // store, so any request that reaches the role lookup would panic the test.
    let accounts_api = AccountApi::new(MockAccountManager::new());
    cfg.app_data(web::Data::new(accounts_api)).service(AccountsRoute::<MockAccountManager>::new());
}

#[actix_web::test]
async fn guarded_route_without_header_is_unauthenticated() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request("", "/accounts", configure).await;
    assert_eq!(status.as_u16(), 401);
    assert!(body.contains("No credential was provided"), "was: {body}");
}

#[actix_web::test]
async fn guarded_route_with_garbled_credential_is_forbidden() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request("complete nonsense", "/accounts", configure).await;
    assert_eq!(status.as_u16(), 403);
    assert!(body.contains("invalid or the token is malformed"), "was: {body}");
}

#[actix_web::test]
async fn guarded_route_with_expired_credential_is_forbidden() {
    let _ = env_logger::try_init().ok();
    let token = issue_token("alice@clinic.test", Utc::now() - Duration::hours(2));
    let (status, body) = get_request(&token, "/accounts", configure).await;
    assert_eq!(status.as_u16(), 403);
    assert!(body.contains("Credential has expired"), "was: {body}");
}

#[actix_web::test]
async fn issued_credentials_pass_verification() {
    let _ = env_logger::try_init().ok();
    let config = get_auth_config();
    let req = TestRequest::post().uri("/credentials").set_json(json!({"email": "alice@clinic.test"}));
    let (status, body) = send_request(req, "", |cfg| {
        cfg.app_data(web::Data::new(TokenIssuer::new(&config))).service(issue_credential);
    })
    .await;
    info!("Response body: {body}");
    assert!(status.is_success());
    let response: TokenResponse = serde_json::from_str(&body).unwrap();
    let claims = TokenVerifier::new(&get_auth_config()).validate(&response.token).unwrap();
    assert_eq!(claims.sub.as_str(), "alice@clinic.test");
}

#[actix_web::test]
async fn credentials_for_bad_emails_are_rejected() {
    let _ = env_logger::try_init().ok();
    let config = get_auth_config();
    let req = TestRequest::post().uri("/credentials").set_json(json!({"email": "not-an-email"}));
    let (status, _body) = send_request(req, "", |cfg| {
        cfg.app_data(web::Data::new(TokenIssuer::new(&config))).service(issue_credential);
    })
    .await;
    assert!(status.is_client_error());
}

#[actix_web::test]
async fn a_valid_credential_still_needs_authorization() {
    // Authentication succeeding is not enough; the role stage runs next and rejects unknown
    // accounts.
    let _ = env_logger::try_init().ok();
    let token = valid_token("nobody@clinic.test");
    let (status, body) = get_request(&token, "/accounts", |cfg| {
        let mut manager = MockAccountManager::new();
        manager.expect_fetch_account_by_email().returning(|_| Ok(None));
        cfg.app_data(web::Data::new(AccountApi::new(manager)))
            .service(AccountsRoute::<MockAccountManager>::new());
    })
    .await;
    assert_eq!(status.as_u16(), 403);
    assert!(body.contains("Insufficient Permissions"), "was: {body}");
}
