//! Checkout and settlement over HTTP: ownership enforcement, the happy path, and the opacity of
//! gateway failures.

use std::str::FromStr;

use actix_web::{test::TestRequest, web, web::ServiceConfig};
use cbs_common::Fee;
use chrono::Utc;
use clinic_booking_engine::{
    db_types::{EmailAddress, Json, PaymentRecord, SettlementOutcome},
    traits::{GatewayAuthorization, GatewayError},
    SettlementApi,
};
use log::info;
use serde_json::json;

use super::{
    helpers::{send_request, valid_token},
    mocks::{MockGateway, MockSettlementManager},
};
use crate::routes::{CheckoutRoute, SettleRoute};

fn payment_record(owner: &str, ids: Vec<i64>, key: &str) -> PaymentRecord {
    PaymentRecord {
        id: 1,
        owner_email: EmailAddress::from_str(owner).unwrap(),
        fees: Fee::from_minor(3500),
        removed_count: ids.len() as i64,
        settled_item_ids: Json(ids),
        gateway_reference: "pi_endpoint_001".to_string(),
        idempotency_key: key.to_string(),
        created_at: Utc::now(),
    }
}

fn configure_settlement(
    store: MockSettlementManager,
    gateway: MockGateway,
) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(SettlementApi::new(store, gateway)))
            .service(SettleRoute::<MockSettlementManager, MockGateway>::new());
    }
}

fn settle_body(owner: &str) -> serde_json::Value {
    json!({
        "owner_email": owner,
        "fees": 35.0,
        "cart_item_ids": [11, 12],
        "idempotency_key": "attempt-http-1",
    })
}

#[actix_web::test]
async fn settlement_requires_the_owner_credential() {
    let _ = env_logger::try_init().ok();
    // Neither the store nor the gateway may be touched when the subject mismatches the body.
    let configure = configure_settlement(MockSettlementManager::new(), MockGateway::new());
    let token = valid_token("mallory@clinic.test");
    let req = TestRequest::post().uri("/payments").set_json(settle_body("alice@clinic.test"));
    let (status, body) = send_request(req, &token, configure).await;
    assert_eq!(status.as_u16(), 403);
    assert!(body.contains("settle your own cart"), "was: {body}");
}

#[actix_web::test]
async fn settlement_reports_the_payment_record() {
    let _ = env_logger::try_init().ok();
    let mut store = MockSettlementManager::new();
    store.expect_payment_by_idempotency_key().returning(|_| Ok(None));
    store.expect_settle_cart_items().returning(|payment| {
        let ids = payment.settled_item_ids.clone();
        Ok(SettlementOutcome {
            removed_count: ids.len() as u64,
            payment: payment_record(payment.owner_email.as_str(), ids, &payment.idempotency_key),
        })
    });
    let mut gateway = MockGateway::new();
    gateway.expect_authorize().times(1).returning(|_, _, _| {
        Ok(GatewayAuthorization { reference: "pi_endpoint_001".into(), client_secret: None })
    });
    let token = valid_token("alice@clinic.test");
    let req = TestRequest::post().uri("/payments").set_json(settle_body("alice@clinic.test"));
    let (status, body) = send_request(req, &token, configure_settlement(store, gateway)).await;
    info!("Response body: {body}");
    assert!(status.is_success());
    assert!(body.contains(r#""removed_count":2"#), "was: {body}");
    assert!(body.contains("pi_endpoint_001"), "was: {body}");
}

#[actix_web::test]
async fn gateway_declines_are_opaque_bad_gateway_responses() {
    let _ = env_logger::try_init().ok();
    let mut store = MockSettlementManager::new();
    store.expect_payment_by_idempotency_key().returning(|_| Ok(None));
    let mut gateway = MockGateway::new();
    gateway.expect_authorize().returning(|_, _, _| {
        Err(GatewayError::Declined { status: 402, message: "card_declined: insufficient_funds".into() })
    });
    let token = valid_token("alice@clinic.test");
    let req = TestRequest::post().uri("/payments").set_json(settle_body("alice@clinic.test"));
    let (status, body) = send_request(req, &token, configure_settlement(store, gateway)).await;
    assert_eq!(status.as_u16(), 502);
    // The decline reason stays in the server log.
    assert!(!body.contains("card_declined"), "was: {body}");
    assert_eq!(body, r#"{"error":"The payment gateway could not authorize the charge."}"#);
}

#[actix_web::test]
async fn empty_id_sets_never_reach_the_gateway() {
    let _ = env_logger::try_init().ok();
    let mut store = MockSettlementManager::new();
    store.expect_payment_by_idempotency_key().returning(|_| Ok(None));
    let configure = configure_settlement(store, MockGateway::new());
    let token = valid_token("alice@clinic.test");
    let body = json!({
        "owner_email": "alice@clinic.test",
        "fees": 35.0,
        "cart_item_ids": [],
        "idempotency_key": "attempt-http-2",
    });
    let req = TestRequest::post().uri("/payments").set_json(body);
    let (status, body) = send_request(req, &token, configure).await;
    assert_eq!(status.as_u16(), 400);
    assert!(body.contains("empty"), "was: {body}");
}

#[actix_web::test]
async fn checkout_authorizes_without_settling() {
    let _ = env_logger::try_init().ok();
    let mut gateway = MockGateway::new();
    gateway.expect_authorize().times(1).returning(|amount, currency, _| {
        assert_eq!(amount, 4200);
        assert_eq!(currency, "usd");
        Ok(GatewayAuthorization { reference: "pi_checkout_001".into(), client_secret: Some("secret".into()) })
    });
    let req = TestRequest::post().uri("/checkout").set_json(json!({"fees": 42.0}));
    let (status, body) = send_request(req, "", |cfg| {
        cfg.app_data(web::Data::new(gateway)).service(CheckoutRoute::<MockGateway>::new());
    })
    .await;
    assert!(status.is_success());
    assert!(body.contains("pi_checkout_001"), "was: {body}");
}

#[actix_web::test]
async fn checkout_rejects_non_positive_fees() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::post().uri("/checkout").set_json(json!({"fees": 0.0}));
    let (status, body) = send_request(req, "", |cfg| {
        cfg.app_data(web::Data::new(MockGateway::new())).service(CheckoutRoute::<MockGateway>::new());
    })
    .await;
    assert_eq!(status.as_u16(), 400);
    assert!(body.contains("positive"), "was: {body}");
}
