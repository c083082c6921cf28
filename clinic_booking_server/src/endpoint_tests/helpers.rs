use std::str::FromStr;

use actix_web::{
    body::MessageBody,
    http::{header, StatusCode},
    test,
    test::TestRequest,
    web,
    web::ServiceConfig,
    App,
};
use cbs_common::Secret;
use chrono::{DateTime, Utc};
use clinic_booking_engine::db_types::EmailAddress;
use jsonwebtoken::{encode, EncodingKey, Header};
use log::debug;

use crate::{
    auth::{default_token_ttl, JwtClaims, TokenVerifier},
    config::AuthConfig,
};

// Creates a test `AuthConfig` for issuing tokens. DO NOT re-use this secret anywhere.
pub fn get_auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: Secret::new("endpoint-test-secret-3d2c1b0a99887766".to_string()),
        token_ttl: default_token_ttl(),
    }
}

pub fn issue_token(email: &str, expiry: DateTime<Utc>) -> String {
    let config = get_auth_config();
    let claims = JwtClaims {
        sub: EmailAddress::from_str(email).expect("invalid test email"),
        iat: Utc::now().timestamp(),
        exp: expiry.timestamp(),
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(config.jwt_secret.reveal().as_bytes()))
        .expect("Failed to sign token")
}

pub fn valid_token(email: &str) -> String {
    issue_token(email, Utc::now() + default_token_ttl())
}

/// Runs one request against an app built from `configure`, with the test token verifier installed.
/// Middleware rejections and handler errors both come back as (status, body).
pub async fn send_request<F>(mut req: TestRequest, auth_header: &str, configure: F) -> (StatusCode, String)
where F: FnOnce(&mut ServiceConfig) {
    if !auth_header.is_empty() {
        req = req.insert_header((header::AUTHORIZATION, format!("Bearer {auth_header}")));
    }
    let verifier = TokenVerifier::new(&get_auth_config());
    let app = App::new().app_data(web::Data::new(verifier)).configure(configure);
    let service = test::init_service(app).await;
    debug!("Making request");
    match test::try_call_service(&service, req.to_request()).await {
        Ok(res) => {
            let (_, res) = res.into_parts();
            let status = res.status();
            let body = String::from_utf8_lossy(&res.into_body().try_into_bytes().unwrap()).into_owned();
            (status, body)
        },
        Err(e) => {
            let res = e.error_response();
            let status = res.status();
            let body = String::from_utf8_lossy(&res.into_body().try_into_bytes().unwrap()).into_owned();
            (status, body)
        },
    }
}

pub async fn get_request<F>(auth_header: &str, path: &str, configure: F) -> (StatusCode, String)
where F: FnOnce(&mut ServiceConfig) {
    send_request(TestRequest::get().uri(path), auth_header, configure).await
}
