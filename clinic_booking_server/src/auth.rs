//! Bearer credential issuance and verification.
//!
//! Credentials are stateless JWTs signed with HMAC-SHA256. The subject email is the only claim the
//! rest of the system cares about; verification is pure computation so the middleware never has to
//! touch the identity store just to authenticate. Role lookups happen afterwards, in the ACL
//! middleware.

use std::future::{ready, Ready};

use actix_web::{dev::Payload, FromRequest, HttpMessage, HttpRequest};
use chrono::{Duration, Utc};
use clinic_booking_engine::db_types::EmailAddress;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{config::AuthConfig, errors::ServerError};

pub fn default_token_ttl() -> Duration {
    Duration::hours(1)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: EmailAddress,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("Credential has expired.")]
    TokenExpired,
    #[error("Credential signature is invalid or the token is malformed.")]
    InvalidToken,
    #[error("Could not sign the credential. {0}")]
    SigningError(String),
}

/// Issues access tokens. Holds the signing half of the shared secret plus the configured lifetime.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(config: &AuthConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.jwt_secret.reveal().as_bytes());
        Self { encoding_key, ttl: config.token_ttl }
    }

    /// Issue a new access token for the given email address.
    ///
    /// This method DOES NOT check that the email corresponds to a registered account. A credential
    /// only asserts an identity claim; what that identity may do is decided per request by the
    /// authorization middleware.
    pub fn issue_token(&self, email: EmailAddress) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = JwtClaims { sub: email, iat: now.timestamp(), exp: (now + self.ttl).timestamp() };
        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| AuthError::SigningError(e.to_string()))
    }
}

/// Verifies access tokens. Holds only the verification half of the shared secret.
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
}

impl TokenVerifier {
    pub fn new(config: &AuthConfig) -> Self {
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.reveal().as_bytes());
        Self { decoding_key }
    }

    /// Validate a bearer token string and return its claims.
    ///
    /// Expiry is checked with zero leeway. An expired token is reported distinctly from a
    /// tampered or malformed one, but both map to a 403 at the HTTP boundary.
    pub fn validate(&self, token: &str) -> Result<JwtClaims, AuthError> {
        let mut validation = Validation::default();
        validation.validate_exp = true;
        validation.leeway = 0;
        decode::<JwtClaims>(token, &self.decoding_key, &validation).map(|data| data.claims).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken,
            }
        })
    }
}

// The BearerAuth middleware stores validated claims in the request extensions. Handlers ask for
// them with a plain `claims: JwtClaims` parameter.
impl FromRequest for JwtClaims {
    type Error = ServerError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let claims = req.extensions().get::<JwtClaims>().cloned();
        ready(claims.ok_or(ServerError::Unauthenticated))
    }
}
