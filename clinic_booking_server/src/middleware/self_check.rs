//! Self-ownership middleware.
//!
//! Runs after authentication on routes carrying an `{email}` path segment. The comparison happens
//! before any data lookup, so a caller probing another account's resources learns nothing about
//! whether they exist.

use std::{pin::Pin, rc::Rc, str::FromStr};

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error,
    HttpMessage,
};
use clinic_booking_engine::db_types::EmailAddress;
use futures::{
    future::{ok, Ready},
    Future,
};

use crate::{auth::JwtClaims, errors::ServerError};

pub struct SelfCheckFactory;

impl<S, B> Transform<S, ServiceRequest> for SelfCheckFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;
    type InitError = ();
    type Response = ServiceResponse<B>;
    type Transform = SelfCheckService<S>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(SelfCheckService { service: Rc::new(service) })
    }
}

pub struct SelfCheckService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for SelfCheckService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;
    type Response = ServiceResponse<B>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        Box::pin(async move {
            let claims = req
                .extensions()
                .get::<JwtClaims>()
                .cloned()
                .ok_or_else(|| {
                    log::warn!("No JWT claims found in request extensions");
                    ServerError::Unspecified("No JWT claims found in request extensions".to_string())
                })?;
            let email = req
                .match_info()
                .get("email")
                .ok_or_else(|| ServerError::InvalidRequestPath("No email in request path".to_string()))?;
            let email = EmailAddress::from_str(email)
                .map_err(|e| ServerError::InvalidRequestPath(e.to_string()))?;
            if claims.sub == email {
                service.call(req).await
            } else {
                Err(ServerError::InsufficientPermissions(
                    "You may only access your own resources".to_string(),
                )
                .into())
            }
        })
    }
}
