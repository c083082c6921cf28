//! Authentication middleware. Extracts and validates the bearer credential.
//!
//! A missing `Authorization` header is a 401. A header that is present but fails validation, in
//! any way (wrong scheme, tampered, expired, garbled), is a 403. On success the decoded claims are
//! inserted into the request extensions for the downstream stages and handlers.

use std::{pin::Pin, rc::Rc};

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    web,
    Error,
    HttpMessage,
};
use futures::{
    future::{ok, Ready},
    Future,
};

use crate::{
    auth::{AuthError, JwtClaims, TokenVerifier},
    errors::ServerError,
};

pub struct BearerAuthFactory;

impl<S, B> Transform<S, ServiceRequest> for BearerAuthFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;
    type InitError = ();
    type Response = ServiceResponse<B>;
    type Transform = BearerAuthService<S>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(BearerAuthService { service: Rc::new(service) })
    }
}

pub struct BearerAuthService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for BearerAuthService<S>
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
            let header = match req.headers().get(header::AUTHORIZATION) {
                Some(h) => h,
                None => return Err(ServerError::Unauthenticated.into()),
            };
            let token = header
                .to_str()
                .ok()
                .and_then(|v| v.strip_prefix("Bearer "))
                .ok_or(ServerError::AuthenticationError(AuthError::InvalidToken))?;
            let verifier = req.app_data::<web::Data<TokenVerifier>>().ok_or_else(|| {
                log::warn!("No token verifier found in app data");
                ServerError::Unspecified("No token verifier found in app data".to_string())
            })?;
            let claims = verifier.validate(token).map_err(ServerError::AuthenticationError)?;
            req.extensions_mut().insert(claims);
            service.call(req).await
        })
    }
}
