//! Role-based access control middleware.
//!
//! Runs after authentication. The authenticated subject is looked up in the identity store on
//! every guarded request; an absent account or a role mismatch is a 403. Credentials carry no role
//! claim, so a promotion or demotion takes effect on the next request, not the next login.

use std::{marker::PhantomData, pin::Pin, rc::Rc};

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    web,
    Error,
    HttpMessage,
};
use clinic_booking_engine::{db_types::Role, traits::AccountManagement, AccountApi};
use futures::{
    future::{ok, Ready},
    Future,
};

use crate::{auth::JwtClaims, errors::ServerError};

pub struct AclMiddlewareFactory<B> {
    required_role: Role,
    _backend: PhantomData<fn() -> B>,
}

impl<B> AclMiddlewareFactory<B> {
    pub fn new(required_role: Role) -> Self {
        Self { required_role, _backend: PhantomData }
    }
}

impl<S, B, Body> Transform<S, ServiceRequest> for AclMiddlewareFactory<B>
where
    S: Service<ServiceRequest, Response = ServiceResponse<Body>, Error = Error> + 'static,
    S::Future: 'static,
    B: AccountManagement + 'static,
    Body: 'static,
{
    type Error = Error;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;
    type InitError = ();
    type Response = ServiceResponse<Body>;
    type Transform = AclMiddlewareService<S, B>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AclMiddlewareService {
            required_role: self.required_role,
            service: Rc::new(service),
            _backend: PhantomData,
        })
    }
}

pub struct AclMiddlewareService<S, B> {
    required_role: Role,
    service: Rc<S>,
    _backend: PhantomData<fn() -> B>,
}

impl<S, B, Body> Service<ServiceRequest> for AclMiddlewareService<S, B>
where
    S: Service<ServiceRequest, Response = ServiceResponse<Body>, Error = Error> + 'static,
    S::Future: 'static,
    B: AccountManagement + 'static,
    Body: 'static,
{
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;
    type Response = ServiceResponse<Body>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let required_role = self.required_role;
        Box::pin(async move {
            let claims = req
                .extensions()
                .get::<JwtClaims>()
                .cloned()
                .ok_or_else(|| {
                    log::warn!("No JWT claims found in request extensions");
                    ServerError::Unspecified("No JWT claims found in request extensions".to_string())
                })?;
            let api = req
                .app_data::<web::Data<AccountApi<B>>>()
                .cloned()
                .ok_or_else(|| {
                    log::warn!("No account API found in app data");
                    ServerError::Unspecified("No account API found in app data".to_string())
                })?;
            let role = api.role_for_email(&claims.sub).await.map_err(ServerError::from)?;
            match role {
                Some(role) if role == required_role => service.call(req).await,
                _ => Err(ServerError::InsufficientPermissions(format!(
                    "This endpoint requires the {required_role} role"
                ))
                .into()),
            }
        })
    }
}
