//! Route definitions and their handlers.
//!
//! Every route is declared here, together with the guard chain that protects it. Handlers stay
//! thin: deserialize, check what only the HTTP layer can check, and delegate to the engine APIs.
//! Anything longer than a screen belongs in its own module.

use actix_web::{get, post, web, HttpResponse, Responder};
use cbs_common::DEFAULT_CURRENCY;
use clinic_booking_engine::{
    db_types::{NewCartItem, NewTreatment, Role, SettlementRequest},
    traits::{AccountManagement, CartManagement, CatalogManagement, PaymentGateway, SettlementStore},
    AccountApi,
    CartApi,
    CatalogApi,
    SettlementApi,
};
use log::*;
use rand::{distributions::Alphanumeric, thread_rng, Rng};

use crate::{
    auth::{JwtClaims, TokenIssuer},
    data_objects::{
        CheckoutRequest,
        CheckoutResponse,
        CredentialRequest,
        NewCartItemRequest,
        RegisterRequest,
        RemovalResponse,
        RoleResponse,
        SettleRequest,
        TokenResponse,
    },
    errors::ServerError,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro.
// The `where` clauses declare the guard chain: `secured` authenticates, `requires [role]` adds a
// role lookup, `requires self` adds the ownership comparison. Wrapping order matters: the last
// `.wrap` runs first, so authentication is always the outermost stage.
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };

    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+ where secured) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>)
                    .wrap($crate::middleware::BearerAuthFactory);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };

    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+ where requires [$role:expr]) => {
        paste::paste! { pub struct [<$name:camel Route>]<A>(core::marker::PhantomData<fn() -> A>);}
        paste::paste! { impl<A> [<$name:camel Route>]<A> {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self(core::marker::PhantomData::<fn() -> A>)
            }
        }}
        paste::paste! { impl<A> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<A>
        where
            A: $($bounds +)+ 'static,
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::<A>)
                    .wrap($crate::middleware::AclMiddlewareFactory::<A>::new($role))
                    .wrap($crate::middleware::BearerAuthFactory);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };

    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+ where requires self) => {
        paste::paste! { pub struct [<$name:camel Route>]<A>(core::marker::PhantomData<fn() -> A>);}
        paste::paste! { impl<A> [<$name:camel Route>]<A> {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self(core::marker::PhantomData::<fn() -> A>)
            }
        }}
        paste::paste! { impl<A> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<A>
        where
            A: $($bounds +)+ 'static,
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::<A>)
                    .wrap($crate::middleware::SelfCheckFactory)
                    .wrap($crate::middleware::BearerAuthFactory);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Credentials  ----------------------------------------------------
/// Issues a bearer credential for the given email.
///
/// The credential asserts an identity claim only. Whether that identity may do anything is decided
/// per request by the authorization middleware, so no account lookup happens here and issuance is
/// pure computation.
#[post("/credentials")]
pub async fn issue_credential(
    body: web::Json<CredentialRequest>,
    signer: web::Data<TokenIssuer>,
) -> Result<HttpResponse, ServerError> {
    let email = body.into_inner().email;
    trace!("💻️ Issuing credential for {email}");
    let token = signer.issue_token(email).map_err(|e| ServerError::Unspecified(e.to_string()))?;
    Ok(HttpResponse::Ok().json(TokenResponse { token }))
}

//----------------------------------------------   Accounts  ----------------------------------------------------
route!(register => Post "/accounts" impl AccountManagement);
/// Self-registration. Registering an email that already has an account is an idempotent no-op
/// returning the existing record, role untouched.
pub async fn register<B: AccountManagement>(
    body: web::Json<RegisterRequest>,
    api: web::Data<AccountApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let email = body.into_inner().email;
    debug!("💻️ POST account registration for {email}");
    let account = api.register(&email).await?;
    Ok(HttpResponse::Ok().json(account))
}

route!(accounts => Get "/accounts" impl AccountManagement where requires [Role::Admin]);
pub async fn accounts<B: AccountManagement>(api: web::Data<AccountApi<B>>) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET all accounts");
    let accounts = api.all_accounts().await?;
    Ok(HttpResponse::Ok().json(accounts))
}

route!(promote_account => Patch "/accounts/role/{id}" impl AccountManagement where requires [Role::Admin]);
pub async fn promote_account<B: AccountManagement>(
    path: web::Path<i64>,
    api: web::Data<AccountApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    debug!("💻️ PATCH promote account #{id}");
    let account = api.promote_to_admin(id).await?;
    Ok(HttpResponse::Ok().json(account))
}

route!(account_role => Get "/accounts/role/{email}" impl AccountManagement where requires self);
/// Reports whether the (authenticated, self-checked) email holds the admin role. An unregistered
/// email is simply not an admin; this endpoint never 404s.
pub async fn account_role<B: AccountManagement>(
    claims: JwtClaims,
    api: web::Data<AccountApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET role for {}", claims.sub);
    let role = api.role_for_email(&claims.sub).await?;
    Ok(HttpResponse::Ok().json(RoleResponse { admin: role == Some(Role::Admin) }))
}

//----------------------------------------------   Catalog  ----------------------------------------------------
route!(treatments => Get "/treatments" impl CatalogManagement);
pub async fn treatments<B: CatalogManagement>(api: web::Data<CatalogApi<B>>) -> Result<HttpResponse, ServerError> {
    trace!("💻️ GET treatments");
    let treatments = api.treatments().await?;
    Ok(HttpResponse::Ok().json(treatments))
}

route!(add_treatment => Post "/treatments" impl CatalogManagement, AccountManagement where requires [Role::Admin]);
pub async fn add_treatment<B: CatalogManagement>(
    body: web::Json<NewTreatment>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let treatment = body.into_inner();
    debug!("💻️ POST new treatment {}", treatment.name);
    let treatment = api.add_treatment(treatment).await?;
    Ok(HttpResponse::Ok().json(treatment))
}

//----------------------------------------------   Cart  ----------------------------------------------------
route!(add_cart_item => Post "/cart" impl CartManagement where secured);
/// Adds a cart item for the authenticated subject. The owner comes from the credential, never from
/// the body, so a caller cannot fill someone else's cart.
pub async fn add_cart_item<TCartManagement: CartManagement>(
    claims: JwtClaims,
    body: web::Json<NewCartItemRequest>,
    api: web::Data<CartApi<TCartManagement>>,
) -> Result<HttpResponse, ServerError> {
    let NewCartItemRequest { treatment_id, fees } = body.into_inner();
    debug!("💻️ POST cart item for {}", claims.sub);
    let item = api.add_item(NewCartItem { owner_email: claims.sub, treatment_id, fees }).await?;
    Ok(HttpResponse::Ok().json(item))
}

route!(cart_for_email => Get "/cart/{email}" impl CartManagement where requires self);
pub async fn cart_for_email<B: CartManagement>(
    claims: JwtClaims,
    api: web::Data<CartApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET cart for {}", claims.sub);
    let items = api.items_for(&claims.sub).await?;
    Ok(HttpResponse::Ok().json(items))
}

route!(remove_cart_item => Delete "/cart/{id}" impl CartManagement where secured);
/// Removes one of the authenticated subject's cart items. Removal is idempotent; an id that is
/// already gone (or that belongs to someone else) reports `removed: false` rather than an error.
pub async fn remove_cart_item<TCartManagement: CartManagement>(
    claims: JwtClaims,
    path: web::Path<i64>,
    api: web::Data<CartApi<TCartManagement>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    debug!("💻️ DELETE cart item #{id} for {}", claims.sub);
    let removed = api.remove_item(id, &claims.sub).await?;
    Ok(HttpResponse::Ok().json(RemovalResponse { removed }))
}

//----------------------------------------------   Checkout  ----------------------------------------------------
route!(checkout => Post "/checkout" impl PaymentGateway);
/// Requests a gateway authorization for an amount, without settling anything. The client completes
/// the charge with the returned client secret and then calls `/payments` to settle.
pub async fn checkout<TPaymentGateway: PaymentGateway>(
    body: web::Json<CheckoutRequest>,
    gateway: web::Data<TPaymentGateway>,
) -> Result<HttpResponse, ServerError> {
    let CheckoutRequest { fees, currency } = body.into_inner();
    if !fees.is_positive() {
        return Err(ServerError::InvalidRequestBody(format!("Fees must be positive, got {fees}")));
    }
    let currency = currency.unwrap_or_else(|| DEFAULT_CURRENCY.to_string());
    let key = new_idempotency_key();
    debug!("💻️ POST checkout authorization for {fees} ({currency})");
    let authorization = gateway.authorize(fees.minor_units(), &currency, &key).await?;
    Ok(HttpResponse::Ok().json(CheckoutResponse {
        gateway_reference: authorization.reference,
        client_secret: authorization.client_secret,
    }))
}

fn new_idempotency_key() -> String {
    let suffix: String = thread_rng().sample_iter(&Alphanumeric).take(24).map(char::from).collect();
    format!("co_{suffix}")
}

//----------------------------------------------   Settlement  ----------------------------------------------------
route!(settle => Post "/payments" impl SettlementStore, PaymentGateway where secured);
/// Runs the settlement engine for one checkout attempt.
///
/// The authenticated subject must match the body's `owner_email`; the engine additionally rejects
/// any cart item id owned by a different account, so foreign ids can never be deleted through this
/// endpoint.
pub async fn settle<TSettlementStore, TPaymentGateway>(
    claims: JwtClaims,
    body: web::Json<SettleRequest>,
    api: web::Data<SettlementApi<TSettlementStore, TPaymentGateway>>,
) -> Result<HttpResponse, ServerError>
where
    TSettlementStore: SettlementStore,
    TPaymentGateway: PaymentGateway,
{
    let request = body.into_inner();
    if claims.sub != request.owner_email {
        debug!("💻️ {} tried to settle a cart belonging to {}", claims.sub, request.owner_email);
        return Err(ServerError::InsufficientPermissions("You may only settle your own cart".to_string()));
    }
    debug!("💻️ POST settlement for {} ({} items)", request.owner_email, request.cart_item_ids.len());
    let request = SettlementRequest {
        owner_email: request.owner_email,
        fees: request.fees,
        cart_item_ids: request.cart_item_ids,
        currency: request.currency.unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
        idempotency_key: request.idempotency_key,
    };
    let outcome = api.settle(request).await?;
    Ok(HttpResponse::Ok().json(outcome))
}

route!(payments_for_email => Get "/payments/{email}" impl AccountManagement where requires self);
pub async fn payments_for_email<B: AccountManagement>(
    claims: JwtClaims,
    api: web::Data<AccountApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET payments for {}", claims.sub);
    let payments = api.payments_for(&claims.sub).await?;
    Ok(HttpResponse::Ok().json(payments))
}
