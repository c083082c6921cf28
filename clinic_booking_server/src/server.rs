use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use clinic_booking_engine::{
    gateway::StripeGateway,
    AccountApi,
    CartApi,
    CatalogApi,
    SettlementApi,
    SqliteDatabase,
};

use crate::{
    auth::{TokenIssuer, TokenVerifier},
    config::ServerConfig,
    errors::ServerError,
    routes::{
        health,
        issue_credential,
        AccountRoleRoute,
        AccountsRoute,
        AddCartItemRoute,
        AddTreatmentRoute,
        CartForEmailRoute,
        CheckoutRoute,
        PaymentsForEmailRoute,
        PromoteAccountRoute,
        RegisterRoute,
        RemoveCartItemRoute,
        SettleRoute,
        TreatmentsRoute,
    },
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let gateway =
        StripeGateway::new(config.gateway.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let srv = create_server_instance(config, db, gateway)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    gateway: StripeGateway,
) -> Result<Server, ServerError> {
    let host = config.host.clone();
    let port = config.port;
    let srv = HttpServer::new(move || {
        let accounts_api = AccountApi::new(db.clone());
        let catalog_api = CatalogApi::new(db.clone());
        let cart_api = CartApi::new(db.clone());
        let settlement_api = SettlementApi::new(db.clone(), gateway.clone());
        let jwt_signer = TokenIssuer::new(&config.auth);
        let jwt_verifier = TokenVerifier::new(&config.auth);
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("cbs::access_log"))
            .app_data(web::Data::new(accounts_api))
            .app_data(web::Data::new(catalog_api))
            .app_data(web::Data::new(cart_api))
            .app_data(web::Data::new(settlement_api))
            .app_data(web::Data::new(gateway.clone()))
            .app_data(web::Data::new(jwt_signer))
            .app_data(web::Data::new(jwt_verifier))
            .service(health)
            .service(issue_credential)
            .service(RegisterRoute::<SqliteDatabase>::new())
            .service(AccountsRoute::<SqliteDatabase>::new())
            .service(PromoteAccountRoute::<SqliteDatabase>::new())
            .service(AccountRoleRoute::<SqliteDatabase>::new())
            .service(TreatmentsRoute::<SqliteDatabase>::new())
            .service(AddTreatmentRoute::<SqliteDatabase>::new())
            .service(AddCartItemRoute::<SqliteDatabase>::new())
            .service(CartForEmailRoute::<SqliteDatabase>::new())
            .service(RemoveCartItemRoute::<SqliteDatabase>::new())
            .service(CheckoutRoute::<StripeGateway>::new())
            .service(SettleRoute::<SqliteDatabase, StripeGateway>::new())
            .service(PaymentsForEmailRoute::<SqliteDatabase>::new())
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((host.as_str(), port))?
    .run();
    Ok(srv)
}
