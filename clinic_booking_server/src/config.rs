use std::{env, time::Duration as StdDuration};

use cbs_common::Secret;
use chrono::Duration;
use clinic_booking_engine::gateway::GatewayConfig;
use log::*;
use rand::{distributions::Alphanumeric, thread_rng, Rng};

use crate::{auth::default_token_ttl, errors::ServerError};

const DEFAULT_CBS_HOST: &str = "127.0.0.1";
const DEFAULT_CBS_PORT: u16 = 4780;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub auth: AuthConfig,
    pub gateway: GatewayConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_CBS_HOST.to_string(),
            port: DEFAULT_CBS_PORT,
            database_url: String::default(),
            auth: AuthConfig::default(),
            gateway: GatewayConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("CBS_HOST").ok().unwrap_or_else(|| DEFAULT_CBS_HOST.into());
        let port = env::var("CBS_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for CBS_PORT. {e} Using the default, {DEFAULT_CBS_PORT}, instead."
                    );
                    DEFAULT_CBS_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_CBS_PORT);
        let database_url = env::var("CBS_DATABASE_URL").ok().unwrap_or_else(|| {
            error!("🪛️ CBS_DATABASE_URL is not set. Please set it to the URL for the clinic database.");
            String::default()
        });
        let auth = AuthConfig::try_from_env().unwrap_or_else(|e| {
            warn!(
                "🪛️ Could not load the authentication configuration from environment variables. {e}. Reverting to the \
                 default configuration."
            );
            AuthConfig::default()
        });
        let gateway = gateway_config_from_env();
        Self { host, port, database_url, auth, gateway }
    }
}

fn gateway_config_from_env() -> GatewayConfig {
    let secret_key = env::var("CBS_GATEWAY_SECRET_KEY").map(Secret::new).unwrap_or_else(|_| {
        error!(
            "🪛️ CBS_GATEWAY_SECRET_KEY is not set. Checkout and settlement will fail until a gateway secret key is \
             configured."
        );
        Secret::default()
    });
    let mut config = GatewayConfig { secret_key, ..Default::default() };
    if let Ok(url) = env::var("CBS_GATEWAY_URL") {
        config.base_url = url;
    }
    if let Ok(s) = env::var("CBS_GATEWAY_TIMEOUT_SECONDS") {
        match s.parse::<u64>() {
            Ok(secs) => config.timeout = Some(StdDuration::from_secs(secs)),
            Err(e) => warn!("🪛️ Invalid configuration value for CBS_GATEWAY_TIMEOUT_SECONDS. {e}"),
        }
    }
    config
}

//-------------------------------------------------  AuthConfig  -------------------------------------------------------

#[derive(Clone, Debug)]
pub struct AuthConfig {
    /// The HMAC secret used to sign and verify access tokens.
    pub jwt_secret: Secret<String>,
    /// How long an issued token stays valid.
    pub token_ttl: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        warn!(
            "🚨️🚨️🚨️ The JWT signing secret has not been set. I'm using a random value for this session. DO NOT \
             operate on production like this since every credential dies with the process. Set CBS_JWT_SECRET instead. \
             🚨️🚨️🚨️"
        );
        let secret: String = thread_rng().sample_iter(&Alphanumeric).take(48).map(char::from).collect();
        Self { jwt_secret: Secret::new(secret), token_ttl: default_token_ttl() }
    }
}

impl AuthConfig {
    pub fn try_from_env() -> Result<Self, ServerError> {
        let secret =
            env::var("CBS_JWT_SECRET").map_err(|e| ServerError::ConfigurationError(format!("{e} [CBS_JWT_SECRET]")))?;
        if secret.len() < 32 {
            warn!("🪛️ CBS_JWT_SECRET is shorter than 32 bytes. Consider using a longer secret.");
        }
        let token_ttl = match env::var("CBS_JWT_TTL_SECONDS") {
            Ok(s) => s
                .parse::<i64>()
                .map(Duration::seconds)
                .map_err(|e| ServerError::ConfigurationError(format!("Invalid CBS_JWT_TTL_SECONDS: {e}")))?,
            Err(_) => default_token_ttl(),
        };
        Ok(Self { jwt_secret: Secret::new(secret), token_ttl })
    }
}
