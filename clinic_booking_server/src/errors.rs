use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use clinic_booking_engine::{
    traits::{AccountApiError, CartApiError, CatalogApiError, GatewayError},
    SettlementError,
};
use log::error;
use thiserror::Error;

use crate::auth::AuthError;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Payload deserialization error")]
    CouldNotDeserializePayload,
    #[error("No credential was provided")]
    Unauthenticated,
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("Could not read request path: {0}")]
    InvalidRequestPath(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    #[error("Authentication Error. {0}")]
    AuthenticationError(#[from] AuthError),
    #[error("The payment gateway could not authorize the charge.")]
    GatewayError(String),
    #[error("The data was not found. {0}")]
    NoRecordFound(String),
    #[error("Insufficient Permissions. {0}")]
    InsufficientPermissions(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::CouldNotDeserializePayload => StatusCode::BAD_REQUEST,
            Self::InvalidRequestPath(_) => StatusCode::BAD_REQUEST,
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::AuthenticationError(_) => StatusCode::FORBIDDEN,
            Self::InsufficientPermissions(_) => StatusCode::FORBIDDEN,
            Self::GatewayError(_) => StatusCode::BAD_GATEWAY,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Gateway and storage details are logged here and never echoed to the client.
        let message = match self {
            Self::GatewayError(detail) => {
                error!("💳️ Gateway authorization failed: {detail}");
                "The payment gateway could not authorize the charge.".to_string()
            },
            Self::BackendError(detail) => {
                error!("🗃️ Backend failure: {detail}");
                "An internal error occurred.".to_string()
            },
            Self::InitializeError(_) | Self::IOError(_) | Self::ConfigurationError(_) | Self::Unspecified(_) => {
                error!("🪛️ Server fault: {self}");
                "An internal error occurred.".to_string()
            },
            other => other.to_string(),
        };
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": message }).to_string())
    }
}

impl From<AccountApiError> for ServerError {
    fn from(e: AccountApiError) -> Self {
        match e {
            AccountApiError::AccountNotFound => Self::NoRecordFound("Account not found".to_string()),
            AccountApiError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
        }
    }
}

impl From<CartApiError> for ServerError {
    fn from(e: CartApiError) -> Self {
        match e {
            CartApiError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
        }
    }
}

impl From<CatalogApiError> for ServerError {
    fn from(e: CatalogApiError) -> Self {
        match e {
            CatalogApiError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
        }
    }
}

impl From<GatewayError> for ServerError {
    fn from(e: GatewayError) -> Self {
        Self::GatewayError(e.to_string())
    }
}

impl From<SettlementError> for ServerError {
    fn from(e: SettlementError) -> Self {
        match e {
            SettlementError::Validation(reason) => Self::InvalidRequestBody(reason),
            SettlementError::Forbidden(reason) => Self::InsufficientPermissions(reason),
            SettlementError::Gateway(g) => Self::GatewayError(g.to_string()),
            SettlementError::Storage(reason) => Self::BackendError(reason),
        }
    }
}
