use thiserror::Error;

use crate::db_types::{NewTreatment, Treatment};

#[derive(Debug, Clone, Error)]
pub enum CatalogApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for CatalogApiError {
    fn from(e: sqlx::Error) -> Self {
        Self::DatabaseError(e.to_string())
    }
}

/// Plain catalog CRUD. No cross-entity invariants live here.
#[allow(async_fn_in_trait)]
pub trait CatalogManagement {
    async fn insert_treatment(&self, treatment: NewTreatment) -> Result<Treatment, CatalogApiError>;

    async fn fetch_treatments(&self) -> Result<Vec<Treatment>, CatalogApiError>;
}
