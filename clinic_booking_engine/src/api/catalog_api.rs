use std::fmt::Debug;

use crate::{
    db_types::{NewTreatment, Treatment},
    traits::{CatalogApiError, CatalogManagement},
};

pub struct CatalogApi<B> {
    db: B,
}

impl<B: Debug> Debug for CatalogApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CatalogApi ({:?})", self.db)
    }
}

impl<B> CatalogApi<B>
where B: CatalogManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    pub async fn add_treatment(&self, treatment: NewTreatment) -> Result<Treatment, CatalogApiError> {
        self.db.insert_treatment(treatment).await
    }

    pub async fn treatments(&self) -> Result<Vec<Treatment>, CatalogApiError> {
        self.db.fetch_treatments().await
    }
}
