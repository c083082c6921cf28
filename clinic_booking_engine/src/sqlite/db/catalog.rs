use sqlx::SqliteConnection;

use crate::{
    db_types::{NewTreatment, Treatment},
    traits::CatalogApiError,
};

pub async fn insert_treatment(
    treatment: NewTreatment,
    conn: &mut SqliteConnection,
) -> Result<Treatment, CatalogApiError> {
    let row = sqlx::query_as::<_, Treatment>(
        "INSERT INTO treatments (name, description, fees) VALUES ($1, $2, $3) \
         RETURNING id, name, description, fees, created_at",
    )
    .bind(treatment.name)
    .bind(treatment.description)
    .bind(treatment.fees)
    .fetch_one(conn)
    .await?;
    Ok(row)
}

pub async fn all_treatments(conn: &mut SqliteConnection) -> Result<Vec<Treatment>, CatalogApiError> {
    let rows = sqlx::query_as::<_, Treatment>(
        "SELECT id, name, description, fees, created_at FROM treatments ORDER BY id",
    )
    .fetch_all(conn)
    .await?;
    Ok(rows)
}
