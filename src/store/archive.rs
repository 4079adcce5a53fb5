//! Partial Postgres case archive
//!
//! The external database integration covers a fraction of the record: one
//! row of intake facts per created case. It is best-effort only — archive
//! failures are logged and never fail the owning operation. The
//! [`InspectionStore`](super::InspectionStore) trait is the seam where a
//! full persistent implementation would plug in.

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

use crate::models::Inspection;

pub struct CaseArchive {
    pool: PgPool,
}

impl CaseArchive {
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(5))
            .connect(database_url)
            .await?;
        ensure_schema(&pool).await?;
        Ok(Self { pool })
    }

    /// Insert the minimal archive row for a freshly created case.
    pub async fn record_case(&self, inspection: &Inspection) {
        let foto_url = inspection.photos.first().map(|p| p.url.as_str());
        let result = sqlx::query(
            r#"
            INSERT INTO fiscalizacoes (observacao, foto_url, endereco, reclamante_nome, reclamado_nome)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&inspection.description)
        .bind(foto_url)
        .bind(&inspection.address)
        .bind(&inspection.complainant_name)
        .bind(&inspection.respondent_name)
        .execute(&self.pool)
        .await;

        if let Err(e) = result {
            tracing::error!("Failed to archive case {}: {}", inspection.protocol, e);
        }
    }
}

async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS fiscalizacoes (
            id BIGSERIAL PRIMARY KEY,
            observacao TEXT NOT NULL,
            foto_url TEXT,
            endereco TEXT NOT NULL,
            reclamante_nome TEXT,
            reclamado_nome TEXT,
            criado_em TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}
