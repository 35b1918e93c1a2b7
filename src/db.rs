use sqlx::{postgres::PgPoolOptions, PgPool};

const DOCUMENTS_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS documents (
    collection TEXT NOT NULL,
    id TEXT NOT NULL,
    seq BIGSERIAL,
    created_at TIMESTAMPTZ NOT NULL,
    body JSONB NOT NULL,
    PRIMARY KEY (collection, id)
)
"#;

const DOCUMENTS_ORDER_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS documents_collection_created_idx
    ON documents (collection, created_at DESC, seq DESC)
"#;

pub struct Database {
    pub pool: PgPool,
}

impl Database {
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;

        sqlx::query("SELECT 1").execute(&pool).await?;
        ensure_schema(&pool).await?;

        Ok(Self { pool })
    }
}

/// Creates the document table and its ordering index when missing.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(DOCUMENTS_DDL).execute(pool).await?;
    sqlx::query(DOCUMENTS_ORDER_INDEX).execute(pool).await?;
    tracing::debug!("Document table ready");
    Ok(())
}
