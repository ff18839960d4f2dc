use async_trait::async_trait;
use qrtrack_core::repository::{ReadRepository, Repository, Result};
use qrtrack_core::{Link, QrCodeRecord, RecordId, StorageError};
use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;
use tracing::debug;

const SCHEMA: &str = include_str!("../ddl/postgres/qr_codes.sql");

/// Postgres implementation of the repository contract.
///
/// Records live in the `qr_codes` table. The scan counter is only ever
/// changed with an in-place `scan_count = scan_count + 1` update, and the
/// image URL is only written while it is still empty.
#[derive(Debug, Clone)]
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a repository from an existing Postgres connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the `qr_codes` table if it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        debug!("qr_codes schema is in place");
        Ok(())
    }
}

fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StorageError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StorageError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StorageError::InvalidData(message),
        _ => StorageError::Query(message),
    }
}

fn record_from_row(row: &PgRow) -> Result<QrCodeRecord> {
    let id: i64 = row.try_get("id").map_err(map_sqlx_error)?;
    let link: String = row.try_get("link").map_err(map_sqlx_error)?;
    let qr_image_url: String = row.try_get("qr_image_url").map_err(map_sqlx_error)?;
    let scan_count: i64 = row.try_get("scan_count").map_err(map_sqlx_error)?;
    let scan_count = u64::try_from(scan_count).map_err(|e| {
        StorageError::InvalidData(format!("invalid scan_count {scan_count} for id {id}: {e}"))
    })?;

    Ok(QrCodeRecord {
        id: RecordId::new(id),
        link: Link::new_unchecked(link),
        qr_image_url,
        scan_count,
    })
}

#[async_trait]
impl ReadRepository for PostgresRepository {
    async fn list_all(&self) -> Result<Vec<QrCodeRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT id, link, qr_image_url, scan_count
            FROM qr_codes
            ORDER BY id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.iter().map(record_from_row).collect()
    }

    async fn fetch_by_id(&self, id: RecordId) -> Result<Option<QrCodeRecord>> {
        let row = sqlx::query(
            r#"
            SELECT id, link, qr_image_url, scan_count
            FROM qr_codes
            WHERE id = $1
            "#,
        )
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.as_ref().map(record_from_row).transpose()
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    async fn create(&self, link: &Link) -> Result<RecordId> {
        let row = sqlx::query(
            r#"
            INSERT INTO qr_codes (link, qr_image_url, scan_count)
            VALUES ($1, '', 0)
            RETURNING id
            "#,
        )
        .bind(link.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let id: i64 = row.try_get("id").map_err(map_sqlx_error)?;
        Ok(RecordId::new(id))
    }

    async fn set_image_url(&self, id: RecordId, url: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE qr_codes
            SET qr_image_url = $1
            WHERE id = $2
              AND qr_image_url = ''
            "#,
        )
        .bind(url)
        .bind(id.get())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn increment_scan_count(&self, id: RecordId) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE qr_codes
            SET scan_count = scan_count + 1
            WHERE id = $1
            "#,
        )
        .bind(id.get())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }
}
