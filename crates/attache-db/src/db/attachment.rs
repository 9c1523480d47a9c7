use async_trait::async_trait;
use attache_core::{AppError, AttachmentFile, NewAttachmentFile};
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};

use super::transaction::with_transaction;

/// Metadata store for attachment files.
///
/// Records are created and read, never updated or deleted.
#[async_trait]
pub trait AttachmentStore: Send + Sync {
    /// Insert a new record inside its own transaction and return it with its assigned id.
    async fn insert(&self, new_file: NewAttachmentFile) -> Result<AttachmentFile, AppError>;

    /// Look up a record by id.
    async fn find_by_id(&self, id: i64) -> Result<Option<AttachmentFile>, AppError>;

    /// Cheap connectivity check used by the health endpoint.
    async fn health_check(&self) -> Result<(), AppError>;
}

/// Row type for attachment_files table (for FromRow).
#[derive(Debug, sqlx::FromRow)]
pub struct AttachmentFileRow {
    pub attachment_file_no: i64,
    pub attachment_file_name: String,
    pub attachment_original_file_name: String,
    pub file_path: String,
    pub attachment_file_size: i64,
    pub created_at: DateTime<Utc>,
}

impl AttachmentFileRow {
    pub fn into_attachment_file(self) -> AttachmentFile {
        AttachmentFile {
            id: self.attachment_file_no,
            file_name: self.attachment_file_name,
            original_file_name: self.attachment_original_file_name,
            file_path: self.file_path,
            file_size: self.attachment_file_size,
            created_at: self.created_at,
        }
    }
}

/// Repository for attachment_files table.
#[derive(Clone)]
pub struct AttachmentFileRepository {
    pool: PgPool,
}

impl AttachmentFileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new attachment file within a caller-owned transaction.
    #[tracing::instrument(
        skip(tx, new_file),
        fields(db.table = "attachment_files", storage_name = %new_file.file_name)
    )]
    pub async fn insert_tx(
        tx: &mut Transaction<'_, Postgres>,
        new_file: &NewAttachmentFile,
    ) -> Result<AttachmentFile, AppError> {
        let row: AttachmentFileRow = sqlx::query_as::<Postgres, AttachmentFileRow>(
            r#"
            INSERT INTO attachment_files (
                attachment_file_name,
                attachment_original_file_name,
                file_path,
                attachment_file_size
            )
            VALUES ($1, $2, $3, $4)
            RETURNING attachment_file_no, attachment_file_name, attachment_original_file_name,
                      file_path, attachment_file_size, created_at
            "#,
        )
        .bind(&new_file.file_name)
        .bind(&new_file.original_file_name)
        .bind(&new_file.file_path)
        .bind(new_file.file_size)
        .fetch_one(&mut **tx)
        .await?;
        Ok(row.into_attachment_file())
    }
}

#[async_trait]
impl AttachmentStore for AttachmentFileRepository {
    #[tracing::instrument(skip(self, new_file), fields(db.table = "attachment_files"))]
    async fn insert(&self, new_file: NewAttachmentFile) -> Result<AttachmentFile, AppError> {
        let record = with_transaction(&self.pool, |tx| {
            Box::pin(async move { Self::insert_tx(tx, &new_file).await })
        })
        .await?;

        tracing::debug!(attachment_file_no = record.id, "Attachment file record committed");
        Ok(record)
    }

    #[tracing::instrument(skip(self), fields(db.table = "attachment_files", db.record_id = id))]
    async fn find_by_id(&self, id: i64) -> Result<Option<AttachmentFile>, AppError> {
        let row: Option<AttachmentFileRow> = sqlx::query_as::<Postgres, AttachmentFileRow>(
            r#"
            SELECT attachment_file_no, attachment_file_name, attachment_original_file_name,
                   file_path, attachment_file_size, created_at
            FROM attachment_files
            WHERE attachment_file_no = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(AttachmentFileRow::into_attachment_file))
    }

    async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
