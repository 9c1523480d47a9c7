use super::disposition::attachment_disposition;
use super::staging::{remove_if_exists, stage_file};
use super::upload::UploadedFile;
use attache_core::{AppError, AttachmentFile, Config, NewAttachmentFile};
use attache_db::AttachmentStore;
use attache_storage::{object_key, ByteStream, Storage};
use http::{header, Response, StatusCode};
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

/// Moves files between clients, the local staging directory, object storage and the
/// metadata store.
///
/// Uploads insert the metadata record first (in its own transaction), then stage the
/// content locally, push it to object storage and delete the staged copy. A failed push
/// leaves the committed record pointing at an object that does not exist; nothing here
/// compensates for that.
#[derive(Clone)]
pub struct FileTransferService {
    store: Arc<dyn AttachmentStore>,
    storage: Arc<dyn Storage>,
    upload_dir: PathBuf,
    key_prefix: String,
}

impl FileTransferService {
    pub fn new(
        store: Arc<dyn AttachmentStore>,
        storage: Arc<dyn Storage>,
        upload_dir: impl Into<PathBuf>,
        key_prefix: impl Into<String>,
    ) -> Self {
        Self {
            store,
            storage,
            upload_dir: upload_dir.into(),
            key_prefix: key_prefix.into(),
        }
    }

    pub fn from_config(
        config: &Config,
        store: Arc<dyn AttachmentStore>,
        storage: Arc<dyn Storage>,
    ) -> Self {
        Self::new(store, storage, config.upload_dir(), config.key_prefix())
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    pub fn store(&self) -> &Arc<dyn AttachmentStore> {
        &self.store
    }

    /// Object key a record's content is stored under.
    pub fn object_key_for(&self, record: &AttachmentFile) -> String {
        object_key(&self.key_prefix, &record.file_name)
    }

    /// Store an uploaded file and return its metadata record.
    ///
    /// `None` (no file in the request) is rejected with `InvalidInput` before anything is
    /// written.
    #[tracing::instrument(
        skip(self, file),
        fields(
            original_filename = file.as_ref().map(|f| f.original_filename.as_str()),
            operation = "upload_file"
        )
    )]
    pub async fn upload(&self, file: Option<UploadedFile>) -> Result<AttachmentFile, AppError> {
        let file = file.ok_or_else(|| AppError::InvalidInput("No file provided".to_string()))?;
        file.validate()?;

        let storage_name = generate_storage_name(&file.original_filename);
        let declared_size = file.size;

        let record = self
            .store
            .insert(NewAttachmentFile {
                file_name: storage_name.clone(),
                original_file_name: file.original_filename.clone(),
                file_path: self.upload_dir.to_string_lossy().into_owned(),
                file_size: declared_size,
            })
            .await?;

        tracing::info!(
            attachment_file_no = record.id,
            storage_name = %storage_name,
            size_bytes = declared_size,
            "Attachment file record created"
        );

        let (staged_path, staged_size) =
            stage_file(&self.upload_dir, &storage_name, file.into_reader())
                .await
                .map_err(|e| {
                    tracing::error!(
                        error = %e,
                        attachment_file_no = record.id,
                        upload_dir = %self.upload_dir.display(),
                        "Failed to stage uploaded file"
                    );
                    AppError::Io(e)
                })?;

        if staged_size != declared_size as u64 {
            tracing::warn!(
                attachment_file_no = record.id,
                declared_size,
                staged_size,
                "Staged size differs from declared size"
            );
        }

        let key = object_key(&self.key_prefix, &storage_name);
        let pushed = self.storage.put_file(&key, &staged_path).await;

        remove_if_exists(&staged_path).await;

        pushed.map_err(|e| {
            tracing::error!(
                error = %e,
                attachment_file_no = record.id,
                key = %key,
                "Object storage push failed; metadata record has no stored object"
            );
            AppError::from(e)
        })?;

        tracing::info!(
            attachment_file_no = record.id,
            key = %key,
            backend = %self.storage.backend_type(),
            "Attachment file stored"
        );

        Ok(record)
    }

    /// Open a stored file as a streaming attachment response.
    ///
    /// The record lookup happens before any object storage call, so an unknown id fails
    /// with `NotFound` without touching the bucket. The body is the object stream itself;
    /// it is released when the response body is dropped.
    #[tracing::instrument(skip(self), fields(operation = "download_file"))]
    pub async fn download(&self, id: i64) -> Result<Response<ByteStream>, AppError> {
        let record = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("File not found".to_string()))?;

        let key = self.object_key_for(&record);

        tracing::debug!(
            attachment_file_no = record.id,
            key = %key,
            "Streaming attachment file from storage"
        );

        let body = self.storage.get_stream(&key).await.map_err(|e| {
            tracing::error!(
                error = %e,
                attachment_file_no = record.id,
                key = %key,
                "Failed to open stored object"
            );
            AppError::from(e)
        })?;

        Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, "application/octet-stream")
            .header(
                header::CONTENT_DISPOSITION,
                attachment_disposition(&record.original_file_name),
            )
            .body(body)
            .map_err(|e| AppError::Internal(format!("Failed to build response: {}", e)))
    }
}

/// `{uuid}_{original}`: unique per upload without any uniqueness check.
fn generate_storage_name(original_filename: &str) -> String {
    format!("{}_{}", Uuid::new_v4(), original_filename)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use attache_db::InMemoryAttachmentStore;
    use attache_storage::{LocalStorage, StorageBackend, StorageError, StorageResult};
    use futures::StreamExt;
    use std::path::Path;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use tempfile::{tempdir, TempDir};

    /// Local bucket that counts calls and can be told to reject pushes.
    struct RecordingStorage {
        inner: LocalStorage,
        fail_puts: AtomicBool,
        puts: AtomicUsize,
        gets: AtomicUsize,
    }

    #[async_trait]
    impl Storage for RecordingStorage {
        async fn put_file(&self, storage_key: &str, local_path: &Path) -> StorageResult<u64> {
            self.puts.fetch_add(1, Ordering::SeqCst);
            assert!(local_path.exists(), "staged file must exist during the push");
            if self.fail_puts.load(Ordering::SeqCst) {
                return Err(StorageError::UploadFailed("access denied".to_string()));
            }
            self.inner.put_file(storage_key, local_path).await
        }

        async fn get_stream(&self, storage_key: &str) -> StorageResult<ByteStream> {
            self.gets.fetch_add(1, Ordering::SeqCst);
            self.inner.get_stream(storage_key).await
        }

        async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
            self.inner.exists(storage_key).await
        }

        fn backend_type(&self) -> StorageBackend {
            StorageBackend::Local
        }
    }

    struct Fixture {
        service: FileTransferService,
        store: Arc<InMemoryAttachmentStore>,
        storage: Arc<RecordingStorage>,
        staging: TempDir,
        _bucket: TempDir,
    }

    async fn fixture() -> Fixture {
        let staging = tempdir().unwrap();
        let bucket = tempdir().unwrap();
        let store = Arc::new(InMemoryAttachmentStore::new());
        let storage = Arc::new(RecordingStorage {
            inner: LocalStorage::new(bucket.path()).await.unwrap(),
            fail_puts: AtomicBool::new(false),
            puts: AtomicUsize::new(0),
            gets: AtomicUsize::new(0),
        });
        let service = FileTransferService::new(
            store.clone(),
            storage.clone(),
            staging.path(),
            attache_core::DEFAULT_KEY_PREFIX,
        );
        Fixture {
            service,
            store,
            storage,
            staging,
            _bucket: bucket,
        }
    }

    async fn body_bytes(response: Response<ByteStream>) -> Vec<u8> {
        let mut body = response.into_body();
        let mut data = Vec::new();
        while let Some(chunk) = body.next().await {
            data.extend_from_slice(&chunk.unwrap());
        }
        data
    }

    fn staged_files(dir: &TempDir) -> usize {
        std::fs::read_dir(dir.path()).unwrap().count()
    }

    #[tokio::test]
    async fn test_upload_then_download_ten_byte_file() {
        let fx = fixture().await;

        let record = fx
            .service
            .upload(Some(UploadedFile::from_bytes("a.txt", &b"0123456789"[..])))
            .await
            .unwrap();

        assert_eq!(record.original_file_name, "a.txt");
        assert_eq!(record.file_size, 10);
        assert_eq!(record.file_path, fx.staging.path().to_string_lossy());
        let (token, rest) = record.file_name.split_once('_').unwrap();
        assert!(Uuid::parse_str(token).is_ok());
        assert_eq!(rest, "a.txt");

        assert_eq!(staged_files(&fx.staging), 0);
        let key = format!("s3_data/{}", record.file_name);
        assert_eq!(fx.service.object_key_for(&record), key);
        assert!(fx.storage.exists(&key).await.unwrap());

        let response = fx.service.download(record.id).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/octet-stream"
        );
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"a.txt\""
        );
        assert_eq!(body_bytes(response).await, b"0123456789");
    }

    #[tokio::test]
    async fn test_round_trip_preserves_binary_content() {
        let fx = fixture().await;
        let content: Vec<u8> = (0..=255u8).cycle().take(70_000).collect();

        let record = fx
            .service
            .upload(Some(UploadedFile::from_bytes("blob.bin", content.clone())))
            .await
            .unwrap();
        let response = fx.service.download(record.id).await.unwrap();

        assert_eq!(body_bytes(response).await, content);
    }

    #[tokio::test]
    async fn test_round_trip_name_with_inner_dots() {
        let fx = fixture().await;

        let record = fx
            .service
            .upload(Some(UploadedFile::from_bytes("a..txt", &b"dots"[..])))
            .await
            .unwrap();

        assert!(record.file_name.ends_with("_a..txt"));
        let key = format!("s3_data/{}", record.file_name);
        assert!(fx.storage.exists(&key).await.unwrap());

        let response = fx.service.download(record.id).await.unwrap();
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"a..txt\""
        );
        assert_eq!(body_bytes(response).await, b"dots");
    }

    #[tokio::test]
    async fn test_upload_without_file_is_invalid_input() {
        let fx = fixture().await;

        let err = fx.service.upload(None).await.unwrap_err();

        assert!(matches!(err, AppError::InvalidInput(_)));
        assert!(fx.store.records().is_empty());
        assert_eq!(fx.storage.puts.load(Ordering::SeqCst), 0);
        assert_eq!(staged_files(&fx.staging), 0);
    }

    #[tokio::test]
    async fn test_invalid_filename_creates_no_record() {
        let fx = fixture().await;

        let err = fx
            .service
            .upload(Some(UploadedFile::from_bytes("../escape.txt", &b"x"[..])))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::InvalidInput(_)));
        assert!(fx.store.records().is_empty());
        assert_eq!(fx.storage.puts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_same_filename_gets_distinct_storage_names() {
        let fx = fixture().await;

        let first = fx
            .service
            .upload(Some(UploadedFile::from_bytes("a.txt", &b"one"[..])))
            .await
            .unwrap();
        let second = fx
            .service
            .upload(Some(UploadedFile::from_bytes("a.txt", &b"two"[..])))
            .await
            .unwrap();

        assert_ne!(first.file_name, second.file_name);
        assert_eq!(body_bytes(fx.service.download(first.id).await.unwrap()).await, b"one");
        assert_eq!(body_bytes(fx.service.download(second.id).await.unwrap()).await, b"two");
    }

    #[tokio::test]
    async fn test_download_unknown_id_never_touches_storage() {
        let fx = fixture().await;

        let err = fx.service.download(42).await.err().expect("expected error");

        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(fx.store.lookups(), 1);
        assert_eq!(fx.storage.gets.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failed_push_keeps_record_and_removes_staged_file() {
        let fx = fixture().await;
        fx.storage.fail_puts.store(true, Ordering::SeqCst);

        let err = fx
            .service
            .upload(Some(UploadedFile::from_bytes("a.txt", &b"0123456789"[..])))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Storage(_)));
        let records = fx.store.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].original_file_name, "a.txt");
        assert_eq!(staged_files(&fx.staging), 0);

        // The record now points at an object that was never stored.
        let err = fx.service.download(records[0].id).await.err().expect("expected error");
        assert!(matches!(err, AppError::Storage(_)));
    }

    #[tokio::test]
    async fn test_staging_failure_is_io_error_and_keeps_record() {
        let fx = fixture().await;
        let service = FileTransferService::new(
            fx.store.clone(),
            fx.storage.clone(),
            fx.staging.path().join("missing"),
            "s3_data",
        );

        let err = service
            .upload(Some(UploadedFile::from_bytes("a.txt", &b"x"[..])))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Io(_)));
        assert_eq!(fx.store.records().len(), 1);
        assert_eq!(fx.storage.puts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_insert_failure_stops_before_staging() {
        let fx = fixture().await;
        fx.store.fail_inserts(true);

        let err = fx
            .service
            .upload(Some(UploadedFile::from_bytes("a.txt", &b"x"[..])))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Database(_)));
        assert_eq!(staged_files(&fx.staging), 0);
        assert_eq!(fx.storage.puts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_download_serves_original_name_not_storage_name() {
        let fx = fixture().await;

        let record = fx
            .service
            .upload(Some(UploadedFile::from_bytes("quarterly report.pdf", &b"%PDF"[..])))
            .await
            .unwrap();
        let response = fx.service.download(record.id).await.unwrap();

        let disposition = response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap();
        assert_eq!(disposition, "attachment; filename=\"quarterly report.pdf\"");
        assert!(!disposition.contains(&record.file_name));
    }
}
