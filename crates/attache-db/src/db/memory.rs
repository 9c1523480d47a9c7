//! In-memory `AttachmentStore` used by service and HTTP tests.

use async_trait::async_trait;
use attache_core::{AppError, AttachmentFile, NewAttachmentFile};
use chrono::Utc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use super::attachment::AttachmentStore;

/// Keeps records in a vector; ids are assigned sequentially from 1.
#[derive(Default)]
pub struct InMemoryAttachmentStore {
    records: Mutex<Vec<AttachmentFile>>,
    fail_inserts: AtomicBool,
    lookups: AtomicUsize,
}

impl InMemoryAttachmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following insert fail the way a broken database would.
    pub fn fail_inserts(&self, fail: bool) {
        self.fail_inserts.store(fail, Ordering::SeqCst);
    }

    /// Snapshot of all stored records.
    pub fn records(&self) -> Vec<AttachmentFile> {
        self.lock().clone()
    }

    /// Number of `find_by_id` calls served.
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    fn lock(&self) -> MutexGuard<'_, Vec<AttachmentFile>> {
        self.records.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl AttachmentStore for InMemoryAttachmentStore {
    async fn insert(&self, new_file: NewAttachmentFile) -> Result<AttachmentFile, AppError> {
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(AppError::Database(sqlx::Error::PoolClosed));
        }

        let mut records = self.lock();
        let id = records.len() as i64 + 1;
        let record = new_file.into_record(id, Utc::now());
        records.push(record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<AttachmentFile>, AppError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.lock().iter().find(|r| r.id == id).cloned())
    }

    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }
}
