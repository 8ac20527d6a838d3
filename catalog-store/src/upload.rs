//! Upload batches for project assets
//!
//! An [`UploadBatch`] uploads every file of one submission to
//! `<project-id>/<kind-folder>/<file-name>`, runs at most `concurrency` uploads
//! at once, tracks the status of each file and publishes aggregate progress on a
//! watch channel. `run` returns only after every file succeeded or failed.
//!
//! Every file gets its own key: names that collide once their directories are
//! stripped are suffixed, so no upload of a batch replaces another.

use crate::models::{FileKind, UploadFile};
use crate::object_storage::ObjectStorage;
use crate::paths;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::{Id, JoinError, JoinSet};

/// Default number of concurrent uploads
pub const DEFAULT_UPLOAD_CONCURRENCY: usize = 3;

/// Status of a single file upload
#[derive(Debug, Clone, PartialEq)]
pub enum UploadStatus {
    Pending,
    Succeeded,
    Failed(String),
}

/// One file of a batch
#[derive(Debug, Clone, PartialEq)]
pub struct UploadEntry {
    pub kind: FileKind,
    pub file_name: String,
    pub key: String,
    pub status: UploadStatus,
}

/// Aggregate counters of a batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UploadProgress {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl UploadProgress {
    pub fn pending(&self) -> usize {
        self.total - self.succeeded - self.failed
    }

    /// True once every file is accounted for
    pub fn is_complete(&self) -> bool {
        self.pending() == 0
    }
}

/// Final state of a batch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadReport {
    entries: Vec<UploadEntry>,
}

impl UploadReport {
    pub fn entries(&self) -> &[UploadEntry] {
        &self.entries
    }

    pub fn progress(&self) -> UploadProgress {
        progress_of(&self.entries)
    }

    pub fn all_succeeded(&self) -> bool {
        self.entries
            .iter()
            .all(|entry| entry.status == UploadStatus::Succeeded)
    }

    /// Entries that failed, with their error message
    pub fn failures(&self) -> impl Iterator<Item = (&UploadEntry, &str)> {
        self.entries.iter().filter_map(|entry| match &entry.status {
            UploadStatus::Failed(message) => Some((entry, message.as_str())),
            _ => None,
        })
    }
}

/// Tracked set of uploads for one submission
pub struct UploadBatch {
    storage: Arc<dyn ObjectStorage>,
    concurrency: usize,
    entries: Vec<UploadEntry>,
    payloads: Vec<Vec<u8>>,
    progress: watch::Sender<UploadProgress>,
}

impl UploadBatch {
    pub fn new(storage: Arc<dyn ObjectStorage>, project_id: &str, files: Vec<UploadFile>) -> Self {
        let mut entries = Vec::with_capacity(files.len());
        let mut payloads = Vec::with_capacity(files.len());
        let mut taken = HashSet::with_capacity(files.len());
        for file in files {
            let key = paths::unique_asset_key(project_id, file.kind, &file.name, &taken);
            taken.insert(key.clone());
            entries.push(UploadEntry {
                kind: file.kind,
                key,
                file_name: file.name,
                status: UploadStatus::Pending,
            });
            payloads.push(file.bytes);
        }

        let (progress, _) = watch::channel(progress_of(&entries));
        Self {
            storage,
            concurrency: DEFAULT_UPLOAD_CONCURRENCY,
            entries,
            payloads,
            progress,
        }
    }

    /// Sets the number of concurrent uploads (at least 1)
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Reuses an existing progress channel, e.g. one owned by the UI
    pub fn with_progress(mut self, progress: watch::Sender<UploadProgress>) -> Self {
        progress.send_replace(progress_of(&self.entries));
        self.progress = progress;
        self
    }

    /// Receiver for aggregate progress updates
    pub fn subscribe(&self) -> watch::Receiver<UploadProgress> {
        self.progress.subscribe()
    }

    pub fn entries(&self) -> &[UploadEntry] {
        &self.entries
    }

    /// Uploads every file and waits until each one succeeded or failed
    pub async fn run(mut self) -> UploadReport {
        let total = self.entries.len();
        if total == 0 {
            return UploadReport::default();
        }
        log::info!("Uploading {} files", total);

        let mut join_set = JoinSet::new();
        let mut tasks = HashMap::with_capacity(total);
        let payloads = std::mem::take(&mut self.payloads);

        for (index, bytes) in payloads.into_iter().enumerate() {
            // Limit concurrent uploads
            while join_set.len() >= self.concurrency {
                if let Some(joined) = join_set.join_next_with_id().await {
                    self.record(&tasks, joined);
                }
            }

            let storage = self.storage.clone();
            let key = self.entries[index].key.clone();
            let content_type = self.entries[index]
                .kind
                .content_type(&self.entries[index].file_name);
            let handle = join_set.spawn(async move {
                storage
                    .put(&key, bytes, content_type)
                    .await
                    .map_err(|e| e.to_string())
            });
            tasks.insert(handle.id(), index);
        }

        // Wait for remaining uploads
        while let Some(joined) = join_set.join_next_with_id().await {
            self.record(&tasks, joined);
        }

        let report = UploadReport {
            entries: self.entries,
        };
        let progress = report.progress();
        log::info!(
            "Uploaded {} of {} files ({} failed)",
            progress.succeeded,
            progress.total,
            progress.failed
        );
        report
    }

    fn record(
        &mut self,
        tasks: &HashMap<Id, usize>,
        joined: Result<(Id, Result<(), String>), JoinError>,
    ) {
        let (id, result) = match joined {
            Ok((id, result)) => (id, result),
            Err(e) => (e.id(), Err(format!("Upload task failed: {}", e))),
        };
        let Some(&index) = tasks.get(&id) else {
            log::warn!("Finished upload task {} is not part of this batch", id);
            return;
        };

        match result {
            Ok(()) => {
                log::debug!("Uploaded {}", self.entries[index].key);
                self.entries[index].status = UploadStatus::Succeeded;
            }
            Err(message) => {
                log::error!("Upload of {} failed: {}", self.entries[index].key, message);
                self.entries[index].status = UploadStatus::Failed(message);
            }
        }
        self.progress.send_replace(progress_of(&self.entries));
    }
}

/// Passes every progress update to `on_update` until the sending batch is gone.
///
/// Returns the last value seen, which is the final state of the batch once the
/// sender has been dropped.
pub async fn follow_progress(
    mut progress: watch::Receiver<UploadProgress>,
    mut on_update: impl FnMut(UploadProgress),
) -> UploadProgress {
    while progress.changed().await.is_ok() {
        on_update(*progress.borrow_and_update());
    }
    let last = *progress.borrow();
    last
}

fn progress_of(entries: &[UploadEntry]) -> UploadProgress {
    let mut progress = UploadProgress {
        total: entries.len(),
        ..Default::default()
    };
    for entry in entries {
        match entry.status {
            UploadStatus::Succeeded => progress.succeeded += 1,
            UploadStatus::Failed(_) => progress.failed += 1,
            UploadStatus::Pending => {}
        }
    }
    progress
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object_storage::MemoryObjectStorage;
    use std::time::Duration;

    fn files() -> Vec<UploadFile> {
        vec![
            UploadFile::new(FileKind::Image, "a.png", vec![1]),
            UploadFile::new(FileKind::Image, "b.png", vec![2]),
            UploadFile::new(FileKind::Video, "c.mp4", vec![3]),
            UploadFile::new(FileKind::Document, "d.pdf", vec![4]),
        ]
    }

    #[tokio::test]
    async fn test_all_files_land_under_project() {
        let storage = Arc::new(MemoryObjectStorage::new("bucket"));
        let batch = UploadBatch::new(storage.clone(), "p1", files());
        assert!(batch
            .entries()
            .iter()
            .all(|entry| entry.status == UploadStatus::Pending));

        let report = batch.run().await;

        assert!(report.all_succeeded());
        assert!(storage.contains("p1/images/a.png"));
        assert!(storage.contains("p1/images/b.png"));
        assert!(storage.contains("p1/videos/c.mp4"));
        assert!(storage.contains("p1/documents/d.pdf"));
        assert_eq!(storage.put_calls(), 4);
    }

    #[tokio::test]
    async fn test_failures_are_tracked_per_file() {
        let storage = Arc::new(MemoryObjectStorage::new("bucket"));
        storage.fail_under("p1/videos/");

        let report = UploadBatch::new(storage, "p1", files()).run().await;
        let progress = report.progress();

        assert!(!report.all_succeeded());
        assert_eq!(progress.succeeded, 3);
        assert_eq!(progress.failed, 1);
        assert!(progress.is_complete());
        let failed: Vec<&str> = report
            .failures()
            .map(|(entry, _)| entry.file_name.as_str())
            .collect();
        assert_eq!(failed, vec!["c.mp4"]);
    }

    #[tokio::test]
    async fn test_progress_reaches_completion() {
        let storage =
            Arc::new(MemoryObjectStorage::new("bucket").with_latency(Duration::from_millis(5)));
        let batch = UploadBatch::new(storage.clone(), "p1", files()).with_concurrency(2);
        let rx = batch.subscribe();
        assert_eq!(rx.borrow().pending(), 4);

        batch.run().await;

        let progress = *rx.borrow();
        assert_eq!(progress.succeeded, 4);
        assert!(progress.is_complete());
        assert!(storage.max_in_flight() <= 2);
    }

    #[tokio::test]
    async fn test_same_file_name_in_different_folders_keeps_both() {
        let storage = Arc::new(MemoryObjectStorage::new("bucket"));
        let files = vec![
            UploadFile::new(FileKind::Image, "front/photo.png", vec![1]),
            UploadFile::new(FileKind::Image, "back/photo.png", vec![2]),
        ];

        let report = UploadBatch::new(storage.clone(), "p1", files).run().await;

        assert_eq!(report.progress().succeeded, 2);
        let keys: Vec<&str> = report.entries().iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["p1/images/photo.png", "p1/images/photo-1.png"]);
        let stored = storage.list_prefix("p1/images/").await.unwrap();
        assert_eq!(stored.len(), report.progress().succeeded);
    }

    #[tokio::test]
    async fn test_panicking_upload_fails_its_own_entry() {
        let storage = Arc::new(PanicOn {
            key: "p1/videos/c.mp4",
            inner: MemoryObjectStorage::new("bucket").with_latency(Duration::from_millis(5)),
        });

        let report = UploadBatch::new(storage, "p1", files())
            .with_concurrency(4)
            .run()
            .await;

        let failed: Vec<&str> = report
            .failures()
            .map(|(entry, _)| entry.file_name.as_str())
            .collect();
        assert_eq!(failed, vec!["c.mp4"]);
        assert_eq!(report.progress().succeeded, 3);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_follower_sees_final_progress_before_sender_closes() {
        let storage = Arc::new(MemoryObjectStorage::new("bucket"));
        let (tx, rx) = watch::channel(UploadProgress::default());
        let follower = tokio::spawn(follow_progress(rx, |_| {}));

        let report = UploadBatch::new(storage, "p1", files())
            .with_progress(tx)
            .run()
            .await;

        let last = follower.await.unwrap();
        assert_eq!(last, report.progress());
        assert!(last.is_complete());
        assert_eq!(last.succeeded, 4);
    }

    #[tokio::test]
    async fn test_follower_ends_when_batch_never_starts() {
        let (tx, rx) = watch::channel(UploadProgress::default());
        drop(tx);
        let mut updates = 0;
        let last = follow_progress(rx, |_| updates += 1).await;
        assert_eq!(updates, 0);
        assert_eq!(last, UploadProgress::default());
    }

    struct PanicOn {
        key: &'static str,
        inner: MemoryObjectStorage,
    }

    #[async_trait::async_trait]
    impl ObjectStorage for PanicOn {
        async fn list_prefix(&self, prefix: &str) -> crate::error::StoreResult<Vec<String>> {
            self.inner.list_prefix(prefix).await
        }

        async fn put(
            &self,
            key: &str,
            bytes: Vec<u8>,
            content_type: Option<&str>,
        ) -> crate::error::StoreResult<()> {
            if key == self.key {
                panic!("storage crashed on {}", key);
            }
            self.inner.put(key, bytes, content_type).await
        }

        fn public_url(&self, key: &str) -> String {
            self.inner.public_url(key)
        }
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let storage = Arc::new(MemoryObjectStorage::new("bucket"));
        let report = UploadBatch::new(storage, "p1", Vec::new()).run().await;
        assert!(report.all_succeeded());
        assert_eq!(report.progress().total, 0);
    }
}
