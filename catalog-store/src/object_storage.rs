//! Object storage abstraction
//!
//! Objects are addressed by flat keys; listing by prefix returns every key that
//! starts with the prefix. Public URLs follow the fixed S3 bucket convention.

use crate::error::{StoreError, StoreResult};
use crate::paths;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Object storage with prefix listing and uploads
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Lists all object keys starting with `prefix`, across every result page
    async fn list_prefix(&self, prefix: &str) -> StoreResult<Vec<String>>;

    /// Uploads `bytes` to `key`, replacing any existing object
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: Option<&str>) -> StoreResult<()>;

    /// Publicly addressable URL of `key`
    fn public_url(&self, key: &str) -> String;
}

/// In-memory object storage used for tests and offline mode
pub struct MemoryObjectStorage {
    bucket: String,
    objects: Mutex<BTreeMap<String, Vec<u8>>>,
    failing_prefixes: Mutex<HashSet<String>>,
    latency: Option<Duration>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    list_calls: AtomicUsize,
    put_calls: AtomicUsize,
}

impl MemoryObjectStorage {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            objects: Mutex::new(BTreeMap::new()),
            failing_prefixes: Mutex::new(HashSet::new()),
            latency: None,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            list_calls: AtomicUsize::new(0),
            put_calls: AtomicUsize::new(0),
        }
    }

    /// Delays every call, which makes concurrency observable in tests
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Stores an object directly, bypassing failure injection
    pub fn insert(&self, key: &str, bytes: Vec<u8>) {
        lock(&self.objects).insert(key.to_string(), bytes);
    }

    pub fn contains(&self, key: &str) -> bool {
        lock(&self.objects).contains_key(key)
    }

    /// Makes every call touching a key or prefix under `prefix` fail
    pub fn fail_under(&self, prefix: &str) {
        lock(&self.failing_prefixes).insert(prefix.to_string());
    }

    /// Highest number of calls that were running at the same time
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn put_calls(&self) -> usize {
        self.put_calls.load(Ordering::SeqCst)
    }

    fn is_failing(&self, path: &str) -> bool {
        lock(&self.failing_prefixes)
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
    }

    async fn enter(&self) -> InFlightGuard<'_> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        InFlightGuard(&self.in_flight)
    }
}

struct InFlightGuard<'a>(&'a AtomicUsize);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ObjectStorage for MemoryObjectStorage {
    async fn list_prefix(&self, prefix: &str) -> StoreResult<Vec<String>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let _guard = self.enter().await;

        if self.is_failing(prefix) {
            return Err(StoreError::ObjectStorage(format!(
                "Injected listing failure for {}",
                prefix
            )));
        }

        let keys = lock(&self.objects)
            .keys()
            .filter(|key| key.starts_with(prefix))
            .cloned()
            .collect();
        Ok(keys)
    }

    async fn put(&self, key: &str, bytes: Vec<u8>, _content_type: Option<&str>) -> StoreResult<()> {
        self.put_calls.fetch_add(1, Ordering::SeqCst);
        let _guard = self.enter().await;

        if self.is_failing(key) {
            return Err(StoreError::ObjectStorage(format!(
                "Injected upload failure for {}",
                key
            )));
        }

        lock(&self.objects).insert(key.to_string(), bytes);
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        paths::public_url(&self.bucket, key)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
