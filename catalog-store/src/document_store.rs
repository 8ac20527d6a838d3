//! Document store abstraction
//!
//! Documents are JSON objects addressed by slash-separated paths that alternate
//! collection and document ids (`users/students/<owner>/<project>`).

use crate::error::{StoreError, StoreResult};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Mutex;

/// Collection-based document store
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Returns every document directly inside `collection`
    async fn get_all(&self, collection: &str) -> StoreResult<Vec<Value>>;

    /// Creates or replaces the document at `path`
    async fn set(&self, path: &str, document: &Value) -> StoreResult<()>;

    /// Deletes the document at `path`; deleting a missing document is not an error
    async fn delete(&self, path: &str) -> StoreResult<()>;
}

/// In-memory document store used for tests and offline mode
///
/// Supports failure injection so callers can exercise partial-failure paths.
#[derive(Default)]
pub struct MemoryDocumentStore {
    documents: Mutex<BTreeMap<String, Value>>,
    failing_reads: Mutex<HashSet<String>>,
    failing_writes: Mutex<HashSet<String>>,
    failing_deletes: Mutex<HashSet<String>>,
    reads: Mutex<HashMap<String, usize>>,
    writes: Mutex<Vec<String>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a document directly, bypassing failure injection and the write log
    pub fn insert(&self, path: &str, document: Value) {
        lock(&self.documents).insert(path.to_string(), document);
    }

    /// Returns the stored document at `path`
    pub fn document(&self, path: &str) -> Option<Value> {
        lock(&self.documents).get(path).cloned()
    }

    /// Number of `get_all` calls issued for `collection`
    pub fn read_count(&self, collection: &str) -> usize {
        lock(&self.reads).get(collection).copied().unwrap_or(0)
    }

    /// Paths of all successful `set` calls, in order
    pub fn write_log(&self) -> Vec<String> {
        lock(&self.writes).clone()
    }

    /// Makes `get_all` fail for `collection`
    pub fn fail_reads_of(&self, collection: &str) {
        lock(&self.failing_reads).insert(collection.to_string());
    }

    /// Makes `set` fail for every path starting with `prefix`
    pub fn fail_writes_under(&self, prefix: &str) {
        lock(&self.failing_writes).insert(prefix.to_string());
    }

    /// Makes `delete` fail for every path starting with `prefix`
    pub fn fail_deletes_under(&self, prefix: &str) {
        lock(&self.failing_deletes).insert(prefix.to_string());
    }

    fn matches_any(set: &Mutex<HashSet<String>>, path: &str) -> bool {
        lock(set).iter().any(|prefix| path.starts_with(prefix.as_str()))
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get_all(&self, collection: &str) -> StoreResult<Vec<Value>> {
        *lock(&self.reads).entry(collection.to_string()).or_insert(0) += 1;

        if lock(&self.failing_reads).contains(collection) {
            return Err(StoreError::Document(format!(
                "Injected read failure for {}",
                collection
            )));
        }

        let documents = lock(&self.documents)
            .iter()
            .filter(|(path, _)| {
                path.rsplit_once('/')
                    .map(|(parent, _)| parent == collection)
                    .unwrap_or(false)
            })
            .map(|(_, doc)| doc.clone())
            .collect();
        Ok(documents)
    }

    async fn set(&self, path: &str, document: &Value) -> StoreResult<()> {
        if Self::matches_any(&self.failing_writes, path) {
            return Err(StoreError::Document(format!(
                "Injected write failure for {}",
                path
            )));
        }
        lock(&self.documents).insert(path.to_string(), document.clone());
        lock(&self.writes).push(path.to_string());
        Ok(())
    }

    async fn delete(&self, path: &str) -> StoreResult<()> {
        if Self::matches_any(&self.failing_deletes, path) {
            return Err(StoreError::Document(format!(
                "Injected delete failure for {}",
                path
            )));
        }
        lock(&self.documents).remove(path);
        Ok(())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_get_all_returns_direct_children_only() {
        let store = MemoryDocumentStore::new();
        store.set("AI/p1", &json!({"projectId": "p1"})).await.unwrap();
        store.set("AI/p2", &json!({"projectId": "p2"})).await.unwrap();
        store
            .set("users/students/u1/p1", &json!({"projectId": "p1"}))
            .await
            .unwrap();

        let docs = store.get_all("AI").await.unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(store.get_all("users/students/u1").await.unwrap().len(), 1);
        assert!(store.get_all("users").await.unwrap().is_empty());
        assert_eq!(store.read_count("AI"), 1);
    }

    #[tokio::test]
    async fn test_injected_failures() {
        let store = MemoryDocumentStore::new();
        store.fail_writes_under("Art/");
        store.fail_reads_of("Design");

        assert!(store.set("Art/p1", &json!({})).await.is_err());
        assert!(store.set("AI/p1", &json!({})).await.is_ok());
        assert!(store.get_all("Design").await.is_err());
        assert_eq!(store.write_log(), vec!["AI/p1".to_string()]);
    }

    #[tokio::test]
    async fn test_delete_missing_is_ok() {
        let store = MemoryDocumentStore::new();
        store.set("AI/p1", &json!({})).await.unwrap();
        store.delete("AI/p1").await.unwrap();
        store.delete("AI/p1").await.unwrap();
        assert!(store.document("AI/p1").is_none());
    }
}
