//! # Catalog Store
//!
//! Project catalog management over an external document store and object storage.
//!
//! This crate provides:
//! - The project data model and the closed set of marketplace categories
//! - Storage path conventions for documents and uploaded assets
//! - `DocumentStore` and `ObjectStorage` traits with in-memory implementations
//! - Catalog loading with bounded, index-preserving asset resolution
//! - Fetch generations so that only the latest category selection commits
//! - Form validation, project id generation and the publish pipeline with upload tracking
//!
//! ## Remote Backends
//!
//! Firestore (REST) and S3 backends live behind the `remote` feature. Tests and
//! offline mode use the in-memory backends.
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use catalog_store::{CatalogLoader, Category, MemoryDocumentStore, MemoryObjectStorage};
//! use std::sync::Arc;
//!
//! let loader = CatalogLoader::new(
//!     Arc::new(MemoryDocumentStore::new()),
//!     Arc::new(MemoryObjectStorage::new("my-bucket")),
//! );
//! let page = loader.load(Category::Ai).await?;
//! assert_eq!(page.records().len(), page.asset_urls().len());
//! ```

pub mod catalog;
pub mod category;
pub mod document_store;
pub mod error;
pub mod id;
pub mod models;
pub mod object_storage;
pub mod paths;
pub mod publish;
pub mod selection;
pub mod upload;
pub mod validation;

#[cfg(feature = "remote")]
pub mod firestore;

#[cfg(feature = "remote")]
pub mod s3;

pub use catalog::{CatalogLoader, DEFAULT_ASSET_CONCURRENCY};
pub use category::Category;
pub use document_store::{DocumentStore, MemoryDocumentStore};
pub use error::{StoreError, StoreResult};
pub use id::generate_project_id;
pub use models::{AssetUrlSet, CatalogPage, FileKind, Owner, ProjectRecord, UploadFile};
pub use object_storage::{MemoryObjectStorage, ObjectStorage};
pub use publish::{ProjectPublisher, PublishError, PublishOutcome};
pub use selection::{CatalogState, FetchGeneration, FetchTicket, LoadStatus};
pub use upload::{
    follow_progress, UploadBatch, UploadEntry, UploadProgress, UploadReport, UploadStatus,
    DEFAULT_UPLOAD_CONCURRENCY,
};
pub use validation::{validate_files, FieldErrors, FormField, ProjectDraft, ValidProject};

#[cfg(feature = "remote")]
pub use firestore::{FirestoreConfig, FirestoreDocumentStore};

#[cfg(feature = "remote")]
pub use s3::{S3Config, S3ObjectStorage};
