//! Catalog loading
//!
//! Loads every record of a category from the document store, then resolves the
//! image URLs of each record by listing object storage under
//! `<project-id>/images/`. Listings run in a bounded worker pool; results are
//! placed back at the index of their record, so `asset_urls[i]` always belongs to
//! `records[i]`.

use crate::category::Category;
use crate::document_store::DocumentStore;
use crate::error::StoreResult;
use crate::models::{AssetUrlSet, CatalogPage, FileKind, ProjectRecord};
use crate::object_storage::ObjectStorage;
use crate::paths;
use std::sync::Arc;
use tokio::task::JoinSet;

/// Default number of concurrent asset listings
pub const DEFAULT_ASSET_CONCURRENCY: usize = 4;

/// Loads category pages from the document store and object storage
#[derive(Clone)]
pub struct CatalogLoader {
    documents: Arc<dyn DocumentStore>,
    objects: Arc<dyn ObjectStorage>,
    concurrency: usize,
}

impl CatalogLoader {
    pub fn new(documents: Arc<dyn DocumentStore>, objects: Arc<dyn ObjectStorage>) -> Self {
        Self {
            documents,
            objects,
            concurrency: DEFAULT_ASSET_CONCURRENCY,
        }
    }

    /// Sets the width of the asset listing pool (at least 1)
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Loads all records of `category` together with their image URLs.
    ///
    /// Fails only if the collection itself cannot be read. A failed listing
    /// for a single record leaves that record with an empty URL set.
    pub async fn load(&self, category: Category) -> StoreResult<CatalogPage> {
        let collection = category.collection();
        let documents = self.documents.get_all(collection).await?;
        log::debug!("Fetched {} documents from {}", documents.len(), collection);

        let records: Vec<ProjectRecord> = documents
            .into_iter()
            .filter_map(|doc| match serde_json::from_value::<ProjectRecord>(doc) {
                Ok(record) => Some(record),
                Err(e) => {
                    log::warn!("Skipping malformed record in {}: {}", collection, e);
                    None
                }
            })
            .collect();

        let asset_urls = self.resolve_assets(&records).await;
        log::info!(
            "Loaded {} projects for category {}",
            records.len(),
            category
        );
        Ok(CatalogPage::new(records, asset_urls))
    }

    /// Resolves the image URLs of every record, preserving record order
    pub async fn resolve_assets(&self, records: &[ProjectRecord]) -> Vec<AssetUrlSet> {
        let mut results: Vec<AssetUrlSet> = vec![Vec::new(); records.len()];
        let mut join_set = JoinSet::new();

        for (index, record) in records.iter().enumerate() {
            // Limit concurrent listings
            while join_set.len() >= self.concurrency {
                if let Some(joined) = join_set.join_next().await {
                    Self::store_result(&mut results, joined);
                }
            }

            let objects = self.objects.clone();
            let project_id = record.project_id.clone();
            join_set.spawn(async move {
                let urls = Self::image_urls(objects.as_ref(), &project_id).await;
                (index, project_id, urls)
            });
        }

        // Wait for remaining listings
        while let Some(joined) = join_set.join_next().await {
            Self::store_result(&mut results, joined);
        }

        results
    }

    /// Lists the image keys of one project and maps them to public URLs
    pub async fn image_urls(
        objects: &dyn ObjectStorage,
        project_id: &str,
    ) -> StoreResult<AssetUrlSet> {
        let prefix = paths::asset_prefix(project_id, FileKind::Image);
        let keys = objects.list_prefix(&prefix).await?;
        Ok(keys.iter().map(|key| objects.public_url(key)).collect())
    }

    fn store_result(
        results: &mut [AssetUrlSet],
        joined: Result<(usize, String, StoreResult<AssetUrlSet>), tokio::task::JoinError>,
    ) {
        match joined {
            Ok((index, _, Ok(urls))) => results[index] = urls,
            Ok((_, project_id, Err(e))) => {
                log::error!("Error fetching image URLs for {}: {}", project_id, e);
            }
            Err(e) => {
                log::error!("Asset listing task failed: {}", e);
            }
        }
    }
}
