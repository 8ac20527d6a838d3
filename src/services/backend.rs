use crate::config::AppConfig;
use crate::error::AppError;
use catalog_store::{
    paths, CatalogLoader, Category, DocumentStore, FileKind, FirestoreConfig,
    FirestoreDocumentStore, MemoryDocumentStore, MemoryObjectStorage, ObjectStorage,
    ProjectPublisher, ProjectRecord, S3ObjectStorage,
};
use marketplace_auth::CurrentUser;
use std::sync::Arc;

const DEMO_BUCKET: &str = "marketplace-demo";

/// Catalog and publishing services bound to one signed-in user
#[derive(Clone)]
pub struct AppServices {
    pub loader: CatalogLoader,
    pub publisher: ProjectPublisher,
    pub offline: bool,
}

impl AppServices {
    /// Builds the services for `user`, using the hosted backends unless offline
    pub fn connect(config: &AppConfig, user: &CurrentUser) -> Result<Self, AppError> {
        let Some(remote) = &config.remote else {
            return Ok(Self::offline(config));
        };

        let documents: Arc<dyn DocumentStore> =
            Arc::new(FirestoreDocumentStore::new(FirestoreConfig {
                project_id: remote.firebase_project_id.clone(),
                api_key: remote.firebase_api_key.clone(),
                id_token: Some(user.id_token.clone()),
            })?);
        let objects: Arc<dyn ObjectStorage> = Arc::new(S3ObjectStorage::new(remote.s3.clone()));

        log::info!(
            "Using Firestore project {} and bucket {}",
            remote.firebase_project_id,
            remote.s3.bucket
        );
        Ok(Self::with_backends(config, documents, objects, false))
    }

    /// In-memory backends seeded with a few demo listings
    pub fn offline(config: &AppConfig) -> Self {
        let documents = Arc::new(MemoryDocumentStore::new());
        let objects = Arc::new(MemoryObjectStorage::new(DEMO_BUCKET));
        seed_demo_catalog(&documents, &objects);

        log::info!("Using in-memory backends");
        Self::with_backends(config, documents, objects, true)
    }

    fn with_backends(
        config: &AppConfig,
        documents: Arc<dyn DocumentStore>,
        objects: Arc<dyn ObjectStorage>,
        offline: bool,
    ) -> Self {
        Self {
            loader: CatalogLoader::new(documents.clone(), objects.clone())
                .with_concurrency(config.asset_concurrency),
            publisher: ProjectPublisher::new(documents, objects)
                .with_upload_concurrency(config.upload_concurrency),
            offline,
        }
    }
}

/// Identity used when running without the hosted backends
pub fn demo_user() -> CurrentUser {
    CurrentUser {
        uid: "demo-student".to_string(),
        display_name: "Demo Student".to_string(),
        email: "demo@example.com".to_string(),
        id_token: String::new(),
    }
}

fn seed_demo_catalog(documents: &MemoryDocumentStore, objects: &MemoryObjectStorage) {
    let demos = [
        ("demoAi0001", "Study buddy chatbot", Category::Ai, 40.0),
        ("demoWeb001", "Portfolio website", Category::WebDevelopment, 120.0),
        ("demoArt001", "Watercolor city prints", Category::Art, 25.0),
    ];

    for (project_id, title, category, price) in demos {
        let record = ProjectRecord {
            project_id: project_id.to_string(),
            title: title.to_string(),
            category,
            price,
            description: format!("{} built for the demo catalog", title),
            owner_id: "demo-owner".to_string(),
            owner_display_name: "Demo Owner".to_string(),
        };
        match serde_json::to_value(&record) {
            Ok(document) => {
                documents.insert(
                    &paths::category_record_path(category, project_id),
                    document.clone(),
                );
                documents.insert(
                    &paths::owner_record_path(&record.owner_id, project_id),
                    document,
                );
            }
            Err(e) => log::warn!("Skipping demo record {}: {}", project_id, e),
        }
        objects.insert(
            &paths::asset_key(project_id, FileKind::Image, "cover.png"),
            Vec::new(),
        );
    }
}

/// Checks that the Firestore endpoint answers at all
pub async fn check_reachable(config: &AppConfig) -> Result<(), String> {
    let Some(remote) = &config.remote else {
        return Ok(());
    };

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(5))
        .build()
        .map_err(|e| format!("Client build failed: {}", e))?;

    let url = format!(
        "https://firestore.googleapis.com/v1/projects/{}/databases/(default)/documents",
        remote.firebase_project_id
    );
    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    // Any HTTP answer, including 401/403 without a token, proves reachability
    if response.status().is_server_error() {
        return Err(format!("HTTP Status: {}", response.status()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_store::{Owner, ProjectDraft};

    fn offline_config() -> AppConfig {
        AppConfig::from_lookup(|name| match name {
            "MARKETPLACE_OFFLINE" => Some("1".to_string()),
            _ => None,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_offline_catalog_is_seeded() {
        let services = AppServices::connect(&offline_config(), &demo_user()).unwrap();
        assert!(services.offline);

        let page = services.loader.load(Category::Ai).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(
            page.asset_urls()[0],
            vec!["https://marketplace-demo.s3.amazonaws.com/demoAi0001/images/cover.png"]
        );
    }

    #[tokio::test]
    async fn test_published_project_appears_in_catalog() {
        let services = AppServices::offline(&offline_config());
        let user = demo_user();
        let project = ProjectDraft {
            title: "Campus event video".to_string(),
            category: "Videography".to_string(),
            price: "60".to_string(),
            description: String::new(),
        }
        .validate()
        .unwrap();

        let outcome = services
            .publisher
            .publish(
                &Owner {
                    id: user.uid.clone(),
                    display_name: user.display_name.clone(),
                },
                project,
                Vec::new(),
            )
            .await
            .unwrap();

        let page = services.loader.load(Category::Videography).await.unwrap();
        assert_eq!(page.records()[0].project_id, outcome.record.project_id);
    }
}
