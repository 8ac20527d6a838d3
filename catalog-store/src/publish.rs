//! Publishing a project
//!
//! Publishing is one logical operation:
//! 1. generate a project id and build the record
//! 2. write the owner-scoped copy (`users/students/<owner>/<project>`)
//! 3. write the category-scoped copy (`<Category>/<project>`); if this fails the
//!    owner copy is deleted again so both listings stay consistent
//! 4. upload all files as a tracked batch and wait until each is accounted for

use crate::document_store::DocumentStore;
use crate::error::StoreError;
use crate::id::generate_project_id;
use crate::models::{Owner, ProjectRecord, UploadFile};
use crate::object_storage::ObjectStorage;
use crate::paths;
use crate::upload::{UploadBatch, UploadProgress, UploadReport, DEFAULT_UPLOAD_CONCURRENCY};
use crate::validation::{validate_files, FieldErrors, ValidProject};
use std::sync::Arc;
use tokio::sync::watch;

/// Errors that can occur while publishing
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    /// Selected files violate type or size limits
    #[error("Invalid files: {0}")]
    Validation(FieldErrors),
    /// A record write failed; nothing is left behind
    #[error("Failed to save project: {0}")]
    Write(#[source] StoreError),
    /// The category write failed and the owner copy could not be removed
    #[error("Project {project_id} saved only at {orphan_path}: {cause}; rollback failed: {rollback}")]
    Inconsistent {
        project_id: String,
        orphan_path: String,
        cause: StoreError,
        rollback: StoreError,
    },
}

/// Outcome of a completed publication
#[derive(Debug, Clone, PartialEq)]
pub struct PublishOutcome {
    pub record: ProjectRecord,
    pub uploads: UploadReport,
}

impl PublishOutcome {
    /// True if the record and every file were stored
    pub fn is_complete(&self) -> bool {
        self.uploads.all_succeeded()
    }
}

/// Writes project records and uploads their files
#[derive(Clone)]
pub struct ProjectPublisher {
    documents: Arc<dyn DocumentStore>,
    objects: Arc<dyn ObjectStorage>,
    upload_concurrency: usize,
}

impl ProjectPublisher {
    pub fn new(documents: Arc<dyn DocumentStore>, objects: Arc<dyn ObjectStorage>) -> Self {
        Self {
            documents,
            objects,
            upload_concurrency: DEFAULT_UPLOAD_CONCURRENCY,
        }
    }

    /// Sets the number of concurrent uploads (at least 1)
    pub fn with_upload_concurrency(mut self, concurrency: usize) -> Self {
        self.upload_concurrency = concurrency.max(1);
        self
    }

    /// Publishes `project` for `owner` and uploads `files`
    pub async fn publish(
        &self,
        owner: &Owner,
        project: ValidProject,
        files: Vec<UploadFile>,
    ) -> Result<PublishOutcome, PublishError> {
        let (progress, _) = watch::channel(UploadProgress::default());
        self.publish_with_progress(owner, project, files, progress)
            .await
    }

    /// Like [`publish`](Self::publish), reporting upload progress on `progress`
    pub async fn publish_with_progress(
        &self,
        owner: &Owner,
        project: ValidProject,
        files: Vec<UploadFile>,
        progress: watch::Sender<UploadProgress>,
    ) -> Result<PublishOutcome, PublishError> {
        let file_errors = validate_files(&files);
        if !file_errors.is_empty() {
            return Err(PublishError::Validation(file_errors));
        }

        let record = ProjectRecord {
            project_id: generate_project_id(),
            title: project.title,
            category: project.category,
            price: project.price,
            description: project.description,
            owner_id: owner.id.clone(),
            owner_display_name: owner.display_name.clone(),
        };
        log::debug!("Publishing project {}", record.project_id);

        self.write_record(&record).await?;

        let uploads = UploadBatch::new(self.objects.clone(), &record.project_id, files)
            .with_concurrency(self.upload_concurrency)
            .with_progress(progress)
            .run()
            .await;

        log::info!(
            "Published project {} in {} ({} files)",
            record.project_id,
            record.category,
            uploads.entries().len()
        );
        Ok(PublishOutcome { record, uploads })
    }

    /// Writes both copies of `record`, rolling back the first if the second fails
    async fn write_record(&self, record: &ProjectRecord) -> Result<(), PublishError> {
        let document =
            serde_json::to_value(record).map_err(|e| PublishError::Write(StoreError::from(e)))?;
        let owner_path = paths::owner_record_path(&record.owner_id, &record.project_id);
        let category_path = paths::category_record_path(record.category, &record.project_id);

        self.documents
            .set(&owner_path, &document)
            .await
            .map_err(PublishError::Write)?;

        if let Err(cause) = self.documents.set(&category_path, &document).await {
            log::error!(
                "Writing {} failed, rolling back {}: {}",
                category_path,
                owner_path,
                cause
            );
            return match self.documents.delete(&owner_path).await {
                Ok(()) => Err(PublishError::Write(cause)),
                Err(rollback) => {
                    log::error!("Rollback of {} failed: {}", owner_path, rollback);
                    Err(PublishError::Inconsistent {
                        project_id: record.project_id.clone(),
                        orphan_path: owner_path,
                        cause,
                        rollback,
                    })
                }
            };
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;
    use crate::document_store::MemoryDocumentStore;
    use crate::models::FileKind;
    use crate::object_storage::MemoryObjectStorage;
    use crate::validation::ProjectDraft;

    fn owner() -> Owner {
        Owner {
            id: "u1".to_string(),
            display_name: "Ada".to_string(),
        }
    }

    fn project() -> ValidProject {
        ProjectDraft {
            title: "Build me a website".to_string(),
            category: "Web Development".to_string(),
            price: "100".to_string(),
            description: "Full responsive site build".to_string(),
        }
        .validate()
        .unwrap()
    }

    fn images() -> Vec<UploadFile> {
        vec![
            UploadFile::new(FileKind::Image, "front.png", vec![1, 2]),
            UploadFile::new(FileKind::Image, "back.jpg", vec![3]),
        ]
    }

    #[tokio::test]
    async fn test_publish_writes_both_copies_and_uploads() {
        let documents = Arc::new(MemoryDocumentStore::new());
        let objects = Arc::new(MemoryObjectStorage::new("bucket"));
        let publisher = ProjectPublisher::new(documents.clone(), objects.clone());

        let outcome = publisher.publish(&owner(), project(), images()).await.unwrap();
        let id = &outcome.record.project_id;

        let owner_copy = documents
            .document(&format!("users/students/u1/{}", id))
            .unwrap();
        let category_copy = documents
            .document(&format!("Web Development/{}", id))
            .unwrap();
        assert_eq!(owner_copy, category_copy);
        assert_eq!(owner_copy["projectId"], id.as_str());
        assert_eq!(documents.write_log().len(), 2);

        assert_eq!(objects.put_calls(), 2);
        assert!(objects.contains(&format!("{}/images/front.png", id)));
        assert!(objects.contains(&format!("{}/images/back.jpg", id)));
        assert!(outcome.is_complete());
    }

    #[tokio::test]
    async fn test_price_is_stored_as_number() {
        let documents = Arc::new(MemoryDocumentStore::new());
        let publisher =
            ProjectPublisher::new(documents.clone(), Arc::new(MemoryObjectStorage::new("b")));
        let draft = ProjectDraft {
            title: "Logo design".to_string(),
            category: "Design".to_string(),
            price: "25".to_string(),
            description: String::new(),
        };

        let outcome = publisher
            .publish(&owner(), draft.validate().unwrap(), Vec::new())
            .await
            .unwrap();

        let stored = documents
            .document(&format!("Design/{}", outcome.record.project_id))
            .unwrap();
        assert!(stored["price"].is_number());
        assert_eq!(stored["price"].as_f64(), Some(25.0));
    }

    #[tokio::test]
    async fn test_category_write_failure_rolls_back_owner_copy() {
        let documents = Arc::new(MemoryDocumentStore::new());
        documents.fail_writes_under("Web Development/");
        let objects = Arc::new(MemoryObjectStorage::new("bucket"));
        let publisher = ProjectPublisher::new(documents.clone(), objects.clone());

        let err = publisher
            .publish(&owner(), project(), images())
            .await
            .unwrap_err();

        assert!(matches!(err, PublishError::Write(_)));
        assert!(documents
            .get_all("users/students/u1")
            .await
            .unwrap()
            .is_empty());
        assert_eq!(objects.put_calls(), 0);
    }

    #[tokio::test]
    async fn test_failed_rollback_reports_inconsistency() {
        let documents = Arc::new(MemoryDocumentStore::new());
        documents.fail_writes_under("Web Development/");
        documents.fail_deletes_under("users/");
        let publisher =
            ProjectPublisher::new(documents.clone(), Arc::new(MemoryObjectStorage::new("b")));

        let err = publisher
            .publish(&owner(), project(), Vec::new())
            .await
            .unwrap_err();

        match err {
            PublishError::Inconsistent {
                project_id,
                orphan_path,
                ..
            } => {
                assert_eq!(orphan_path, format!("users/students/u1/{}", project_id));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[tokio::test]
    async fn test_owner_write_failure_stops_before_second_write() {
        let documents = Arc::new(MemoryDocumentStore::new());
        documents.fail_writes_under("users/");
        let publisher =
            ProjectPublisher::new(documents.clone(), Arc::new(MemoryObjectStorage::new("b")));

        let err = publisher
            .publish(&owner(), project(), Vec::new())
            .await
            .unwrap_err();

        assert!(matches!(err, PublishError::Write(_)));
        assert!(documents.write_log().is_empty());
        assert!(documents
            .get_all(Category::WebDevelopment.collection())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_upload_failures_are_reported() {
        let documents = Arc::new(MemoryDocumentStore::new());
        let objects = Arc::new(MemoryObjectStorage::new("bucket"));
        objects.fail_under("");
        let publisher = ProjectPublisher::new(documents, objects);

        let outcome = publisher.publish(&owner(), project(), images()).await.unwrap();

        assert!(!outcome.is_complete());
        assert_eq!(outcome.uploads.progress().failed, 2);
    }

    #[tokio::test]
    async fn test_invalid_files_are_rejected_before_writing() {
        let documents = Arc::new(MemoryDocumentStore::new());
        let publisher =
            ProjectPublisher::new(documents.clone(), Arc::new(MemoryObjectStorage::new("b")));
        let files = vec![UploadFile::new(FileKind::Image, "virus.exe", vec![0])];

        let err = publisher.publish(&owner(), project(), files).await.unwrap_err();

        assert!(matches!(err, PublishError::Validation(_)));
        assert!(documents.write_log().is_empty());
    }
}
