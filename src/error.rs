use catalog_store::{PublishError, StoreError};
use marketplace_auth::AuthError;

/// Central error type for the Marketplace app
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Missing or invalid environment configuration
    #[error("Configuration error: {0}")]
    Config(String),
    /// Database error (rusqlite)
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    /// Filesystem error
    #[error("Filesystem error: {0}")]
    Filesystem(#[from] std::io::Error),
    /// Document store or object storage error
    #[error(transparent)]
    Store(#[from] StoreError),
    /// Publishing a project failed
    #[error(transparent)]
    Publish(#[from] PublishError),
    /// Sign-in failed
    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// User-friendly error messages for UI
impl AppError {
    pub fn user_message(&self) -> String {
        match self {
            AppError::Config(msg) => format!("The app is not configured: {}", msg),
            AppError::Database(_) => "A database error occurred. Please try again.".to_string(),
            AppError::Filesystem(_) => {
                "Error accessing files. Please check app permissions.".to_string()
            }
            _ if self.is_session_expired() => {
                "Your session has expired. Please sign in again.".to_string()
            }
            AppError::Store(_) => {
                "The marketplace could not be reached. Please try again.".to_string()
            }
            AppError::Publish(PublishError::Validation(errors)) => {
                format!("Some files cannot be uploaded: {}", errors)
            }
            AppError::Publish(PublishError::Write(_)) => {
                "Your project could not be saved. Nothing was published, please try again."
                    .to_string()
            }
            AppError::Publish(PublishError::Inconsistent { project_id, .. }) => format!(
                "Project {} was only partially saved. Please contact support.",
                project_id
            ),
            AppError::Auth(e) => e.to_string(),
        }
    }

    /// True if the backend rejected the signed-in user's token
    pub fn is_session_expired(&self) -> bool {
        matches!(
            self,
            AppError::Store(StoreError::Unauthorized(_))
                | AppError::Publish(PublishError::Write(StoreError::Unauthorized(_)))
        )
    }
}
