use crate::models::{CurrentUser, SignInResponse};
use serde::Deserialize;

const IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com/v1";

/// Error type for authentication operations
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("JSON error: {0}")]
    JsonError(String),
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("This account has been disabled")]
    UserDisabled,
    #[error("Too many attempts, try again later")]
    TooManyAttempts,
    #[error("Server error: {0}")]
    ServerError(String),
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

impl AuthError {
    /// Maps a Firebase error message such as `"INVALID_PASSWORD"` or
    /// `"TOO_MANY_ATTEMPTS_TRY_LATER : Access disabled..."` to an error
    pub fn from_firebase_message(message: &str) -> Self {
        let code = message
            .split(|c: char| c == ':' || c.is_whitespace())
            .next()
            .unwrap_or_default();
        match code {
            "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS"
            | "INVALID_EMAIL" | "MISSING_PASSWORD" => AuthError::InvalidCredentials,
            "USER_DISABLED" => AuthError::UserDisabled,
            "TOO_MANY_ATTEMPTS_TRY_LATER" => AuthError::TooManyAttempts,
            _ => AuthError::ServerError(message.to_string()),
        }
    }
}

/// Firebase email/password authentication service
pub struct FirebaseAuthService {
    api_key: String,
    client: reqwest::Client,
}

impl FirebaseAuthService {
    /// Create a new authentication service for a Firebase web API key
    pub fn new(api_key: String) -> Result<Self, AuthError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .connect_timeout(std::time::Duration::from_secs(10))
            .user_agent("MarketplaceAuth/0.1.0")
            .build()
            .map_err(|e| AuthError::NetworkError(format!("Client build failed: {}", e)))?;
        Ok(Self { api_key, client })
    }

    /// Sign in with email and password
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<CurrentUser, AuthError> {
        let url = format!(
            "{}/accounts:signInWithPassword?key={}",
            IDENTITY_TOOLKIT_URL, self.api_key
        );

        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({
                "email": email.trim(),
                "password": password,
                "returnSecureToken": true,
            }))
            .send()
            .await
            .map_err(|e| AuthError::NetworkError(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::warn!("Sign-in rejected with status {}", status);
            return Err(match serde_json::from_str::<ErrorEnvelope>(&body) {
                Ok(envelope) => AuthError::from_firebase_message(&envelope.error.message),
                Err(_) => AuthError::ServerError(format!("Server returned status: {}", status)),
            });
        }

        let result = response
            .json::<SignInResponse>()
            .await
            .map_err(|e| AuthError::JsonError(format!("Failed to parse response: {}", e)))?;

        log::info!("Signed in as {}", result.local_id);
        Ok(CurrentUser::from(result))
    }
}
