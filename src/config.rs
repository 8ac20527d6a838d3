//! Environment configuration
//!
//! Values come from the process environment, optionally seeded from a `.env`
//! file. Remote credentials are required unless `MARKETPLACE_OFFLINE` is set.

use crate::error::AppError;
use catalog_store::{S3Config, DEFAULT_ASSET_CONCURRENCY, DEFAULT_UPLOAD_CONCURRENCY};

/// Credentials for the hosted backends
#[derive(Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    pub firebase_api_key: String,
    pub firebase_project_id: String,
    pub s3: S3Config,
}

impl std::fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("firebase_project_id", &self.firebase_project_id)
            .field("region", &self.s3.region)
            .field("bucket", &self.s3.bucket)
            .finish_non_exhaustive()
    }
}

/// Runtime configuration of the app
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// `None` selects the in-memory backends
    pub remote: Option<RemoteConfig>,
    pub asset_concurrency: usize,
    pub upload_concurrency: usize,
}

impl AppConfig {
    /// Loads `.env` (if present) and reads the process environment
    pub fn from_env() -> Result<Self, AppError> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                log::warn!("Ignoring unreadable .env file: {}", e);
            }
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let get = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let require = |name: &str| {
            get(name).ok_or_else(|| AppError::Config(format!("{} is not set", name)))
        };

        let offline = get("MARKETPLACE_OFFLINE")
            .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let remote = if offline {
            None
        } else {
            Some(RemoteConfig {
                firebase_api_key: require("FIREBASE_API_KEY")?,
                firebase_project_id: require("FIREBASE_PROJECT_ID")?,
                s3: S3Config {
                    region: require("S3_REGION")?,
                    bucket: require("S3_BUCKET")?,
                    access_key_id: require("AWS_ACCESS_KEY_ID")?,
                    secret_access_key: require("AWS_SECRET_ACCESS_KEY")?,
                },
            })
        };

        Ok(Self {
            remote,
            asset_concurrency: parse_width(
                "MARKETPLACE_ASSET_CONCURRENCY",
                get("MARKETPLACE_ASSET_CONCURRENCY"),
                DEFAULT_ASSET_CONCURRENCY,
            )?,
            upload_concurrency: parse_width(
                "MARKETPLACE_UPLOAD_CONCURRENCY",
                get("MARKETPLACE_UPLOAD_CONCURRENCY"),
                DEFAULT_UPLOAD_CONCURRENCY,
            )?,
        })
    }

    pub fn is_offline(&self) -> bool {
        self.remote.is_none()
    }
}

fn parse_width(name: &str, value: Option<String>, default: usize) -> Result<usize, AppError> {
    match value {
        None => Ok(default),
        Some(raw) => match raw.parse::<usize>() {
            Ok(width) if width > 0 => Ok(width),
            _ => Err(AppError::Config(format!(
                "{} must be a positive integer, got '{}'",
                name, raw
            ))),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    fn remote_vars() -> Vec<(&'static str, &'static str)> {
        vec![
            ("FIREBASE_API_KEY", "key"),
            ("FIREBASE_PROJECT_ID", "market"),
            ("S3_REGION", "us-east-1"),
            ("S3_BUCKET", "market-assets"),
            ("AWS_ACCESS_KEY_ID", "AKIA"),
            ("AWS_SECRET_ACCESS_KEY", "secret"),
        ]
    }

    #[test]
    fn test_remote_config() {
        let config = AppConfig::from_lookup(lookup(&remote_vars())).unwrap();
        let remote = config.remote.as_ref().unwrap();
        assert_eq!(remote.s3.bucket, "market-assets");
        assert_eq!(config.asset_concurrency, DEFAULT_ASSET_CONCURRENCY);
        assert_eq!(config.upload_concurrency, DEFAULT_UPLOAD_CONCURRENCY);
        assert!(!config.is_offline());
    }

    #[test]
    fn test_missing_variable_is_named() {
        let vars: Vec<_> = remote_vars()
            .into_iter()
            .filter(|(k, _)| *k != "S3_BUCKET")
            .collect();
        match AppConfig::from_lookup(lookup(&vars)) {
            Err(AppError::Config(msg)) => assert!(msg.contains("S3_BUCKET")),
            other => panic!("unexpected result: {:?}", other.map(|c| c.asset_concurrency)),
        }
    }

    #[test]
    fn test_offline_needs_no_credentials() {
        let config = AppConfig::from_lookup(lookup(&[
            ("MARKETPLACE_OFFLINE", "true"),
            ("MARKETPLACE_UPLOAD_CONCURRENCY", "8"),
        ]))
        .unwrap();
        assert!(config.is_offline());
        assert_eq!(config.upload_concurrency, 8);
    }

    #[test]
    fn test_invalid_width() {
        let result = AppConfig::from_lookup(lookup(&[
            ("MARKETPLACE_OFFLINE", "1"),
            ("MARKETPLACE_ASSET_CONCURRENCY", "0"),
        ]));
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_debug_hides_secrets() {
        let config = AppConfig::from_lookup(lookup(&remote_vars())).unwrap();
        let printed = format!("{:?}", config);
        assert!(!printed.contains("secret"));
        assert!(!printed.contains("AKIA"));
    }
}
