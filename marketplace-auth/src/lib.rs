//! # Marketplace Auth
//!
//! Email/password sign-in against the Firebase Identity Toolkit.
//!
//! This crate provides:
//! - `FirebaseAuthService` for the `accounts:signInWithPassword` endpoint
//! - `AuthSession`, a watchable "current user" implementing `IdentityProvider`
//! - `SignInComponent`, a Dioxus form reporting the signed-in user through callbacks
//!
//! ## Separation of Concerns
//!
//! This crate focuses solely on identity. It does **not**:
//! - Persist tokens (a session lasts as long as the process)
//! - Talk to the document store or object storage (handled by the application)
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use marketplace_auth::{AuthSession, FirebaseAuthService, SignInComponent};
//!
//! // Programmatic usage
//! let service = FirebaseAuthService::new(api_key)?;
//! let user = service.sign_in("ada@example.com", "secret").await?;
//! session.set_user(user);
//!
//! // UI component usage
//! SignInComponent {
//!     api_key: api_key.clone(),
//!     on_success: move |user| session.set_user(user),
//! }
//! ```

pub mod component;
pub mod models;
pub mod service;
pub mod session;

pub use component::{SignInComponent, SignInLabels, SignInProps};
pub use models::{CurrentUser, SignInResponse, SignInState};
pub use service::{AuthError, FirebaseAuthService};
pub use session::{AuthSession, IdentityProvider};
