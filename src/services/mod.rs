pub mod backend;
pub mod settings_service;

pub use backend::{demo_user, AppServices};
