pub mod marketplace;
pub mod navigation;
pub mod project_form;
pub mod settings;
pub mod sign_in;
pub mod success_dialog;

pub use marketplace::MarketplaceScreen;
pub use navigation::NavigationBar;
pub use project_form::NewProjectScreen;
pub use settings::SettingsScreen;
pub use sign_in::{MissingDisplayNameScreen, SignInScreen};
pub use success_dialog::SuccessDialog;
