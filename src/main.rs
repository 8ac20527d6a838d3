use dioxus::prelude::*;
use dioxus_i18n::prelude::use_init_i18n;
use marketplace_auth::{AuthSession, CurrentUser, IdentityProvider};

mod components;
mod config;
mod database;
mod error;
mod i18n;
mod models;
mod services;

use components::{
    MarketplaceScreen, MissingDisplayNameScreen, NavigationBar, NewProjectScreen,
    SettingsScreen, SignInScreen,
};
use config::AppConfig;
use models::Theme;
use services::{settings_service, AppServices};

const MAIN_CSS: Asset = asset!("/assets/main.css");

fn main() {
    init_logging();
    dioxus::launch(App);
}

#[cfg(not(target_os = "android"))]
fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

#[cfg(target_os = "android")]
fn init_logging() {
    android_logger::init_once(
        android_logger::Config::default()
            .with_max_level(log::LevelFilter::Info)
            .with_tag("marketplace"),
    );
}

/// Screen navigation for the app
#[derive(Clone, PartialEq, Debug)]
pub enum Screen {
    Marketplace,
    NewProject,
    Settings,
}

/// Stored theme, or the default if the settings database is unavailable
fn load_initial_theme() -> Theme {
    match database::init_database().and_then(|conn| settings_service::load_theme(&conn)) {
        Ok(theme) => theme,
        Err(e) => {
            log::warn!("Using default theme: {}", e);
            Theme::default()
        }
    }
}

#[component]
fn App() -> Element {
    use_init_i18n(i18n::init_i18n);

    let config = use_hook(|| {
        AppConfig::from_env().map_err(|e| {
            log::error!("{}", e);
            e.user_message()
        })
    });
    let theme = use_context_provider(|| Signal::new(load_initial_theme()));
    let session = use_context_provider(AuthSession::new);
    let mut services = use_context_provider(|| Signal::new(None::<AppServices>));
    let mut current_user = use_signal(|| session.current_user());
    let mut connect_error = use_signal(|| None::<String>);

    // Mirror sign-in state changes into the UI
    use_future(move || {
        let mut rx = session.subscribe();
        async move {
            while rx.changed().await.is_ok() {
                let user = rx.borrow_and_update().clone();
                current_user.set(user);
            }
        }
    });

    // Rebuild the backends whenever the signed-in user changes
    let connect_config = config.clone();
    use_effect(move || {
        let user = current_user();
        let (Ok(config), Some(user)) = (&connect_config, user) else {
            services.set(None);
            return;
        };
        match AppServices::connect(config, &user) {
            Ok(connected) => {
                connect_error.set(None);
                services.set(Some(connected));
            }
            Err(e) => {
                log::error!("Failed to connect backends: {}", e);
                connect_error.set(Some(e.user_message()));
                services.set(None);
            }
        }
    });

    let config = match config {
        Ok(config) => config,
        Err(message) => {
            return rsx! {
                document::Link { rel: "stylesheet", href: MAIN_CSS }
                div { style: "padding: 24px; color: #c33; font-family: sans-serif;",
                    "⚠️ {message}"
                }
            };
        }
    };

    let theme_class = format!("theme-{}", theme().as_str());

    rsx! {
        document::Link { rel: "stylesheet", href: MAIN_CSS }

        div { class: "{theme_class}", style: "font-family: sans-serif;",
            match current_user() {
                None => rsx! {
                    SignInScreen { config }
                },
                Some(user) if !user.has_display_name() => rsx! {
                    MissingDisplayNameScreen {}
                },
                Some(user) => rsx! {
                    SignedInApp { key: "{user.uid}", config, user, connect_error: connect_error() }
                },
            }
        }
    }
}

#[component]
fn SignedInApp(config: AppConfig, user: CurrentUser, connect_error: Option<String>) -> Element {
    let mut current_screen = use_signal(|| Screen::Marketplace);
    log::debug!("Rendering app for {}", user.uid);

    rsx! {
        div { style: "display: flex; flex-direction: column; height: 100vh;",

            if let Some(message) = connect_error {
                div { style: "background: #fee; border-bottom: 1px solid #fcc; color: #c33; padding: 12px; font-size: 14px;",
                    "⚠️ {message}"
                }
            }

            // Main Content
            div { style: "flex: 1; overflow-y: auto;",
                match current_screen() {
                    Screen::Marketplace => rsx! {
                        MarketplaceScreen {}
                    },
                    Screen::NewProject => rsx! {
                        NewProjectScreen { on_navigate: move |s| current_screen.set(s) }
                    },
                    Screen::Settings => rsx! {
                        SettingsScreen { config: config.clone() }
                    },
                }
            }

            // Bottom Navigation Bar
            NavigationBar {
                current_screen: current_screen(),
                on_navigate: move |screen| current_screen.set(screen),
            }
        }
    }
}
