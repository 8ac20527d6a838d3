use crate::config::AppConfig;
use crate::database;
use crate::models::Theme;
use crate::services::{backend, settings_service};
use dioxus::prelude::*;
use dioxus_i18n::t;
use marketplace_auth::{AuthSession, IdentityProvider};

#[derive(Clone, PartialEq)]
enum NetworkStatus {
    Checking,
    Online,
    Demo,
    Offline(String),
}

#[component]
fn NetworkCheckCard(config: AppConfig) -> Element {
    let mut network_status = use_signal(|| NetworkStatus::Checking);

    let check = use_callback(move |_: ()| {
        let config = config.clone();
        network_status.set(NetworkStatus::Checking);
        spawn(async move {
            if config.is_offline() {
                network_status.set(NetworkStatus::Demo);
                return;
            }
            match backend::check_reachable(&config).await {
                Ok(()) => network_status.set(NetworkStatus::Online),
                Err(e) => {
                    log::warn!("Connectivity check failed: {}", e);
                    network_status.set(NetworkStatus::Offline(e));
                }
            }
        });
    });

    // Check on mount
    use_effect(move || check.call(()));

    rsx! {
        div { class: "card", style: "margin-bottom: 16px; padding: 16px; border-radius: 8px;",
            h2 { style: "margin: 0 0 12px 0; font-size: 18px;", {t!("settings-connection")} }
            match network_status() {
                NetworkStatus::Checking => rsx! {
                    p { style: "margin: 0; color: #666;", {t!("settings-connection-checking")} }
                },
                NetworkStatus::Online => rsx! {
                    p { style: "margin: 0; color: #155724;", {t!("settings-connection-online")} }
                },
                NetworkStatus::Demo => rsx! {
                    p { style: "margin: 0; color: #856404;", {t!("settings-connection-demo")} }
                },
                NetworkStatus::Offline(error) => rsx! {
                    p { style: "margin: 0; color: #721c24;", {t!("settings-connection-offline", error: error)} }
                },
            }
            button {
                class: "btn-secondary",
                style: "margin-top: 12px; padding: 8px 12px;",
                disabled: network_status() == NetworkStatus::Checking,
                onclick: move |_| check.call(()),
                {t!("settings-recheck")}
            }
        }
    }
}

#[component]
pub fn SettingsScreen(config: AppConfig) -> Element {
    let session = use_context::<AuthSession>();
    let mut theme = use_context::<Signal<Theme>>();
    let mut error = use_signal(|| None::<String>);

    let user = session.current_user();
    let page_style = theme().page_style();
    let card_style = theme().card_style();

    let mut set_theme = move |next: Theme| {
        error.set(None);
        match database::init_database()
            .and_then(|conn| settings_service::save_theme(&conn, next))
        {
            Ok(()) => theme.set(next),
            Err(e) => {
                log::error!("Failed to save theme: {}", e);
                error.set(Some(e.user_message()));
            }
        }
    };

    rsx! {
        div { style: "padding: 16px; max-width: 600px; margin: 0 auto; min-height: 100vh; {page_style}",
            h1 { style: "color: #0066cc; font-size: 24px; font-weight: 700; margin: 0 0 24px 0;",
                {t!("settings-title")}
            }

            if let Some(err) = error() {
                div { style: "background: #fee; border: 1px solid #fcc; color: #c33; padding: 12px; margin-bottom: 16px; border-radius: 8px; font-size: 14px;",
                    "⚠️ {err}"
                }
            }

            div { style: "margin-bottom: 16px; padding: 16px; border-radius: 8px; {card_style}",
                h2 { style: "margin: 0 0 12px 0; font-size: 18px;", {t!("settings-theme")} }
                div { style: "display: flex; gap: 8px;",
                    button {
                        class: if theme() == Theme::Light { "btn-primary" } else { "btn-secondary" },
                        style: "flex: 1; padding: 10px;",
                        onclick: move |_| set_theme(Theme::Light),
                        {t!("settings-theme-light")}
                    }
                    button {
                        class: if theme() == Theme::Dark { "btn-primary" } else { "btn-secondary" },
                        style: "flex: 1; padding: 10px;",
                        onclick: move |_| set_theme(Theme::Dark),
                        {t!("settings-theme-dark")}
                    }
                }
            }

            div { style: "margin-bottom: 16px; padding: 16px; border-radius: 8px; {card_style}",
                h2 { style: "margin: 0 0 12px 0; font-size: 18px;", {t!("settings-account")} }
                if let Some(user) = user {
                    p { style: "margin: 0 0 12px 0; font-size: 14px;",
                        {t!("settings-signed-in-as", name: user.display_name.clone(), email: user.email.clone())}
                    }
                }
                button {
                    class: "btn-secondary",
                    style: "padding: 10px 16px;",
                    onclick: move |_| session.sign_out(),
                    {t!("settings-sign-out")}
                }
            }

            NetworkCheckCard { config }
        }
    }
}
