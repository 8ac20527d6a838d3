use crate::config::AppConfig;
use crate::models::Theme;
use crate::services::demo_user;
use dioxus::prelude::*;
use dioxus_i18n::t;
use marketplace_auth::{AuthSession, SignInComponent, SignInLabels};

fn sign_in_labels() -> SignInLabels {
    SignInLabels {
        title: t!("sign-in-title"),
        email: t!("sign-in-email"),
        password: t!("sign-in-password"),
        sign_in_button: t!("sign-in-button"),
        signing_in: t!("sign-in-progress"),
        sign_in_success: t!("sign-in-success"),
        error_title: t!("sign-in-error"),
        missing_fields: t!("sign-in-missing-fields"),
    }
}

/// Shown until a user is signed in
#[component]
pub fn SignInScreen(config: AppConfig) -> Element {
    let session = use_context::<AuthSession>();
    let theme = use_context::<Signal<Theme>>();
    let page_style = theme().page_style();

    rsx! {
        div { style: "min-height: 100vh; padding: 16px; {page_style}",
            match config.remote {
                Some(remote) => rsx! {
                    SignInComponent {
                        api_key: remote.firebase_api_key,
                        labels: sign_in_labels(),
                        on_success: move |user| session.set_user(user),
                    }
                },
                None => rsx! {
                    div { style: "max-width: 360px; margin: 48px auto; text-align: center;",
                        h2 { {t!("sign-in-title")} }
                        button {
                            class: "btn-primary",
                            style: "padding: 12px 24px; font-size: 16px;",
                            onclick: move |_| session.set_user(demo_user()),
                            {t!("sign-in-offline")}
                        }
                    }
                },
            }
        }
    }
}

/// Signed in, but the account has no display name to publish under
#[component]
pub fn MissingDisplayNameScreen() -> Element {
    let session = use_context::<AuthSession>();

    rsx! {
        div { style: "max-width: 420px; margin: 48px auto; padding: 16px; text-align: center;",
            p { style: "font-size: 15px; margin-bottom: 16px;", {t!("sign-in-display-name-missing")} }
            button {
                class: "btn-secondary",
                style: "padding: 10px 16px;",
                onclick: move |_| session.sign_out(),
                {t!("settings-sign-out")}
            }
        }
    }
}
