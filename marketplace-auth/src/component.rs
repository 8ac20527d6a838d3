use crate::models::{CurrentUser, SignInState};
use crate::service::FirebaseAuthService;
use dioxus::prelude::*;

/// Props for the SignInComponent
#[derive(Props, Clone, PartialEq)]
pub struct SignInProps {
    /// Firebase web API key
    pub api_key: String,
    /// Callback when sign-in succeeds
    pub on_success: EventHandler<CurrentUser>,
    /// Callback when sign-in fails
    #[props(default)]
    pub on_error: Option<EventHandler<String>>,
    /// Custom labels for UI elements (optional)
    #[props(default)]
    pub labels: Option<SignInLabels>,
}

/// Custom labels for the sign-in UI
#[derive(Clone, PartialEq, Default)]
pub struct SignInLabels {
    pub title: String,
    pub email: String,
    pub password: String,
    pub sign_in_button: String,
    pub signing_in: String,
    pub sign_in_success: String,
    pub error_title: String,
    pub missing_fields: String,
}

/// Email/password sign-in form
///
/// Calls `on_success` with the signed-in user. The form stays usable after an
/// error so the user can correct the input and retry.
#[component]
pub fn SignInComponent(props: SignInProps) -> Element {
    let mut state = use_signal(|| SignInState::Idle);
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);

    let labels = props.labels.clone().unwrap_or_else(|| SignInLabels {
        title: "Sign in".to_string(),
        email: "Email".to_string(),
        password: "Password".to_string(),
        sign_in_button: "Sign in".to_string(),
        signing_in: "Signing in...".to_string(),
        sign_in_success: "Signed in".to_string(),
        error_title: "Sign-in failed".to_string(),
        missing_fields: "Please enter email and password".to_string(),
    });

    let submit = {
        let api_key = props.api_key.clone();
        let on_success = props.on_success;
        let on_error = props.on_error;
        let missing_fields = labels.missing_fields.clone();

        move |evt: FormEvent| {
            evt.prevent_default();
            if email().trim().is_empty() || password().is_empty() {
                state.set(SignInState::Error(missing_fields.clone()));
                return;
            }

            state.set(SignInState::SigningIn);
            let api_key = api_key.clone();

            spawn(async move {
                let result = match FirebaseAuthService::new(api_key) {
                    Ok(service) => service.sign_in(&email(), &password()).await,
                    Err(e) => Err(e),
                };

                match result {
                    Ok(user) => {
                        password.set(String::new());
                        state.set(SignInState::Success(user.clone()));
                        on_success.call(user);
                    }
                    Err(e) => {
                        let error_msg = e.to_string();
                        log::error!("Sign-in failed: {}", error_msg);
                        state.set(SignInState::Error(error_msg.clone()));
                        if let Some(handler) = on_error {
                            handler.call(error_msg);
                        }
                    }
                }
            });
        }
    };

    let busy = state() == SignInState::SigningIn;

    rsx! {
        form {
            class: "sign-in",
            style: "max-width: 360px; margin: 48px auto; padding: 24px; background: white; border-radius: 8px; box-shadow: 0 2px 8px rgba(0,0,0,0.1);",
            onsubmit: submit,
            h2 { style: "margin: 0 0 16px 0;", "{labels.title}" }

            label { style: "display: block; font-size: 14px; margin-bottom: 4px;", "{labels.email}" }
            input {
                r#type: "email",
                value: "{email}",
                disabled: busy,
                style: "width: 100%; padding: 8px; margin-bottom: 12px; box-sizing: border-box;",
                oninput: move |evt| email.set(evt.value()),
            }

            label { style: "display: block; font-size: 14px; margin-bottom: 4px;", "{labels.password}" }
            input {
                r#type: "password",
                value: "{password}",
                disabled: busy,
                style: "width: 100%; padding: 8px; margin-bottom: 16px; box-sizing: border-box;",
                oninput: move |evt| password.set(evt.value()),
            }

            match state() {
                SignInState::Idle => rsx! {
                    button { class: "btn-primary", r#type: "submit", "{labels.sign_in_button}" }
                },
                SignInState::SigningIn => rsx! {
                    div {
                        style: "padding: 12px; background: #fff3cd; border-radius: 4px; text-align: center;",
                        "{labels.signing_in}"
                    }
                },
                SignInState::Success(_) => rsx! {
                    div {
                        style: "padding: 12px; background: #d4edda; border-radius: 4px; text-align: center; color: #155724;",
                        "{labels.sign_in_success}"
                    }
                },
                SignInState::Error(error) => rsx! {
                    div {
                        style: "padding: 12px; margin-bottom: 12px; background: #f8d7da; border-radius: 4px; color: #721c24;",
                        p { style: "margin: 0 0 4px 0; font-weight: 600;", "{labels.error_title}" }
                        p { style: "margin: 0; font-size: 14px;", "{error}" }
                    }
                    button { class: "btn-primary", r#type: "submit", "{labels.sign_in_button}" }
                },
            }
        }
    }
}
