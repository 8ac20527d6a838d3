use crate::components::SuccessDialog;
use crate::error::AppError;
use crate::models::Theme;
use crate::services::AppServices;
use crate::Screen;
use catalog_store::{
    follow_progress, validate_files, Category, FieldErrors, FileKind, FormField, Owner,
    ProjectDraft, PublishOutcome, UploadFile, UploadProgress,
};
use dioxus::prelude::*;
use dioxus_i18n::t;
use marketplace_auth::{AuthSession, IdentityProvider};
use tokio::sync::watch;

const LABEL_STYLE: &str =
    "display: block; margin-bottom: 6px; font-weight: 600; font-size: 14px;";
const FIELD_ERROR_STYLE: &str = "margin-top: 4px; color: #c33; font-size: 13px;";

fn accept_for(kind: FileKind) -> String {
    kind.extensions()
        .iter()
        .map(|ext| format!(".{}", ext))
        .collect::<Vec<_>>()
        .join(",")
}

#[component]
pub fn NewProjectScreen(on_navigate: EventHandler<Screen>) -> Element {
    let services = use_context::<Signal<Option<AppServices>>>();
    let session = use_context::<AuthSession>();
    let theme = use_context::<Signal<Theme>>();

    let mut title = use_signal(String::new);
    let mut category = use_signal(String::new);
    let mut price = use_signal(String::new);
    let mut description = use_signal(String::new);
    let mut images = use_signal(Vec::<UploadFile>::new);
    let mut videos = use_signal(Vec::<UploadFile>::new);
    let mut documents = use_signal(Vec::<UploadFile>::new);
    // Bumped on reset so the file inputs are re-created empty
    let mut form_generation = use_signal(|| 0u32);

    let mut field_errors = use_signal(FieldErrors::new);
    let mut submit_error = use_signal(|| None::<String>);
    let mut submitting = use_signal(|| false);
    let mut reading_files = use_signal(|| false);
    let mut progress = use_signal(|| None::<UploadProgress>);
    let mut outcome = use_signal(|| None::<PublishOutcome>);

    let mut reset_form = move || {
        title.set(String::new());
        category.set(String::new());
        price.set(String::new());
        description.set(String::new());
        images.set(Vec::new());
        videos.set(Vec::new());
        documents.set(Vec::new());
        field_errors.set(FieldErrors::new());
        submit_error.set(None);
        form_generation += 1;
    };

    let read_files = move |kind: FileKind, evt: FormEvent| async move {
        reading_files.set(true);
        let mut selected = Vec::new();
        for file in evt.files() {
            let name = file.name();
            match file.read_bytes().await {
                Ok(bytes) => selected.push(UploadFile::new(kind, name, bytes.to_vec())),
                Err(e) => log::error!("Failed to read {}: {}", name, e),
            }
        }
        log::debug!("Selected {} {} file(s)", selected.len(), kind.folder());

        let mut target = match kind {
            FileKind::Image => images,
            FileKind::Video => videos,
            FileKind::Document => documents,
        };
        target.set(selected);
        reading_files.set(false);
    };

    let submit = move |evt: FormEvent| {
        evt.prevent_default();
        if submitting() {
            return;
        }
        submit_error.set(None);

        let draft = ProjectDraft {
            title: title(),
            category: category(),
            price: price(),
            description: description(),
        };
        let files: Vec<UploadFile> = images()
            .into_iter()
            .chain(videos())
            .chain(documents())
            .collect();

        let mut errors = validate_files(&files);
        let project = match draft.validate() {
            Ok(project) => Some(project),
            Err(draft_errors) => {
                errors.merge(draft_errors);
                None
            }
        };
        let project = match project {
            Some(project) if errors.is_empty() => project,
            _ => {
                log::debug!("Submission blocked by {} field error(s)", errors.len());
                field_errors.set(errors);
                return;
            }
        };
        field_errors.set(FieldErrors::new());

        let Some(services) = services() else {
            submit_error.set(Some(
                AppError::Config("no backend connected".to_string()).user_message(),
            ));
            return;
        };
        let Some(user) = session.current_user() else {
            on_navigate.call(Screen::Marketplace);
            return;
        };
        let owner = Owner {
            id: user.uid,
            display_name: user.display_name,
        };

        submitting.set(true);
        let session = session.clone();
        spawn(async move {
            let (tx, rx) = watch::channel(UploadProgress::default());
            let publish = services
                .publisher
                .publish_with_progress(&owner, project, files, tx);
            // The follower drains the last update before the publish drops its sender
            let (published, _) = tokio::join!(
                publish,
                follow_progress(rx, |current| progress.set(Some(current)))
            );
            progress.set(None);

            match published {
                Ok(result) => {
                    reset_form();
                    outcome.set(Some(result));
                }
                Err(e) => {
                    let e = AppError::from(e);
                    log::error!("Publishing failed: {}", e);
                    if e.is_session_expired() {
                        session.sign_out();
                    }
                    submit_error.set(Some(e.user_message()));
                }
            }
            submitting.set(false);
        });
    };

    let errors = field_errors();
    let page_style = theme().page_style();
    let card_style = theme().card_style();

    rsx! {
        div { style: "padding: 16px; max-width: 600px; margin: 0 auto; min-height: 100vh; {page_style}",

            h1 { style: "color: #0066cc; font-size: 24px; font-weight: 700; margin: 0 0 24px 0;",
                {t!("form-title")}
            }

            if let Some(err) = submit_error() {
                div { style: "background: #fee; border: 1px solid #fcc; color: #c33; padding: 12px; margin-bottom: 16px; border-radius: 8px; font-size: 14px;",
                    "⚠️ {err}"
                }
            }

            form {
                key: "{form_generation}",
                style: "padding: 16px; border-radius: 8px; {card_style}",
                onsubmit: submit,

                div { style: "margin-bottom: 20px;",
                    label { style: LABEL_STYLE, {t!("form-title-label")} }
                    input {
                        r#type: "text",
                        class: "input",
                        value: "{title}",
                        oninput: move |e| title.set(e.value()),
                    }
                    FieldError { message: errors.get(FormField::Title).map(str::to_string) }
                }

                div { style: "margin-bottom: 20px;",
                    label { style: LABEL_STYLE, {t!("form-category-label")} }
                    select {
                        class: "input",
                        value: "{category}",
                        onchange: move |e| category.set(e.value()),
                        option { value: "", {t!("form-category-placeholder")} }
                        for option_category in Category::all() {
                            option {
                                value: "{option_category}",
                                selected: category() == option_category.as_str(),
                                "{option_category}"
                            }
                        }
                    }
                    FieldError { message: errors.get(FormField::Category).map(str::to_string) }
                }

                div { style: "margin-bottom: 20px;",
                    label { style: LABEL_STYLE, {t!("form-price-label")} }
                    input {
                        r#type: "number",
                        class: "input",
                        min: "0",
                        step: "any",
                        value: "{price}",
                        oninput: move |e| price.set(e.value()),
                    }
                    FieldError { message: errors.get(FormField::Price).map(str::to_string) }
                }

                div { style: "margin-bottom: 20px;",
                    label { style: LABEL_STYLE, {t!("form-description-label")} }
                    textarea {
                        class: "input",
                        rows: "4",
                        value: "{description}",
                        oninput: move |e| description.set(e.value()),
                    }
                    FieldError { message: errors.get(FormField::Description).map(str::to_string) }
                }

                div { style: "margin-bottom: 20px;",
                    label { style: LABEL_STYLE, {t!("form-images-label")} }
                    input {
                        r#type: "file",
                        multiple: true,
                        accept: accept_for(FileKind::Image),
                        onchange: move |evt| read_files(FileKind::Image, evt),
                    }
                    if !images.read().is_empty() {
                        div { style: "font-size: 12px; color: #666; margin-top: 4px;",
                            {t!("form-files-selected", count: images.read().len())}
                        }
                    }
                    FieldError { message: errors.get(FormField::Images).map(str::to_string) }
                }

                div { style: "margin-bottom: 20px;",
                    label { style: LABEL_STYLE, {t!("form-videos-label")} }
                    input {
                        r#type: "file",
                        multiple: true,
                        accept: accept_for(FileKind::Video),
                        onchange: move |evt| read_files(FileKind::Video, evt),
                    }
                    if !videos.read().is_empty() {
                        div { style: "font-size: 12px; color: #666; margin-top: 4px;",
                            {t!("form-files-selected", count: videos.read().len())}
                        }
                    }
                    FieldError { message: errors.get(FormField::Videos).map(str::to_string) }
                }

                div { style: "margin-bottom: 20px;",
                    label { style: LABEL_STYLE, {t!("form-documents-label")} }
                    input {
                        r#type: "file",
                        multiple: true,
                        accept: accept_for(FileKind::Document),
                        onchange: move |evt| read_files(FileKind::Document, evt),
                    }
                    if !documents.read().is_empty() {
                        div { style: "font-size: 12px; color: #666; margin-top: 4px;",
                            {t!("form-files-selected", count: documents.read().len())}
                        }
                    }
                    FieldError { message: errors.get(FormField::Documents).map(str::to_string) }
                }

                if let Some(current) = progress() {
                    div { style: "padding: 12px; background: #e3f2fd; border-radius: 8px; color: #0066cc; font-size: 13px; margin-bottom: 20px;",
                        {t!("form-upload-progress", done: current.succeeded + current.failed, total: current.total)}
                    }
                }

                div { style: "display: flex; gap: 8px;",
                    button {
                        class: "btn-primary",
                        r#type: "submit",
                        style: "flex: 1; padding: 12px; font-size: 16px;",
                        disabled: submitting() || reading_files(),
                        if submitting() {
                            "⏳ "
                            {t!("form-submitting")}
                        } else if reading_files() {
                            {t!("form-files-reading")}
                        } else {
                            {t!("form-submit")}
                        }
                    }
                    button {
                        class: "btn-secondary",
                        r#type: "button",
                        style: "padding: 12px;",
                        disabled: submitting(),
                        onclick: move |_| reset_form(),
                        {t!("form-reset")}
                    }
                }
            }

            if let Some(result) = outcome() {
                SuccessDialog {
                    project_title: result.record.title.clone(),
                    uploads: result.uploads.clone(),
                    on_accept: move |_| {
                        outcome.set(None);
                        on_navigate.call(Screen::Marketplace);
                    },
                    on_decline: move |_| outcome.set(None),
                }
            }
        }
    }
}

#[component]
fn FieldError(message: Option<String>) -> Element {
    rsx! {
        if let Some(message) = message {
            div { style: FIELD_ERROR_STYLE, "{message}" }
        }
    }
}
