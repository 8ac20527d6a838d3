use catalog_store::UploadReport;
use dioxus::prelude::*;
use dioxus_i18n::t;

/// Confirmation shown once a project and all of its uploads are accounted for
#[component]
pub fn SuccessDialog(
    project_title: String,
    uploads: UploadReport,
    on_accept: EventHandler<()>,
    on_decline: EventHandler<()>,
) -> Element {
    let progress = uploads.progress();
    let failed: Vec<String> = uploads
        .failures()
        .map(|(entry, _)| entry.file_name.clone())
        .collect();

    rsx! {
        div { style: "position: fixed; inset: 0; background: rgba(0,0,0,0.5); display: flex; align-items: center; justify-content: center; z-index: 100;",
            div { style: "background: white; color: #333; border-radius: 12px; padding: 24px; max-width: 420px; width: 90%; box-shadow: 0 4px 16px rgba(0,0,0,0.2);",
                h2 { style: "margin: 0 0 12px 0; color: #155724;", {t!("dialog-success-title")} }
                p { style: "margin: 0 0 8px 0; font-size: 15px;", {t!("dialog-success-body")} }
                p { style: "margin: 0 0 12px 0; font-size: 14px; font-weight: 600;", "{project_title}" }

                if progress.total > 0 {
                    p { style: "margin: 0 0 8px 0; font-size: 13px; color: #555;",
                        {t!("dialog-upload-summary", succeeded: progress.succeeded, total: progress.total)}
                    }
                }

                if !failed.is_empty() {
                    div { style: "background: #fff3cd; border-radius: 8px; padding: 8px 12px; margin-bottom: 12px; font-size: 13px;",
                        p { style: "margin: 0 0 4px 0; font-weight: 600;", {t!("dialog-upload-failed")} }
                        ul { style: "margin: 0; padding-left: 20px;",
                            for name in failed {
                                li { "{name}" }
                            }
                        }
                    }
                }

                div { style: "display: flex; gap: 8px; justify-content: flex-end; margin-top: 16px;",
                    button {
                        class: "btn-primary",
                        style: "padding: 10px 16px;",
                        onclick: move |_| on_accept.call(()),
                        {t!("dialog-accept")}
                    }
                    button {
                        class: "btn-secondary",
                        style: "padding: 10px 16px;",
                        onclick: move |_| on_decline.call(()),
                        {t!("dialog-decline")}
                    }
                }
            }
        }
    }
}
