use crate::models::Theme;
use crate::services::AppServices;
use catalog_store::{CatalogState, Category, LoadStatus, ProjectRecord, StoreError};
use dioxus::prelude::*;
use dioxus_i18n::t;
use marketplace_auth::{AuthSession, IdentityProvider};

const HIGHLIGHT: &str = "#E9E920";

#[component]
pub fn MarketplaceScreen() -> Element {
    let services = use_context::<Signal<Option<AppServices>>>();
    let session = use_context::<AuthSession>();
    let theme = use_context::<Signal<Theme>>();
    let mut catalog = use_signal(CatalogState::new);

    // Every click starts a fetch; only the latest one may commit
    let fetch_session = session.clone();
    let select = use_callback(move |category: Category| {
        let ticket = catalog.write().select(category);
        let Some(services) = services() else {
            log::warn!("No backend connected, cannot load {}", category);
            catalog.write().apply(
                &ticket,
                Err(StoreError::Document("no backend connected".to_string())),
            );
            return;
        };
        let session = fetch_session.clone();
        spawn(async move {
            let result = services.loader.load(category).await;
            let expired = matches!(result, Err(StoreError::Unauthorized(_)));
            if catalog.write().apply(&ticket, result) && expired {
                log::warn!("Session token rejected, signing out");
                session.sign_out();
            }
        });
    });

    let display_name = session
        .current_user()
        .map(|user| user.display_name)
        .unwrap_or_default();
    let offline = services().map(|s| s.offline).unwrap_or(false);
    let page_style = theme().page_style();
    let state = catalog.read();

    rsx! {
        div { style: "padding: 16px; max-width: 1100px; margin: 0 auto; min-height: 100vh; {page_style}",

            // Header
            div { style: "display: flex; justify-content: space-between; align-items: center; margin-bottom: 12px; padding-top: 8px;",
                h1 { style: "color: #0066cc; margin: 0; font-size: 24px; font-weight: 700;",
                    {t!("marketplace-title")}
                }
                div { style: "display: flex; gap: 8px; align-items: center; font-size: 14px;",
                    if offline {
                        span { style: "padding: 4px 8px; background: #fff3cd; color: #856404; border-radius: 6px; font-size: 12px;",
                            {t!("marketplace-offline-badge")}
                        }
                    }
                    span { {t!("marketplace-greeting", name: display_name)} }
                }
            }

            CategoryBar {
                highlights: state.highlights(),
                on_select: move |category| select.call(category),
            }

            match state.status() {
                LoadStatus::Idle => rsx! {
                    div { style: "text-align: center; padding: 48px 16px; color: #888;",
                        {t!("marketplace-select-category")}
                    }
                },
                LoadStatus::Loading => rsx! {
                    div { style: "text-align: center; padding: 48px 16px; color: #666;",
                        "⏳ "
                        {t!("marketplace-loading")}
                    }
                },
                LoadStatus::Failed(error) => rsx! {
                    div { style: "background: #fee; border: 1px solid #fcc; color: #c33; padding: 12px; margin: 16px 0; border-radius: 8px; font-size: 14px;",
                        "⚠️ "
                        {t!("marketplace-load-failed", error: error.clone())}
                    }
                },
                LoadStatus::Loaded if state.page().is_empty() => rsx! {
                    div { style: "text-align: center; padding: 48px 16px; color: #888;",
                        {t!("marketplace-empty")}
                    }
                },
                LoadStatus::Loaded => rsx! {
                    div { style: "display: grid; grid-template-columns: repeat(auto-fill, minmax(220px, 1fr)); gap: 16px; margin-top: 16px;",
                        for (record, urls) in state.page().entries() {
                            ProjectCard {
                                key: "{record.project_id}",
                                record: record.clone(),
                                image_urls: urls.clone(),
                                theme: theme(),
                            }
                        }
                    }
                },
            }
        }
    }
}

/// Mutually exclusive category buttons
#[component]
fn CategoryBar(highlights: Vec<(Category, bool)>, on_select: EventHandler<Category>) -> Element {
    rsx! {
        div { style: "display: flex; flex-wrap: wrap; gap: 8px; margin: 8px 0 16px;",
            for (category, active) in highlights {
                button {
                    key: "{category}",
                    style: format!(
                        "padding: 8px 14px; border-radius: 16px; border: 1px solid #ccc; cursor: pointer; font-size: 14px; color: #000; background: {};",
                        if active { HIGHLIGHT } else { "#ffffff" },
                    ),
                    onclick: move |_| on_select.call(category),
                    "{category}"
                }
            }
        }
    }
}

#[component]
fn ProjectCard(record: ProjectRecord, image_urls: Vec<String>, theme: Theme) -> Element {
    let cover = image_urls.first().cloned();
    let card_style = theme.card_style();

    rsx! {
        div { style: "border-radius: 8px; overflow: hidden; box-shadow: 0 2px 6px rgba(0,0,0,0.1); {card_style}",
            if let Some(url) = cover {
                img {
                    src: "{url}",
                    alt: "{record.title}",
                    style: "width: 100%; height: 180px; object-fit: cover; display: block;",
                }
            } else {
                div { style: "width: 100%; height: 180px; background: #ddd; display: flex; align-items: center; justify-content: center; color: #777; font-size: 14px;",
                    {t!("marketplace-no-image")}
                }
            }
            div { style: "padding: 12px;",
                div { style: "font-weight: 700; font-size: 15px; margin-bottom: 6px;", "{record.title}" }
                div { style: "font-size: 14px; margin-bottom: 4px;", "${record.price}" }
                div { style: "font-size: 12px; color: #888;", "{record.owner_display_name}" }
            }
        }
    }
}
