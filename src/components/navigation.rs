use crate::models::Theme;
use crate::Screen;
use dioxus::prelude::*;
use dioxus_i18n::t;

const BUTTON_BASE: &str = "flex: 1; padding: 12px; margin: 0 5px; border: none; border-radius: 8px; cursor: pointer; font-size: 14px; text-align: center;";

fn button_style(active: bool) -> String {
    if active {
        format!("{} background: #0066cc; color: #ffffff;", BUTTON_BASE)
    } else {
        format!("{} background: #ffffff; color: #333;", BUTTON_BASE)
    }
}

#[component]
pub fn NavigationBar(current_screen: Screen, on_navigate: EventHandler<Screen>) -> Element {
    let theme = use_context::<Signal<Theme>>();
    let nav_style = match theme() {
        Theme::Light => "display: flex; justify-content: space-around; padding: 10px; background: #f0f0f0; border-top: 1px solid #ddd;",
        Theme::Dark => "display: flex; justify-content: space-around; padding: 10px; background: #111; border-top: 1px solid #333;",
    };

    rsx! {
        div {
            style: "{nav_style}",

            button {
                style: button_style(current_screen == Screen::Marketplace),
                onclick: move |_| on_navigate.call(Screen::Marketplace),
                {t!("nav-marketplace")}
            }

            button {
                style: button_style(current_screen == Screen::NewProject),
                onclick: move |_| on_navigate.call(Screen::NewProject),
                {t!("nav-new-project")}
            }

            button {
                style: button_style(current_screen == Screen::Settings),
                onclick: move |_| on_navigate.call(Screen::Settings),
                {t!("nav-settings")}
            }
        }
    }
}
