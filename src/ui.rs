use crate::api::RemoteGateway;
use crate::theme::{persist_theme, stored_theme, theme_definition, toggled};
use crate::types::ThemeMode;
use crate::views::{ChatView, DashboardView, UploadView};
use dioxus::prelude::*;

const APP_CSS: Asset = asset!("/assets/docassist.css");

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AppTab {
    Chat,
    Upload,
    Dashboard,
}

#[component]
pub fn App() -> Element {
    use_context_provider(RemoteGateway::from_env);
    let active_tab = use_signal(|| AppTab::Chat);
    let theme = use_signal(stored_theme);

    rsx! {
        ThemeStyles { theme }
        AppHeader { active_tab, theme }
        TabPanels { active_tab }
    }
}

#[component]
fn ThemeStyles(theme: Signal<ThemeMode>) -> Element {
    let definition = theme_definition(theme());
    rsx! {
        document::Link { rel: "stylesheet", href: APP_CSS }
        style { dangerous_inner_html: "{definition.css}" }
    }
}

#[component]
fn AppHeader(active_tab: Signal<AppTab>, theme: Signal<ThemeMode>) -> Element {
    let mut theme = theme;
    let theme_label = match theme() {
        ThemeMode::Light => "Dark",
        ThemeMode::Dark => "Light",
    };
    rsx! {
        div { class: "header",
            div { class: "header-content",
                span { class: "header-wordmark", "DocAssist" }
                TabNavigation { active_tab }
                button {
                    class: "btn btn-ghost theme-toggle",
                    r#type: "button",
                    onclick: move |_| {
                        let next = toggled(theme());
                        theme.set(next);
                        persist_theme(next);
                    },
                    "{theme_label}"
                }
            }
        }
    }
}

#[component]
fn TabPanels(active_tab: Signal<AppTab>) -> Element {
    rsx! {
        div { class: "tab-panels",
            TabPanel {
                active_tab,
                tab: AppTab::Chat,
                children: rsx!( ChatView {} ),
            }
            TabPanel {
                active_tab,
                tab: AppTab::Upload,
                children: rsx!( UploadView {} ),
            }
            TabPanel {
                active_tab,
                tab: AppTab::Dashboard,
                children: rsx!( DashboardView {} ),
            }
        }
    }
}

#[component]
fn TabPanel(active_tab: Signal<AppTab>, tab: AppTab, children: Element) -> Element {
    let is_active = active_tab() == tab;
    let class_suffix = if is_active { "active" } else { "" };
    rsx! {
        div {
            class: format_args!("tab-panel {}", class_suffix),
            aria_hidden: (!is_active).to_string(),
            {children}
        }
    }
}

#[component]
fn TabNavigation(active_tab: Signal<AppTab>) -> Element {
    rsx! {
        div { class: "tabs",
            TabButton { active_tab, tab: AppTab::Chat, label: "Chat" }
            TabButton { active_tab, tab: AppTab::Upload, label: "Upload" }
            TabButton { active_tab, tab: AppTab::Dashboard, label: "Dashboard" }
        }
    }
}

#[component]
fn TabButton(active_tab: Signal<AppTab>, tab: AppTab, label: &'static str) -> Element {
    let mut active_tab = active_tab;
    let class = if active_tab() == tab {
        "tab active"
    } else {
        "tab"
    };
    rsx! {
        h1 {
            class: class,
            onclick: move |_| active_tab.set(tab),
            "{label}"
        }
    }
}
