use anyhow::{anyhow, Result};
use dioxus::prelude::*;
use once_cell::sync::OnceCell;

use crate::infra::config::AppConfig;
use crate::ui::components::header::Header;
use crate::ui::components::home_page::HomePage;
use crate::ui::components::report_page::ReportPage;
use crate::ui::components::settings_modal::SettingsModal;
use crate::ui::state::app_state::{AppState, Page, Services};

static CONFIG: OnceCell<AppConfig> = OnceCell::new();

/// Must run before the desktop launch; the root component reads it once.
pub fn install_config(config: AppConfig) -> Result<()> {
    CONFIG
        .set(config)
        .map_err(|_| anyhow!("configuration was already installed"))
}

#[component]
pub fn App() -> Element {
    let Some(config) = CONFIG.get() else {
        return rsx! {
            div {
                p { "Configuração do aplicativo indisponível." }
            }
        };
    };

    let state = AppState::new();
    use_context_provider(|| Services::from_config(config));

    let page = state.page;
    let show_settings = state.show_settings;
    let status = state.status;

    rsx! {
        div {
            style: "font-family: system-ui, sans-serif; min-height: 100vh; background: #f9fafb; padding-bottom: 32px;",
            Header { page }
            {match page() {
                Page::Home => rsx!(HomePage { state }),
                Page::Report => rsx!(ReportPage { state }),
            }}
            if show_settings() {
                SettingsModal { state }
            }
            div {
                style: "position: fixed; left: 0; right: 0; bottom: 0; padding: 6px 16px; font-size: 12px; color: #4b5563; background: #fff; border-top: 1px solid #e5e7eb;",
                "{status}"
            }
        }
    }
}
