use anyhow::{Context, Result};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod app;
mod domain;
mod infra;
mod platform;
mod ui;
mod usecase;

#[cfg(test)]
mod tests;

use crate::infra::config::AppConfig;
use crate::infra::sqlite::repo::SqliteHandoffStore;
use crate::usecase::ports::repo::HandoffStore;

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    if let Err(err) = run() {
        error!(error = %format!("{err:#}"), "failed to start");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let config = AppConfig::load()?;
    let webview_data_dir = config.webview_data_dir()?;

    SqliteHandoffStore {
        db_path: config.db_path(),
    }
    .init()
    .context("failed to prepare hand-off store")?;

    info!(
        api = %config.api_base_url,
        data_dir = %config.data_dir.display(),
        "starting oraculo"
    );
    app::install_config(config)?;

    dioxus::LaunchBuilder::desktop()
        .with_cfg(
            dioxus::desktop::Config::new()
                .with_window(dioxus::desktop::WindowBuilder::new().with_title("Oráculo"))
                .with_data_directory(webview_data_dir),
        )
        .launch(app::App);
    Ok(())
}
