use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;

pub const DEFAULT_API_URL: &str = "http://localhost:5000";
pub const API_URL_VAR: &str = "ORACULO_API_URL";
pub const DATA_DIR_VAR: &str = "ORACULO_DATA_DIR";

const DB_FILE_NAME: &str = "oraculo.sqlite";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api_base_url: String,
    pub data_dir: PathBuf,
}

impl AppConfig {
    /// Reads `.env` when present, then the process environment.
    pub fn load() -> Result<Self> {
        if let Err(err) = dotenvy::dotenv() {
            if !err.not_found() {
                return Err(err).context("failed to read .env file");
            }
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base_url = lookup(API_URL_VAR)
            .map(|value| value.trim().trim_end_matches('/').to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let data_dir = match lookup(DATA_DIR_VAR).filter(|value| !value.trim().is_empty()) {
            Some(value) => PathBuf::from(value.trim()),
            None => default_data_dir()?,
        };

        Ok(Self {
            api_base_url,
            data_dir,
        })
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE_NAME)
    }

    pub fn webview_data_dir(&self) -> Result<PathBuf> {
        ensure_webview_data_dir(&self.data_dir)
    }
}

pub fn default_data_dir() -> Result<PathBuf> {
    let project_dirs = ProjectDirs::from("br", "ufc", "oraculo")
        .ok_or_else(|| anyhow!("unable to resolve data directory"))?;
    Ok(project_dirs.data_local_dir().to_path_buf())
}

pub fn ensure_webview_data_dir(base_data_dir: &Path) -> Result<PathBuf> {
    let webview_data_dir = base_data_dir.join("webview2");
    std::fs::create_dir_all(&webview_data_dir).with_context(|| {
        format!(
            "failed to create webview dir: {}",
            webview_data_dir.display()
        )
    })?;
    Ok(webview_data_dir)
}
