use std::path::PathBuf;

use anyhow::Context;

use crate::domain::entities::analysis::{AnalysisOutcome, ChartImagePaths, DEFAULT_ANALYSIS_MESSAGE};
use crate::infra::sqlite::queries::{delete_values, get_value, put_values};
use crate::infra::sqlite::schema::init_db;
use crate::usecase::ports::repo::{HandoffStore, RepoError};

pub const CHART_IMAGE_URLS_KEY: &str = "chartImageUrls";
pub const ANALYSIS_MESSAGE_KEY: &str = "analysisMessage";

pub struct SqliteHandoffStore {
    pub db_path: PathBuf,
}

impl HandoffStore for SqliteHandoffStore {
    fn init(&self) -> Result<(), RepoError> {
        init_db(&self.db_path).map_err(|err| RepoError::Message(err.to_string()))
    }

    fn save_result(&self, outcome: &AnalysisOutcome) -> Result<(), RepoError> {
        let urls = serde_json::to_string(&outcome.image_paths)
            .context("failed to encode chart image urls")
            .map_err(|err| RepoError::Message(format!("{err:#}")))?;

        init_db(&self.db_path)
            .and_then(|_| {
                put_values(
                    &self.db_path,
                    &[
                        (CHART_IMAGE_URLS_KEY, urls.as_str()),
                        (ANALYSIS_MESSAGE_KEY, outcome.message.as_str()),
                    ],
                )
            })
            .map_err(|err| RepoError::Message(format!("{err:#}")))
    }

    fn load_result(&self) -> Result<Option<AnalysisOutcome>, RepoError> {
        init_db(&self.db_path).map_err(|err| RepoError::Message(format!("{err:#}")))?;

        let Some(urls) = get_value(&self.db_path, CHART_IMAGE_URLS_KEY)
            .map_err(|err| RepoError::Message(format!("{err:#}")))?
        else {
            return Ok(None);
        };
        let image_paths: ChartImagePaths = serde_json::from_str(&urls)
            .map_err(|err| RepoError::Message(format!("URLs de gráficos salvas são inválidas: {err}")))?;
        let message = get_value(&self.db_path, ANALYSIS_MESSAGE_KEY)
            .map_err(|err| RepoError::Message(format!("{err:#}")))?
            .unwrap_or_else(|| DEFAULT_ANALYSIS_MESSAGE.to_string());

        Ok(Some(AnalysisOutcome {
            image_paths,
            message,
        }))
    }

    fn clear(&self) -> Result<(), RepoError> {
        init_db(&self.db_path)
            .and_then(|_| delete_values(&self.db_path, &[CHART_IMAGE_URLS_KEY, ANALYSIS_MESSAGE_KEY]))
            .map_err(|err| RepoError::Message(format!("{err:#}")))
    }
}
