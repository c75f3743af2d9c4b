use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::domain::entities::analysis::{AnalysisOutcome, AnalysisRequest, ChartImageUrls};
use crate::infra::http::analysis_client::{AnalysisClient, AnalysisError};
use crate::usecase::ports::repo::{HandoffStore, RepoError};

pub const DEMO_CSV: &str = "Semestre,Unidade,Taxa de Evasao\n\
2018.1,QUIXADA,10\n\
2018.2,QUIXADA,12\n\
2019.1,QUIXADA,11\n\
2019.2,QUIXADA,15\n\
2020.1,QUIXADA,20\n\
2020.2,QUIXADA,18\n\
2021.1,QUIXADA,22\n\
2021.2,QUIXADA,25\n\
2022.1,QUIXADA,23\n\
2022.2,QUIXADA,28\n\
2023.1,QUIXADA,30\n\
2023.2,QUIXADA,29\n";

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
    #[error("Falha ao salvar o resultado da análise: {0}")]
    Persist(#[from] RepoError),
}

/// What the report page renders: absolute chart URLs plus the backend message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportData {
    pub image_urls: ChartImageUrls,
    pub message: String,
}

pub struct AnalysisService {
    client: AnalysisClient,
    store: Arc<dyn HandoffStore>,
}

impl AnalysisService {
    pub fn new(client: AnalysisClient, store: Arc<dyn HandoffStore>) -> Self {
        Self { client, store }
    }

    pub fn http(&self) -> &reqwest::Client {
        self.client.http()
    }

    /// Posts the request and, on success, replaces the stored hand-off.
    pub async fn submit(&self, request: &AnalysisRequest) -> Result<ReportData, SubmitError> {
        let outcome = self.client.analyze(request).await?;
        self.store.save_result(&outcome)?;
        info!(message = %outcome.message, "analysis stored");
        Ok(self.to_report(&outcome))
    }

    /// Reads the stored result. A result that can no longer be read is
    /// dropped so the next load starts clean.
    pub fn load_latest(&self) -> Result<Option<ReportData>, RepoError> {
        match self.store.load_result() {
            Ok(outcome) => Ok(outcome.map(|outcome| self.to_report(&outcome))),
            Err(err) => {
                warn!(error = %err, "discarding unreadable stored analysis");
                if let Err(clear_err) = self.store.clear() {
                    warn!(error = %clear_err, "failed to discard stored analysis");
                }
                Err(err)
            }
        }
    }

    fn to_report(&self, outcome: &AnalysisOutcome) -> ReportData {
        ReportData {
            image_urls: outcome.image_paths.resolve(self.client.base_url()),
            message: outcome.message.clone(),
        }
    }
}

/// Built-in series used when the report page opens without a stored result.
pub fn demo_request() -> AnalysisRequest {
    AnalysisRequest {
        csv_content: DEMO_CSV.to_string(),
        filters: vec!["QUIXADA".to_string()],
        max_semester: "2023.2".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::domain::entities::analysis::ChartImagePaths;
    use crate::infra::import::csv::parse_table;

    #[derive(Default)]
    struct MemoryStore {
        saved: Mutex<Option<AnalysisOutcome>>,
    }

    impl HandoffStore for MemoryStore {
        fn init(&self) -> Result<(), RepoError> {
            Ok(())
        }

        fn save_result(&self, outcome: &AnalysisOutcome) -> Result<(), RepoError> {
            *self.saved.lock().expect("lock") = Some(outcome.clone());
            Ok(())
        }

        fn load_result(&self) -> Result<Option<AnalysisOutcome>, RepoError> {
            Ok(self.saved.lock().expect("lock").clone())
        }

        fn clear(&self) -> Result<(), RepoError> {
            *self.saved.lock().expect("lock") = None;
            Ok(())
        }
    }

    #[test]
    fn demo_series_is_a_parseable_quixada_table() {
        let request = demo_request();
        let table = parse_table(&request.csv_content).expect("demo csv should parse");

        assert_eq!(table.headers(), ["Semestre", "Unidade", "Taxa de Evasao"]);
        assert_eq!(table.len(), 12);
        assert_eq!(request.filters, vec!["QUIXADA"]);
        assert_eq!(request.max_semester, "2023.2");
    }

    #[test]
    fn load_latest_resolves_stored_paths_against_base_url() {
        let store = Arc::new(MemoryStore::default());
        store
            .save_result(&AnalysisOutcome {
                image_paths: ChartImagePaths {
                    decomposicao: "/images/d.png".to_string(),
                    acf_pacf: "/images/a.png".to_string(),
                    predicao: "/images/p.png".to_string(),
                },
                message: "Pronto".to_string(),
            })
            .expect("save");
        let service = AnalysisService::new(AnalysisClient::new("http://backend:5000"), store);

        let report = service.load_latest().expect("load").expect("report should exist");

        assert_eq!(report.image_urls.decomposicao, "http://backend:5000/images/d.png");
        assert_eq!(report.message, "Pronto");
    }

    #[tokio::test]
    async fn unreachable_backend_leaves_store_untouched() {
        let store = Arc::new(MemoryStore::default());
        let service = AnalysisService::new(AnalysisClient::new("http://127.0.0.1:9"), store.clone());

        let err = service.submit(&demo_request()).await.expect_err("should fail");

        assert!(matches!(err, SubmitError::Analysis(AnalysisError::Network(_))), "unexpected error: {err:?}");
        assert!(store.load_result().expect("load").is_none());
    }
}
