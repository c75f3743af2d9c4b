use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use reqwest::StatusCode;
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::entities::analysis::{
    AnalysisOutcome, AnalysisRequest, AnalyzeFailure, AnalyzePayload, AnalyzeResponse,
};

pub const GENERIC_FAILURE_MESSAGE: &str = "Falha na análise do backend.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("Falha na requisição: {0}")]
    Network(String),
    #[error("{0}")]
    Remote(String),
    #[error("Resposta inválida do backend: {0}")]
    MalformedResponse(String),
}

pub struct AnalysisClient {
    client: reqwest::Client,
    base_url: String,
}

impl AnalysisClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn endpoint(&self) -> String {
        if self.base_url.ends_with('/') {
            format!("{}analyze", self.base_url)
        } else {
            format!("{}/analyze", self.base_url)
        }
    }

    pub fn http(&self) -> &reqwest::Client {
        &self.client
    }

    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisOutcome, AnalysisError> {
        let url = self.endpoint();
        let payload = encode_payload(request);
        info!(
            %url,
            filters = request.filters.len(),
            max_semester = %request.max_semester,
            "submitting analysis"
        );

        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|err| AnalysisError::Network(err.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| AnalysisError::Network(err.to_string()))?;

        let outcome = interpret_response(status, &body);
        if let Err(err) = &outcome {
            warn!(%status, error = %err, "analysis failed");
        }
        outcome
    }
}

pub fn encode_payload(request: &AnalysisRequest) -> AnalyzePayload {
    AnalyzePayload {
        file_content: STANDARD.encode(request.csv_content.as_bytes()),
        filters: request.filters.clone(),
        max_semester: request.max_semester.clone(),
    }
}

/// Maps a backend answer onto an outcome. Failure statuses surface the
/// backend's `error` field when it has one.
pub fn interpret_response(status: StatusCode, body: &[u8]) -> Result<AnalysisOutcome, AnalysisError> {
    if !status.is_success() {
        let message = serde_json::from_slice::<AnalyzeFailure>(body)
            .ok()
            .and_then(|failure| failure.error)
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string());
        return Err(AnalysisError::Remote(message));
    }

    serde_json::from_slice::<AnalyzeResponse>(body)
        .map(AnalysisOutcome::from)
        .map_err(|err| AnalysisError::MalformedResponse(err.to_string()))
}
