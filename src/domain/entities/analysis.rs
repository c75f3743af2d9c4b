use serde::{Deserialize, Serialize};

pub const DEFAULT_ANALYSIS_MESSAGE: &str = "Análise concluída.";

/// What the settings modal hands to its host once the table is confirmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub csv_content: String,
    /// Empty means every campus is included.
    pub filters: Vec<String>,
    pub max_semester: String,
}

/// Wire body of `POST /analyze`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzePayload {
    pub file_content: String,
    pub filters: Vec<String>,
    pub max_semester: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartImagePaths {
    pub decomposicao: String,
    pub acf_pacf: String,
    pub predicao: String,
}

impl ChartImagePaths {
    pub fn resolve(&self, base_url: &str) -> ChartImageUrls {
        ChartImageUrls {
            decomposicao: prefix_with_base(base_url, &self.decomposicao),
            acf_pacf: prefix_with_base(base_url, &self.acf_pacf),
            predicao: prefix_with_base(base_url, &self.predicao),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartImageUrls {
    pub decomposicao: String,
    pub acf_pacf: String,
    pub predicao: String,
}

impl ChartImageUrls {
    pub fn get(&self, kind: ChartKind) -> &str {
        match kind {
            ChartKind::Decomposition => &self.decomposicao,
            ChartKind::AcfPacf => &self.acf_pacf,
            ChartKind::Forecast => &self.predicao,
        }
    }

    pub fn is_empty(&self) -> bool {
        ChartKind::ALL.iter().all(|kind| self.get(*kind).is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Decomposition,
    AcfPacf,
    Forecast,
}

impl ChartKind {
    pub const ALL: [ChartKind; 3] = [ChartKind::Decomposition, ChartKind::AcfPacf, ChartKind::Forecast];

    pub fn title(self) -> &'static str {
        match self {
            ChartKind::Decomposition => "Decomposição da série temporal",
            ChartKind::AcfPacf => "Autocorrelação (ACF e PACF)",
            ChartKind::Forecast => "Previsão de evasão",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ChartKind::Decomposition => {
                "Tendência, sazonalidade e resíduo da taxa de evasão ao longo dos semestres."
            }
            ChartKind::AcfPacf => {
                "Correlação da série com seus próprios atrasos, usada na escolha do modelo."
            }
            ChartKind::Forecast => {
                "Valores previstos para o período da pandemia com intervalo de confiança."
            }
        }
    }
}

/// Successful backend answer as persisted for the report page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisOutcome {
    pub image_paths: ChartImagePaths,
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeResponse {
    pub image_urls: ChartImagePaths,
    #[serde(default)]
    pub message: Option<String>,
}

impl From<AnalyzeResponse> for AnalysisOutcome {
    fn from(response: AnalyzeResponse) -> Self {
        Self {
            image_paths: response.image_urls,
            message: response
                .message
                .filter(|message| !message.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_ANALYSIS_MESSAGE.to_string()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeFailure {
    pub error: Option<String>,
}

fn prefix_with_base(base_url: &str, path: &str) -> String {
    let path = path.trim();
    if path.is_empty() {
        return String::new();
    }
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    let base = base_url.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}
