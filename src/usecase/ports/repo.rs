use crate::domain::entities::analysis::AnalysisOutcome;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoError {
    Message(String),
}

impl std::fmt::Display for RepoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RepoError::Message(message) => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for RepoError {}

/// Key/value hand-off between the submission flow and the report page.
pub trait HandoffStore: Send + Sync {
    fn init(&self) -> Result<(), RepoError>;

    fn save_result(&self, outcome: &AnalysisOutcome) -> Result<(), RepoError>;
    fn load_result(&self) -> Result<Option<AnalysisOutcome>, RepoError>;
    fn clear(&self) -> Result<(), RepoError>;
}
