use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The frame source could not be opened at all. Never retried here.
    #[error("frame source unavailable: {0}")]
    SourceUnavailable(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid analysis config: {0}")]
    InvalidConfig(String),
    #[error("analysis worker failed: {0}")]
    WorkerFailed(String),
}

impl From<tokio::task::JoinError> for AnalysisError {
    fn from(value: tokio::task::JoinError) -> Self {
        AnalysisError::WorkerFailed(value.to_string())
    }
}
