#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("index unavailable: {reason}")]
    IndexUnavailable { reason: String },

    #[error("ingestion failed: {0}")]
    Ingestion(String),
}

pub type Result<T> = std::result::Result<T, SearchError>;
