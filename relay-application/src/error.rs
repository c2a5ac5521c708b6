use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("malformed event: {0}")]
    MalformedEvent(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}
