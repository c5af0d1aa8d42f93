use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("malformed host record: {0}")]
    Json(#[from] serde_json::Error),
    #[error("host record is not a JSON object")]
    NotAnObject,
}

pub type Result<T> = std::result::Result<T, ModelError>;
