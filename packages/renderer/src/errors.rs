use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Block not found: {0}")]
    BlockNotFound(String),
}
