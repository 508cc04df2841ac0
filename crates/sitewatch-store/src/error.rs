use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

/// 存储访问错误
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("store returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("store operation timed out")]
    Timeout,

    #[error("invalid store configuration: {0}")]
    Config(String),
}
