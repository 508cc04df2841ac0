use sitewatch_store::StoreError;
use thiserror::Error;

/// 检查循环错误
///
/// 这些错误只会让当前这一轮失败，调度循环本身继续运行。
#[derive(Debug, Error)]
pub enum CheckerError {
    #[error("failed to list sites: {0}")]
    ListSites(#[source] StoreError),

    #[error("failed to resolve user emails: {0}")]
    ListUsers(#[source] StoreError),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("check cycle panicked: {0}")]
    Panicked(String),
}
