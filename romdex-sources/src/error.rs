/// Errors that can occur while constructing or driving a source adapter.
///
/// In-band source conditions (unreachable service, malformed payload, spent
/// quota) are not errors: adapters degrade those to "no data" and the shared
/// quota counter. These variants cover transport plumbing and configuration.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}
