use thiserror::Error;

#[derive(Debug, Error)]
pub enum CentralError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid proxy configuration: {0}")]
    Proxy(String),

    #[error("Connector not found: {0}")]
    NotFound(String),

    #[error("Ballerina Central returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}
