use thiserror::Error;

/// Unified error type for the Pulse application
#[derive(Error, Debug)]
pub enum PulseError {
    // Proxy list errors
    #[error("Invalid proxy format: {0}")]
    InvalidProxyFormat(String),

    #[error("No valid proxies in list")]
    EmptyProxyList,

    // Configuration errors
    #[error("Missing credential: {0}")]
    MissingCredentials(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Per-tick errors (contained within a worker)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Remote endpoint error: {0}")]
    Remote(String),

    // I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Pulse operations
pub type Result<T> = std::result::Result<T, PulseError>;

impl PulseError {
    /// Whether this error aborts startup (as opposed to being contained
    /// within a single worker's tick loop)
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            PulseError::MissingCredentials(_)
                | PulseError::EmptyProxyList
                | PulseError::InvalidConfig(_)
                | PulseError::Io(_)
        )
    }
}

// Convert from URL parse errors
impl From<url::ParseError> for PulseError {
    fn from(err: url::ParseError) -> Self {
        PulseError::InvalidConfig(err.to_string())
    }
}
