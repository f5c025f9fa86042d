use thiserror::Error;

/// Failures talking to the remote catalog service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// No usable response came back (DNS, connect, timeout, reset...)
    #[error("network error: {0}")]
    Transport(String),
    /// The service answered with a non-success HTTP status
    #[error("catalog service returned HTTP {status}")]
    Status { status: u16 },
    /// The service reported GraphQL errors alongside partial or absent data
    #[error("catalog query failed: {}", .0.join("; "))]
    Protocol(Vec<String>),
    /// The response body was not the shape we asked for
    #[error("unexpected response from catalog: {0}")]
    Decode(String),
}

impl CatalogError {
    /// The message shown to a user when a fetch fails.
    pub fn user_message(&self) -> String {
        match self {
            CatalogError::Transport(_) => {
                "Could not reach the Pokémon catalog. Check your connection and try again."
                    .to_string()
            }
            CatalogError::Status { status } => {
                format!("The Pokémon catalog is unavailable right now (HTTP {}).", status)
            }
            CatalogError::Protocol(messages) => match messages.first() {
                Some(first) => format!("The Pokémon catalog rejected the query: {}", first),
                None => "The Pokémon catalog rejected the query.".to_string(),
            },
            CatalogError::Decode(_) => {
                "The Pokémon catalog sent a response we could not read.".to_string()
            }
        }
    }
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return CatalogError::Decode(err.to_string());
        }
        match err.status() {
            Some(status) => CatalogError::Status {
                status: status.as_u16(),
            },
            None => CatalogError::Transport(err.to_string()),
        }
    }
}

/// Errors reading or writing the persisted client state.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("state file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("state file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors assembling the runtime configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("config file is not valid RON: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

/// Type alias for Results using CatalogError
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Type alias for Results using PersistenceError
pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Type alias for Results using ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;
