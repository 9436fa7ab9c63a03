use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to access stored key '{key}': {source}")]
    Storage {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode payload: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("unexpected response body: {message}")]
    Decode { message: String },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("not logged in")]
    NotAuthenticated,
}

impl AppError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn storage(key: &str, source: std::io::Error) -> Self {
        Self::Storage {
            key: key.to_string(),
            source,
        }
    }

    /// Builds the error for a non-2xx response from the raw body.
    ///
    /// The server sends `{"error": "..."}`; anything else falls back to a
    /// generic message carrying the status code.
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        let message = serde_json::from_slice::<serde_json::Value>(body)
            .ok()
            .and_then(|value| {
                value
                    .get("error")
                    .and_then(|error| error.as_str())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| format!("API Error: {status}"));
        Self::Api { status, message }
    }

    pub fn is_api(&self) -> bool {
        matches!(self, Self::Api { .. })
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
