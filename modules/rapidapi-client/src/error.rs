use thiserror::Error;

pub type Result<T> = std::result::Result<T, RapidApiError>;

#[derive(Debug, Error)]
pub enum RapidApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid endpoint URL: {0}")]
    InvalidUrl(String),
}

impl RapidApiError {
    /// HTTP status of the failed call, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            RapidApiError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for RapidApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return RapidApiError::Parse(err.to_string());
        }
        RapidApiError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for RapidApiError {
    fn from(err: serde_json::Error) -> Self {
        RapidApiError::Parse(err.to_string())
    }
}
