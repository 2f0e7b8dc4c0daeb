use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Could not connect to the server at {base_url}")]
    ConnectionFailed {
        base_url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Not authorized (HTTP {status})")]
    Unauthorized { status: u16 },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{message}")]
    Request { status: Option<u16>, message: String },

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl ApiError {
    pub fn request(status: Option<u16>, message: impl Into<String>) -> Self {
        ApiError::Request {
            status,
            message: message.into(),
        }
    }

    /// Session token was rejected; the caller should send the user to login.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }

    /// Text shown to the user in a notification.
    pub fn user_message(&self) -> String {
        let message = match self {
            ApiError::Request { message, .. } => message.trim().to_string(),
            other => other.to_string(),
        };
        if message.is_empty() {
            "Unknown error".to_string()
        } else {
            message
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
