//! Error types for API calls and attempt-controller operations.

use thiserror::Error;

const CONNECTION_MESSAGE: &str = "Unable to reach the server. Please check your connection.";
const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please sign in again.";
const GENERIC_MESSAGE: &str = "Something went wrong. Please try again.";

/// Failure talking to the remote quiz API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No response: connection refused, DNS failure, reset.
    #[error("network error: {0}")]
    Network(String),

    /// The request exceeded its deadline.
    #[error("request timed out")]
    Timeout,

    /// HTTP 401.
    #[error("unauthorized")]
    Unauthorized,

    /// HTTP 404, carrying the server's message.
    #[error("not found: {0}")]
    NotFound(String),

    /// Any other non-success status, or a `success: false` envelope.
    #[error("server error ({status}): {}", .message.as_deref().unwrap_or("no message"))]
    Server { status: u16, message: Option<String> },

    /// The body could not be decoded into the expected shape.
    #[error("malformed response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Text suitable for an alert shown to the student.
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(_) | Self::Timeout => CONNECTION_MESSAGE.to_string(),
            Self::Unauthorized => SESSION_EXPIRED_MESSAGE.to_string(),
            Self::NotFound(message) => message.clone(),
            Self::Server {
                message: Some(message),
                ..
            } => message.clone(),
            Self::Server { message: None, .. } | Self::Decode(_) => GENERIC_MESSAGE.to_string(),
        }
    }

    /// Network and timeout failures can be retried as-is.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Timeout)
    }

    /// Map a non-success HTTP status and optional server message.
    pub fn from_status(status: u16, message: Option<String>) -> Self {
        match status {
            401 => Self::Unauthorized,
            404 => Self::NotFound(message.unwrap_or_else(|| "Not found".to_string())),
            _ => Self::Server { status, message },
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            Self::from_status(status.as_u16(), None)
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Failure of an attempt-controller operation.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// The operation is not valid in the controller's current state.
    #[error("cannot {operation} while {state}")]
    InvalidState {
        operation: &'static str,
        state: &'static str,
    },

    /// The option id does not belong to the current question.
    #[error("option {option_id} is not part of question {question_id}")]
    UnknownOption {
        question_id: String,
        option_id: String,
    },

    /// Text was given for a question that offers options.
    #[error("question {0} expects one of its options, not text")]
    NotFreeText(String),

    /// The server handed out an attempt without questions.
    #[error("attempt {0} has no questions")]
    EmptyAttempt(String),

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl ControllerError {
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(err) => err.user_message(),
            Self::EmptyAttempt(_) => "This quiz has no questions yet.".to_string(),
            Self::NotFreeText(_) => "Pick one of the listed options for this question.".to_string(),
            other => other.to_string(),
        }
    }
}

/// Invalid or missing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Top-level failure of the binary.
#[derive(Debug, Error)]
pub enum PortalError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{}", .0.user_message())]
    Api(#[from] ApiError),

    #[error("terminal error: {0}")]
    Io(#[from] std::io::Error),
}
