pub type Result<T> = core::result::Result<T, Error>;

/// Generic notice shown for any 5xx answer.
pub const SERVER_ERROR_NOTICE: &str = "Internal Server Error occurred. Please try again later.";

pub struct Error {
    pub inner: Box<ErrorKind>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Error {
        Error {
            inner: Box::new(kind),
        }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.inner
    }

    /// True when the server rejected the bearer token.
    pub fn is_auth_expired(&self) -> bool {
        matches!(*self.inner, ErrorKind::AuthExpired)
    }

    pub fn user_message(&self) -> String {
        self.inner.user_message()
    }
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:?}", self.inner)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl std::error::Error for Error {}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error::new(kind)
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Error {
        Error::new(ErrorKind::Network(e))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Error {
        Error::new(ErrorKind::SerdeJson(e))
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Error {
        Error::new(ErrorKind::StdIo(e))
    }
}

impl From<crate::config::ConfigError> for Error {
    fn from(e: crate::config::ConfigError) -> Error {
        Error::new(ErrorKind::Config(e))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// HTTP 401: the token is no longer accepted.
    #[error("session expired, please log in again")]
    AuthExpired,
    /// HTTP 400 carrying a server `message`, e.g. the enrollment cap.
    #[error("{0}")]
    Validation(String),
    /// HTTP 5xx.
    #[error("server error (status {status}): {body}")]
    Server { status: u16, body: String },
    /// Any other non-2xx answer.
    #[error("unexpected status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },
    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(reqwest::Error),
    /// Local form validation, raised before any request is sent.
    #[error("{0}")]
    InvalidInput(String),
    #[error("enrollment {id} is already {status} and cannot be {action}")]
    InvalidTransition {
        id: u64,
        status: &'static str,
        action: &'static str,
    },
    #[error("not logged in")]
    AuthRequired,
    #[error("this action is only available to {0} accounts")]
    Forbidden(&'static str),
    #[error("{0} not found")]
    NotFound(String),
    #[error("invalid JSON: {0}")]
    SerdeJson(serde_json::Error),
    #[error("io error: {0}")]
    StdIo(std::io::Error),
    #[error("configuration error: {0}")]
    Config(crate::config::ConfigError),
    #[error("parse error: {0}")]
    Parse(String),
}

impl ErrorKind {
    /// Text for the blocking notice shown to the user.
    pub fn user_message(&self) -> String {
        match self {
            ErrorKind::AuthExpired => "Your session has expired. Please log in again.".to_string(),
            ErrorKind::Validation(message) => message.clone(),
            ErrorKind::Server { .. } => SERVER_ERROR_NOTICE.to_string(),
            ErrorKind::UnexpectedStatus { status, .. } => {
                format!("An error occurred (status {status}). Please try again.")
            }
            ErrorKind::Network(_) => {
                "Could not reach the enrollment server. Please check your connection.".to_string()
            }
            other => other.to_string(),
        }
    }
}
