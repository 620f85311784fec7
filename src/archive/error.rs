use std::fmt;

/// Errors that can occur while talking to the archive host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// HTTP client creation failed
    ClientCreation(String),
    /// Request timed out
    Timeout(String),
    /// Could not connect to the host
    Connect(String),
    /// Any other transport-level failure
    Transport(String),
    /// Host answered with a non-success status
    Status(u16, String),
    /// Body could not be parsed as CSV
    Parse(String),
}

impl FetchError {
    /// Short machine-friendly label used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::ClientCreation(_) => "client_creation",
            FetchError::Timeout(_) => "timeout",
            FetchError::Connect(_) => "connect",
            FetchError::Transport(_) => "transport",
            FetchError::Status(_, _) => "status",
            FetchError::Parse(_) => "parse",
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::ClientCreation(msg) => write!(f, "Client creation error: {}", msg),
            FetchError::Timeout(msg) => write!(f, "Timeout error: {}", msg),
            FetchError::Connect(msg) => write!(f, "Connection error: {}", msg),
            FetchError::Transport(msg) => write!(f, "Request error: {}", msg),
            FetchError::Status(code, body) => write!(f, "HTTP Error {}: {}", code, body),
            FetchError::Parse(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for FetchError {}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout(err.to_string())
        } else if err.is_connect() {
            FetchError::Connect(err.to_string())
        } else {
            FetchError::Transport(err.to_string())
        }
    }
}

impl From<csv::Error> for FetchError {
    fn from(err: csv::Error) -> Self {
        FetchError::Parse(err.to_string())
    }
}
