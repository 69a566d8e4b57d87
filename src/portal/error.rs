use reqwest::StatusCode;
use thiserror::Error;

/// Maximum number of characters of a raw body quoted back to the user.
pub const EXCERPT_CHARS: usize = 100;

/// Everything that can go wrong talking to the grading portal.
///
/// Each variant maps to one user-visible message family: transport problems
/// carry the underlying error text, protocol problems carry the status code
/// and a body excerpt, application problems carry the server's own message.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PortalError {
    #[error("Request timed out after {secs}s: {source}")]
    Timeout {
        secs: u64,
        #[source]
        source: reqwest::Error,
    },
    #[error("Network error or server unresponsive: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("Server returned a non-JSON response ({status}). Body excerpt: {excerpt}...")]
    NonJson { status: StatusCode, excerpt: String },
    #[error("Parse error: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("{}", .message.as_deref().unwrap_or("request rejected by the portal"))]
    Rejected {
        status: StatusCode,
        message: Option<String>,
    },
    #[error("Could not read {path}: {source}")]
    File {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("Invalid portal URL {url}: {reason}")]
    Url { url: String, reason: String },
}

impl PortalError {
    /// Classify a reqwest failure, keeping timeouts apart from other transport errors.
    pub(crate) fn from_send(err: reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                secs: timeout_secs,
                source: err,
            }
        } else {
            Self::Transport(err)
        }
    }

    /// The server's own message when the portal rejected the call.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Rejected { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Text for the status line. Rejections read `"<prefix>: <server message>"`,
    /// everything else is shown as is.
    pub fn user_message(&self, prefix: &str) -> String {
        match self {
            Self::Rejected { message, .. } => format!(
                "{}: {}",
                prefix,
                message.as_deref().filter(|m| !m.is_empty()).unwrap_or("unknown error")
            ),
            other => other.to_string(),
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::Transport(_))
    }
}

/// First `max` characters of `body`, never splitting a UTF-8 sequence.
pub fn excerpt(body: &str, max: usize) -> String {
    body.chars().take(max).collect()
}
