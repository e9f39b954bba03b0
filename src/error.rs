/// Coarse failure classes. Every one of them is recoverable at the granularity
/// of a single branch or hop; none aborts the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Fetch failed, timed out, or returned a non-success status
    Transport,
    /// Malformed document or malformed URL
    Parse,
    /// No paragraph links the page to the hop target
    NotFound,
    /// Bad configuration or local I/O
    Config,
}

/// Error type for fetching, parsing, and evidence extraction.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("request to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    #[error("non-success HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("fetching {url} timed out after {secs}s")]
    Timeout { url: String, secs: u64 },

    #[error("invalid URL {href:?}: {reason}")]
    InvalidUrl { href: String, reason: String },

    #[error("document parsing failed: {0}")]
    Parse(String),

    #[error("no paragraph on {page} links to {target}")]
    ParagraphNotFound { page: String, target: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Regex(#[from] regex::Error),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Transport { .. } | Error::Status { .. } | Error::Timeout { .. } => {
                ErrorKind::Transport
            }
            Error::InvalidUrl { .. } | Error::Parse(_) => ErrorKind::Parse,
            Error::ParagraphNotFound { .. } => ErrorKind::NotFound,
            Error::Config(_) | Error::Io(_) | Error::Json(_) | Error::Regex(_) => {
                ErrorKind::Config
            }
        }
    }
}

/// Result type alias for this crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_taxonomy() {
        let timeout = Error::Timeout {
            url: "https://example.org/wiki/A".to_string(),
            secs: 5,
        };
        assert_eq!(timeout.kind(), ErrorKind::Transport);

        let status = Error::Status {
            url: "https://example.org/wiki/A".to_string(),
            status: 404,
        };
        assert_eq!(status.kind(), ErrorKind::Transport);
        assert_eq!(
            status.to_string(),
            "non-success HTTP status 404 for https://example.org/wiki/A"
        );

        assert_eq!(Error::Parse("bad".into()).kind(), ErrorKind::Parse);
        let missing = Error::ParagraphNotFound {
            page: "a".into(),
            target: "b".into(),
        };
        assert_eq!(missing.kind(), ErrorKind::NotFound);
    }
}
