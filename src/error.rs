//! Application error types.
//!
//! Fatal errors (configuration, missing inputs) abort a command; lookup and
//! per-item render errors are reported by the caller and the batch continues.

use thiserror::Error;

/// Application result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Application error types with specific context for actionable debugging
#[derive(Debug, Error)]
pub enum Error {
    /// IO error with path context
    #[error("IO error at {path:?}: {source}")]
    Io {
        /// The underlying IO error.
        source: std::io::Error,
        /// File path where the error occurred, if known.
        path: Option<std::path::PathBuf>,
    },

    /// Configuration error with guidance
    #[error("Configuration error: {message}. {hint}")]
    Config {
        /// Description of the configuration problem.
        message: String,
        /// Actionable guidance for fixing the issue.
        hint: &'static str,
    },

    /// File parsing error
    #[error("Parse error in {file:?}: {message}")]
    Parse {
        /// File that failed to parse, if known.
        file: Option<std::path::PathBuf>,
        /// Description of the parse failure.
        message: String,
    },

    /// A requested song or sheet does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Template loading or rendering error
    #[error("Template error: {0}")]
    Template(String),

    /// PDF backend or merge error
    #[error("PDF error: {0}")]
    Pdf(String),

    /// Network error (connection, timeout, bad status)
    #[error("Network error: {0}")]
    Network(String),

    /// Generic message error (escape hatch)
    #[error("{0}")]
    Msg(String),
}

impl Error {
    /// Create an IO error with path context
    pub fn io(source: std::io::Error, path: impl Into<Option<std::path::PathBuf>>) -> Self {
        Self::Io { source, path: path.into() }
    }

    /// Create a config error with actionable hint
    pub fn config(message: impl Into<String>, hint: &'static str) -> Self {
        Self::Config { message: message.into(), hint }
    }

    /// Create a parse error with file context
    pub fn parse(message: impl Into<String>, file: impl Into<Option<std::path::PathBuf>>) -> Self {
        Self::Parse { file: file.into(), message: message.into() }
    }

    /// Whether this error should abort the whole command rather than one item.
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Config { .. } | Self::Parse { .. })
    }
}

// Convenience conversions
impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io { source: e, path: None }
    }
}

impl From<lopdf::Error> for Error {
    fn from(e: lopdf::Error) -> Self {
        Self::Pdf(e.to_string())
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Self::Msg(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Self::Msg(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    #[test]
    fn config_error_carries_hint() {
        let err = Error::config("Missing config.json", "Pass --config or set SONGBOOK_CONFIG");
        let text = err.to_string();
        assert!(text.contains("Missing config.json"));
        assert!(text.contains("SONGBOOK_CONFIG"));
        assert!(err.is_fatal());
    }

    #[test]
    fn per_item_errors_are_not_fatal() {
        assert!(!Error::Pdf("wkhtmltopdf exited with 1".into()).is_fatal());
        assert!(!Error::NotFound("song 7".into()).is_fatal());
    }
}
