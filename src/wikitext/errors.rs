//! Error types for the wikitext module.
//!
//! Parsing itself never fails: unrecognised markup is simply left as text.
//! Errors only show up at the edges, when a caller asks for something that
//! is not there (a missing template parameter, a position past the end),
//! when the dump binary is given a bad flag, or when it touches the
//! filesystem.
//!
//! Exported items:
//! - `WtError` - main error enum.
//! - `Result<T>` - alias for `std::result::Result<T, WtError>`.

use std::error::Error;
use std::fmt;

/// The canonical result type used across the wikitext module.
pub type Result<T> = std::result::Result<T, WtError>;

/// Wikitext error.
///
/// - `NotFound` - requested item was not present (template/parameter).
/// - `IndexOutOfBounds` - asked for the Nth positional parameter but the
///    template had fewer; `idx` is the 1-based position requested.
/// - `InvalidArgument` - a command-line value that could not be understood.
/// - `Io` - wrapper for I/O errors raised while reading input.
/// - `Other` - catch-all carrying a message and optional boxed cause.
#[derive(Debug)]
pub enum WtError {
    NotFound {
        msg: String,
    },
    IndexOutOfBounds {
        idx: usize,
        len: usize,
    },
    InvalidArgument {
        msg: String,
    },
    Io {
        msg: String,
        source: Option<Box<dyn Error + Send + Sync + 'static>>,
    },
    Other {
        msg: String,
        source: Option<Box<dyn Error + Send + Sync + 'static>>,
    },
}

impl WtError {
    /// Construct a not-found error.
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        WtError::NotFound { msg: msg.into() }
    }

    /// Construct an index-out-of-bounds error.
    pub fn index_oob(idx: usize, len: usize) -> Self {
        WtError::IndexOutOfBounds { idx, len }
    }

    /// Construct an invalid argument error.
    pub fn invalid_arg<S: Into<String>>(msg: S) -> Self {
        WtError::InvalidArgument { msg: msg.into() }
    }

    /// Wrap a std::io::Error as an Io variant.
    pub fn io_err<E: Error + Send + Sync + 'static>(msg: impl Into<String>, e: E) -> Self {
        WtError::Io {
            msg: msg.into(),
            source: Some(Box::new(e)),
        }
    }

    /// Generic helper to produce Other(...) with an optional source.
    pub fn other_with_source<E: Error + Send + Sync + 'static>(
        msg: impl Into<String>,
        source: Option<E>,
    ) -> Self {
        WtError::Other {
            msg: msg.into(),
            source: source.map(|e| Box::new(e) as Box<dyn Error + Send + Sync>),
        }
    }

    /// Returns a short description of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            WtError::NotFound { .. } => "NotFound",
            WtError::IndexOutOfBounds { .. } => "IndexOutOfBounds",
            WtError::InvalidArgument { .. } => "InvalidArgument",
            WtError::Io { .. } => "Io",
            WtError::Other { .. } => "Other",
        }
    }
}

impl fmt::Display for WtError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WtError::NotFound { msg } => write!(f, "Not found: {}", msg),
            WtError::IndexOutOfBounds { idx, len } => {
                write!(f, "Index out of bounds: requested {}, length {}", idx, len)
            }
            WtError::InvalidArgument { msg } => write!(f, "Invalid argument: {}", msg),
            WtError::Io { msg, source } => {
                if let Some(s) = source {
                    write!(f, "IO error: {} (cause: {})", msg, s)
                } else {
                    write!(f, "IO error: {}", msg)
                }
            }
            WtError::Other { msg, source } => {
                if let Some(s) = source {
                    write!(f, "{} (cause: {})", msg, s)
                } else {
                    write!(f, "{}", msg)
                }
            }
        }
    }
}

impl Error for WtError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            WtError::Io { source, .. } | WtError::Other { source, .. } => {
                source.as_ref().map(|b| b.as_ref() as &dyn Error)
            }
            _ => None,
        }
    }
}

impl From<std::io::Error> for WtError {
    fn from(e: std::io::Error) -> Self {
        WtError::io_err("I/O error", e)
    }
}

impl From<serde_json::Error> for WtError {
    fn from(e: serde_json::Error) -> Self {
        WtError::other_with_source("json serialisation error", Some(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_not_found() {
        let e = WtError::not_found("parameter 'x' missing");
        assert!(format!("{}", e).contains("parameter 'x' missing"));
        assert_eq!(e.kind(), "NotFound");
    }

    #[test]
    fn display_index_oob() {
        let e = WtError::index_oob(3, 2);
        let s = format!("{}", e);
        assert!(s.contains("requested 3"));
        assert!(s.contains("length 2"));
    }

    #[test]
    fn invalid_argument_has_no_source() {
        let e = WtError::invalid_arg("unknown QueryType 'fuzzy'");
        assert_eq!(e.kind(), "InvalidArgument");
        assert_eq!(format!("{}", e), "Invalid argument: unknown QueryType 'fuzzy'");
        assert!(e.source().is_none());
    }

    #[test]
    fn io_conversion_has_source() {
        let io_err = std::io::Error::other("oh no");
        let e: WtError = io_err.into();
        let s = format!("{}", e);
        assert!(s.contains("I/O error"));
        assert!(s.contains("oh no"));
        assert!(e.source().is_some());
    }
}
