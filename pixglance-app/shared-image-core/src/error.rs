//! Error types for reference resolution.
//!
//! Every variant is recoverable: the capture layer logs it and records
//! "no shared data" instead of surfacing it to the frontend.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Reasons a [`ResourceReference`](crate::ResourceReference) could not be
/// turned into a readable path.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// A `file` reference without a path component.
    #[error("File reference has no path")]
    MissingPath,

    /// The reference is neither a direct path nor a content reference.
    #[error("Unsupported reference scheme: '{0}'")]
    UnsupportedScheme(String),

    /// The content provider refused to open a stream for the reference.
    #[error("Failed to open content stream for {uri}: {source}")]
    Open {
        uri: String,
        #[source]
        source: io::Error,
    },

    /// Creating or writing the staged copy in the cache directory failed.
    #[error("Failed to stage {}: {source}", .path.display())]
    Stage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ResolveError {
    /// Short machine-readable code, used as a log field.
    pub fn code(&self) -> &'static str {
        match self {
            ResolveError::MissingPath => "MISSING_PATH",
            ResolveError::UnsupportedScheme(_) => "UNSUPPORTED_SCHEME",
            ResolveError::Open { .. } => "OPEN_FAILED",
            ResolveError::Stage { .. } => "STAGE_FAILED",
        }
    }
}

/// Result type alias for resolver operations.
pub type ResolveResult<T> = std::result::Result<T, ResolveError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_error_mentions_path() {
        let err = ResolveError::Stage {
            path: PathBuf::from("/cache/photo.jpg"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        let message = err.to_string();
        assert!(message.contains("/cache/photo.jpg"));
        assert!(message.contains("denied"));
        assert_eq!(err.code(), "STAGE_FAILED");
    }

    #[test]
    fn test_open_error_keeps_source() {
        use std::error::Error as _;

        let err = ResolveError::Open {
            uri: "content://media/1".into(),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };
        assert!(err.source().is_some());
        assert_eq!(err.code(), "OPEN_FAILED");
    }
}
