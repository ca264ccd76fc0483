//! Access to provider-mediated content.
//!
//! The resolver only needs two things from the platform: the first row of a
//! metadata query and a byte stream. Android implements this over JNI; the
//! desktop build has no content providers at all.

use std::collections::HashMap;
use std::io::{self, Read};

/// Column holding the human-readable file name of a content reference.
pub const DISPLAY_NAME_COLUMN: &str = "_display_name";

/// One metadata row returned by a content provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentMetadata {
    columns: HashMap<String, Option<String>>,
}

impl ContentMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a column. `None` models a column that exists but holds NULL.
    pub fn with_column(mut self, name: impl Into<String>, value: Option<String>) -> Self {
        self.columns.insert(name.into(), value);
        self
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.columns.get(column).and_then(|value| value.as_deref())
    }

    pub fn display_name(&self) -> Option<&str> {
        self.get(DISPLAY_NAME_COLUMN)
    }
}

/// Platform seam for reading content references.
pub trait ContentResolver {
    /// Query metadata for `uri`. `Ok(None)` means the provider answered with
    /// an empty result set.
    fn query_metadata(&self, uri: &str) -> io::Result<Option<ContentMetadata>>;

    /// Open a read stream for `uri`. The stream is closed when dropped.
    fn open_stream(&self, uri: &str) -> io::Result<Box<dyn Read + '_>>;
}

/// Resolver for platforms without content providers.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoContentProvider;

impl ContentResolver for NoContentProvider {
    fn query_metadata(&self, _uri: &str) -> io::Result<Option<ContentMetadata>> {
        Ok(None)
    }

    fn open_stream(&self, uri: &str) -> io::Result<Box<dyn Read + '_>> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            format!("content references are not available on this platform: {uri}"),
        ))
    }
}
