//! Turns shared references into paths the frontend can read.
//!
//! Direct paths pass through untouched. Content references are streamed into
//! the private cache directory under the provider's display name, so the
//! frontend only ever sees plain files.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::content::ContentResolver;
use crate::error::{ResolveError, ResolveResult};
use crate::reference::ResourceReference;

/// File name used when the provider does not report a display name.
pub const DEFAULT_FILE_NAME: &str = "temp_image";

pub struct ReferenceResolver<C> {
    content: C,
    cache_dir: PathBuf,
}

impl<C: ContentResolver> ReferenceResolver<C> {
    /// `cache_dir` should be absolute; staged paths are built by joining onto it.
    pub fn new(content: C, cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            content,
            cache_dir: cache_dir.into(),
        }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn content(&self) -> &C {
        &self.content
    }

    pub fn resolve(&self, reference: &ResourceReference) -> ResolveResult<PathBuf> {
        match reference {
            ResourceReference::File { path: Some(path) } => Ok(PathBuf::from(path)),
            ResourceReference::File { path: None } => Err(ResolveError::MissingPath),
            ResourceReference::Content { uri } => self.stage(uri),
            ResourceReference::Unsupported { scheme } => {
                Err(ResolveError::UnsupportedScheme(scheme.clone()))
            }
        }
    }

    /// Copy a content reference into the cache directory.
    fn stage(&self, uri: &str) -> ResolveResult<PathBuf> {
        let file_name = self.display_name(uri);

        // Nothing touches the cache directory until the source is readable.
        let mut input = self
            .content
            .open_stream(uri)
            .map_err(|source| ResolveError::Open {
                uri: uri.to_string(),
                source,
            })?;

        fs::create_dir_all(&self.cache_dir).map_err(|source| ResolveError::Stage {
            path: self.cache_dir.clone(),
            source,
        })?;

        let target = self.cache_dir.join(&file_name);
        let copied = File::create(&target).and_then(|mut output| io::copy(&mut input, &mut output));

        match copied {
            Ok(bytes) => {
                debug!("Staged {} ({} bytes) at {}", uri, bytes, target.display());
                Ok(target)
            }
            Err(source) => {
                if let Err(e) = fs::remove_file(&target) {
                    if e.kind() != io::ErrorKind::NotFound {
                        warn!("Failed to remove partial file {}: {}", target.display(), e);
                    }
                }
                Err(ResolveError::Stage {
                    path: target,
                    source,
                })
            }
        }
    }

    fn display_name(&self, uri: &str) -> String {
        let reported = match self.content.query_metadata(uri) {
            Ok(Some(row)) => row.display_name().and_then(sanitize_file_name),
            Ok(None) => None,
            Err(e) => {
                debug!("Metadata query failed for {}: {}", uri, e);
                None
            }
        };

        reported.unwrap_or_else(|| DEFAULT_FILE_NAME.to_string())
    }
}

/// Keep only the last path component of a provider-supplied name.
fn sanitize_file_name(name: &str) -> Option<String> {
    match name.rsplit(['/', '\\']).next() {
        None | Some("") | Some(".") | Some("..") => None,
        Some(last) => Some(last.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::testing::{named, FakeContent, Metadata};
    use crate::content::{ContentMetadata, DISPLAY_NAME_COLUMN};

    const URI: &str = "content://media/external/images/media/42";

    fn setup(content: FakeContent) -> (tempfile::TempDir, ReferenceResolver<FakeContent>) {
        let dir = tempfile::tempdir().unwrap();
        let resolver = ReferenceResolver::new(content, dir.path().join("cache"));
        (dir, resolver)
    }

    fn content_ref() -> ResourceReference {
        ResourceReference::Content { uri: URI.into() }
    }

    #[test]
    fn test_direct_path_is_returned_unchanged() {
        let (_dir, resolver) = setup(FakeContent::new());
        for path in ["/storage/emulated/0/img.png", "/tmp/a b/c.jpg", "relative/x.gif"] {
            let reference = ResourceReference::File {
                path: Some(path.into()),
            };
            assert_eq!(resolver.resolve(&reference).unwrap(), PathBuf::from(path));
        }
        // No I/O happens for direct paths.
        assert!(!resolver.cache_dir().exists());
    }

    #[test]
    fn test_file_without_path_fails() {
        let (_dir, resolver) = setup(FakeContent::new());
        let err = resolver
            .resolve(&ResourceReference::File { path: None })
            .unwrap_err();
        assert!(matches!(err, ResolveError::MissingPath));
    }

    #[test]
    fn test_unsupported_scheme_fails() {
        let (_dir, resolver) = setup(FakeContent::new());
        let err = resolver
            .resolve(&ResourceReference::parse("https://example.com/a.png"))
            .unwrap_err();
        assert!(matches!(err, ResolveError::UnsupportedScheme(ref s) if s == "https"));
    }

    #[test]
    fn test_content_is_copied_byte_for_byte() {
        let bytes: Vec<u8> = (0..=255u8).cycle().take(64 * 1024 + 7).collect();
        let (_dir, resolver) = setup(FakeContent::new().with_bytes(URI, named("photo.jpg"), &bytes));

        let staged = resolver.resolve(&content_ref()).unwrap();

        assert_eq!(staged, resolver.cache_dir().join("photo.jpg"));
        assert_eq!(fs::read(&staged).unwrap(), bytes);
    }

    #[test]
    fn test_restaging_overwrites_previous_copy() {
        let (_dir, resolver) = setup(FakeContent::new().with_bytes(URI, named("photo.jpg"), b"new"));
        fs::create_dir_all(resolver.cache_dir()).unwrap();
        fs::write(resolver.cache_dir().join("photo.jpg"), b"older and longer").unwrap();

        let staged = resolver.resolve(&content_ref()).unwrap();
        assert_eq!(fs::read(staged).unwrap(), b"new");
    }

    #[test]
    fn test_default_name_when_metadata_missing() {
        let no_column = Metadata::Row(ContentMetadata::new().with_column("_size", Some("3".into())));
        let null_column = Metadata::Row(ContentMetadata::new().with_column(DISPLAY_NAME_COLUMN, None));

        for metadata in [Metadata::Empty, Metadata::Fails, no_column, null_column] {
            let (_dir, resolver) = setup(FakeContent::new().with_bytes(URI, metadata, b"abc"));
            let staged = resolver.resolve(&content_ref()).unwrap();
            assert_eq!(staged.file_name().unwrap(), DEFAULT_FILE_NAME);
            assert_eq!(fs::read(staged).unwrap(), b"abc");
        }
    }

    #[test]
    fn test_display_name_cannot_escape_cache_dir() {
        let (_dir, resolver) =
            setup(FakeContent::new().with_bytes(URI, named("../../etc/evil.png"), b"x"));
        let staged = resolver.resolve(&content_ref()).unwrap();
        assert_eq!(staged, resolver.cache_dir().join("evil.png"));

        let (_dir, resolver) = resolver_with_name("..");
        let staged = resolver.resolve(&content_ref()).unwrap();
        assert_eq!(staged, resolver.cache_dir().join(DEFAULT_FILE_NAME));
    }

    fn resolver_with_name(name: &str) -> (tempfile::TempDir, ReferenceResolver<FakeContent>) {
        setup(FakeContent::new().with_bytes(URI, named(name), b"x"))
    }

    #[test]
    fn test_open_failure_creates_nothing() {
        let (_dir, resolver) = setup(FakeContent::new().with_unopenable(URI, named("photo.jpg")));
        let err = resolver.resolve(&content_ref()).unwrap_err();
        assert!(matches!(err, ResolveError::Open { .. }));
        assert!(!resolver.cache_dir().exists());
    }

    #[test]
    fn test_copy_failure_removes_partial_file() {
        let (_dir, resolver) =
            setup(FakeContent::new().with_broken_stream(URI, named("photo.jpg"), b"partial"));
        let err = resolver.resolve(&content_ref()).unwrap_err();
        assert!(matches!(err, ResolveError::Stage { .. }));
        assert!(!resolver.cache_dir().join("photo.jpg").exists());
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("photo.jpg").as_deref(), Some("photo.jpg"));
        assert_eq!(sanitize_file_name("dir\\x.png").as_deref(), Some("x.png"));
        assert_eq!(sanitize_file_name("a/"), None);
        assert_eq!(sanitize_file_name(""), None);
    }
}
