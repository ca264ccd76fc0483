use percent_encoding::percent_decode_str;
use url::Url;

pub const FILE_SCHEME: &str = "file";
pub const CONTENT_SCHEME: &str = "content";

/// A reference to a shared resource as delivered by the OS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceReference {
    /// Direct filesystem path (`file://` or a bare absolute path).
    File { path: Option<String> },
    /// Provider-mediated reference that has to be streamed (`content://`).
    Content { uri: String },
    /// Any other scheme. Empty when the input could not be parsed at all.
    Unsupported { scheme: String },
}

impl ResourceReference {
    /// Parse a reference from the raw string carried by an intent.
    pub fn parse(raw: &str) -> Self {
        if raw.starts_with('/') {
            return ResourceReference::File {
                path: Some(raw.to_string()),
            };
        }

        let url = match Url::parse(raw) {
            Ok(url) => url,
            Err(_) => {
                return ResourceReference::Unsupported {
                    scheme: String::new(),
                }
            }
        };

        match url.scheme() {
            FILE_SCHEME => {
                let path = percent_decode_str(raw_file_path(raw))
                    .decode_utf8_lossy()
                    .into_owned();
                ResourceReference::File {
                    path: (!path.is_empty()).then_some(path),
                }
            }
            CONTENT_SCHEME => ResourceReference::Content {
                uri: raw.to_string(),
            },
            other => ResourceReference::Unsupported {
                scheme: other.to_string(),
            },
        }
    }

    pub fn scheme(&self) -> &str {
        match self {
            ResourceReference::File { .. } => FILE_SCHEME,
            ResourceReference::Content { .. } => CONTENT_SCHEME,
            ResourceReference::Unsupported { scheme } => scheme,
        }
    }
}

/// Path component of a `file:` URI exactly as written.
///
/// `Url::path()` normalizes dot segments and backslashes; shared paths are
/// handed on unchanged, so the path is cut out of the raw text instead.
fn raw_file_path(raw: &str) -> &str {
    let rest = raw.split_once(':').map_or(raw, |(_, rest)| rest);
    let rest = match rest.strip_prefix("//") {
        // Skip the authority (usually empty, sometimes `localhost`).
        Some(after) => after.find('/').map_or("", |start| &after[start..]),
        None => rest,
    };
    rest.split(['?', '#']).next().unwrap_or_default()
}
