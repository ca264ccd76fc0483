//! Platform-independent half of the PixGlance share bridge.
//!
//! [`IntentCapture`] turns OS "view"/"send" events into a single pending
//! path, using a [`ReferenceResolver`] to stage provider content into the
//! private cache directory. The frontend collects the path once through the
//! [`channel`] dispatcher.

pub mod args;
pub mod capture;
pub mod channel;
pub mod content;
mod error;
pub mod reference;
pub mod resolver;

pub use args::view_intents;
pub use capture::{Intent, IntentCapture, IntentOrigin, PendingShare};
pub use channel::{dispatch, MethodCall, MethodResponse};
pub use content::{ContentMetadata, ContentResolver, NoContentProvider};
pub use error::{ResolveError, ResolveResult};
pub use reference::ResourceReference;
pub use resolver::{ReferenceResolver, DEFAULT_FILE_NAME};
