//! Capture of "view" and "send" intents into a single pending share.

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::content::ContentResolver;
use crate::reference::ResourceReference;
use crate::resolver::ReferenceResolver;

pub const ACTION_VIEW: &str = "android.intent.action.VIEW";
pub const ACTION_SEND: &str = "android.intent.action.SEND";

/// Only `send` intents with a MIME type under this prefix are captured.
pub const IMAGE_MIME_PREFIX: &str = "image/";

/// How an intent reached the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IntentOrigin {
    /// The intent that launched the process.
    Launch,
    /// Delivered to an already running app.
    Redelivered,
}

/// An OS event as far as sharing is concerned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    View {
        data: Option<String>,
    },
    Send {
        mime_type: Option<String>,
        stream: Option<String>,
    },
    Other {
        action: Option<String>,
    },
}

impl Intent {
    /// Build an intent from the raw fields of a platform intent.
    pub fn from_parts(
        action: Option<&str>,
        data: Option<String>,
        mime_type: Option<String>,
        stream: Option<String>,
    ) -> Self {
        match action {
            Some(ACTION_VIEW) => Intent::View { data },
            Some(ACTION_SEND) => Intent::Send { mime_type, stream },
            other => Intent::Other {
                action: other.map(str::to_string),
            },
        }
    }

    pub fn view(data: impl Into<String>) -> Self {
        Intent::View {
            data: Some(data.into()),
        }
    }

    pub fn send(mime_type: impl Into<String>, stream: impl Into<String>) -> Self {
        Intent::Send {
            mime_type: Some(mime_type.into()),
            stream: Some(stream.into()),
        }
    }

    /// The reference this intent shares, or `None` if it should be ignored.
    pub fn shared_reference(&self) -> Option<&str> {
        match self {
            Intent::View { data } => data.as_deref(),
            Intent::Send {
                mime_type: Some(mime_type),
                stream,
            } if mime_type.starts_with(IMAGE_MIME_PREFIX) => stream.as_deref(),
            Intent::Send { .. } | Intent::Other { .. } => None,
        }
    }
}

/// The one shared path waiting to be picked up by the frontend.
#[derive(Debug, Default)]
pub struct PendingShare {
    slot: Mutex<Option<String>>,
}

impl PendingShare {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Option<String>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store `value`, returning whatever was pending before.
    pub fn replace(&self, value: Option<String>) -> Option<String> {
        std::mem::replace(&mut *self.lock(), value)
    }

    /// Read and clear in one step.
    pub fn take(&self) -> Option<String> {
        self.lock().take()
    }

    pub fn is_set(&self) -> bool {
        self.lock().is_some()
    }
}

pub struct IntentCapture<C> {
    resolver: ReferenceResolver<C>,
    pending: PendingShare,
}

impl<C: ContentResolver> IntentCapture<C> {
    pub fn new(resolver: ReferenceResolver<C>) -> Self {
        Self {
            resolver,
            pending: PendingShare::new(),
        }
    }

    pub fn resolver(&self) -> &ReferenceResolver<C> {
        &self.resolver
    }

    /// Handle an OS event. Returns `true` if the pending share was written.
    ///
    /// A recognized event whose reference cannot be resolved still overwrites
    /// the pending share, with nothing.
    pub fn handle_intent(&self, intent: &Intent, origin: IntentOrigin) -> bool {
        let Some(raw) = intent.shared_reference() else {
            trace!("Ignoring {:?} intent: {:?}", origin, intent);
            return false;
        };

        let reference = ResourceReference::parse(raw);
        let resolved = match self.resolver.resolve(&reference) {
            Ok(path) => Some(path.to_string_lossy().into_owned()),
            Err(e) => {
                warn!("Could not resolve shared reference {} [{}]: {}", raw, e.code(), e);
                None
            }
        };

        debug!(
            "Captured {:?} intent ({} reference): {:?}",
            origin,
            reference.scheme(),
            resolved
        );

        if let Some(previous) = self.pending.replace(resolved) {
            debug!("Replaced unconsumed shared path {}", previous);
        }
        true
    }

    /// Return the pending path and clear it.
    pub fn take_shared_data(&self) -> Option<String> {
        self.pending.take()
    }

    /// Check for a pending path without consuming it.
    pub fn has_pending(&self) -> bool {
        self.pending.is_set()
    }

    pub fn clear(&self) {
        self.pending.replace(None);
    }
}
