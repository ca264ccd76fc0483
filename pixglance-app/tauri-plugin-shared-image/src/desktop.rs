use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use shared_image_core::{
    dispatch, view_intents, Intent, IntentCapture, IntentOrigin, MethodCall, MethodResponse,
    NoContentProvider, ReferenceResolver,
};
use tauri::{plugin::PluginApi, AppHandle, Emitter, Runtime};
use tracing::{info, warn};

use crate::models::*;

/// Initialize the desktop plugin.
///
/// Desktops have no share sheet; files handed to the executable play the role
/// of "view" intents (see [`SharedImage::capture_args`]).
pub fn init<R: Runtime, C: DeserializeOwned>(
    app: &AppHandle<R>,
    _api: PluginApi<R, C>,
    cache_dir: PathBuf,
) -> crate::Result<SharedImage<R>> {
    Ok(SharedImage {
        app: app.clone(),
        capture: IntentCapture::new(ReferenceResolver::new(NoContentProvider, cache_dir)),
    })
}

/// Access to the shared-image APIs (desktop).
pub struct SharedImage<R: Runtime> {
    app: AppHandle<R>,
    capture: IntentCapture<NoContentProvider>,
}

impl<R: Runtime> SharedImage<R> {
    /// Return the pending shared path and clear it.
    pub fn get_shared_data(&self) -> Option<String> {
        self.capture.take_shared_data()
    }

    pub fn invoke(&self, call: &MethodCall) -> MethodResponse {
        dispatch(&self.capture, call)
    }

    pub fn has_shared_data(&self) -> bool {
        self.capture.has_pending()
    }

    pub fn clear_shared_data(&self) {
        self.capture.clear()
    }

    /// Feed an OS event into the capture state.
    pub fn handle_intent(&self, intent: &Intent, origin: IntentOrigin) -> bool {
        let captured = self.capture.handle_intent(intent, origin);
        if captured {
            if let Err(e) = self
                .app
                .emit(SHARED_IMAGE_EVENT, SharedImageReceived { origin })
            {
                warn!("Failed to emit {}: {}", SHARED_IMAGE_EVENT, e);
            }
        }
        captured
    }

    /// Treat files named on a command line as "view" intents.
    ///
    /// Used with the app's own argv at launch and with the argv forwarded by
    /// a second instance. The last file wins.
    pub fn capture_args<I, S>(&self, args: I, cwd: &Path, origin: IntentOrigin) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let intents = view_intents(args, cwd);
        if !intents.is_empty() {
            info!("Opening {} file(s) from the command line", intents.len());
        }

        intents
            .iter()
            .fold(false, |captured, intent| self.handle_intent(intent, origin) || captured)
    }

    /// Nothing is redelivered on resume on desktop.
    pub(crate) fn on_resumed(&self) {}
}
