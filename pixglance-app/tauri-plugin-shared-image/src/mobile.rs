use std::path::PathBuf;

use serde::de::DeserializeOwned;
use shared_image_core::{
    dispatch, Intent, IntentCapture, IntentOrigin, MethodCall, MethodResponse, ReferenceResolver,
};
use tauri::{plugin::PluginApi, AppHandle, Emitter, Runtime};
use tracing::warn;

use crate::models::*;

#[cfg(target_os = "android")]
type Content = crate::android::AndroidContent;
#[cfg(target_os = "ios")]
type Content = shared_image_core::NoContentProvider;

/// Initialize the mobile plugin and capture the launching intent.
pub fn init<R: Runtime, C: DeserializeOwned>(
    app: &AppHandle<R>,
    api: PluginApi<R, C>,
    cache_dir: PathBuf,
) -> crate::Result<SharedImage<R>> {
    // The native plugin points `getIntent()` at intents delivered while running.
    #[cfg(target_os = "android")]
    api.register_android_plugin("com.archit.pixglance.sharedimage", "SharedImagePlugin")?;
    #[cfg(target_os = "android")]
    let content = crate::android::AndroidContent::from_context()?;

    #[cfg(target_os = "ios")]
    let _ = api;
    #[cfg(target_os = "ios")]
    let content = shared_image_core::NoContentProvider;

    let shared_image = SharedImage {
        app: app.clone(),
        capture: IntentCapture::new(ReferenceResolver::new(content, cache_dir)),
    };
    shared_image.poll_activity_intent(IntentOrigin::Launch);
    Ok(shared_image)
}

/// Access to the shared-image mobile APIs.
pub struct SharedImage<R: Runtime> {
    app: AppHandle<R>,
    capture: IntentCapture<Content>,
}

impl<R: Runtime> SharedImage<R> {
    /// Return the pending shared path and clear it.
    ///
    /// The copy out of the content provider already happened when the intent
    /// arrived, so this never blocks on I/O.
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

    /// The activity may have received a new intent while in the background;
    /// `SharedImagePlugin.onNewIntent` has made it the activity's intent.
    pub(crate) fn on_resumed(&self) {
        self.poll_activity_intent(IntentOrigin::Redelivered);
    }

    #[cfg(target_os = "android")]
    fn poll_activity_intent(&self, origin: IntentOrigin) {
        match self.capture.resolver().content().take_activity_intent() {
            Ok(Some(intent)) => {
                self.handle_intent(&intent, origin);
            }
            Ok(None) => {}
            Err(e) => warn!("Failed to read activity intent: {}", e),
        }
    }

    // Share extensions are not wired up on iOS; nothing is ever captured.
    #[cfg(target_os = "ios")]
    fn poll_activity_intent(&self, _origin: IntentOrigin) {}
}
