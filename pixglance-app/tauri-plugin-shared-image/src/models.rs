use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use shared_image_core::IntentOrigin;

/// Event emitted to the frontend when a share has been captured.
pub const SHARED_IMAGE_EVENT: &str = "shared-image-received";

/// `plugins.shared-image` section of `tauri.conf.json`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Where content references are staged. Defaults to the app cache directory.
    pub cache_dir: Option<PathBuf>,
}

/// Payload of [`SHARED_IMAGE_EVENT`].
///
/// Carries no path: the frontend still collects it through `getSharedData`
/// so the one-shot contract holds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedImageReceived {
    pub origin: IntentOrigin,
}
