use tauri::{command, AppHandle, Runtime};

use crate::{MethodCall, MethodResponse, Result, SharedImageExt};

/// Return the pending shared image path, clearing it.
///
/// A second call returns `None` until another image is shared.
#[command]
pub(crate) async fn get_shared_data<R: Runtime>(app: AppHandle<R>) -> Result<Option<String>> {
    Ok(app.shared_image().get_shared_data())
}

/// Channel-style entry point: dispatch a method by name.
///
/// Unknown names answer `{"status":"notImplemented"}` rather than failing.
#[command]
pub(crate) async fn invoke_method<R: Runtime>(
    app: AppHandle<R>,
    method: String,
) -> Result<MethodResponse> {
    Ok(app.shared_image().invoke(&MethodCall::new(method)))
}

/// Check for a pending share without consuming it.
#[command]
pub(crate) async fn has_shared_data<R: Runtime>(app: AppHandle<R>) -> Result<bool> {
    Ok(app.shared_image().has_shared_data())
}

/// Drop the pending share without reading it.
#[command]
pub(crate) async fn clear_shared_data<R: Runtime>(app: AppHandle<R>) -> Result<()> {
    app.shared_image().clear_shared_data();
    Ok(())
}
