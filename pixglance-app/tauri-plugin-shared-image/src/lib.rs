use std::path::{Path, PathBuf};

use tauri::{
    plugin::{Builder, TauriPlugin},
    AppHandle, Manager, RunEvent, Runtime,
};

pub use models::*;
pub use shared_image_core::{IntentOrigin, MethodCall, MethodResponse};

#[cfg(target_os = "android")]
mod android;
#[cfg(desktop)]
mod desktop;
#[cfg(mobile)]
mod mobile;

mod commands;
mod error;
mod models;

pub use error::{Error, Result};

#[cfg(desktop)]
pub use desktop::SharedImage;
#[cfg(mobile)]
pub use mobile::SharedImage;

/// Extensions to [`tauri::App`], [`tauri::AppHandle`] and [`tauri::Window`] to access the shared-image APIs.
pub trait SharedImageExt<R: Runtime> {
    fn shared_image(&self) -> &SharedImage<R>;
}

impl<R: Runtime, T: Manager<R>> crate::SharedImageExt<R> for T {
    fn shared_image(&self) -> &SharedImage<R> {
        self.state::<SharedImage<R>>().inner()
    }
}

/// Initializes the shared-image plugin.
///
/// - Captures "view" and "send" image intents (Android) or files passed on
///   the command line (desktop) as a single pending share
/// - Stages content references into the app cache directory
/// - Exposes `get_shared_data` / `invoke_method` so the frontend can collect
///   the path exactly once
pub fn init<R: Runtime>() -> TauriPlugin<R, Option<Config>> {
    Builder::<R, Option<Config>>::new("shared-image")
        .invoke_handler(tauri::generate_handler![
            commands::get_shared_data,
            commands::invoke_method,
            commands::has_shared_data,
            commands::clear_shared_data,
        ])
        .setup(|app, api| {
            let cache_dir = resolve_cache_dir(app, api.config().as_ref())?;
            tracing::debug!("shared-image: staging into {}", cache_dir.display());

            #[cfg(mobile)]
            let shared_image = mobile::init(app, api, cache_dir)?;
            #[cfg(desktop)]
            let shared_image = desktop::init(app, api, cache_dir)?;
            app.manage(shared_image);
            Ok(())
        })
        .on_event(|app, event| {
            if let RunEvent::Resumed = event {
                if let Some(shared_image) = app.try_state::<SharedImage<R>>() {
                    shared_image.on_resumed();
                }
            }
        })
        .build()
}

fn resolve_cache_dir<R: Runtime>(app: &AppHandle<R>, config: Option<&Config>) -> Result<PathBuf> {
    cache_dir_from(config.and_then(|c| c.cache_dir.as_deref()), || {
        app.path()
            .app_cache_dir()
            .map_err(|e| Error::CacheDir(format!("Could not determine cache directory: {}", e)))
    })
}

/// An absolute `cacheDir` is used as-is; a relative one is placed under the
/// app cache directory so staged paths are always absolute.
fn cache_dir_from<F>(configured: Option<&Path>, app_cache_dir: F) -> Result<PathBuf>
where
    F: FnOnce() -> Result<PathBuf>,
{
    match configured {
        Some(dir) if dir.is_absolute() => Ok(dir.to_path_buf()),
        Some(dir) => Ok(app_cache_dir()?.join(dir)),
        None => app_cache_dir(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app_cache_dir() -> Result<PathBuf> {
        Ok(std::env::temp_dir().join("pixglance-cache"))
    }

    #[test]
    fn test_cache_dir_defaults_to_app_cache_dir() {
        assert_eq!(cache_dir_from(None, app_cache_dir).unwrap(), app_cache_dir().unwrap());
    }

    #[test]
    fn test_absolute_cache_dir_is_used_as_is() {
        let dir = std::env::temp_dir().join("elsewhere");
        assert_eq!(cache_dir_from(Some(&dir), app_cache_dir).unwrap(), dir);
    }

    #[test]
    fn test_relative_cache_dir_is_placed_under_app_cache_dir() {
        let dir = cache_dir_from(Some(Path::new("staging")), app_cache_dir).unwrap();
        assert!(dir.is_absolute());
        assert_eq!(dir, app_cache_dir().unwrap().join("staging"));
    }

    #[test]
    fn test_relative_cache_dir_reports_missing_app_cache_dir() {
        let err = cache_dir_from(Some(Path::new("staging")), || {
            Err(Error::CacheDir("no home".into()))
        })
        .unwrap_err();
        assert!(matches!(err, Error::CacheDir(_)));
    }
}
