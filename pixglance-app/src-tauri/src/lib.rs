use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[cfg(desktop)]
use tauri::Manager;
#[cfg(desktop)]
use tauri_plugin_shared_image::{IntentOrigin, SharedImageExt};

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "pixglance_app=debug,shared_image_core=debug,tauri_plugin_shared_image=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting PixGlance...");

    #[allow(unused_mut)]
    let mut builder = tauri::Builder::default();

    // Must be registered first so a second launch is forwarded before anything else starts.
    #[cfg(desktop)]
    {
        builder = builder.plugin(tauri_plugin_single_instance::init(|app, argv, cwd| {
            info!("Second instance launched with {:?}", argv);
            app.shared_image().capture_args(
                argv,
                std::path::Path::new(&cwd),
                IntentOrigin::Redelivered,
            );
            if let Some(window) = app.get_webview_window("main") {
                let _ = window.unminimize();
                let _ = window.set_focus();
            }
        }));
    }

    builder
        .plugin(tauri_plugin_shared_image::init())
        .setup(|app| {
            #[cfg(desktop)]
            {
                let cwd = std::env::current_dir().unwrap_or_default();
                app.shared_image()
                    .capture_args(std::env::args_os(), &cwd, IntentOrigin::Launch);
            }
            #[cfg(mobile)]
            let _ = app;

            Ok(())
        })
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
