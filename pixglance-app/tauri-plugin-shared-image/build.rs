const COMMANDS: &[&str] = &[
    "get_shared_data",
    "invoke_method",
    "has_shared_data",
    "clear_shared_data",
];

/// Intent filters added to the app's main activity.
const INTENT_FILTERS: &str = r#"<intent-filter>
    <action android:name="android.intent.action.VIEW" />
    <category android:name="android.intent.category.DEFAULT" />
    <data android:mimeType="image/*" />
</intent-filter>
<intent-filter>
    <action android:name="android.intent.action.SEND" />
    <category android:name="android.intent.category.DEFAULT" />
    <data android:mimeType="image/*" />
</intent-filter>"#;

fn main() {
    tauri_plugin::Builder::new(COMMANDS)
        .android_path("android")
        .build();

    if std::env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("android") {
        if let Err(e) = tauri_plugin::mobile::update_android_manifest(
            "SHARED IMAGE PLUGIN",
            "activity",
            INTENT_FILTERS.to_string(),
        ) {
            println!("cargo:warning=failed to add shared-image intent filters: {e}");
        }
    }
}
