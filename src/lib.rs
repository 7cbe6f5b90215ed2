mod constants;
mod encode;

pub mod config;
pub mod error;
pub mod gallery;
pub mod input;
pub mod render;
pub mod storage;
pub mod types;

#[cfg(feature = "desktop")]
mod commands;
#[cfg(feature = "desktop")]
mod state;

pub use config::GalleryConfig;
pub use constants::{ACCEPTED_MIME_TYPES, CLEAR_PROMPT, STORAGE_KEY};
pub use encode::{is_accepted, mime_from_extension, to_data_uri};
pub use gallery::{AddBatch, Gallery, PersistOutcome};

#[cfg(feature = "desktop")]
pub fn run() -> anyhow::Result<()> {
    use std::sync::Arc;
    use tauri::Manager;
    use commands::gallery::{
        gallery_add_files, gallery_clear, gallery_enlarge, gallery_remove, gallery_view,
        handle_drag_drop, WebviewTarget,
    };
    use state::AppState;
    use storage::DiskStore;

    tauri::Builder::default()
        .plugin(tauri_plugin_dialog::init())
        .setup(|app| {
            let config = GalleryConfig::load();
            tracing::info!("保存先: {}", config.data_dir.display());

            let store = Arc::new(DiskStore::from_config(&config));
            let target = Arc::new(WebviewTarget::new(app.handle().clone()));
            let gallery = Gallery::initialize(store, target, config.storage_key);
            app.manage(AppState::new(gallery));
            Ok(())
        })
        .on_window_event(|window, event| {
            if let tauri::WindowEvent::DragDrop(drag) = event {
                handle_drag_drop(window.app_handle(), drag);
            }
        })
        .invoke_handler(tauri::generate_handler![
            gallery_view,
            gallery_add_files,
            gallery_remove,
            gallery_clear,
            gallery_enlarge,
        ])
        .run(tauri::generate_context!())?;

    Ok(())
}
