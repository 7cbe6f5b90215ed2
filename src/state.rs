use std::sync::{Mutex, MutexGuard, PoisonError};
use crate::gallery::Gallery;
use crate::input::{DropZone, FileInput};

// アプリケーション状態（ギャラリーと入力部品を保持）
pub struct AppState {
    pub gallery: Gallery,
    pub file_input: Mutex<FileInput>,
    pub drop_zone: Mutex<DropZone>,
}

impl AppState {
    pub fn new(gallery: Gallery) -> Self {
        Self {
            gallery,
            file_input: Mutex::new(FileInput::new()),
            drop_zone: Mutex::new(DropZone::new()),
        }
    }

    pub fn file_input(&self) -> MutexGuard<'_, FileInput> {
        self.file_input.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn drop_zone(&self) -> MutexGuard<'_, DropZone> {
        self.drop_zone.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
