use std::mem;
use crate::gallery::{AddBatch, Gallery};
use crate::types::CandidateFile;

/// 同期的な「はい / いいえ」確認
pub trait ConfirmPrompt {
    fn confirm(&self, message: &str) -> bool;
}

impl<F> ConfirmPrompt for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, message: &str) -> bool {
        self(message)
    }
}

// ファイル選択。送信後は選択をリセットし、同じファイルを再選択できるようにする
#[derive(Debug, Default)]
pub struct FileInput {
    selection: Vec<CandidateFile>,
}

impl FileInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, files: Vec<CandidateFile>) {
        self.selection = files;
    }

    pub fn selection(&self) -> &[CandidateFile] {
        &self.selection
    }

    pub fn submit(&mut self, gallery: &Gallery) -> AddBatch {
        let files = mem::take(&mut self.selection);
        gallery.add_files(files)
    }
}

// ドロップ領域（ドラッグ中はハイライト）
#[derive(Debug, Default)]
pub struct DropZone {
    drag_over: bool,
}

impl DropZone {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_drag_over(&self) -> bool {
        self.drag_over
    }

    pub fn drag_over(&mut self) {
        self.drag_over = true;
    }

    pub fn drag_leave(&mut self) {
        self.drag_over = false;
    }

    pub fn drop_files(&mut self, files: Vec<CandidateFile>, gallery: &Gallery) -> AddBatch {
        self.drag_over = false;
        gallery.add_files(files)
    }
}
