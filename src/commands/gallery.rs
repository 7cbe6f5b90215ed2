use std::path::PathBuf;
use tauri::{AppHandle, DragDropEvent, Emitter, Manager, Runtime, State};
use tauri_plugin_dialog::{DialogExt, MessageDialogButtons};
use tracing::{debug, warn};
use crate::constants::{DRAG_EVENT, RENDER_EVENT};
use crate::render::{gallery_html, lightbox_html, RenderTarget};
use crate::state::AppState;
use crate::types::{CandidateFile, GalleryView};

/// WebView への描画先。描画のたびにHTML全体をイベントで送る
pub struct WebviewTarget<R: Runtime> {
    app: AppHandle<R>,
}

impl<R: Runtime> WebviewTarget<R> {
    pub fn new(app: AppHandle<R>) -> Self {
        Self { app }
    }
}

impl<R: Runtime> RenderTarget for WebviewTarget<R> {
    fn replace(&self, view: &GalleryView) {
        if let Err(e) = self.app.emit(RENDER_EVENT, gallery_html(view)) {
            warn!("描画イベント送信エラー: {}", e);
        }
    }
}

// 現在のギャラリーHTML（ページ読み込み時に取得）
#[tauri::command]
pub fn gallery_view(state: State<'_, AppState>) -> String {
    gallery_html(&state.gallery.view())
}

// ファイル選択で受け取ったファイルを追加（完了は描画イベントで通知）
#[tauri::command]
pub async fn gallery_add_files(
    files: Vec<CandidateFile>,
    state: State<'_, AppState>,
) -> Result<usize, String> {
    let mut input = state.file_input();
    input.select(files);
    // 送信で選択はリセットされる
    let batch = input.submit(&state.gallery);
    Ok(batch.accepted())
}

// ウィンドウへのドラッグ＆ドロップ。ハイライト状態はイベントでページへ送る
pub fn handle_drag_drop<R: Runtime>(app: &AppHandle<R>, event: &DragDropEvent) {
    let state = app.state::<AppState>();
    match event {
        DragDropEvent::Enter { .. } | DragDropEvent::Over { .. } => state.drop_zone().drag_over(),
        DragDropEvent::Leave => state.drop_zone().drag_leave(),
        DragDropEvent::Drop { paths, .. } => {
            let paths = paths.clone();
            let app = app.clone();
            tauri::async_runtime::spawn(async move {
                let files = read_dropped(&paths).await;
                let state = app.state::<AppState>();
                let accepted = state.drop_zone().drop_files(files, &state.gallery).accepted();
                debug!("ドロップで{}件追加", accepted);
                emit_drag_state(&app, false);
            });
            return;
        }
        _ => return,
    }
    emit_drag_state(app, state.drop_zone().is_drag_over());
}

fn emit_drag_state<R: Runtime>(app: &AppHandle<R>, drag_over: bool) {
    if let Err(e) = app.emit(DRAG_EVENT, drag_over) {
        warn!("ドラッグ状態イベント送信エラー: {}", e);
    }
}

// 読めないファイルはスキップして残りを追加する
async fn read_dropped(paths: &[PathBuf]) -> Vec<CandidateFile> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        match CandidateFile::from_path(path).await {
            Ok(file) => files.push(file),
            Err(e) => warn!("{}", e),
        }
    }
    files
}

#[tauri::command]
pub fn gallery_remove(index: usize, state: State<'_, AppState>) -> bool {
    state.gallery.remove_at(index).is_some()
}

// 確認ダイアログのあと全削除（ダイアログはメインスレッド以外で待つ）
#[tauri::command]
pub async fn gallery_clear(
    app: AppHandle,
    state: State<'_, AppState>,
) -> Result<bool, String> {
    let prompt = |message: &str| {
        app.dialog()
            .message(message)
            .buttons(MessageDialogButtons::OkCancel)
            .blocking_show()
    };
    Ok(state.gallery.clear_with_confirmation(&prompt))
}

#[tauri::command]
pub fn gallery_enlarge(index: usize, state: State<'_, AppState>) -> Option<String> {
    state.gallery.enlarge(index).map(|lightbox| lightbox_html(&lightbox))
}
