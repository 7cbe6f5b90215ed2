use std::path::Path;
use serde::{Deserialize, Serialize};
use crate::encode::mime_from_extension;
use crate::error::InputError;

// ファイル選択・ドロップで渡される候補ファイル
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateFile {
    pub name: String,
    pub mime_type: String,  // ブラウザ/OSが宣言したタイプ（中身は検査しない）
    pub bytes: Vec<u8>,
}

impl CandidateFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// パスからファイルを読み込み、拡張子から MIME タイプを宣言する
    pub async fn from_path(path: &Path) -> Result<Self, InputError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| InputError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");

        Ok(Self::new(name, mime_from_extension(ext), bytes))
    }
}
