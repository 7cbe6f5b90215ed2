use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::warn;
use super::KeyValueStore;
use crate::config::GalleryConfig;
use crate::error::StorageError;

// ディスク上のストア（キーごとに <key>.json を1ファイル）
pub struct DiskStore {
    pub dir: PathBuf,
    quota: usize,
}

impl DiskStore {
    pub fn new(dir: impl Into<PathBuf>, quota: usize) -> Self {
        let dir = dir.into();

        // 保存ディレクトリ作成（エラー時はログ出力、書き込み時に再試行）
        if let Err(e) = fs::create_dir_all(&dir) {
            warn!("保存ディレクトリ作成失敗: {} - {}", dir.display(), e);
        }

        Self { dir, quota }
    }

    pub fn from_config(config: &GalleryConfig) -> Self {
        Self::new(&config.data_dir, config.quota_bytes)
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", file_stem(key)))
    }

    // 対象ファイルを除いた使用量
    fn used_bytes_excluding(&self, target: &Path) -> Result<usize, StorageError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        let mut used = 0usize;
        for entry in entries {
            let path = entry?.path();
            if path == target || path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            used += fs::metadata(&path)?.len() as usize;
        }
        Ok(used)
    }
}

// キーをファイル名に変換（英数字と '-' 以外は "_XX" 形式で1バイトずつ逃がす）
// '_' 自体も逃がすので、異なるキーが同じファイルになることはない
fn file_stem(key: &str) -> String {
    let mut stem = String::with_capacity(key.len());
    for b in key.bytes() {
        if b.is_ascii_alphanumeric() || b == b'-' {
            stem.push(b as char);
        } else {
            stem.push_str(&format!("_{:02X}", b));
        }
    }
    stem
}

impl KeyValueStore for DiskStore {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(content) => Some(content),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                warn!("保存データ読み込みエラー: {} - {}", path.display(), e);
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        let needed = self.used_bytes_excluding(&path)? + value.len();
        if needed > self.quota {
            return Err(StorageError::QuotaExceeded {
                needed,
                limit: self.quota,
            });
        }

        fs::create_dir_all(&self.dir)?;
        fs::write(&path, value)?;
        Ok(())
    }

    fn remove(&self, key: &str) {
        let path = self.path_for(key);
        if let Err(e) = fs::remove_file(&path) {
            if e.kind() != ErrorKind::NotFound {
                warn!("保存データ削除エラー: {} - {}", path.display(), e);
            }
        }
    }
}
