use std::path::PathBuf;
use thiserror::Error;

/// キー・バリューストアへの書き込みエラー
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("保存容量を超えています: {needed} バイト (上限: {limit} バイト)")]
    QuotaExceeded { needed: usize, limit: usize },

    #[error("ストレージ入出力エラー: {0}")]
    Io(#[from] std::io::Error),
}

/// 候補ファイルの読み込みエラー
#[derive(Error, Debug)]
pub enum InputError {
    #[error("ファイル読み込みエラー: {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
