use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use tracing::{info, warn};

use crate::constants::{APP_DIR_NAME, DEFAULT_QUOTA_BYTES, STORAGE_KEY};

// ギャラリー設定（環境変数で上書き可能）
#[derive(Debug, Clone)]
pub struct GalleryConfig {
    pub storage_key: String,
    pub quota_bytes: usize,
    pub data_dir: PathBuf,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            storage_key: STORAGE_KEY.to_string(),
            quota_bytes: DEFAULT_QUOTA_BYTES,
            data_dir: default_data_dir(),
        }
    }
}

impl GalleryConfig {
    pub fn load() -> Self {
        let defaults = Self::default();
        Self {
            storage_key: try_load("GALLERY_STORAGE_KEY", defaults.storage_key),
            quota_bytes: try_load("GALLERY_QUOTA_BYTES", defaults.quota_bytes),
            data_dir: try_load("GALLERY_DATA_DIR", defaults.data_dir),
        }
    }
}

// データディレクトリを取得（取得できなければカレント）
fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}

fn try_load<T>(key: &str, default: T) -> T
where
    T: FromStr + std::fmt::Debug,
    T::Err: Display,
{
    let Ok(raw) = env::var(key) else {
        info!("{key} not set, using default: {default:?}");
        return default;
    };

    raw.parse().unwrap_or_else(|e| {
        warn!("Invalid {key} value: {e}, using default: {default:?}");
        default
    })
}
