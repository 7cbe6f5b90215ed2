use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use super::KeyValueStore;
use crate::error::StorageError;

// メモリ上のストア。クローンは同じ領域を共有する
#[derive(Clone)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,  // key -> 保存値
    quota: usize,                                   // キー＋値の合計バイト数の上限
}

impl MemoryStore {
    pub fn new(quota: usize) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            quota,
        }
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // 現在の使用量（バイト）
    pub fn used_bytes(&self) -> usize {
        self.entries()
            .iter()
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries();

        // 上書き対象の旧値は使用量から除く
        let others: usize = entries
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum();
        let needed = others + key.len() + value.len();
        if needed > self.quota {
            return Err(StorageError::QuotaExceeded {
                needed,
                limit: self.quota,
            });
        }

        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.entries().remove(key);
    }
}
