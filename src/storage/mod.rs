mod disk;
mod memory;

pub use disk::DiskStore;
pub use memory::MemoryStore;

use crate::error::StorageError;

/// 容量上限つきのキー・バリューストア（ブラウザの localStorage 相当）
///
/// 同じストアは複数箇所から共有されるため、すべて `&self` で操作する。
pub trait KeyValueStore: Send + Sync {
    /// 保存済みの値。存在しない・読めない場合は `None`
    fn get(&self, key: &str) -> Option<String>;

    /// 値を書き込む。容量を超える場合は `StorageError::QuotaExceeded`
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// キーを削除する（存在しなくてもエラーにしない）
    fn remove(&self, key: &str);
}
