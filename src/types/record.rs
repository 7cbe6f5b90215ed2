use serde::{Deserialize, Serialize};
use crate::constants::SEED_IMAGES;

// ギャラリーの画像1件（位置が唯一の識別子）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub src: String,   // データURI、またはシード画像のアセットパス
    pub name: String,  // 元のファイル名 / 表示ラベル
}

impl ImageRecord {
    pub fn new(src: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            name: name.into(),
        }
    }

    // src が空のレコードは保存データとして無効
    pub fn is_valid(&self) -> bool {
        !self.src.is_empty()
    }
}

/// 初期表示用の3件
pub fn seed_records() -> Vec<ImageRecord> {
    SEED_IMAGES
        .iter()
        .map(|(src, name)| ImageRecord::new(*src, *name))
        .collect()
}

/// 保存済みJSONを検証付きで復元する。
///
/// 不正なJSON・フィールド欠落・空の src・空配列はすべて「保存なし」として `None` を返す。
pub fn parse_collection(raw: &str) -> Option<Vec<ImageRecord>> {
    let records: Vec<ImageRecord> = serde_json::from_str(raw).ok()?;
    if records.is_empty() || !records.iter().all(ImageRecord::is_valid) {
        return None;
    }
    Some(records)
}
