use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use crate::constants::{ACCEPTED_MIME_TYPES, FALLBACK_MIME_TYPE};

// 宣言された MIME タイプが許可リストに含まれるか
pub fn is_accepted(mime_type: &str) -> bool {
    ACCEPTED_MIME_TYPES.contains(&mime_type)
}

// バイト列をデータURIに変換
pub fn to_data_uri(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes))
}

// 拡張子から MIME タイプを宣言
pub fn mime_from_extension(ext: &str) -> &'static str {
    match ext.to_lowercase().as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        _ => FALLBACK_MIME_TYPE,
    }
}
