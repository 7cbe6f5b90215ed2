// ストレージキー（ブラウザ版と同じ名前空間）
pub const STORAGE_KEY: &str = "portfolioGallery";

// 保存容量の上限（localStorage 相当の 5MB）
pub const DEFAULT_QUOTA_BYTES: usize = 5 * 1024 * 1024;

// アプリケーションのデータディレクトリ名
pub const APP_DIR_NAME: &str = "portfolio-gallery";

// 受け付ける MIME タイプ
pub const ACCEPTED_MIME_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
    "image/svg+xml",
];

// 拡張子が不明なときに宣言する MIME タイプ
pub const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

// 初回起動時・破損時に表示する画像 (src, name)
pub const SEED_IMAGES: &[(&str, &str)] = &[
    ("assets/images/gallery_code_1771753043549.png", "Code Wallpaper"),
    ("assets/images/gallery_setup_1771753063299.png", "Developer Setup"),
    ("assets/images/gallery_abstract_1771753088132.png", "Abstract Tech"),
];

// 全削除前の確認メッセージ
pub const CLEAR_PROMPT: &str = "Remove all photos from the gallery?";

// WebView へ描画結果を送るイベント名
#[cfg(feature = "desktop")]
pub const RENDER_EVENT: &str = "gallery://render";

// ドロップ領域のハイライト状態を送るイベント名
#[cfg(feature = "desktop")]
pub const DRAG_EVENT: &str = "gallery://drag-over";
