use serde::Serialize;

/// ギャラリーの描画内容（描画先は毎回これで全置換する）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum GalleryView {
    /// 空表示。コントロール類は隠す
    Empty,
    #[serde(rename_all = "camelCase")]
    Populated {
        count_label: String,
        tiles: Vec<Tile>,
    },
}

/// 画像タイル1枚。操作（拡大・削除）は位置で指定する
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tile {
    pub index: usize,
    pub src: String,
    pub name: String,
}

/// 拡大表示（ライトボックス）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Lightbox {
    pub src: String,
}
