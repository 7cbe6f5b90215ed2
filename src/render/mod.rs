mod html;

pub use html::{escape_html, gallery_html, lightbox_html};

use std::sync::{Arc, Mutex, PoisonError};
use crate::types::{GalleryView, ImageRecord, Tile};

/// 描画先。呼ばれるたびに中身を全置換する
pub trait RenderTarget: Send + Sync {
    fn replace(&self, view: &GalleryView);
}

// コレクションから描画内容を組み立てる
pub fn project(images: &[ImageRecord]) -> GalleryView {
    if images.is_empty() {
        return GalleryView::Empty;
    }

    let tiles = images
        .iter()
        .enumerate()
        .map(|(index, img)| Tile {
            index,
            src: img.src.clone(),
            name: img.name.clone(),
        })
        .collect();

    GalleryView::Populated {
        count_label: count_label(images.len()),
        tiles,
    }
}

// "1 photo" / "N photos"
pub fn count_label(count: usize) -> String {
    format!("{} photo{}", count, if count > 1 { "s" } else { "" })
}

/// 最後に描画したHTMLを保持する描画先（クローンは同じ内容を参照）
#[derive(Clone, Default)]
pub struct HtmlTarget {
    markup: Arc<Mutex<String>>,
}

impl HtmlTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn markup(&self) -> String {
        self.markup
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl RenderTarget for HtmlTarget {
    fn replace(&self, view: &GalleryView) {
        let html = gallery_html(view);
        *self.markup.lock().unwrap_or_else(PoisonError::into_inner) = html;
    }
}
