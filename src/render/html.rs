use std::fmt::Write;
use crate::types::{GalleryView, Lightbox};

// HTMLエスケープ（& < > "）
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// ギャラリー全体のHTML。
///
/// 空のときは空表示のみを出し、件数表示と全削除ボタンは出さない。
/// 各タイルの拡大・削除ボタンは `data-index` で位置を指定する。
pub fn gallery_html(view: &GalleryView) -> String {
    match view {
        GalleryView::Empty => {
            r#"<div class="gallery-empty" id="galleryEmpty">No photos yet. Drop some images above.</div>"#
                .to_string()
        }
        GalleryView::Populated { count_label, tiles } => {
            let mut html = String::new();
            // String への write! は失敗しない
            let _ = write!(
                html,
                r#"<div class="gallery-controls" id="galleryControls"><span class="gallery-count" id="galleryCount">{}</span><button class="gallery-clear" id="clearGallery">Clear all</button></div>"#,
                escape_html(count_label)
            );
            html.push_str(r#"<div class="gallery-grid" id="galleryGrid">"#);
            for tile in tiles {
                let name = escape_html(&tile.name);
                let _ = write!(
                    html,
                    r#"<div class="gallery-item"><img src="{src}" alt="{name}" loading="lazy" data-index="{i}" /><div class="gallery-item-overlay"><span class="gallery-item-name">{name}</span><button class="gallery-item-remove" data-index="{i}" title="Remove">✕</button></div></div>"#,
                    src = escape_html(&tile.src),
                    name = name,
                    i = tile.index,
                );
            }
            html.push_str("</div>");
            html
        }
    }
}

// 拡大表示のHTML（閉じるボタン・背景クリック・Escで閉じる）
pub fn lightbox_html(lightbox: &Lightbox) -> String {
    format!(
        r#"<div class="lightbox"><img src="{}" alt="Gallery photo" /><button class="lightbox-close" title="Close">✕</button></div>"#,
        escape_html(&lightbox.src)
    )
}
