mod record;
mod file;
mod view;

pub use record::{ImageRecord, parse_collection, seed_records};
pub use file::CandidateFile;
pub use view::{GalleryView, Lightbox, Tile};
