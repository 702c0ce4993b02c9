pub mod file_path;
pub mod item_view;

pub use file_path::FilePath;
pub use item_view::GalleryItemView;
