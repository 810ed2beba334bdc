//! Application services built on the ports.

mod bookmarks;
mod content;
mod posts;

pub use bookmarks::BookmarkService;
pub use content::{
    ContentNormalizer, ImageUpload, number_blocks, object_path, parse_blocks,
    upload_prefix,
};
pub use posts::PostService;
