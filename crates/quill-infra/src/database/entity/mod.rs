//! SeaORM entities.

pub mod bookmark;
pub mod content_block;
pub mod credential;
pub mod post;
pub mod user;
