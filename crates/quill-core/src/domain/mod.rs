//! Domain entities - the core business objects.

mod bookmark;
mod content;
mod credential;
mod post;
mod user;

pub use bookmark::Bookmark;
pub use content::{BlockBody, ContentBlock};
pub use credential::Credential;
pub use post::{AuthorSummary, Post, PostAggregate, PostDraft};
pub use user::User;
