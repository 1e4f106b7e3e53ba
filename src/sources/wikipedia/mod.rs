/*! Wikipedia extraction archives.

Archives are compressed files produced by Wikipedia extraction tools, holding a sequence of
articles either as JSON lines or as `<doc>` blocks.

[Archive] implements [Iterator] over contained [Article]s.
!*/
mod archive;
mod article;
pub mod markup;

pub use archive::Archive;
pub use article::Article;
