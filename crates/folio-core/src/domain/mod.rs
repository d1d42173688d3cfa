//! Domain entities - the core business objects.

mod pagination;
mod post;
pub mod slug;

pub use pagination::{
    DEFAULT_LIMIT, DEFAULT_PAGE, MAX_ROW_BOUND, Page, PageRequest, PaginationMeta,
};
pub use post::{
    BlogPost, CreatePostInput, EXCERPT_MAX_CHARS, ImageUpload, NewBlogPost, PostSummary,
};
