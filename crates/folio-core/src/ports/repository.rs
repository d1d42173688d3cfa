use async_trait::async_trait;

use crate::domain::{BlogPost, NewBlogPost, PostSummary};
use crate::error::RepoError;

/// Persistence port for blog posts.
///
/// `search` is a case-insensitive substring matched against title, content
/// and excerpt; `None` matches every post.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Exact-match lookup. A miss is `Ok(None)`, not an error.
    async fn find_by_slug(&self, slug: &str) -> Result<Option<BlogPost>, RepoError>;

    /// Count posts matching the search predicate.
    async fn count(&self, search: Option<&str>) -> Result<u64, RepoError>;

    /// Summaries of posts matching the search predicate, newest `created_at`
    /// first. `content` is not loaded.
    async fn list(
        &self,
        search: Option<&str>,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<PostSummary>, RepoError>;

    /// Persist a new post. Fails with `RepoError::Constraint` when the slug is taken.
    async fn insert(&self, post: NewBlogPost) -> Result<BlogPost, RepoError>;
}
