//! In-memory blog post repository - used when no database is configured.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use folio_core::domain::{BlogPost, NewBlogPost, PostSummary};
use folio_core::error::RepoError;
use folio_core::ports::PostRepository;

/// In-memory repository backed by a `Vec` behind an async `RwLock`.
///
/// Enforces slug uniqueness like the database's unique index.
/// Note: Data is lost on process restart.
pub struct InMemoryPostRepository {
    rows: RwLock<Vec<BlogPost>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
        }
    }

    fn matching(rows: &[BlogPost], search: Option<&str>) -> Vec<BlogPost> {
        let mut matched: Vec<BlogPost> = rows
            .iter()
            .filter(|post| match search {
                Some(term) if !term.is_empty() => post.matches(term),
                _ => true,
            })
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        matched
    }
}

impl Default for InMemoryPostRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<BlogPost>, RepoError> {
        let rows = self.rows.read().await;
        Ok(rows.iter().find(|post| post.slug == slug).cloned())
    }

    async fn count(&self, search: Option<&str>) -> Result<u64, RepoError> {
        let rows = self.rows.read().await;
        Ok(Self::matching(&rows, search).len() as u64)
    }

    async fn list(
        &self,
        search: Option<&str>,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<PostSummary>, RepoError> {
        let rows = self.rows.read().await;
        Ok(Self::matching(&rows, search)
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .map(PostSummary::from)
            .collect())
    }

    async fn insert(&self, post: NewBlogPost) -> Result<BlogPost, RepoError> {
        let mut rows = self.rows.write().await;

        if rows.iter().any(|existing| existing.slug == post.slug) {
            return Err(RepoError::Constraint(format!(
                "slug '{}' already exists",
                post.slug
            )));
        }

        let id = rows.len() as i64 + 1;
        let saved = post.into_post(id, Utc::now());
        rows.push(saved.clone());
        Ok(saved)
    }
}
