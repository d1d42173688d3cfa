//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Select,
};

use folio_core::domain::{BlogPost, MAX_ROW_BOUND, NewBlogPost, PostSummary};
use folio_core::error::RepoError;
use folio_core::ports::PostRepository;

use super::entity::blog_post::{self, Entity as BlogPostEntity, SummaryRow};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL blog post repository.
pub type PostgresPostRepository = PostgresBaseRepository<BlogPostEntity>;

/// Escape LIKE wildcards so the term matches literally.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// `LOWER(title) LIKE p OR LOWER(content) LIKE p OR LOWER(excerpt) LIKE p`
fn search_condition(term: &str) -> Condition {
    let pattern = format!("%{}%", escape_like(&term.to_lowercase()));
    [
        blog_post::Column::Title,
        blog_post::Column::Content,
        blog_post::Column::Excerpt,
    ]
    .into_iter()
    .fold(Condition::any(), |cond, column| {
        cond.add(Expr::expr(Func::lower(Expr::col(column))).like(pattern.clone()))
    })
}

fn filtered(search: Option<&str>) -> Select<BlogPostEntity> {
    let query = BlogPostEntity::find();
    match search {
        Some(term) if !term.is_empty() => query.filter(search_condition(term)),
        _ => query,
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<BlogPost>, RepoError> {
        tracing::debug!(slug = %slug, "Finding blog post by slug");

        let result = BlogPostEntity::find()
            .filter(blog_post::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn count(&self, search: Option<&str>) -> Result<u64, RepoError> {
        filtered(search).count(&self.db).await.map_err(map_db_err)
    }

    async fn list(
        &self,
        search: Option<&str>,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<PostSummary>, RepoError> {
        // OFFSET and LIMIT are bound as signed 64-bit values.
        let result = filtered(search)
            .select_only()
            .columns(SummaryRow::COLUMNS)
            .order_by_desc(blog_post::Column::CreatedAt)
            .order_by_desc(blog_post::Column::Id)
            .offset(offset.min(MAX_ROW_BOUND))
            .limit(limit.min(MAX_ROW_BOUND))
            .into_model::<SummaryRow>()
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn insert(&self, post: NewBlogPost) -> Result<BlogPost, RepoError> {
        let active_model: blog_post::ActiveModel = post.into();
        let model = active_model.insert(&self.db).await.map_err(map_db_err)?;

        Ok(model.into())
    }
}
