//! Blog post use cases: create, list and fetch by slug.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::slug::{generate_slug, with_suffix};
use crate::domain::{
    BlogPost, CreatePostInput, EXCERPT_MAX_CHARS, ImageUpload, NewBlogPost, Page, PageRequest,
    PostSummary,
};
use crate::error::{DomainError, RepoError};
use crate::ports::{ImageStore, PostRepository};

/// Total insert attempts when the unique slug index rejects a candidate.
const MAX_INSERT_ATTEMPTS: u32 = 3;

const ENTITY: &str = "blog post";

/// Blog post service.
///
/// Holds no state of its own; every call is a single request/response
/// against the injected repository and image store.
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    images: Arc<dyn ImageStore>,
}

/// Input that passed validation, with the derived values resolved.
struct Draft {
    input: CreatePostInput,
    base_slug: String,
    published_at: DateTime<Utc>,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostRepository>, images: Arc<dyn ImageStore>) -> Self {
        Self { posts, images }
    }

    /// Create a post.
    ///
    /// The slug comes from `input.slug` when given, else from the title. If
    /// it is already taken the current unix time is appended. `published_at`
    /// must be RFC 3339 when present and defaults to now.
    pub async fn create_post(&self, input: CreatePostInput) -> Result<BlogPost, DomainError> {
        let draft = Self::prepare(input)?;
        self.persist(draft).await
    }

    /// Create a post, first storing `upload` and using its URL as the image.
    ///
    /// Input is validated before anything is written. If the post cannot be
    /// persisted the stored image is removed again.
    pub async fn create_post_with_upload(
        &self,
        input: CreatePostInput,
        upload: Option<ImageUpload>,
    ) -> Result<BlogPost, DomainError> {
        let mut draft = Self::prepare(input)?;

        let Some(upload) = upload else {
            return self.persist(draft).await;
        };

        let url = self
            .images
            .store(&upload.content, &upload.filename)
            .await
            .map_err(|e| DomainError::storage("failed to upload image", e))?;
        tracing::debug!(url = %url, "Stored uploaded image");
        draft.input.image = Some(url.clone());

        match self.persist(draft).await {
            Ok(post) => Ok(post),
            Err(err) => {
                if let Err(cleanup) = self.images.remove(&url).await {
                    tracing::warn!(url = %url, error = %cleanup, "Failed to remove orphaned image");
                }
                Err(err)
            }
        }
    }

    /// List posts newest first, optionally filtered by a search term.
    pub async fn list_posts(
        &self,
        request: PageRequest,
        search: Option<&str>,
    ) -> Result<Page<PostSummary>, DomainError> {
        let search = search.map(str::trim).filter(|s| !s.is_empty());

        let total = self
            .posts
            .count(search)
            .await
            .map_err(|e| DomainError::storage("failed to count blog posts", e))?;

        let data = self
            .posts
            .list(search, request.offset(), request.limit)
            .await
            .map_err(|e| DomainError::storage("failed to fetch blog posts", e))?;

        let pagination = request.meta(total);
        tracing::debug!(
            page = pagination.page,
            limit = pagination.limit,
            total = pagination.total,
            search = search.unwrap_or_default(),
            "Listed blog posts"
        );

        Ok(Page { data, pagination })
    }

    /// Fetch a single post by its slug.
    pub async fn get_by_slug(&self, slug: &str) -> Result<BlogPost, DomainError> {
        if slug.trim().is_empty() {
            return Err(DomainError::validation("slug is required"));
        }

        self.posts
            .find_by_slug(slug)
            .await
            .map_err(|e| DomainError::storage("failed to retrieve blog post", e))?
            .ok_or_else(|| DomainError::NotFound {
                entity_type: ENTITY,
                key: slug.to_string(),
            })
    }

    fn prepare(input: CreatePostInput) -> Result<Draft, DomainError> {
        if input.title.trim().is_empty()
            || input.content.trim().is_empty()
            || input.excerpt.trim().is_empty()
        {
            return Err(DomainError::validation(
                "title, content and excerpt are required",
            ));
        }
        if input.excerpt.chars().count() > EXCERPT_MAX_CHARS {
            return Err(DomainError::validation(format!(
                "excerpt must be at most {} characters",
                EXCERPT_MAX_CHARS
            )));
        }

        let base_slug = match input.slug.as_deref().filter(|s| !s.trim().is_empty()) {
            Some(explicit) => generate_slug(explicit),
            None => generate_slug(&input.title),
        };
        if base_slug.is_empty() {
            return Err(DomainError::validation(
                "slug must contain at least one ASCII letter or digit",
            ));
        }

        let published_at = match input.published_at.as_deref().filter(|s| !s.trim().is_empty()) {
            Some(raw) => DateTime::parse_from_rfc3339(raw.trim())
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| {
                    DomainError::validation(format!(
                        "invalid published_at format: {}. Use RFC 3339, e.g. 2024-01-31T09:30:00Z",
                        e
                    ))
                })?,
            None => Utc::now(),
        };

        Ok(Draft {
            input,
            base_slug,
            published_at,
        })
    }

    async fn persist(&self, draft: Draft) -> Result<BlogPost, DomainError> {
        let Draft {
            input,
            base_slug,
            published_at,
        } = draft;

        // Fast path only; the unique index decides, see the retry below.
        let taken = self
            .posts
            .find_by_slug(&base_slug)
            .await
            .map_err(|e| DomainError::storage("failed to check for existing slug", e))?
            .is_some();

        let stamp = Utc::now().timestamp();
        let stamped = with_suffix(&base_slug, stamp);
        let mut slug = if taken { stamped.clone() } else { base_slug };

        let mut attempt = 1;
        loop {
            let candidate = NewBlogPost {
                title: input.title.clone(),
                slug: slug.clone(),
                content: input.content.clone(),
                excerpt: input.excerpt.clone(),
                image: input.image.clone(),
                published_at,
            };

            match self.posts.insert(candidate).await {
                Ok(post) => {
                    tracing::info!(id = post.id, slug = %post.slug, "Created blog post");
                    return Ok(post);
                }
                Err(RepoError::Constraint(reason)) if attempt < MAX_INSERT_ATTEMPTS => {
                    tracing::warn!(slug = %slug, attempt, reason = %reason, "Slug collision on insert, retrying");
                    slug = with_suffix(&stamped, attempt);
                    attempt += 1;
                }
                Err(e) => {
                    tracing::error!(slug = %slug, error = %e, "Failed to create blog post");
                    return Err(DomainError::storage("failed to create blog post", e));
                }
            }
        }
    }
}
