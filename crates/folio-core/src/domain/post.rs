use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum length of an excerpt, in characters.
pub const EXCERPT_MAX_CHARS: usize = 160;

/// Blog post entity - the sole persisted aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub published_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Listing view of a post. Carries the excerpt in place of `content`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostSummary {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub published_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<BlogPost> for PostSummary {
    fn from(post: BlogPost) -> Self {
        Self {
            id: post.id,
            title: post.title,
            slug: post.slug,
            excerpt: post.excerpt,
            image: post.image,
            published_at: post.published_at,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

/// Field set for a post that has not been persisted yet.
///
/// The store assigns `id`, `created_at` and `updated_at`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBlogPost {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: String,
    pub image: Option<String>,
    pub published_at: DateTime<Utc>,
}

impl NewBlogPost {
    /// Materialize the post with store-assigned fields.
    pub fn into_post(self, id: i64, now: DateTime<Utc>) -> BlogPost {
        BlogPost {
            id,
            title: self.title,
            slug: self.slug,
            content: self.content,
            excerpt: self.excerpt,
            image: self.image,
            published_at: self.published_at,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Caller-supplied input for creating a post.
///
/// `slug` and `published_at` are optional; see `PostService::create_post`
/// for the defaulting rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreatePostInput {
    pub title: String,
    pub excerpt: String,
    pub content: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
}

/// Binary image content accompanying a create request.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub filename: String,
    pub content: Vec<u8>,
}

impl BlogPost {
    /// Case-insensitive substring match against title, content and excerpt.
    pub fn matches(&self, term: &str) -> bool {
        let needle = term.to_lowercase();
        [&self.title, &self.content, &self.excerpt]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> BlogPost {
        NewBlogPost {
            title: "Rust Ownership".to_string(),
            slug: "rust-ownership".to_string(),
            content: "Borrowing and lifetimes explained".to_string(),
            excerpt: "A short tour".to_string(),
            image: None,
            published_at: Utc::now(),
        }
        .into_post(1, Utc::now())
    }

    #[test]
    fn matches_any_text_field_ignoring_case() {
        let post = sample();
        assert!(post.matches("OWNERSHIP"));
        assert!(post.matches("lifetimes"));
        assert!(post.matches("Short"));
        assert!(!post.matches("async"));
    }

    #[test]
    fn image_is_omitted_from_json_when_absent() {
        let json = serde_json::to_value(sample()).unwrap();
        assert!(json.get("image").is_none());
        assert_eq!(json["slug"], "rust-ownership");
    }

    #[test]
    fn summary_drops_content() {
        let json = serde_json::to_value(PostSummary::from(sample())).unwrap();
        assert!(json.get("content").is_none());
        assert_eq!(json["excerpt"], "A short tour");
        assert_eq!(json["id"], 1);
    }
}
