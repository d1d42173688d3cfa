//! Blog post entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::sea_query::StringLen;
use sea_orm::{FromQueryResult, NotSet, Set};

use folio_core::domain::{BlogPost, NewBlogPost, PostSummary};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "blog_posts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    #[sea_orm(unique)]
    pub slug: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    #[sea_orm(column_type = "String(StringLen::N(160))")]
    pub excerpt: String,
    pub image: Option<String>,
    pub published_at: DateTimeWithTimeZone,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

/// Maintains `created_at` on insert and `updated_at` on every save.
#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let now: DateTimeWithTimeZone = chrono::Utc::now().into();
        if insert {
            self.created_at = Set(now);
        }
        self.updated_at = Set(now);
        Ok(self)
    }
}

/// Conversion from SeaORM Model to Domain BlogPost.
impl From<Model> for BlogPost {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            slug: model.slug,
            content: model.content,
            excerpt: model.excerpt,
            image: model.image,
            published_at: model.published_at.into(),
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

/// Projection used for listings. `content` is never selected.
#[derive(Debug, FromQueryResult)]
pub struct SummaryRow {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub image: Option<String>,
    pub published_at: DateTimeWithTimeZone,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl SummaryRow {
    pub const COLUMNS: [Column; 8] = [
        Column::Id,
        Column::Title,
        Column::Slug,
        Column::Excerpt,
        Column::Image,
        Column::PublishedAt,
        Column::CreatedAt,
        Column::UpdatedAt,
    ];
}

impl From<SummaryRow> for PostSummary {
    fn from(row: SummaryRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            slug: row.slug,
            excerpt: row.excerpt,
            image: row.image,
            published_at: row.published_at.into(),
            created_at: row.created_at.into(),
            updated_at: row.updated_at.into(),
        }
    }
}

/// Conversion from a new Domain post to an insertable ActiveModel.
impl From<NewBlogPost> for ActiveModel {
    fn from(post: NewBlogPost) -> Self {
        Self {
            id: NotSet,
            title: Set(post.title),
            slug: Set(post.slug),
            content: Set(post.content),
            excerpt: Set(post.excerpt),
            image: Set(post.image),
            published_at: Set(post.published_at.into()),
            created_at: NotSet,
            updated_at: NotSet,
        }
    }
}
