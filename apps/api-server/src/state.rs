//! Application state - shared across all handlers.

use std::sync::Arc;

use anyhow::Context;
use folio_core::PostService;
use folio_core::ports::{ImageStore, PostRepository};
use folio_infra::{InMemoryPostRepository, LocalImageStore};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<PostService>,
}

impl AppState {
    pub fn new(repo: Arc<dyn PostRepository>, images: Arc<dyn ImageStore>) -> Self {
        Self {
            posts: Arc::new(PostService::new(repo, images)),
        }
    }

    /// Build the application state with the configured implementations.
    pub async fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let images: Arc<dyn ImageStore> = Arc::new(
            LocalImageStore::new(&config.uploads.dir, config.uploads.base_url())
                .await
                .context("failed to prepare image upload directory")?,
        );

        let repo = Self::repository(config).await?;

        tracing::info!("Application state initialized");
        Ok(Self::new(repo, images))
    }

    #[cfg(feature = "postgres")]
    async fn repository(config: &AppConfig) -> anyhow::Result<Arc<dyn PostRepository>> {
        use folio_infra::PostgresPostRepository;
        use migration::{Migrator, MigratorTrait};

        let Some(db_config) = config.database.as_ref() else {
            tracing::warn!("No database configured. Running with in-memory repository.");
            return Ok(Arc::new(InMemoryPostRepository::new()));
        };

        let conn = folio_infra::database::connect(db_config)
            .await
            .context("failed to connect to database")?;

        if config.auto_migrate {
            tracing::info!("Running database migrations...");
            Migrator::up(&conn, None)
                .await
                .context("failed to run database migrations")?;
            tracing::info!("Database migrations completed successfully");
        }

        Ok(Arc::new(PostgresPostRepository::new(conn)))
    }

    #[cfg(not(feature = "postgres"))]
    async fn repository(config: &AppConfig) -> anyhow::Result<Arc<dyn PostRepository>> {
        if config.database.is_some() {
            tracing::warn!("Database configured but postgres feature is disabled - ignoring");
        }
        tracing::info!("Running without postgres feature - using in-memory repository");
        Ok(Arc::new(InMemoryPostRepository::new()))
    }
}
