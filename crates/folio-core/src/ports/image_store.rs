use async_trait::async_trait;

/// Image store trait - saves uploaded images and hands back a public URL.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Save `content` under a generated name and return its public URL.
    async fn store(&self, content: &[u8], original_filename: &str) -> Result<String, ImageStoreError>;

    /// Remove a previously stored image by the URL `store` returned.
    async fn remove(&self, url: &str) -> Result<(), ImageStoreError>;
}

/// Image store errors.
#[derive(Debug, thiserror::Error)]
pub enum ImageStoreError {
    #[error("Failed to create upload directory: {0}")]
    Directory(String),

    #[error("Failed to write image: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image URL not managed by this store: {0}")]
    UnknownUrl(String),
}
