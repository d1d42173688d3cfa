//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod image_store;
mod repository;

pub use crate::error::RepoError;
pub use image_store::{ImageStore, ImageStoreError};
pub use repository::PostRepository;
