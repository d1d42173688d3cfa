//! Application services - orchestrate domain rules over the ports.

mod post_service;

pub use post_service::PostService;
