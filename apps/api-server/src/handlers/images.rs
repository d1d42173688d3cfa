//! Static serving of uploaded images.

use actix_files::Files;
use actix_web::http::header::{CACHE_CONTROL, HeaderValue};
use actix_web::middleware::DefaultHeaders;
use actix_web::web;

use crate::config::UploadConfig;

/// Uploaded file names are unique, so responses can be cached for a year.
const CACHE_POLICY: &str = "public, max-age=31536000";

/// Mount the upload directory under its public path. Directory listing stays off.
pub fn configure(cfg: &mut web::ServiceConfig, uploads: &UploadConfig) {
    cfg.service(
        web::scope(&uploads.public_path)
            .wrap(DefaultHeaders::new().add((CACHE_CONTROL, HeaderValue::from_static(CACHE_POLICY))))
            .service(Files::new("", &uploads.dir)),
    );
}
