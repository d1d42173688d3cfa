//! Cross-origin access for browser clients.

use actix_cors::Cors;
use actix_web::http::header::{ACCEPT, CONTENT_TYPE};

use crate::config::CorsOrigins;

const PREFLIGHT_MAX_AGE_SECS: usize = 3600;

/// Build the CORS middleware. `Any` answers with a literal `*`.
pub fn cors(origins: &CorsOrigins) -> Cors {
    let cors = Cors::default()
        .allowed_methods(["GET", "POST"])
        .allowed_headers([ACCEPT, CONTENT_TYPE])
        .max_age(PREFLIGHT_MAX_AGE_SECS);

    match origins {
        CorsOrigins::Any => cors.allow_any_origin().send_wildcard(),
        CorsOrigins::List(list) => list
            .iter()
            .fold(cors, |cors, origin| cors.allowed_origin(origin)),
    }
}
