//! CORS configuration.

use actix_cors::Cors;
use actix_web::http::header;

/// Build the CORS middleware.
///
/// Allowed origins come from `CORS_ALLOWED_ORIGINS` (comma-separated);
/// without it, any origin is accepted, which is only suitable for local
/// development.
pub fn create_cors() -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
        .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(3600);

    match std::env::var("CORS_ALLOWED_ORIGINS") {
        Ok(origins) => origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .fold(cors, |cors, origin| cors.allowed_origin(origin)),
        Err(_) => cors.allow_any_origin(),
    }
}
