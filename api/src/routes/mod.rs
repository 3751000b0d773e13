//! Route handlers.

pub mod auth;
pub mod chat;
pub mod health;
pub mod users;

use validator::Validate;

use ec_core::errors::{DomainError, ValidationError};

use crate::handlers::ApiError;

/// Unwrap a JSON body and run shape validation, mapping the first failing
/// field into the domain validation taxonomy.
pub(crate) fn validated<T: Validate>(json: actix_web::web::Json<T>) -> Result<T, ApiError> {
    let value = json.into_inner();
    if let Err(errors) = value.validate() {
        let field = errors
            .field_errors()
            .keys()
            .next()
            .map(|field| field.to_string())
            .unwrap_or_else(|| "body".to_string());
        return Err(DomainError::ValidationErr(ValidationError::InvalidFormat { field }).into());
    }
    Ok(value)
}
