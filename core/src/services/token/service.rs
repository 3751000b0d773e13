//! Token issuer implementation.

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::domain::entities::{AccessClaims, IssuedToken, RefreshClaims, User};
use crate::errors::{DomainError, TokenError};

use super::config::TokenIssuerConfig;

/// Signs and verifies access and refresh tokens.
///
/// Storage-independent: persistence and revocation of refresh tokens are
/// the refresh token repository's concern. The two token kinds use
/// separate signing secrets, so neither verifies under the other's key.
pub struct TokenIssuer {
    config: TokenIssuerConfig,
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    validation: Validation,
}

impl TokenIssuer {
    /// Creates a new token issuer from validated configuration.
    pub fn new(config: TokenIssuerConfig) -> Self {
        let access_encoding = EncodingKey::from_secret(config.access_secret.as_bytes());
        let access_decoding = DecodingKey::from_secret(config.access_secret.as_bytes());
        let refresh_encoding = EncodingKey::from_secret(config.refresh_secret.as_bytes());
        let refresh_decoding = DecodingKey::from_secret(config.refresh_secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.issuer]);
        validation.validate_exp = true;

        Self {
            config,
            access_encoding,
            access_decoding,
            refresh_encoding,
            refresh_decoding,
            validation,
        }
    }

    /// Signs a short-lived access token embedding the user's identity and
    /// role.
    pub fn issue_access_token(&self, user: &User) -> Result<IssuedToken, DomainError> {
        let now = Utc::now();
        let expires_at = now + self.config.access_ttl;
        let claims = AccessClaims {
            sub: user.id.to_string(),
            phone: user.phone.clone(),
            name: user.name.clone(),
            role: user.role.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            jti: Uuid::new_v4().to_string(),
            iss: self.config.issuer.clone(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.access_encoding)
            .map_err(|_| DomainError::Token(TokenError::GenerationFailed))?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Signs a long-lived refresh token carrying identity only.
    pub fn issue_refresh_token(&self, user_id: Uuid) -> Result<IssuedToken, DomainError> {
        let now = Utc::now();
        let expires_at = now + self.config.refresh_ttl;
        let claims = RefreshClaims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            jti: Uuid::new_v4().to_string(),
            iss: self.config.issuer.clone(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.refresh_encoding)
            .map_err(|_| DomainError::Token(TokenError::GenerationFailed))?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Verifies an access token's signature and expiry. No database access.
    pub fn verify_access_token(&self, token: &str) -> Result<AccessClaims, DomainError> {
        decode::<AccessClaims>(token, &self.access_decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|_| DomainError::Token(TokenError::InvalidOrExpired))
    }

    /// Verifies a refresh token's signature and expiry. No database access;
    /// revocation state is checked separately against the repository.
    pub fn verify_refresh_token(&self, token: &str) -> Result<RefreshClaims, DomainError> {
        decode::<RefreshClaims>(token, &self.refresh_decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|_| DomainError::Token(TokenError::InvalidOrExpired))
    }

    /// Access token lifetime in seconds, for response bodies.
    pub fn access_ttl_secs(&self) -> i64 {
        self.config.access_ttl.num_seconds()
    }
}
