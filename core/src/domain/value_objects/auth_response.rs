//! Authentication response value objects.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::{TokenPair, User, UserRole};

/// Redacted user projection for API responses.
///
/// This is the only serializable view of a user; the password hash has no
/// path to the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub phone: String,
    pub name: Option<String>,
    pub role: UserRole,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            phone: user.phone.clone(),
            name: user.name.clone(),
            role: user.role,
        }
    }
}

/// Response returned on successful login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub user: UserProfile,
}

impl AuthResponse {
    /// Builds a response from a token pair and the authenticated user.
    pub fn from_token_pair(pair: TokenPair, user: &User) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            expires_in: pair.expires_in,
            user: UserProfile::from(user),
        }
    }
}

/// Response returned on successful token refresh.
///
/// The refresh token is not rotated, so only a new access token is issued.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshedSession {
    pub access_token: String,
    pub expires_in: i64,
    pub user: UserProfile,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_redacts_password_hash() {
        let mut user = User::register("13800138000".to_string());
        user.set_password_hash("$2b$12$secret-digest".to_string());
        user.name = Some("Wei".to_string());

        let profile = UserProfile::from(&user);
        let json = serde_json::to_string(&profile).unwrap();

        assert!(json.contains("13800138000"));
        assert!(json.contains("Wei"));
        assert!(!json.contains("secret-digest"));
        assert!(!json.contains("password"));
    }
}
