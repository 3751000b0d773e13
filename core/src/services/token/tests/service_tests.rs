use chrono::Duration;
use uuid::Uuid;

use crate::domain::entities::{User, UserRole};
use crate::errors::{DomainError, TokenError};
use crate::services::token::{TokenIssuer, TokenIssuerConfig};

fn test_config() -> TokenIssuerConfig {
    TokenIssuerConfig {
        access_secret: "test-access-secret".to_string(),
        refresh_secret: "test-refresh-secret".to_string(),
        access_ttl: Duration::minutes(15),
        refresh_ttl: Duration::days(30),
        issuer: "echochat".to_string(),
    }
}

fn test_user() -> User {
    let mut user = User::register("13800138000".to_string());
    user.name = Some("Wei".to_string());
    user
}

#[test]
fn access_token_round_trip_preserves_identity() {
    let issuer = TokenIssuer::new(test_config());
    let user = test_user();

    let issued = issuer.issue_access_token(&user).unwrap();
    assert!(!issued.token.is_empty());

    let claims = issuer.verify_access_token(&issued.token).unwrap();
    assert_eq!(claims.user_id().unwrap(), user.id);
    assert_eq!(claims.phone, "13800138000");
    assert_eq!(claims.name.as_deref(), Some("Wei"));
    assert_eq!(claims.role, UserRole::User.to_string());
}

#[test]
fn refresh_token_round_trip_carries_identity_only() {
    let issuer = TokenIssuer::new(test_config());
    let user_id = Uuid::new_v4();

    let issued = issuer.issue_refresh_token(user_id).unwrap();
    let claims = issuer.verify_refresh_token(&issued.token).unwrap();
    assert_eq!(claims.user_id().unwrap(), user_id);
}

#[test]
fn secrets_are_separated_between_token_kinds() {
    let issuer = TokenIssuer::new(test_config());
    let user = test_user();

    let access = issuer.issue_access_token(&user).unwrap();
    let refresh = issuer.issue_refresh_token(user.id).unwrap();

    // A token signed with one secret must not verify under the other.
    assert!(matches!(
        issuer.verify_refresh_token(&access.token),
        Err(DomainError::Token(TokenError::InvalidOrExpired))
    ));
    assert!(matches!(
        issuer.verify_access_token(&refresh.token),
        Err(DomainError::Token(TokenError::InvalidOrExpired))
    ));
}

#[test]
fn tampered_token_is_rejected() {
    let issuer = TokenIssuer::new(test_config());
    let issued = issuer.issue_access_token(&test_user()).unwrap();

    let mut tampered = issued.token.clone();
    tampered.pop();
    tampered.push('x');

    assert!(issuer.verify_access_token(&tampered).is_err());
}

#[test]
fn expired_access_token_is_rejected() {
    // Comfortably beyond the default 60s validation leeway
    let mut config = test_config();
    config.access_ttl = Duration::minutes(-5);
    let issuer = TokenIssuer::new(config);

    let issued = issuer.issue_access_token(&test_user()).unwrap();
    assert!(matches!(
        issuer.verify_access_token(&issued.token),
        Err(DomainError::Token(TokenError::InvalidOrExpired))
    ));
}

#[test]
fn wrong_issuer_is_rejected() {
    let issuer = TokenIssuer::new(test_config());

    let mut other_config = test_config();
    other_config.issuer = "someone-else".to_string();
    let other = TokenIssuer::new(other_config);

    let issued = other.issue_access_token(&test_user()).unwrap();
    assert!(issuer.verify_access_token(&issued.token).is_err());
}

#[test]
fn expiry_metadata_matches_ttl() {
    let issuer = TokenIssuer::new(test_config());
    let issued = issuer.issue_refresh_token(Uuid::new_v4()).unwrap();

    let lifetime = issued.expires_at - chrono::Utc::now();
    assert!(lifetime <= Duration::days(30));
    assert!(lifetime > Duration::days(29));
    assert_eq!(issuer.access_ttl_secs(), 900);
}
