use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::domain::entities::token::hash_token;
use crate::domain::entities::{RefreshToken, User, UserRole};
use crate::errors::{AuthError, DomainError};
use crate::repositories::{
    MockRefreshTokenRepository, MockUserRepository, RefreshTokenRepository, UserRepository,
};
use crate::services::admin::UserAdminService;

struct Fixture {
    service: UserAdminService<MockUserRepository, MockRefreshTokenRepository>,
    users: Arc<MockUserRepository>,
    tokens: Arc<MockRefreshTokenRepository>,
}

fn fixture() -> Fixture {
    let users = Arc::new(MockUserRepository::new());
    let tokens = Arc::new(MockRefreshTokenRepository::new());
    Fixture {
        service: UserAdminService::new(Arc::clone(&users), Arc::clone(&tokens)),
        users,
        tokens,
    }
}

async fn seed_user(fx: &Fixture, phone: &str, role: UserRole) -> User {
    let mut user = User::register(phone.to_string());
    user.set_role(role);
    fx.users.create(user).await.unwrap()
}

async fn seed_token(fx: &Fixture, user_id: Uuid, raw: &str) -> String {
    let token = RefreshToken::new(user_id, hash_token(raw), Utc::now() + Duration::days(30));
    let hash = token.token_hash.clone();
    fx.tokens.create(token).await.unwrap();
    hash
}

#[tokio::test]
async fn admin_cannot_change_own_role() {
    let fx = fixture();
    let admin = seed_user(&fx, "13800138000", UserRole::Admin).await;

    let result = fx
        .service
        .change_role(admin.id, admin.id, UserRole::User)
        .await;
    assert!(matches!(
        result,
        Err(DomainError::Auth(AuthError::CannotActOnSelf))
    ));
}

#[tokio::test]
async fn role_change_revokes_target_sessions() {
    let fx = fixture();
    let admin = seed_user(&fx, "13800138000", UserRole::Admin).await;
    let target = seed_user(&fx, "13900139000", UserRole::User).await;
    let hash = seed_token(&fx, target.id, "target-session").await;

    let updated = fx
        .service
        .change_role(admin.id, target.id, UserRole::Moderator)
        .await
        .unwrap();

    assert_eq!(updated.role, UserRole::Moderator);
    assert!(fx.tokens.find_valid(&hash).await.unwrap().is_none());
}

#[tokio::test]
async fn cannot_suspend_self_or_admins() {
    let fx = fixture();
    let admin = seed_user(&fx, "13800138000", UserRole::Admin).await;
    let other_admin = seed_user(&fx, "13900139000", UserRole::Admin).await;

    let self_result = fx.service.suspend(admin.id, admin.id, None).await;
    assert!(matches!(
        self_result,
        Err(DomainError::Auth(AuthError::CannotActOnSelf))
    ));

    let admin_result = fx.service.suspend(admin.id, other_admin.id, None).await;
    assert!(matches!(
        admin_result,
        Err(DomainError::Auth(AuthError::CannotActOnAdmin))
    ));
}

#[tokio::test]
async fn suspension_round_trip_with_token_revocation() {
    let fx = fixture();
    let moderator = seed_user(&fx, "13800138000", UserRole::Moderator).await;
    let target = seed_user(&fx, "13900139000", UserRole::User).await;
    let hash = seed_token(&fx, target.id, "target-session").await;

    let suspended = fx
        .service
        .suspend(moderator.id, target.id, Some("spam".to_string()))
        .await
        .unwrap();
    assert!(suspended.is_suspended);
    assert_eq!(suspended.suspended_reason.as_deref(), Some("spam"));
    assert!(fx.tokens.find_valid(&hash).await.unwrap().is_none());

    let restored = fx.service.unsuspend(target.id).await.unwrap();
    assert!(!restored.is_suspended);
    // Lifting the suspension does not resurrect revoked sessions
    assert!(fx.tokens.find_valid(&hash).await.unwrap().is_none());
}

#[tokio::test]
async fn cannot_delete_self_or_admins() {
    let fx = fixture();
    let admin = seed_user(&fx, "13800138000", UserRole::Admin).await;
    let other_admin = seed_user(&fx, "13900139000", UserRole::Admin).await;

    assert!(matches!(
        fx.service.delete(admin.id, admin.id).await,
        Err(DomainError::Auth(AuthError::CannotActOnSelf))
    ));
    assert!(matches!(
        fx.service.delete(admin.id, other_admin.id).await,
        Err(DomainError::Auth(AuthError::CannotActOnAdmin))
    ));
    assert_eq!(fx.users.count().await, 2);
}

#[tokio::test]
async fn delete_removes_user_and_sessions() {
    let fx = fixture();
    let admin = seed_user(&fx, "13800138000", UserRole::Admin).await;
    let target = seed_user(&fx, "13900139000", UserRole::User).await;
    let hash = seed_token(&fx, target.id, "target-session").await;

    fx.service.delete(admin.id, target.id).await.unwrap();

    assert!(fx.users.find_by_id(target.id).await.unwrap().is_none());
    assert!(fx.tokens.find_valid(&hash).await.unwrap().is_none());
}

#[tokio::test]
async fn operations_on_unknown_target_fail() {
    let fx = fixture();
    let admin = seed_user(&fx, "13800138000", UserRole::Admin).await;

    let ghost = Uuid::new_v4();
    assert!(matches!(
        fx.service.change_role(admin.id, ghost, UserRole::User).await,
        Err(DomainError::Auth(AuthError::UserNotFound))
    ));
    assert!(matches!(
        fx.service.suspend(admin.id, ghost, None).await,
        Err(DomainError::Auth(AuthError::UserNotFound))
    ));
    assert!(matches!(
        fx.service.delete(admin.id, ghost).await,
        Err(DomainError::Auth(AuthError::UserNotFound))
    ));
}
