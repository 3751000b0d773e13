use std::sync::Arc;

use chrono::{Duration, Utc};

use crate::domain::entities::{User, VerificationCode};
use crate::errors::{AuthError, DomainError, TokenError, ValidationError};
use crate::repositories::{
    MockRefreshTokenRepository, MockUserRepository, MockVerificationCodeRepository, UserRepository,
};
use crate::services::auth::{AuthService, AuthServiceConfig};
use crate::services::sms::SmsDispatchError;
use crate::services::token::{TokenIssuer, TokenIssuerConfig};

use super::mocks::{MockPasswordHasher, MockRateLimiter, MockSmsDispatcher};

const PHONE: &str = "13800138000";
const CODE: &str = "123456";

type TestAuthService = AuthService<
    MockUserRepository,
    MockVerificationCodeRepository,
    MockRefreshTokenRepository,
    MockPasswordHasher,
    MockSmsDispatcher,
    MockRateLimiter,
>;

struct Fixture {
    service: Arc<TestAuthService>,
    users: Arc<MockUserRepository>,
    codes: Arc<MockVerificationCodeRepository>,
    tokens: Arc<MockRefreshTokenRepository>,
    sms: Arc<MockSmsDispatcher>,
    limiter: Arc<MockRateLimiter>,
}

fn issuer() -> Arc<TokenIssuer> {
    Arc::new(TokenIssuer::new(TokenIssuerConfig {
        access_secret: "test-access-secret".to_string(),
        refresh_secret: "test-refresh-secret".to_string(),
        access_ttl: Duration::minutes(15),
        refresh_ttl: Duration::days(30),
        issuer: "echochat".to_string(),
    }))
}

fn fixture() -> Fixture {
    fixture_with(
        AuthServiceConfig::default(),
        MockSmsDispatcher::new(),
        MockRateLimiter::allowing(),
    )
}

fn fixture_with(
    config: AuthServiceConfig,
    sms: MockSmsDispatcher,
    limiter: MockRateLimiter,
) -> Fixture {
    let users = Arc::new(MockUserRepository::new());
    let codes = Arc::new(MockVerificationCodeRepository::new());
    let tokens = Arc::new(MockRefreshTokenRepository::new());
    let sms = Arc::new(sms);
    let limiter = Arc::new(limiter);

    let service = Arc::new(AuthService::new(
        Arc::clone(&users),
        Arc::clone(&codes),
        Arc::clone(&tokens),
        Arc::new(MockPasswordHasher),
        Arc::clone(&sms),
        Arc::clone(&limiter),
        issuer(),
        config,
    ));

    Fixture {
        service,
        users,
        codes,
        tokens,
        sms,
        limiter,
    }
}

/// Seed a claimable code row directly, bypassing SMS.
async fn seed_code(fx: &Fixture, phone: &str, digits: &str) {
    let mut code = VerificationCode::new(phone.to_string());
    code.code = digits.to_string();
    fx.codes.insert_raw(code).await;
}

// --- send-code ---

#[tokio::test]
async fn send_code_persists_and_dispatches() {
    let fx = fixture();

    fx.service.send_verification_code(PHONE).await.unwrap();

    assert_eq!(fx.sms.sent_count(), 1);
    let sent = fx.sms.sent.lock().unwrap().first().cloned().unwrap();
    assert_eq!(sent.0, PHONE);
    assert_eq!(sent.1.len(), 6);
    // The dispatched code is the persisted one
    assert_eq!(fx.codes.last_code_for(PHONE).await, Some(sent.1));
}

#[tokio::test]
async fn send_code_rejects_malformed_phone() {
    let fx = fixture();

    let result = fx.service.send_verification_code("12345678901").await;
    assert!(matches!(
        result,
        Err(DomainError::Auth(AuthError::InvalidPhoneFormat { .. }))
    ));
    assert_eq!(fx.sms.sent_count(), 0);
}

#[tokio::test]
async fn send_code_enforces_recent_count_limit() {
    let fx = fixture();
    for _ in 0..10 {
        seed_code(&fx, PHONE, "000000").await;
    }

    let result = fx.service.send_verification_code(PHONE).await;
    assert!(matches!(
        result,
        Err(DomainError::Auth(AuthError::RateLimitExceeded { .. }))
    ));
    assert_eq!(fx.sms.sent_count(), 0);
}

#[tokio::test]
async fn send_code_honors_limiter_denial() {
    let fx = fixture_with(
        AuthServiceConfig::default(),
        MockSmsDispatcher::new(),
        MockRateLimiter::limiting(1800),
    );

    match fx.service.send_verification_code(PHONE).await {
        Err(DomainError::Auth(AuthError::RateLimitExceeded { retry_after_secs })) => {
            assert_eq!(retry_after_secs, 1800);
        }
        other => panic!("expected rate limit rejection, got {:?}", other.err()),
    }
}

#[tokio::test]
async fn development_mode_bypasses_send_limits() {
    let config = AuthServiceConfig {
        development_mode: true,
        ..Default::default()
    };
    let fx = fixture_with(config, MockSmsDispatcher::new(), MockRateLimiter::limiting(60));
    for _ in 0..20 {
        seed_code(&fx, PHONE, "000000").await;
    }

    fx.service.send_verification_code(PHONE).await.unwrap();
    assert_eq!(fx.limiter.check_count(), 0);
}

#[tokio::test]
async fn sms_provider_failure_is_masked() {
    let fx = fixture_with(
        AuthServiceConfig::default(),
        MockSmsDispatcher::failing(SmsDispatchError::Rejected {
            reason: "sensitive word filter code 4085".to_string(),
        }),
        MockRateLimiter::allowing(),
    );

    let result = fx.service.send_verification_code(PHONE).await;
    match result {
        Err(DomainError::Auth(err @ AuthError::SmsDispatchFailure)) => {
            // Provider detail must not leak into the user-facing message
            assert!(!err.to_string().contains("4085"));
        }
        other => panic!("expected dispatch failure, got {:?}", other.err()),
    }
}

// --- OTP login ---

#[tokio::test]
async fn login_with_code_auto_registers_and_issues_tokens() {
    let fx = fixture();
    seed_code(&fx, PHONE, CODE).await;

    let response = fx.service.login_with_code(PHONE, CODE, false).await.unwrap();

    assert_eq!(response.user.phone, PHONE);
    assert!(!response.access_token.is_empty());
    assert!(!response.refresh_token.is_empty());
    assert_eq!(fx.users.count().await, 1);

    // Reusing the claimed code must fail with the generic message
    let reuse = fx.service.login_with_code(PHONE, CODE, false).await;
    assert!(matches!(
        reuse,
        Err(DomainError::Auth(AuthError::InvalidOrExpiredCode))
    ));
}

#[tokio::test]
async fn login_with_code_reuses_existing_account() {
    let fx = fixture();
    let existing = fx
        .users
        .create(User::register(PHONE.to_string()))
        .await
        .unwrap();
    seed_code(&fx, PHONE, CODE).await;

    let response = fx.service.login_with_code(PHONE, CODE, false).await.unwrap();
    assert_eq!(response.user.id, existing.id);
    assert_eq!(fx.users.count().await, 1);
}

#[tokio::test]
async fn concurrent_double_claim_creates_one_user() {
    let fx = fixture();
    seed_code(&fx, PHONE, CODE).await;

    let (a, b) = tokio::join!(
        fx.service.login_with_code(PHONE, CODE, false),
        fx.service.login_with_code(PHONE, CODE, false),
    );

    // Exactly one side wins the claim; no duplicate account appears.
    assert_eq!(a.is_ok() as u8 + b.is_ok() as u8, 1);
    assert_eq!(fx.users.count().await, 1);
}

#[tokio::test]
async fn expired_code_is_never_claimable() {
    let fx = fixture();
    let mut code = VerificationCode::new(PHONE.to_string());
    code.code = CODE.to_string();
    code.expires_at = Utc::now() - Duration::seconds(1);
    fx.codes.insert_raw(code).await;

    let result = fx.service.login_with_code(PHONE, CODE, false).await;
    assert!(matches!(
        result,
        Err(DomainError::Auth(AuthError::InvalidOrExpiredCode))
    ));
}

#[tokio::test]
async fn malformed_code_is_rejected_before_storage() {
    let fx = fixture();

    for bad in ["12345", "1234567", "12345a", ""] {
        let result = fx.service.login_with_code(PHONE, bad, false).await;
        assert!(matches!(
            result,
            Err(DomainError::ValidationErr(ValidationError::InvalidFormat { .. }))
        ));
    }
}

#[tokio::test]
async fn suspended_user_cannot_login_with_code() {
    let fx = fixture();
    let mut user = User::register(PHONE.to_string());
    user.suspend(Some("abuse".to_string()));
    fx.users.create(user).await.unwrap();
    seed_code(&fx, PHONE, CODE).await;

    let result = fx.service.login_with_code(PHONE, CODE, false).await;
    assert!(matches!(
        result,
        Err(DomainError::Auth(AuthError::Suspended))
    ));
}

// --- single-device mode ---

#[tokio::test]
async fn single_device_login_revokes_prior_sessions() {
    let fx = fixture();

    seed_code(&fx, PHONE, "111111").await;
    let first = fx
        .service
        .login_with_code(PHONE, "111111", false)
        .await
        .unwrap();

    seed_code(&fx, PHONE, "222222").await;
    let second = fx
        .service
        .login_with_code(PHONE, "222222", true)
        .await
        .unwrap();

    // Tokens issued before the single-device login are dead
    let stale = fx.service.refresh_access_token(&first.refresh_token).await;
    assert!(matches!(
        stale,
        Err(DomainError::Token(TokenError::RevokedOrNotFound))
    ));

    // The fresh token still works
    let refreshed = fx
        .service
        .refresh_access_token(&second.refresh_token)
        .await
        .unwrap();
    assert_eq!(refreshed.user.phone, PHONE);
}

// --- password login ---

#[tokio::test]
async fn password_round_trip() {
    let fx = fixture();
    fx.users
        .create(User::register(PHONE.to_string()))
        .await
        .unwrap();

    seed_code(&fx, PHONE, CODE).await;
    fx.service.set_password(PHONE, CODE, "secret1").await.unwrap();

    let response = fx
        .service
        .login_with_password(PHONE, "secret1", false)
        .await
        .unwrap();
    assert_eq!(response.user.phone, PHONE);

    let wrong = fx.service.login_with_password(PHONE, "wrong", false).await;
    assert!(matches!(
        wrong,
        Err(DomainError::Auth(AuthError::InvalidCredentials))
    ));
}

#[tokio::test]
async fn unknown_phone_and_wrong_password_are_indistinguishable() {
    let fx = fixture();
    let mut user = User::register(PHONE.to_string());
    user.password_hash = Some("hashed:right".to_string());
    fx.users.create(user).await.unwrap();

    let unknown = fx
        .service
        .login_with_password("13900139000", "whatever", false)
        .await
        .unwrap_err();
    let wrong = fx
        .service
        .login_with_password(PHONE, "wrong", false)
        .await
        .unwrap_err();

    assert_eq!(unknown.to_string(), wrong.to_string());
}

#[tokio::test]
async fn otp_only_account_is_directed_to_code_login() {
    let fx = fixture();
    fx.users
        .create(User::register(PHONE.to_string()))
        .await
        .unwrap();

    let result = fx.service.login_with_password(PHONE, "whatever", false).await;
    assert!(matches!(
        result,
        Err(DomainError::Auth(AuthError::PasswordNotSet))
    ));
}

// --- set-password ---

#[tokio::test]
async fn set_password_cannot_register() {
    let fx = fixture();
    seed_code(&fx, PHONE, CODE).await;

    let result = fx.service.set_password(PHONE, CODE, "secret1").await;
    assert!(matches!(
        result,
        Err(DomainError::Auth(AuthError::UserNotFound))
    ));
    assert_eq!(fx.users.count().await, 0);
}

#[tokio::test]
async fn set_password_enforces_length_bounds() {
    let fx = fixture();
    fx.users
        .create(User::register(PHONE.to_string()))
        .await
        .unwrap();
    seed_code(&fx, PHONE, CODE).await;

    let short = fx.service.set_password(PHONE, CODE, "12345").await;
    assert!(matches!(
        short,
        Err(DomainError::ValidationErr(ValidationError::InvalidLength { .. }))
    ));

    let long = fx.service.set_password(PHONE, CODE, &"x".repeat(256)).await;
    assert!(matches!(
        long,
        Err(DomainError::ValidationErr(ValidationError::InvalidLength { .. }))
    ));

    // Bounds are checked before the code is claimed, so it is still valid
    fx.service.set_password(PHONE, CODE, "secret1").await.unwrap();
}

#[tokio::test]
async fn set_password_keeps_existing_sessions() {
    let fx = fixture();

    seed_code(&fx, PHONE, "111111").await;
    let session = fx
        .service
        .login_with_code(PHONE, "111111", false)
        .await
        .unwrap();

    seed_code(&fx, PHONE, "222222").await;
    fx.service
        .set_password(PHONE, "222222", "secret1")
        .await
        .unwrap();

    // Unlike suspension or role changes, a password change does not force
    // re-authentication.
    assert!(fx
        .service
        .refresh_access_token(&session.refresh_token)
        .await
        .is_ok());
}

// --- refresh and logout ---

#[tokio::test]
async fn refresh_rejects_garbage_tokens() {
    let fx = fixture();

    let result = fx.service.refresh_access_token("not-a-jwt").await;
    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::InvalidOrExpired))
    ));
}

#[tokio::test]
async fn refresh_rejects_unpersisted_tokens() {
    let fx = fixture();
    // Signed correctly but never stored: the persisted-state check must
    // reject it independently of the signature check.
    let orphan = issuer()
        .issue_refresh_token(uuid::Uuid::new_v4())
        .unwrap();

    let result = fx.service.refresh_access_token(&orphan.token).await;
    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::RevokedOrNotFound))
    ));
}

#[tokio::test]
async fn refresh_issues_new_access_token_without_rotation() {
    let fx = fixture();
    seed_code(&fx, PHONE, CODE).await;
    let session = fx.service.login_with_code(PHONE, CODE, false).await.unwrap();

    let refreshed = fx
        .service
        .refresh_access_token(&session.refresh_token)
        .await
        .unwrap();
    assert!(!refreshed.access_token.is_empty());
    assert_eq!(refreshed.user.phone, PHONE);

    // No rotation: the same refresh token keeps working
    assert!(fx
        .service
        .refresh_access_token(&session.refresh_token)
        .await
        .is_ok());
    assert_eq!(fx.tokens.count().await, 1);
}

#[tokio::test]
async fn logout_is_idempotent_and_kills_refresh() {
    let fx = fixture();
    seed_code(&fx, PHONE, CODE).await;
    let session = fx.service.login_with_code(PHONE, CODE, false).await.unwrap();

    fx.service.logout(&session.refresh_token).await.unwrap();
    fx.service.logout(&session.refresh_token).await.unwrap();
    fx.service.logout("complete-garbage").await.unwrap();

    let result = fx.service.refresh_access_token(&session.refresh_token).await;
    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::RevokedOrNotFound))
    ));
}

#[tokio::test]
async fn refresh_for_suspended_user_is_rejected() {
    let fx = fixture();
    seed_code(&fx, PHONE, CODE).await;
    let session = fx.service.login_with_code(PHONE, CODE, false).await.unwrap();

    let mut user = fx.users.find_by_phone(PHONE).await.unwrap().unwrap();
    user.suspend(None);
    fx.users.update(user).await.unwrap();

    let result = fx.service.refresh_access_token(&session.refresh_token).await;
    assert!(matches!(
        result,
        Err(DomainError::Auth(AuthError::Suspended))
    ));
}

#[tokio::test]
async fn refresh_for_deleted_user_is_rejected() {
    let fx = fixture();
    seed_code(&fx, PHONE, CODE).await;
    let session = fx.service.login_with_code(PHONE, CODE, false).await.unwrap();

    let user = fx.users.find_by_phone(PHONE).await.unwrap().unwrap();
    fx.users.delete(user.id).await.unwrap();

    let result = fx.service.refresh_access_token(&session.refresh_token).await;
    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::RevokedOrNotFound))
    ));
}
