//! Main authentication service implementation

use std::sync::Arc;

use chrono::Duration;
use tracing::{info, warn};

use crate::domain::entities::token::hash_token;
use crate::domain::entities::{RefreshToken, TokenPair, User, VerificationCode};
use crate::domain::value_objects::{AuthResponse, RefreshedSession, UserProfile};
use crate::errors::{AuthError, DomainResult, TokenError, ValidationError};
use crate::repositories::{RefreshTokenRepository, UserRepository, VerificationCodeRepository};
use crate::services::password::PasswordHasher;
use crate::services::rate_limit::{RateDecision, RateLimiter, RateQuota};
use crate::services::sms::SmsDispatcher;
use crate::services::token::TokenIssuer;

use super::config::AuthServiceConfig;
use super::phone::{mask_phone, validate_phone};

/// Rate limit scope for verification code sends.
const SMS_CODE_SCOPE: &str = "sms-code";

/// Authentication service orchestrating the complete login flow.
///
/// All collaborators are injected at construction; there are no process
/// globals, so every dependency can be replaced by a test double.
pub struct AuthService<U, V, T, P, S, R>
where
    U: UserRepository,
    V: VerificationCodeRepository,
    T: RefreshTokenRepository,
    P: PasswordHasher,
    S: SmsDispatcher,
    R: RateLimiter,
{
    users: Arc<U>,
    codes: Arc<V>,
    tokens: Arc<T>,
    hasher: Arc<P>,
    sms: Arc<S>,
    rate_limiter: Arc<R>,
    issuer: Arc<TokenIssuer>,
    config: AuthServiceConfig,
}

impl<U, V, T, P, S, R> AuthService<U, V, T, P, S, R>
where
    U: UserRepository,
    V: VerificationCodeRepository,
    T: RefreshTokenRepository,
    P: PasswordHasher,
    S: SmsDispatcher,
    R: RateLimiter,
{
    /// Create a new authentication service.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        users: Arc<U>,
        codes: Arc<V>,
        tokens: Arc<T>,
        hasher: Arc<P>,
        sms: Arc<S>,
        rate_limiter: Arc<R>,
        issuer: Arc<TokenIssuer>,
        config: AuthServiceConfig,
    ) -> Self {
        Self {
            users,
            codes,
            tokens,
            hasher,
            sms,
            rate_limiter,
            issuer,
            config,
        }
    }

    /// Send a verification code to a phone number.
    ///
    /// Validates the phone format, enforces the per-phone send limit
    /// (fixed-window counter first, then the authoritative count over
    /// persisted code rows), persists a fresh code and dispatches it over
    /// SMS. Rate limits are bypassed in development mode.
    pub async fn send_verification_code(&self, phone: &str) -> DomainResult<()> {
        if !validate_phone(phone) {
            return Err(AuthError::InvalidPhoneFormat {
                phone: mask_phone(phone),
            }
            .into());
        }

        if !self.config.development_mode {
            self.enforce_send_limit(phone).await?;
        }

        let code =
            VerificationCode::new_with_expiration(phone.to_string(), self.config.code_ttl_minutes);
        let code = self.codes.create(code).await?;

        if let Err(e) = self.sms.send_code(phone, &code.code).await {
            // Provider detail stays server-side; the client sees a generic
            // dispatch failure.
            warn!(phone = %mask_phone(phone), error = %e, "SMS dispatch failed");
            return Err(AuthError::SmsDispatchFailure.into());
        }

        info!(phone = %mask_phone(phone), "verification code sent");
        Ok(())
    }

    /// Login with a verification code, auto-registering unknown phones.
    ///
    /// This is the only registration path: a valid code for an unknown
    /// phone creates the account. With `single_device` set, all refresh
    /// tokens issued previously for the user are revoked before the new
    /// pair is issued.
    pub async fn login_with_code(
        &self,
        phone: &str,
        code: &str,
        single_device: bool,
    ) -> DomainResult<AuthResponse> {
        if !validate_phone(phone) {
            return Err(AuthError::InvalidPhoneFormat {
                phone: mask_phone(phone),
            }
            .into());
        }
        validate_code_shape(code)?;

        self.codes
            .claim(phone, code)
            .await?
            .ok_or(AuthError::InvalidOrExpiredCode)?;

        let user = match self.users.find_by_phone(phone).await? {
            Some(user) => user,
            None => {
                let user = self.users.create(User::register(phone.to_string())).await?;
                info!(user_id = %user.id, "auto-registered new user");
                user
            }
        };

        self.open_session(user, single_device).await
    }

    /// Login with a password.
    ///
    /// Unknown phone and wrong password produce the same generic error so
    /// the endpoint cannot be used to enumerate registered phones.
    pub async fn login_with_password(
        &self,
        phone: &str,
        password: &str,
        single_device: bool,
    ) -> DomainResult<AuthResponse> {
        let user = self
            .users
            .find_by_phone(phone)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let digest = user
            .password_hash
            .clone()
            .ok_or(AuthError::PasswordNotSet)?;

        if !self.hasher.verify(password, &digest).await? {
            return Err(AuthError::InvalidCredentials.into());
        }

        self.open_session(user, single_device).await
    }

    /// Set a password after proving phone ownership with a verification
    /// code. Cannot register: the user must already exist. Existing
    /// sessions stay valid.
    pub async fn set_password(
        &self,
        phone: &str,
        code: &str,
        new_password: &str,
    ) -> DomainResult<()> {
        let len = new_password.chars().count();
        if len < self.config.password_min_len || len > self.config.password_max_len {
            return Err(ValidationError::InvalidLength {
                field: "password".to_string(),
                min: self.config.password_min_len,
                max: self.config.password_max_len,
            }
            .into());
        }
        validate_code_shape(code)?;

        self.codes
            .claim(phone, code)
            .await?
            .ok_or(AuthError::InvalidOrExpiredCode)?;

        let mut user = self
            .users
            .find_by_phone(phone)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let digest = self.hasher.hash(new_password).await?;
        user.set_password_hash(digest);
        self.users.update(user).await?;

        Ok(())
    }

    /// Exchange a refresh token for a new access token.
    ///
    /// Two independent checks: the JWT signature/expiry, then the
    /// persisted record, which catches tokens revoked before their
    /// cryptographic expiry. The refresh token itself is not rotated.
    pub async fn refresh_access_token(&self, refresh_token: &str) -> DomainResult<RefreshedSession> {
        let claims = self.issuer.verify_refresh_token(refresh_token)?;

        let record = self
            .tokens
            .find_valid(&hash_token(refresh_token))
            .await?
            .ok_or(TokenError::RevokedOrNotFound)?;

        // A token whose subject disagrees with its record, or whose user is
        // gone, is unusable by the same rule as a revoked one.
        if claims.user_id().ok() != Some(record.user_id) {
            return Err(TokenError::RevokedOrNotFound.into());
        }
        let user = self
            .users
            .find_by_id(record.user_id)
            .await?
            .ok_or(TokenError::RevokedOrNotFound)?;

        if user.is_suspended {
            return Err(AuthError::Suspended.into());
        }

        let access = self.issuer.issue_access_token(&user)?;
        Ok(RefreshedSession {
            access_token: access.token,
            expires_in: self.issuer.access_ttl_secs(),
            user: UserProfile::from(&user),
        })
    }

    /// Logout by revoking a refresh token.
    ///
    /// Idempotent: a garbage or already-revoked token still reports
    /// success, so logout never fails visibly.
    pub async fn logout(&self, refresh_token: &str) -> DomainResult<()> {
        self.tokens.revoke(&hash_token(refresh_token)).await
    }

    /// Enforce the per-phone send limit.
    async fn enforce_send_limit(&self, phone: &str) -> DomainResult<()> {
        let quota = RateQuota {
            max: self.config.max_codes_per_window,
            window_secs: self.config.code_window_secs,
        };
        if let RateDecision::Limited { retry_after_secs } =
            self.rate_limiter.check(SMS_CODE_SCOPE, phone, quota).await
        {
            return Err(AuthError::RateLimitExceeded { retry_after_secs }.into());
        }

        // Authoritative check against persisted rows; the fixed-window
        // counter above fails open on storage errors.
        let window = Duration::seconds(self.config.code_window_secs as i64);
        let recent = self.codes.count_recent(phone, window).await?;
        if recent >= self.config.max_codes_per_window {
            return Err(AuthError::RateLimitExceeded {
                retry_after_secs: self.config.code_window_secs,
            }
            .into());
        }
        Ok(())
    }

    /// Issue and persist a token pair for an authenticated user.
    async fn open_session(&self, mut user: User, single_device: bool) -> DomainResult<AuthResponse> {
        if user.is_suspended {
            return Err(AuthError::Suspended.into());
        }

        // Single-device mode: all previously issued refresh tokens die
        // before the new one exists.
        if single_device {
            let revoked = self.tokens.revoke_all_for_user(user.id).await?;
            if revoked > 0 {
                info!(user_id = %user.id, revoked, "single-device login revoked prior sessions");
            }
        }

        user.update_last_login();
        let user = self.users.update(user).await?;

        let access = self.issuer.issue_access_token(&user)?;
        let refresh = self.issuer.issue_refresh_token(user.id)?;
        self.tokens
            .create(RefreshToken::new(
                user.id,
                hash_token(&refresh.token),
                refresh.expires_at,
            ))
            .await?;

        Ok(AuthResponse::from_token_pair(
            TokenPair {
                access_token: access.token,
                refresh_token: refresh.token,
                expires_in: self.issuer.access_ttl_secs(),
            },
            &user,
        ))
    }
}

/// Codes are exactly six ASCII digits; anything else is rejected before
/// touching storage.
fn validate_code_shape(code: &str) -> DomainResult<()> {
    if code.len() == 6 && code.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::InvalidFormat {
            field: "code".to_string(),
        }
        .into())
    }
}
