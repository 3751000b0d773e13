//! User entity representing a registered account in the EchoChat system.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role assigned to a user account.
///
/// Stored as an uppercase string; unknown values are rejected at the
/// deserialization boundary rather than passed through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    /// Full administrative access
    Admin,
    /// Moderation privileges (suspend/unsuspend)
    Moderator,
    /// Regular registered user
    User,
    /// Limited guest account
    Guest,
}

impl UserRole {
    /// Uppercase storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "ADMIN",
            UserRole::Moderator => "MODERATOR",
            UserRole::User => "USER",
            UserRole::Guest => "GUEST",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(UserRole::Admin),
            "MODERATOR" => Ok(UserRole::Moderator),
            "USER" => Ok(UserRole::User),
            "GUEST" => Ok(UserRole::Guest),
            other => Err(format!("unknown user role: {}", other)),
        }
    }
}

/// User entity.
///
/// Deliberately not `Serialize`: the password hash must never reach a wire
/// format. API responses go through [`crate::domain::value_objects::UserProfile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Unique identifier for the user
    pub id: Uuid,

    /// Phone number, domestic mobile format, globally unique
    pub phone: String,

    /// Optional contact email
    pub email: Option<String>,

    /// Optional display name
    pub name: Option<String>,

    /// Bcrypt digest; `None` means the account is OTP-only
    pub password_hash: Option<String>,

    /// Role assigned to this account
    pub role: UserRole,

    /// Whether the account is currently suspended
    pub is_suspended: bool,

    /// When the suspension was applied
    pub suspended_at: Option<DateTime<Utc>>,

    /// Operator-supplied suspension reason
    pub suspended_reason: Option<String>,

    /// Timestamp when the user was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the user was last updated
    pub updated_at: DateTime<Utc>,

    /// Timestamp of the user's last login
    pub last_login_at: Option<DateTime<Utc>>,
}

impl User {
    /// Creates a new account for a verified phone number.
    ///
    /// This is the auto-registration path: no password, regular role.
    pub fn register(phone: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            phone,
            email: None,
            name: None,
            password_hash: None,
            role: UserRole::User,
            is_suspended: false,
            suspended_at: None,
            suspended_reason: None,
            created_at: now,
            updated_at: now,
            last_login_at: None,
        }
    }

    /// Whether a password has been set for this account.
    pub fn has_password(&self) -> bool {
        self.password_hash.is_some()
    }

    /// Stores a new password digest.
    pub fn set_password_hash(&mut self, digest: String) {
        self.password_hash = Some(digest);
        self.updated_at = Utc::now();
    }

    /// Assigns a new role.
    pub fn set_role(&mut self, role: UserRole) {
        self.role = role;
        self.updated_at = Utc::now();
    }

    /// Suspends the account.
    pub fn suspend(&mut self, reason: Option<String>) {
        let now = Utc::now();
        self.is_suspended = true;
        self.suspended_at = Some(now);
        self.suspended_reason = reason;
        self.updated_at = now;
    }

    /// Lifts a suspension.
    pub fn unsuspend(&mut self) {
        self.is_suspended = false;
        self.suspended_at = None;
        self.suspended_reason = None;
        self.updated_at = Utc::now();
    }

    /// Updates the last login timestamp.
    pub fn update_last_login(&mut self) {
        let now = Utc::now();
        self.last_login_at = Some(now);
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registered_user_has_no_password() {
        let user = User::register("13800138000".to_string());

        assert_eq!(user.phone, "13800138000");
        assert_eq!(user.role, UserRole::User);
        assert!(!user.has_password());
        assert!(!user.is_suspended);
        assert!(user.last_login_at.is_none());
    }

    #[test]
    fn suspension_round_trip() {
        let mut user = User::register("13800138000".to_string());

        user.suspend(Some("spam".to_string()));
        assert!(user.is_suspended);
        assert!(user.suspended_at.is_some());
        assert_eq!(user.suspended_reason.as_deref(), Some("spam"));

        user.unsuspend();
        assert!(!user.is_suspended);
        assert!(user.suspended_at.is_none());
        assert!(user.suspended_reason.is_none());
    }

    #[test]
    fn role_parsing_rejects_unknown_values() {
        assert_eq!("ADMIN".parse::<UserRole>(), Ok(UserRole::Admin));
        assert_eq!("GUEST".parse::<UserRole>(), Ok(UserRole::Guest));
        assert!("SUPERUSER".parse::<UserRole>().is_err());
        assert!("admin".parse::<UserRole>().is_err());
    }

    #[test]
    fn setting_password_marks_account() {
        let mut user = User::register("13800138000".to_string());
        user.set_password_hash("$2b$12$abcdefghijklmnopqrstuv".to_string());
        assert!(user.has_password());
    }
}
