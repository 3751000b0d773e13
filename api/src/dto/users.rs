//! User administration request DTOs.

use serde::{Deserialize, Serialize};

use ec_core::domain::entities::UserRole;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeRoleRequest {
    /// New role; unknown values are rejected during deserialization
    pub role: UserRole,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuspendRequest {
    /// Operator-supplied reason, stored with the suspension
    #[serde(default)]
    pub reason: Option<String>,
}
