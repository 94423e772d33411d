//! Session-related types.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use feather_core::{AccountId, DistributorId, Role, UserId};

use super::user::User;

/// Session-stored user identity.
///
/// Holds only identifiers and the values read at login; mutable user fields
/// are never copied into the session beyond this snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's database ID.
    pub user_id: UserId,
    /// Distributor the user belongs to.
    pub distributor_id: DistributorId,
    /// Distributor display name.
    pub distributor_name: String,
    /// Authorization role.
    pub role: Role,
    /// Purchasing account for customers.
    pub account_id: Option<AccountId>,
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            distributor_id: user.distributor_id,
            distributor_name: user.distributor_name.clone(),
            role: user.role,
            account_id: user.account_id,
        }
    }
}

/// Session keys for authentication data.
pub mod session_keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";
}
