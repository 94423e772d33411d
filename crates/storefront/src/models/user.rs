//! User domain types.

use feather_core::{AccountId, DistributorId, Role, UserId};

/// A storefront login (domain type).
///
/// Customers are always bound to an account; admins usually are not.
/// The stored password never leaves the repository layer.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Login name (the customer's email address for provisioned logins).
    pub username: String,
    /// Distributor this login belongs to.
    pub distributor_id: DistributorId,
    /// Display name of the distributor, denormalized at creation time.
    pub distributor_name: String,
    /// Authorization role.
    pub role: Role,
    /// Purchasing account, present for customers.
    pub account_id: Option<AccountId>,
}
