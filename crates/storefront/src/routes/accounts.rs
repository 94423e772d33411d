//! Account listing and admin provisioning route handlers.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use feather_core::{AccountId, UserId};

use crate::db::AccountRepository;
use crate::error::Result;
use crate::middleware::{RequireAdmin, RequireUser};
use crate::models::Account;
use crate::services::accounts::connect_account;
use crate::state::AppState;

/// Account response body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountBody {
    pub id: AccountId,
    pub name: String,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub price_level: Option<String>,
    pub payment_terms: Option<String>,
    pub email: Option<String>,
}

impl From<Account> for AccountBody {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            name: account.name,
            address_line1: account.address_line1,
            address_line2: account.address_line2,
            city: account.city,
            state: account.state,
            postal_code: account.postal_code,
            price_level: account.price_level,
            payment_terms: account.payment_terms,
            email: account.email,
        }
    }
}

/// List accounts visible to the caller.
///
/// Admins see every account under their distributor; customers see only
/// their own account. Storage failures on this read path degrade to an
/// empty list.
pub async fn list(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Json<Vec<AccountBody>> {
    let repo = AccountRepository::new(state.pool());

    let accounts = if user.role.is_admin() {
        repo.list_by_distributor(user.distributor_id).await
    } else {
        match user.account_id {
            Some(account_id) => repo
                .get_for_distributor(account_id, user.distributor_id)
                .await
                .map(|found| found.into_iter().collect()),
            None => Ok(Vec::new()),
        }
    }
    .unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Account listing failed, returning empty");
        Vec::new()
    });

    Json(accounts.into_iter().map(AccountBody::from).collect())
}

/// Connect-account request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectAccountRequest {
    pub account_id: AccountId,
    pub email: String,
}

/// Connect-account response body. The credential is returned exactly once
/// for out-of-band delivery.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectAccountResponse {
    pub status: &'static str,
    pub user_id: UserId,
    pub username: String,
    pub credential: String,
}

/// Create a customer login for an account (admin only).
pub async fn connect(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(body): Json<ConnectAccountRequest>,
) -> Result<Json<ConnectAccountResponse>> {
    let connected = connect_account(state.pool(), &admin, body.account_id, &body.email).await?;

    tracing::info!(
        user_id = %connected.user.id,
        account_id = %body.account_id,
        "Customer login provisioned"
    );

    Ok(Json(ConnectAccountResponse {
        status: "account_connected",
        user_id: connected.user.id,
        username: connected.user.username,
        credential: connected.credential,
    }))
}
