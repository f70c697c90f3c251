//! Profile of the authenticated user (`v2/UserProfile`)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub username: String,
    #[serde(default)]
    pub org_account: bool,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub org_admin: bool,
    #[serde(default)]
    pub org_user: bool,
    #[serde(default)]
    pub accounts: Vec<UserAccount>,
}

impl UserProfile {
    /// Sub-accounts this user can access, lowercased
    pub fn sub_accounts(&self) -> Vec<String> {
        self.accounts
            .iter()
            .map(|account| account.account_name.to_lowercase())
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    #[serde(default)]
    pub admin: bool,
    pub account_name: String,
    #[serde(default)]
    pub cust_guid: String,
    #[serde(default)]
    pub user_guid: String,
    #[serde(default)]
    pub user_enabled: u8,
}
