//! Team members (`v2/TeamMembers`)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub cust_guid: String,

    pub props: TeamMemberProps,

    #[serde(default)]
    pub user_enabled: u8,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub user_guid: String,

    pub user_name: String,
}

impl TeamMember {
    /// A new, enabled member
    pub fn new(user_name: impl Into<String>, props: TeamMemberProps) -> Self {
        Self {
            user_name: user_name.into(),
            props,
            user_enabled: 1,
            ..Default::default()
        }
    }

    pub fn id(&self) -> &str {
        &self.user_guid
    }

    pub fn is_enabled(&self) -> bool {
        self.user_enabled == 1
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMemberProps {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub company: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub account_admin: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub org_admin: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub org_user: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub jit_created: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_session_created_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
    #[serde(rename = "UpdatedTime", default, skip_serializing_if = "Option::is_none")]
    pub updated_time: Option<String>,
}

fn is_false(value: &bool) -> bool {
    !*value
}
