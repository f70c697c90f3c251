//! Wire models for the Lacework API
//!
//! Response envelopes live here; each resource family has its own module.

pub mod agent_access_token;
pub mod alert_channel;
pub mod alert_rule;
pub mod cloud_account;
pub mod component_data;
pub mod container_registry;
pub mod feature_flag;
pub mod integration;
pub mod metric;
pub mod recipients;
pub mod resource_group;
pub mod team_member;
pub mod user_profile;

use serde::{Deserialize, Serialize};

pub use agent_access_token::{AgentAccessToken, AgentAccessTokenProps, AgentAccessTokenRequest};
pub use alert_channel::{AlertChannel, AlertChannelData};
pub use alert_rule::{AlertRule, AlertRuleFilter, AlertSeverity};
pub use cloud_account::{CloudAccount, CloudAccountData};
pub use component_data::UrlType;
pub use container_registry::{ContainerRegistry, ContainerRegistryData};
pub use feature_flag::FeatureFlags;
pub use integration::{
    EpochMillis, Integration, IntegrationCommon, IntegrationPayload, IntegrationState, ServerToken,
};
pub use metric::MetricEvent;
pub use recipients::Recipients;
pub use resource_group::{ResourceGroup, RgChild, RgExpression, RgFilter, RgQuery};
pub use team_member::{TeamMember, TeamMemberProps};
pub use user_profile::{UserAccount, UserProfile};

/// Single item envelope: `{"data": ...}`.
///
/// v1 endpoints add `ok` and `message`; both are optional here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response<T> {
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ok: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Collection envelope: `{"data": [...]}`; a missing or null list is empty
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ListResponse<T> {
    #[serde(default = "Vec::new", deserialize_with = "null_as_empty")]
    pub data: Vec<T>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<Vec<T>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_v1_envelope() {
        let response: Response<Vec<String>> =
            serde_json::from_str(r#"{"data": ["a"], "ok": true, "message": "SUCCESS"}"#).unwrap();
        assert_eq!(response.data, vec!["a"]);
        assert_eq!(response.ok, Some(true));
        assert_eq!(response.message.as_deref(), Some("SUCCESS"));
    }

    #[test]
    fn test_null_list_is_empty() {
        let response: ListResponse<String> = serde_json::from_str(r#"{"data": null}"#).unwrap();
        assert!(response.data.is_empty());
        let response: ListResponse<String> = serde_json::from_str("{}").unwrap();
        assert!(response.data.is_empty());
    }
}
