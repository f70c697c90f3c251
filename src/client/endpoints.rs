//! API resource paths
//!
//! Paths carrying a `v2/` prefix are pinned to that version; the rest follow
//! the client's configured version.

pub const ACCESS_TOKENS: &str = "access/tokens";

pub const ALERT_CHANNELS: &str = "v2/AlertChannels";
pub const ALERT_RULES: &str = "v2/AlertRules";
pub const CLOUD_ACCOUNTS: &str = "v2/CloudAccounts";
pub const CONTAINER_REGISTRIES: &str = "v2/ContainerRegistries";
pub const RESOURCE_GROUPS: &str = "v2/ResourceGroups";
pub const TEAM_MEMBERS: &str = "v2/TeamMembers";
pub const AGENT_ACCESS_TOKENS: &str = "v2/AgentAccessTokens";
pub const AGENT_ACCESS_TOKENS_SEARCH: &str = "v2/AgentAccessTokens/search";
pub const USER_PROFILE: &str = "v2/UserProfile";
pub const FEATURE_FLAGS: &str = "v2/FeatureFlags";
pub const METRICS: &str = "v2/Metrics";
pub const COMPONENT_DATA_REQUEST: &str = "v2/ComponentData/requestUpload";
pub const COMPONENT_DATA_COMPLETE: &str = "v2/ComponentData/completeUpload";

pub fn alert_channel_test(guid: &str) -> String {
    format!("{}/{}/test", ALERT_CHANNELS, urlencoding::encode(guid))
}
