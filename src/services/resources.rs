//! Services for the resources that aren't integrations

use log::debug;
use reqwest::Method;
use serde::de::IgnoredAny;

use crate::client::{Crud, LaceworkClient, endpoints};
use crate::error::{ApiError, ConfigError, Result};
use crate::models::agent_access_token::SearchFilter;
use crate::models::{
    AgentAccessToken, AgentAccessTokenRequest, AlertRule, FeatureFlags, ListResponse,
    MetricEvent, ResourceGroup, Response, TeamMember, UserProfile,
};

pub struct ResourceGroupsService<'a> {
    crud: Crud<'a>,
}

impl<'a> ResourceGroupsService<'a> {
    pub(crate) fn new(crud: Crud<'a>) -> Self {
        Self { crud }
    }

    pub async fn list(&self) -> Result<Vec<ResourceGroup>> {
        self.crud.list().await
    }

    pub async fn get(&self, guid: &str) -> Result<ResourceGroup> {
        self.crud.get(guid).await
    }

    pub async fn create(&self, group: &ResourceGroup) -> Result<ResourceGroup> {
        self.crud.create(group).await
    }

    /// Update the group identified by its own guid; server-managed fields are not sent
    pub async fn update(&self, group: &ResourceGroup) -> Result<ResourceGroup> {
        self.crud.update(group.id(), &group.for_update()).await
    }

    pub async fn delete(&self, guid: &str) -> Result<()> {
        self.crud.delete(guid).await
    }
}

pub struct AlertRulesService<'a> {
    crud: Crud<'a>,
}

impl<'a> AlertRulesService<'a> {
    pub(crate) fn new(crud: Crud<'a>) -> Self {
        Self { crud }
    }

    pub async fn list(&self) -> Result<Vec<AlertRule>> {
        self.crud.list().await
    }

    pub async fn get(&self, guid: &str) -> Result<AlertRule> {
        self.crud.get(guid).await
    }

    pub async fn create(&self, rule: &AlertRule) -> Result<AlertRule> {
        self.crud.create(rule).await
    }

    pub async fn update(&self, rule: &AlertRule) -> Result<AlertRule> {
        self.crud.update(rule.id(), rule).await
    }

    pub async fn delete(&self, guid: &str) -> Result<()> {
        self.crud.delete(guid).await
    }
}

pub struct TeamMembersService<'a> {
    crud: Crud<'a>,
}

impl<'a> TeamMembersService<'a> {
    pub(crate) fn new(crud: Crud<'a>) -> Self {
        Self { crud }
    }

    pub async fn list(&self) -> Result<Vec<TeamMember>> {
        self.crud.list().await
    }

    pub async fn get(&self, guid: &str) -> Result<TeamMember> {
        self.crud.get(guid).await
    }

    pub async fn create(&self, member: &TeamMember) -> Result<TeamMember> {
        self.crud.create(member).await
    }

    pub async fn update(&self, member: &TeamMember) -> Result<TeamMember> {
        self.crud.update(member.id(), member).await
    }

    pub async fn delete(&self, guid: &str) -> Result<()> {
        self.crud.delete(guid).await
    }
}

/// Agent access tokens are addressed by the token value itself
pub struct AgentAccessTokensService<'a> {
    crud: Crud<'a>,
}

impl<'a> AgentAccessTokensService<'a> {
    pub(crate) fn new(crud: Crud<'a>) -> Self {
        Self { crud }
    }

    pub async fn list(&self) -> Result<Vec<AgentAccessToken>> {
        self.crud.list().await
    }

    pub async fn get(&self, token: &str) -> Result<AgentAccessToken> {
        self.crud.get(token).await
    }

    /// Create an enabled token
    pub async fn create(&self, alias: &str, description: &str) -> Result<AgentAccessToken> {
        if alias.is_empty() {
            return Err(ConfigError::MissingField("token alias").into());
        }
        self.crud
            .create(&AgentAccessTokenRequest::new(alias, description))
            .await
    }

    pub async fn update(
        &self,
        token: &str,
        request: &AgentAccessTokenRequest,
    ) -> Result<AgentAccessToken> {
        self.crud.update(token, request).await
    }

    /// Enable or disable a token, leaving everything else untouched
    pub async fn update_state(&self, token: &str, enabled: bool) -> Result<AgentAccessToken> {
        self.crud
            .update(token, &AgentAccessTokenRequest::state(enabled))
            .await
    }

    /// Tokens whose alias equals `alias`
    pub async fn search_alias(&self, alias: &str) -> Result<Vec<AgentAccessToken>> {
        if alias.is_empty() {
            return Err(ConfigError::MissingField("token alias").into());
        }
        let response: ListResponse<AgentAccessToken> = self
            .crud
            .client()
            .request_with_body(
                Method::POST,
                endpoints::AGENT_ACCESS_TOKENS_SEARCH,
                &SearchFilter::equals("tokenAlias", alias),
            )
            .await?;
        Ok(response.data)
    }
}

pub struct UserProfileService<'a> {
    client: &'a LaceworkClient,
}

impl<'a> UserProfileService<'a> {
    pub(crate) fn new(client: &'a LaceworkClient) -> Self {
        Self { client }
    }

    /// Profile of the user owning the client's credentials
    pub async fn get(&self) -> Result<UserProfile> {
        let response: ListResponse<UserProfile> = self
            .client
            .request(Method::GET, endpoints::USER_PROFILE)
            .await?;
        response.data.into_iter().next().ok_or_else(|| {
            ApiError::InvalidResponse("user profile response contained no profile".to_string())
                .into()
        })
    }
}

pub struct FeatureFlagsService<'a> {
    client: &'a LaceworkClient,
}

impl<'a> FeatureFlagsService<'a> {
    pub(crate) fn new(client: &'a LaceworkClient) -> Self {
        Self { client }
    }

    /// Flags enabled for the account whose name starts with `prefix`
    pub async fn get_matching_prefix(&self, prefix: &str) -> Result<FeatureFlags> {
        if prefix.is_empty() {
            return Err(ConfigError::MissingField("feature flag prefix").into());
        }
        let path = format!("{}/{}", endpoints::FEATURE_FLAGS, urlencoding::encode(prefix));
        let response: Response<FeatureFlags> = self.client.request(Method::GET, &path).await?;
        Ok(response.data)
    }
}

pub struct MetricsService<'a> {
    client: &'a LaceworkClient,
}

impl<'a> MetricsService<'a> {
    pub(crate) fn new(client: &'a LaceworkClient) -> Self {
        Self { client }
    }

    /// Report one telemetry event; the acknowledgement body is ignored
    pub async fn send(&self, event: &MetricEvent) -> Result<()> {
        debug!("sending metric event dataset={}", event.dataset);
        let _: IgnoredAny = self
            .client
            .request_with_body(Method::POST, endpoints::METRICS, event)
            .await?;
        Ok(())
    }
}
