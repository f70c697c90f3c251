//! Resource services
//!
//! Each service borrows the client and maps one API resource onto the
//! generic [`Crud`] verbs. Services are cheap to create; get one per call
//! site from the accessors on [`LaceworkClient`].

mod alert_channels;
mod cloud_accounts;
mod component_data;
mod container_registries;
mod integrations;
mod resources;

pub use alert_channels::AlertChannelsService;
pub use cloud_accounts::CloudAccountsService;
pub use component_data::ComponentDataService;
pub use container_registries::ContainerRegistriesService;
pub use integrations::IntegrationsService;
pub use resources::{
    AgentAccessTokensService, AlertRulesService, FeatureFlagsService, MetricsService,
    ResourceGroupsService, TeamMembersService, UserProfileService,
};

use crate::client::{Crud, Endpoint, LaceworkClient, endpoints};

pub const ALERT_CHANNELS: Endpoint = Endpoint::new(endpoints::ALERT_CHANNELS, "alert channel");
pub const CLOUD_ACCOUNTS: Endpoint = Endpoint::new(endpoints::CLOUD_ACCOUNTS, "cloud account");
pub const CONTAINER_REGISTRIES: Endpoint =
    Endpoint::new(endpoints::CONTAINER_REGISTRIES, "container registry");
pub const RESOURCE_GROUPS: Endpoint = Endpoint::new(endpoints::RESOURCE_GROUPS, "resource group");
pub const ALERT_RULES: Endpoint = Endpoint::new(endpoints::ALERT_RULES, "alert rule");
pub const TEAM_MEMBERS: Endpoint = Endpoint::new(endpoints::TEAM_MEMBERS, "team member");
pub const AGENT_ACCESS_TOKENS: Endpoint =
    Endpoint::new(endpoints::AGENT_ACCESS_TOKENS, "agent access token");

impl LaceworkClient {
    pub fn alert_channels(&self) -> AlertChannelsService<'_> {
        IntegrationsService::new(self, ALERT_CHANNELS)
    }

    pub fn cloud_accounts(&self) -> CloudAccountsService<'_> {
        IntegrationsService::new(self, CLOUD_ACCOUNTS)
    }

    pub fn container_registries(&self) -> ContainerRegistriesService<'_> {
        IntegrationsService::new(self, CONTAINER_REGISTRIES)
    }

    pub fn resource_groups(&self) -> ResourceGroupsService<'_> {
        ResourceGroupsService::new(Crud::new(self, RESOURCE_GROUPS))
    }

    pub fn alert_rules(&self) -> AlertRulesService<'_> {
        AlertRulesService::new(Crud::new(self, ALERT_RULES))
    }

    pub fn team_members(&self) -> TeamMembersService<'_> {
        TeamMembersService::new(Crud::new(self, TEAM_MEMBERS))
    }

    pub fn agent_access_tokens(&self) -> AgentAccessTokensService<'_> {
        AgentAccessTokensService::new(Crud::new(self, AGENT_ACCESS_TOKENS))
    }

    pub fn user_profile(&self) -> UserProfileService<'_> {
        UserProfileService::new(self)
    }

    pub fn feature_flags(&self) -> FeatureFlagsService<'_> {
        FeatureFlagsService::new(self)
    }

    pub fn metrics(&self) -> MetricsService<'_> {
        MetricsService::new(self)
    }

    pub fn component_data(&self) -> ComponentDataService<'_> {
        ComponentDataService::new(self)
    }
}
