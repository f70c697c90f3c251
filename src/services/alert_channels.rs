//! Alert channels service

use reqwest::Method;
use serde::de::IgnoredAny;

use super::integrations::{IntegrationsService, typed_getters};
use crate::client::endpoints;
use crate::error::Result;
use crate::models::AlertChannelData;
use crate::models::alert_channel::{
    AwsS3Data, CiscoSparkWebhookData, CloudwatchEbData, DatadogData, EmailUserData,
    GcpPubSubData, IbmQradarData, JiraData, MicrosoftTeamsData, NewRelicInsightsData,
    PagerDutyApiData, SlackChannelData, SplunkHecData, VictorOpsData, WebhookData,
};

pub type AlertChannelsService<'a> = IntegrationsService<'a, AlertChannelData>;

impl AlertChannelsService<'_> {
    /// Ask the platform to send a test notification through the channel
    pub async fn test(&self, guid: &str) -> Result<()> {
        self.crud().require_guid(guid)?;
        let _: IgnoredAny = self
            .crud()
            .client()
            .request(Method::POST, &endpoints::alert_channel_test(guid))
            .await?;
        Ok(())
    }
}

typed_getters! {
    AlertChannelData {
        get_email_user => EmailUserData,
        get_slack_channel => SlackChannelData,
        get_aws_s3 => AwsS3Data,
        get_cloudwatch_eb => CloudwatchEbData,
        get_datadog => DatadogData,
        get_webhook => WebhookData,
        get_victorops => VictorOpsData,
        get_cisco_spark_webhook => CiscoSparkWebhookData,
        get_microsoft_teams => MicrosoftTeamsData,
        get_splunk_hec => SplunkHecData,
        get_pagerduty_api => PagerDutyApiData,
        get_new_relic_insights => NewRelicInsightsData,
        get_ibm_qradar => IbmQradarData,
        get_gcp_pubsub => GcpPubSubData,
        get_jira => JiraData,
    }
}
