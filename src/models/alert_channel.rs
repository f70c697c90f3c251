//! Alert channel payloads (`v2/AlertChannels`)

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::integration::{Integration, integration_family};
use super::recipients;

integration_family! {
    /// Payload of any alert channel, keyed by its `type`
    AlertChannelData {
        EmailUser(EmailUserData) => "EmailUser",
        SlackChannel(SlackChannelData) => "SlackChannel",
        AwsS3(AwsS3Data) => "AwsS3",
        CloudwatchEb(CloudwatchEbData) => "CloudwatchEb",
        Datadog(DatadogData) => "Datadog",
        Webhook(WebhookData) => "Webhook",
        VictorOps(VictorOpsData) => "VictorOps",
        CiscoSparkWebhook(CiscoSparkWebhookData) => "CiscoSparkWebhook",
        MicrosoftTeams(MicrosoftTeamsData) => "MicrosoftTeams",
        SplunkHec(SplunkHecData) => "SplunkHec",
        PagerDutyApi(PagerDutyApiData) => "PagerDutyApi",
        NewRelicInsights(NewRelicInsightsData) => "NewRelicInsights",
        IbmQradar(IbmQradarData) => "IbmQradar",
        GcpPubSub(GcpPubSubData) => "GcpPubsub",
        Jira(JiraData) => "Jira",
    }
}

pub type AlertChannel = Integration<AlertChannelData>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailUserData {
    pub channel_props: EmailUserChannelProps,
    #[serde(default)]
    pub notification_types: NotificationTypes,
}

impl EmailUserData {
    pub fn new<I, S>(recipients: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            channel_props: EmailUserChannelProps {
                recipients: recipients.into_iter().map(Into::into).collect(),
            },
            notification_types: NotificationTypes::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmailUserChannelProps {
    #[serde(default, deserialize_with = "recipients::deserialize")]
    pub recipients: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotificationTypes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlackChannelData {
    pub slack_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwsS3Data {
    pub s3_cross_account_credentials: AwsS3Credentials,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwsS3Credentials {
    pub role_arn: String,
    pub external_id: String,
    pub bucket_arn: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudwatchEbData {
    pub event_bus_arn: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_grouping: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatadogData {
    pub datadog_site: String,
    pub datadog_service: String,
    pub api_key: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookData {
    pub webhook_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VictorOpsData {
    pub intg_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CiscoSparkWebhookData {
    pub webhook: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MicrosoftTeamsData {
    pub teams_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplunkHecData {
    pub channel: String,
    pub hec_token: String,
    pub host: String,
    pub port: u16,
    pub ssl: bool,
    pub event_data: SplunkEventData,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SplunkEventData {
    pub index: String,
    pub source: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagerDutyApiData {
    pub api_intg_key: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRelicInsightsData {
    pub account_id: u64,
    pub insert_key: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IbmQradarData {
    pub qradar_host_url: String,
    pub qradar_host_port: u16,
    pub qradar_comm_type: QradarCommType,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum QradarCommType {
    #[default]
    #[serde(rename = "HTTPS")]
    Https,
    #[serde(rename = "HTTPS Self Signed Cert")]
    HttpsSelfSigned,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GcpPubSubData {
    pub credentials: GcpPubSubCredentials,
    pub project_id: String,
    pub topic_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_grouping: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GcpPubSubCredentials {
    pub client_id: String,
    pub client_email: String,
    pub private_key_id: String,
    pub private_key: String,
}

/// Jira Cloud authenticates with `api_token`, Jira Server with `password`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraData {
    pub jira_type: JiraType,
    pub jira_url: String,
    pub issue_type: String,
    pub project_id: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_grouping: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_template_file: Option<String>,
    #[serde(
        rename = "bidirectionalConfig",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub bidirectional_config: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum JiraType {
    #[default]
    #[serde(rename = "JIRA_CLOUD")]
    Cloud,
    #[serde(rename = "JIRA_SERVER")]
    Server,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IntegrationPayload;
    use serde_json::json;

    fn channel(kind: &str, data: Value) -> Value {
        json!({
            "intgGuid": "TECHALLY_000000000000AAAAAAAAAAAAAAAAAAAA",
            "name": "integration_name",
            "enabled": 1,
            "isOrg": 0,
            "createdOrUpdatedBy": "salim.afiunemaya@lacework.net",
            "createdOrUpdatedTime": "2021-06-01T18:10:40.745Z",
            "state": {
                "ok": true,
                "details": {},
                "lastUpdatedTime": 1627895573122i64,
                "lastSuccessfulTime": 1627895573122i64
            },
            "type": kind,
            "data": data
        })
    }

    #[test]
    fn test_decode_heterogeneous_list() {
        let list = json!([
            channel("Webhook", json!({"webhookUrl": "https://hooks.webhook.com/?api-token=12345"})),
            channel("SplunkHec", json!({
                "channel": "channel-name",
                "hecToken": "AA111111-11AA-1AA1-11AA-11111AA1111A",
                "eventData": {"source": "test-source", "index": "test-index"},
                "host": "localhost",
                "port": 80,
                "ssl": true
            })),
            channel("ServiceNowRest", json!({"instanceUrl": "https://dev.service-now.com"})),
        ]);

        let channels: Vec<AlertChannel> = serde_json::from_value(list).unwrap();
        assert_eq!(channels.len(), 3);

        match &channels[0].data {
            AlertChannelData::Webhook(data) => {
                assert_eq!(data.webhook_url, "https://hooks.webhook.com/?api-token=12345")
            }
            other => panic!("Expected Webhook, got {:?}", other),
        }
        match &channels[1].data {
            AlertChannelData::SplunkHec(data) => {
                assert_eq!(data.port, 80);
                assert_eq!(data.event_data.index, "test-index");
            }
            other => panic!("Expected SplunkHec, got {:?}", other),
        }
        assert_eq!(channels[2].kind(), "ServiceNowRest");
        assert!(matches!(channels[2].data, AlertChannelData::Unknown { .. }));
    }

    #[test]
    fn test_email_user_with_csv_recipients() {
        let value = channel(
            "EmailUser",
            json!({
                "channelProps": {"recipients": "foo@example.com,bar@example.com"},
                "notificationTypes": {"properties": null}
            }),
        );
        let channel: Integration<EmailUserData> = serde_json::from_value(value).unwrap();
        assert_eq!(
            channel.data.channel_props.recipients,
            vec!["foo@example.com", "bar@example.com"]
        );

        // always written back as an array
        let written = serde_json::to_value(&channel).unwrap();
        assert_eq!(
            written["data"]["channelProps"]["recipients"],
            json!(["foo@example.com", "bar@example.com"])
        );
    }

    #[test]
    fn test_new_qradar_channel() {
        let channel = AlertChannel::new(
            "qradar",
            IbmQradarData {
                qradar_host_url: "https://qradar-lacework.com".to_string(),
                qradar_host_port: 443,
                qradar_comm_type: QradarCommType::HttpsSelfSigned,
            },
        );
        let written = serde_json::to_value(&channel).unwrap();
        assert_eq!(written["type"], "IbmQradar");
        assert_eq!(written["enabled"], 1);
        assert_eq!(written["data"]["qradarCommType"], "HTTPS Self Signed Cert");

        let plain: QradarCommType = serde_json::from_value(json!("HTTPS")).unwrap();
        assert_eq!(plain, QradarCommType::Https);
        assert_eq!(written["data"]["qradarHostPort"], 443);
    }

    #[test]
    fn test_jira_server_omits_api_token() {
        let data = JiraData {
            jira_type: JiraType::Server,
            jira_url: "mycompany.atlassian.net".to_string(),
            issue_type: "Bug".to_string(),
            project_id: "EXAMPLE".to_string(),
            username: "user@example.com".to_string(),
            password: Some("secret".to_string()),
            ..Default::default()
        };
        assert_eq!(data.kind(), "Jira");

        let raw = data.to_raw().unwrap();
        assert_eq!(raw["jiraType"], "JIRA_SERVER");
        assert_eq!(raw["password"], "secret");
        assert!(raw.get("apiToken").is_none());
    }

    #[test]
    fn test_known_kinds() {
        assert!(AlertChannelData::is_known("EmailUser"));
        assert!(AlertChannelData::is_known("GcpPubsub"));
        assert!(!AlertChannelData::is_known("None"));
    }
}
