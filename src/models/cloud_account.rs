//! Cloud account payloads (`v2/CloudAccounts`)

use serde::{Deserialize, Serialize};

use super::integration::{Integration, integration_family};

integration_family! {
    /// Payload of any cloud account integration, keyed by its `type`
    CloudAccountData {
        AwsCfg(AwsCfgData) => "AwsCfg",
        AwsCtSqs(AwsCtSqsData) => "AwsCtSqs",
        AwsEksAudit(AwsEksAuditData) => "AwsEksAudit",
        AwsSidekickOrg(AwsSidekickOrgData) => "AwsSidekickOrg",
        AzureCfg(AzureCfgData) => "AzureCfg",
        AzureAlSeq(AzureAlSeqData) => "AzureAlSeq",
        GcpCfg(GcpCfgData) => "GcpCfg",
        GcpAtSes(GcpAtSesData) => "GcpAtSes",
        GcpGkeAudit(GcpGkeAuditData) => "GcpGkeAudit",
        GcpSidekick(GcpSidekickData) => "GcpSidekick",
        OciCfg(OciCfgData) => "OciCfg",
    }
}

pub type CloudAccount = Integration<CloudAccountData>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwsCrossAccountCredentials {
    pub role_arn: String,
    pub external_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwsCfgData {
    pub cross_account_credentials: AwsCrossAccountCredentials,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub aws_account_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwsCtSqsData {
    pub cross_account_credentials: AwsCrossAccountCredentials,
    pub queue_url: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub aws_account_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwsEksAuditData {
    pub cross_account_credentials: AwsCrossAccountCredentials,
    pub sns_arn: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s3_bucket_arn: Option<String>,
}

/// Agentless scanning across an AWS organization
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwsSidekickOrgData {
    pub cross_account_credentials: AwsCrossAccountCredentials,
    pub scanning_account: String,
    pub monitored_accounts: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub management_account: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub aws_account_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub bucket_arn: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub query_text: String,
    #[serde(default)]
    pub scan_frequency: u32,
    #[serde(default)]
    pub scan_containers: bool,
    #[serde(default)]
    pub scan_host_vulnerabilities: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub account_mapping_file: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AzureCredentials {
    pub client_id: String,
    pub client_secret: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AzureCfgData {
    pub credentials: AzureCredentials,
    pub tenant_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AzureAlSeqData {
    pub credentials: AzureCredentials,
    pub tenant_id: String,
    pub queue_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GcpCredentials {
    pub client_id: String,
    pub client_email: String,
    pub private_key_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub private_key: String,
}

/// Level at which a GCP integration is attached
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GcpIdType {
    #[default]
    Project,
    Organization,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GcpCfgData {
    pub credentials: GcpCredentials,
    pub id_type: GcpIdType,
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GcpAtSesData {
    pub credentials: GcpCredentials,
    pub id_type: GcpIdType,
    pub id: String,
    pub subscription_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GcpGkeAuditData {
    pub credentials: GcpCredentials,
    pub integration_type: String,
    pub project_id: String,
    pub subscription_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
}

/// Agentless scanning of GCP workloads
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GcpSidekickData {
    pub credentials: GcpCredentials,
    pub id_type: GcpIdType,
    pub id: String,
    pub scanning_project_id: String,
    #[serde(rename = "sharedBucketName")]
    pub shared_bucket: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub filter_list: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub query_text: String,
    #[serde(default)]
    pub scan_frequency: u32,
    #[serde(default)]
    pub scan_containers: bool,
    #[serde(default)]
    pub scan_host_vulnerabilities: bool,
    #[serde(default)]
    pub scan_multi_volume: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OciCredentials {
    pub fingerprint: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub private_key: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OciCfgData {
    pub credentials: OciCredentials,
    pub home_region: String,
    pub tenant_id: String,
    pub tenant_name: String,
    pub user_ocid: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_aws_ct_sqs() {
        let value = json!({
            "intgGuid": "TECHALLY_1",
            "name": "integration_name",
            "enabled": 1,
            "isOrg": 0,
            "state": {
                "ok": true,
                "details": {"complianceOpsDeniedAccess": ["GetBucketAcl", "GetBucketLogging"]},
                "lastUpdatedTime": 1624456896915i64,
                "lastSuccessfulTime": 1624456896915i64
            },
            "type": "AwsCtSqs",
            "data": {
                "awsAccountId": "123456789000",
                "queueUrl": "https://sqs.us-west-2.amazonaws.com/123456789000/lw",
                "crossAccountCredentials": {"externalId": "0123456789", "roleArn": "arn:foo:bar"}
            }
        });

        let account: CloudAccount = serde_json::from_value(value).unwrap();
        match &account.data {
            CloudAccountData::AwsCtSqs(data) => {
                assert_eq!(data.aws_account_id, "123456789000");
                assert_eq!(data.cross_account_credentials.role_arn, "arn:foo:bar");
            }
            other => panic!("Expected AwsCtSqs, got {:?}", other),
        }

        let details = &account.common.state.as_ref().unwrap().details;
        assert_eq!(details["complianceOpsDeniedAccess"][0], "GetBucketAcl");
    }

    #[test]
    fn test_gcp_cfg_organization() {
        let data: GcpCfgData = serde_json::from_value(json!({
            "credentials": {
                "clientId": "0123456789",
                "privateKeyId": "",
                "clientEmail": "test@project.iam.gserviceaccount.com",
                "privateKey": ""
            },
            "idType": "ORGANIZATION",
            "id": "0123456789"
        }))
        .unwrap();
        assert_eq!(data.id_type, GcpIdType::Organization);

        // empty private keys are never sent back
        let raw = serde_json::to_value(&data).unwrap();
        assert!(raw["credentials"].get("privateKey").is_none());
    }

    #[test]
    fn test_new_aws_cfg_account() {
        let account = CloudAccount::new(
            "aws",
            AwsCfgData {
                cross_account_credentials: AwsCrossAccountCredentials {
                    role_arn: "arn:foo:bar".to_string(),
                    external_id: "0123456789".to_string(),
                },
                ..Default::default()
            },
        );
        let written = serde_json::to_value(&account).unwrap();
        assert_eq!(written["type"], "AwsCfg");
        assert_eq!(
            written["data"],
            json!({"crossAccountCredentials": {"roleArn": "arn:foo:bar", "externalId": "0123456789"}})
        );
    }
}
