//! Cloud accounts service

use super::integrations::{IntegrationsService, typed_getters};
use crate::error::Result;
use crate::models::cloud_account::{
    AwsCfgData, AwsCtSqsData, AwsEksAuditData, AwsSidekickOrgData, AzureAlSeqData, AzureCfgData,
    GcpAtSesData, GcpCfgData, GcpGkeAuditData, GcpSidekickData, OciCfgData,
};
use crate::models::{CloudAccount, CloudAccountData};

pub type CloudAccountsService<'a> = IntegrationsService<'a, CloudAccountData>;

impl CloudAccountsService<'_> {
    /// All cloud accounts of one sub-type, e.g. `AwsCfg`
    pub async fn list_by_type(&self, kind: &str) -> Result<Vec<CloudAccount>> {
        self.crud().list_by(kind).await
    }
}

typed_getters! {
    CloudAccountData {
        get_aws_cfg => AwsCfgData,
        get_aws_ct_sqs => AwsCtSqsData,
        get_aws_eks_audit => AwsEksAuditData,
        get_aws_sidekick_org => AwsSidekickOrgData,
        get_azure_cfg => AzureCfgData,
        get_azure_al_seq => AzureAlSeqData,
        get_gcp_cfg => GcpCfgData,
        get_gcp_at_ses => GcpAtSesData,
        get_gcp_gke_audit => GcpGkeAuditData,
        get_gcp_sidekick => GcpSidekickData,
        get_oci_cfg => OciCfgData,
    }
}
