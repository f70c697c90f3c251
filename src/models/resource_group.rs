//! Resource groups (`v2/ResourceGroups`)
//!
//! Groups select resources through a query: named filters combined by a
//! boolean expression tree.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const AWS_RESOURCE_GROUP: &str = "AWS";
pub const AZURE_RESOURCE_GROUP: &str = "AZURE";
pub const CONTAINER_RESOURCE_GROUP: &str = "CONTAINER";
pub const GCP_RESOURCE_GROUP: &str = "GCP";
pub const LW_ACCOUNT_RESOURCE_GROUP: &str = "LW_ACCOUNT";
pub const MACHINE_RESOURCE_GROUP: &str = "MACHINE";
pub const OCI_RESOURCE_GROUP: &str = "OCI";
pub const KUBERNETES_RESOURCE_GROUP: &str = "KUBERNETES";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceGroup {
    pub name: String,

    #[serde(rename = "resourceType")]
    pub resource_type: String,

    pub query: Option<RgQuery>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub resource_group_guid: String,

    #[serde(
        rename = "lastUpdated",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub created_time: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_time: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,

    #[serde(default)]
    pub enabled: u8,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_default_boolean: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_org: Option<bool>,
}

impl ResourceGroup {
    /// A new, enabled group
    pub fn new(
        name: impl Into<String>,
        resource_type: impl Into<String>,
        description: impl Into<String>,
        query: RgQuery,
    ) -> Self {
        let description = description.into();
        Self {
            name: name.into(),
            resource_type: resource_type.into(),
            query: Some(query),
            description: (!description.is_empty()).then_some(description),
            enabled: 1,
            ..Default::default()
        }
    }

    pub fn id(&self) -> &str {
        &self.resource_group_guid
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled == 1
    }

    pub fn is_default(&self) -> bool {
        self.is_default_boolean.unwrap_or(false)
    }

    /// Copy without the server-managed fields, which updates must not send
    pub fn for_update(&self) -> Self {
        Self {
            resource_group_guid: String::new(),
            created_time: None,
            created_by: None,
            updated_time: None,
            updated_by: None,
            is_default_boolean: None,
            is_org: None,
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RgQuery {
    pub filters: BTreeMap<String, RgFilter>,
    pub expression: RgExpression,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RgFilter {
    pub field: String,
    pub operation: String,
    pub values: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RgExpression {
    pub operator: String,
    pub children: Vec<RgChild>,
}

/// Either a reference to a named filter or a nested expression
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RgChild {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RgChild>,
}

impl RgChild {
    pub fn filter(name: impl Into<String>) -> Self {
        Self {
            filter_name: Some(name.into()),
            ..Default::default()
        }
    }
}
