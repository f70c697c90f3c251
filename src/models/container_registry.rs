//! Container registry payloads (`v2/ContainerRegistries`)
//!
//! Every registry is an integration of type `ContVulnCfg`; the sub-type
//! lives inside the payload as `data.registryType`.

use std::collections::HashMap;

use serde::de::Error as _;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::IntegrationPayload;
use super::integration::Integration;

/// Integration type shared by all container registries
pub const CONTAINER_REGISTRY_TYPE: &str = "ContVulnCfg";

const REGISTRY_TYPE_FIELD: &str = "registryType";

/// Scan limits shared by every registry type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryLimits {
    #[serde(default)]
    pub limit_by_label: Vec<HashMap<String, String>>,
    #[serde(default, rename = "limitByRep")]
    pub limit_by_repository: Vec<String>,
    #[serde(default)]
    pub limit_by_tag: Vec<String>,
    #[serde(default, rename = "limitNumImg")]
    pub limit_num_images: u32,
    #[serde(default)]
    pub non_os_package_eval: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryCredentials {
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssl: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DockerhubData {
    pub credentials: RegistryCredentials,
    pub registry_domain: String,
    #[serde(flatten)]
    pub limits: RegistryLimits,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GhcrData {
    pub credentials: RegistryCredentials,
    pub registry_domain: String,
    #[serde(flatten)]
    pub limits: RegistryLimits,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct V2RegistryData {
    pub credentials: RegistryCredentials,
    pub registry_domain: String,
    #[serde(flatten)]
    pub limits: RegistryLimits,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AwsEcrAuthType {
    #[default]
    #[serde(rename = "AWS_IAM")]
    IamRole,
    #[serde(rename = "AWS_ACCESS_KEY")]
    AccessKey,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwsEcrCrossAccountCredentials {
    pub role_arn: String,
    pub external_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwsEcrAccessKeyCredentials {
    pub access_key_id: String,
    #[serde(default)]
    pub secret_access_key: String,
}

/// ECR authenticates with either an IAM role or an access key pair
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwsEcrData {
    pub aws_auth_type: AwsEcrAuthType,
    pub registry_domain: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cross_account_credentials: Option<AwsEcrCrossAccountCredentials>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_key_credentials: Option<AwsEcrAccessKeyCredentials>,
    #[serde(flatten)]
    pub limits: RegistryLimits,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GcpRegistryCredentials {
    pub client_id: String,
    pub client_email: String,
    pub private_key_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub private_key: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GcpGarData {
    pub credentials: GcpRegistryCredentials,
    pub registry_domain: String,
    #[serde(flatten)]
    pub limits: RegistryLimits,
}

fn registry_type(raw: &Value) -> Option<&str> {
    raw.get(REGISTRY_TYPE_FIELD).and_then(Value::as_str)
}

fn check_integration_type(kind: &str) -> serde_json::Result<()> {
    if kind != CONTAINER_REGISTRY_TYPE {
        return Err(serde_json::Error::custom(format!(
            "expected integration type {}, found {}",
            CONTAINER_REGISTRY_TYPE, kind
        )));
    }
    Ok(())
}

fn with_registry_type(mut raw: Value, registry: &str) -> Value {
    if let Value::Object(map) = &mut raw {
        map.insert(
            REGISTRY_TYPE_FIELD.to_string(),
            Value::String(registry.to_string()),
        );
    }
    raw
}

macro_rules! registry_family {
    ( $( $variant:ident($payload:ty) => $registry:literal, )+ ) => {
        /// Payload of any container registry, keyed by `data.registryType`
        #[derive(Debug, Clone, PartialEq)]
        pub enum ContainerRegistryData {
            $( $variant($payload), )+
            /// Registry type without a dedicated payload struct, or a payload
            /// its struct could not decode
            Unknown {
                registry_type: String,
                raw: Value,
            },
        }

        impl ContainerRegistryData {
            pub const REGISTRY_TYPES: &'static [&'static str] = &[$( $registry ),+];

            pub fn registry_type(&self) -> &str {
                match self {
                    $( Self::$variant(_) => $registry, )+
                    Self::Unknown { registry_type, .. } => registry_type.as_str(),
                }
            }
        }

        impl IntegrationPayload for ContainerRegistryData {
            fn kind(&self) -> &str {
                CONTAINER_REGISTRY_TYPE
            }

            fn from_raw(kind: &str, raw: Value) -> serde_json::Result<Self> {
                check_integration_type(kind)?;
                let registry = registry_type(&raw).unwrap_or_default().to_string();
                let decoded = match registry.as_str() {
                    $( $registry => Some(<$payload as Deserialize>::deserialize(&raw).map(Self::$variant)), )+
                    _ => None,
                };
                match decoded {
                    Some(Ok(data)) => Ok(data),
                    other => {
                        if let Some(Err(err)) = other {
                            log::warn!("keeping raw {} registry payload: {}", registry, err);
                        }
                        Ok(Self::Unknown {
                            registry_type: registry,
                            raw,
                        })
                    }
                }
            }

            fn to_raw(&self) -> serde_json::Result<Value> {
                match self {
                    $( Self::$variant(data) => data.to_raw(), )+
                    Self::Unknown { raw, .. } => Ok(raw.clone()),
                }
            }
        }

        $(
            impl IntegrationPayload for $payload {
                fn kind(&self) -> &str {
                    CONTAINER_REGISTRY_TYPE
                }

                fn from_raw(kind: &str, raw: Value) -> serde_json::Result<Self> {
                    check_integration_type(kind)?;
                    match registry_type(&raw) {
                        Some($registry) => serde_json::from_value(raw),
                        other => Err(serde_json::Error::custom(format!(
                            "expected registry type {}, found {}",
                            $registry,
                            other.unwrap_or("none")
                        ))),
                    }
                }

                fn to_raw(&self) -> serde_json::Result<Value> {
                    serde_json::to_value(self).map(|raw| with_registry_type(raw, $registry))
                }
            }

            impl From<$payload> for ContainerRegistryData {
                fn from(data: $payload) -> Self {
                    Self::$variant(data)
                }
            }
        )+
    };
}

registry_family! {
    Dockerhub(DockerhubData) => "DOCKERHUB",
    Ghcr(GhcrData) => "GHCR",
    V2Registry(V2RegistryData) => "V2_REGISTRY",
    AwsEcr(AwsEcrData) => "AWS_ECR",
    GcpGar(GcpGarData) => "GCP_GAR",
}

pub type ContainerRegistry = Integration<ContainerRegistryData>;

impl ContainerRegistry {
    pub fn registry_type(&self) -> &str {
        self.data.registry_type()
    }
}
