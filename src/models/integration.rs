//! Integration envelope and polymorphic payloads
//!
//! One endpoint serves many integration sub-types, distinguished by the
//! `type` field next to `data`. [`Integration<D>`] carries the shared
//! envelope fields and a payload `D`, which is either a family enum (for
//! heterogeneous lists) or a concrete payload struct (for typed access).

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::ser::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Milliseconds since the Unix epoch, as the API reports timestamps
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EpochMillis(pub i64);

impl EpochMillis {
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.0)
    }
}

impl From<DateTime<Utc>> for EpochMillis {
    fn from(at: DateTime<Utc>) -> Self {
        EpochMillis(at.timestamp_millis())
    }
}

/// Health of an integration as last observed by the platform
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationState {
    pub ok: bool,
    #[serde(default)]
    pub details: HashMap<String, Value>,
    #[serde(default)]
    pub last_updated_time: EpochMillis,
    #[serde(default)]
    pub last_successful_time: EpochMillis,
}

/// Token issued to container registries scanned by an on-premise scanner
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerToken {
    pub server_token: String,
    pub uri: String,
}

/// Envelope fields shared by every integration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationCommon {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub intg_guid: String,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_or_updated_time: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_or_updated_by: Option<String>,

    #[serde(default)]
    pub enabled: u8,

    #[serde(default, skip_serializing_if = "is_zero")]
    pub is_org: u8,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<IntegrationState>,

    /// Free-form properties some integrations carry next to `data`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub props: Option<Value>,

    /// Only populated for inline and proxy scanner container registries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_token: Option<ServerToken>,
}

fn is_zero(value: &u8) -> bool {
    *value == 0
}

impl IntegrationCommon {
    /// Envelope for a new, enabled integration
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enabled: 1,
            ..Default::default()
        }
    }

    pub fn id(&self) -> &str {
        &self.intg_guid
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled == 1
    }

    pub fn status(&self) -> &'static str {
        if self.is_enabled() {
            "Enabled"
        } else {
            "Disabled"
        }
    }

    pub fn state_string(&self) -> &'static str {
        match &self.state {
            Some(state) if state.ok => "Ok",
            _ => "Pending",
        }
    }
}

/// Payload of an integration, selected by the `type` discriminator
pub trait IntegrationPayload: Sized {
    /// Discriminator written to the envelope's `type` field
    fn kind(&self) -> &str;

    /// Decode the raw `data` object of an integration of type `kind`
    fn from_raw(kind: &str, raw: Value) -> serde_json::Result<Self>;

    /// Encode the payload as the `data` object
    fn to_raw(&self) -> serde_json::Result<Value>;
}

/// Generic integration: envelope plus payload
#[derive(Debug, Clone, PartialEq)]
pub struct Integration<D> {
    pub common: IntegrationCommon,
    pub data: D,
}

impl<D: IntegrationPayload> Integration<D> {
    /// A new, enabled integration
    pub fn new(name: impl Into<String>, data: impl Into<D>) -> Self {
        Self {
            common: IntegrationCommon::named(name),
            data: data.into(),
        }
    }

    pub fn id(&self) -> &str {
        self.common.id()
    }

    pub fn kind(&self) -> &str {
        self.data.kind()
    }

    /// Re-decode the payload as another payload type.
    ///
    /// Used to narrow a family enum to a concrete struct (or the reverse);
    /// fails if the discriminator does not match the target type.
    pub fn cast<P: IntegrationPayload>(self) -> serde_json::Result<Integration<P>> {
        let data = P::from_raw(self.data.kind(), self.data.to_raw()?)?;
        Ok(Integration {
            common: self.common,
            data,
        })
    }
}

impl<D: IntegrationPayload> Serialize for Integration<D> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = match serde_json::to_value(&self.common).map_err(S::Error::custom)? {
            Value::Object(map) => map,
            _ => return Err(S::Error::custom("integration envelope must be an object")),
        };
        map.insert("type".to_string(), Value::String(self.kind().to_string()));
        map.insert(
            "data".to_string(),
            self.data.to_raw().map_err(S::Error::custom)?,
        );
        Value::Object(map).serialize(serializer)
    }
}

impl<'de, D: IntegrationPayload> Deserialize<'de> for Integration<D> {
    fn deserialize<De: Deserializer<'de>>(deserializer: De) -> Result<Self, De::Error> {
        let mut map = Map::deserialize(deserializer)?;

        let kind = match map.remove("type") {
            Some(Value::String(kind)) => kind,
            _ => return Err(De::Error::missing_field("type")),
        };
        let raw = map.remove("data").unwrap_or(Value::Null);

        let common: IntegrationCommon =
            serde_json::from_value(Value::Object(map)).map_err(De::Error::custom)?;
        let data = D::from_raw(&kind, raw).map_err(De::Error::custom)?;

        Ok(Integration { common, data })
    }
}

/// Declare a family of integration payloads.
///
/// Generates the family enum with one variant per sub-type plus an
/// `Unknown` variant keeping the undecoded payload, and implements
/// [`IntegrationPayload`] for the enum and for every payload struct.
macro_rules! integration_family {
    (
        $(#[$meta:meta])*
        $family:ident {
            $( $variant:ident($payload:ty) => $kind:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub enum $family {
            $( $variant($payload), )+
            /// Sub-type without a dedicated payload struct, or a payload its
            /// struct could not decode
            Unknown {
                kind: String,
                raw: serde_json::Value,
            },
        }

        impl $family {
            /// Discriminators with a dedicated payload struct
            pub const KINDS: &'static [&'static str] = &[$( $kind ),+];

            pub fn is_known(kind: &str) -> bool {
                Self::KINDS.contains(&kind)
            }
        }

        impl $crate::models::IntegrationPayload for $family {
            fn kind(&self) -> &str {
                match self {
                    $( Self::$variant(_) => $kind, )+
                    Self::Unknown { kind, .. } => kind.as_str(),
                }
            }

            fn from_raw(kind: &str, raw: serde_json::Value) -> serde_json::Result<Self> {
                let decoded = match kind {
                    $( $kind => <$payload as serde::Deserialize>::deserialize(&raw).map(Self::$variant), )+
                    _ => return Ok(Self::Unknown {
                        kind: kind.to_string(),
                        raw,
                    }),
                };
                // A drifted payload must not fail the whole collection.
                Ok(decoded.unwrap_or_else(|err| {
                    ::log::warn!("keeping raw {} integration payload: {}", kind, err);
                    Self::Unknown {
                        kind: kind.to_string(),
                        raw,
                    }
                }))
            }

            fn to_raw(&self) -> serde_json::Result<serde_json::Value> {
                match self {
                    $( Self::$variant(data) => serde_json::to_value(data), )+
                    Self::Unknown { raw, .. } => Ok(raw.clone()),
                }
            }
        }

        $(
            impl $crate::models::IntegrationPayload for $payload {
                fn kind(&self) -> &str {
                    $kind
                }

                fn from_raw(kind: &str, raw: serde_json::Value) -> serde_json::Result<Self> {
                    if kind != $kind {
                        return Err(<serde_json::Error as serde::de::Error>::custom(format!(
                            "expected integration type {}, found {}",
                            $kind, kind
                        )));
                    }
                    serde_json::from_value(raw)
                }

                fn to_raw(&self) -> serde_json::Result<serde_json::Value> {
                    serde_json::to_value(self)
                }
            }

            impl From<$payload> for $family {
                fn from(data: $payload) -> Self {
                    Self::$variant(data)
                }
            }
        )+
    };
}

pub(crate) use integration_family;
