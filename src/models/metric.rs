//! Usage telemetry events (`v2/Metrics`)

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Dataset events are reported to unless overridden
pub const DEFAULT_METRIC_DATASET: &str = "lacework-cli-prod";

/// One telemetry event; the schema is fixed by the metrics endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricEvent {
    pub os: String,
    pub arch: String,
    pub version: String,
    #[serde(default)]
    pub profile: String,
    #[serde(default)]
    pub account: String,
    #[serde(default)]
    pub subaccount: String,
    #[serde(rename = "api_key", default)]
    pub api_key: String,
    #[serde(rename = "cfg_version", default)]
    pub cfg_version: u32,
    #[serde(default)]
    pub command: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<String>,
    #[serde(rename = "duration_ms", default)]
    pub duration_ms: u64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub error: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub feature: String,
    #[serde(rename = "feature.data", default, skip_serializing_if = "Option::is_none")]
    pub feature_data: Option<HashMap<String, Value>>,
    #[serde(rename = "install_method", default)]
    pub install_method: String,
    #[serde(rename = "trace.trace_id", default)]
    pub trace_id: String,
    #[serde(rename = "trace.span_id", default, skip_serializing_if = "String::is_empty")]
    pub span_id: String,
    #[serde(rename = "trace.parent_id", default, skip_serializing_if = "String::is_empty")]
    pub parent_id: String,
    #[serde(rename = "context_id", default, skip_serializing_if = "String::is_empty")]
    pub context_id: String,
    #[serde(default)]
    pub dataset: String,
}

impl MetricEvent {
    /// Event for the running platform, reported to the default dataset
    pub fn new(version: impl Into<String>, trace_id: impl Into<String>) -> Self {
        Self {
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
            version: version.into(),
            trace_id: trace_id.into(),
            dataset: DEFAULT_METRIC_DATASET.to_string(),
            ..Default::default()
        }
    }

    /// Attach a key to the event's feature data
    pub fn add_feature_field(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.feature_data
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
    }

    /// Clear the per-call fields so the event can be reused for the next call
    pub fn reset_temporal_fields(&mut self) {
        self.duration_ms = 0;
        self.error.clear();
        self.feature.clear();
        self.feature_data = None;
    }
}
