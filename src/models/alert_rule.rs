//! Alert rules (`v2/AlertRules`)

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Rule type used by every alert rule the API accepts
pub const ALERT_RULE_EVENT_TYPE: &str = "Event";

/// Alert severity, ordered from most to least severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AlertSeverity {
    Critical = 1,
    High = 2,
    Medium = 3,
    Low = 4,
    Info = 5,
}

impl AlertSeverity {
    pub const ALL: [AlertSeverity; 5] = [
        AlertSeverity::Critical,
        AlertSeverity::High,
        AlertSeverity::Medium,
        AlertSeverity::Low,
        AlertSeverity::Info,
    ];

    pub fn from_level(level: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|severity| *severity as u8 == level)
    }

    pub fn level(self) -> u8 {
        self as u8
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AlertSeverity::Critical => "Critical",
            AlertSeverity::High => "High",
            AlertSeverity::Medium => "Medium",
            AlertSeverity::Low => "Low",
            AlertSeverity::Info => "Info",
        }
    }
}

impl fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlertSeverity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|severity| severity.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown alert severity '{}'", s))
    }
}

impl Serialize for AlertSeverity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.level())
    }
}

impl<'de> Deserialize<'de> for AlertSeverity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let level = u8::deserialize(deserializer)?;
        AlertSeverity::from_level(level).ok_or_else(|| {
            serde::de::Error::custom(format!("unknown alert severity level {}", level))
        })
    }
}

/// Parse severity names, silently skipping unknown ones
pub fn parse_severities<I, S>(names: I) -> Vec<AlertSeverity>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .filter_map(|name| name.as_ref().parse().ok())
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertRule {
    #[serde(rename = "mcGuid", default, skip_serializing_if = "String::is_empty")]
    pub guid: String,

    #[serde(rename = "type")]
    pub rule_type: String,

    #[serde(rename = "intgGuidList")]
    pub channels: Vec<String>,

    #[serde(rename = "filters")]
    pub filter: AlertRuleFilter,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertRuleFilter {
    pub name: String,

    #[serde(default)]
    pub enabled: u8,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(rename = "severity", default)]
    pub severities: Vec<AlertSeverity>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resource_groups: Vec<String>,

    #[serde(rename = "eventCategory", default, skip_serializing_if = "Vec::is_empty")]
    pub event_categories: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<String>,

    #[serde(rename = "category", default, skip_serializing_if = "Vec::is_empty")]
    pub alert_categories: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_or_updated_time: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_or_updated_by: Option<String>,
}

impl AlertRuleFilter {
    pub fn status(&self) -> &'static str {
        if self.enabled == 1 {
            "Enabled"
        } else {
            "Disabled"
        }
    }
}

impl AlertRule {
    /// A new, enabled event rule routed to `channels`
    pub fn new(
        name: impl Into<String>,
        channels: Vec<String>,
        severities: Vec<AlertSeverity>,
    ) -> Self {
        Self {
            guid: String::new(),
            rule_type: ALERT_RULE_EVENT_TYPE.to_string(),
            channels,
            filter: AlertRuleFilter {
                name: name.into(),
                enabled: 1,
                severities,
                ..Default::default()
            },
        }
    }

    pub fn id(&self) -> &str {
        &self.guid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_severity_names() {
        assert_eq!(
            parse_severities(["critical", "HIGH", "bogus", "info"]),
            vec![
                AlertSeverity::Critical,
                AlertSeverity::High,
                AlertSeverity::Info
            ]
        );
        assert_eq!(AlertSeverity::Medium.to_string(), "Medium");
        assert_eq!(AlertSeverity::from_level(4), Some(AlertSeverity::Low));
        assert_eq!(AlertSeverity::from_level(0), None);
    }

    #[test]
    fn test_decode_rule() {
        let rule: AlertRule = serde_json::from_value(json!({
            "mcGuid": "TECHALLY_1",
            "type": "Event",
            "intgGuidList": ["TECHALLY_2"],
            "filters": {
                "name": "rule",
                "enabled": 1,
                "severity": [1, 2],
                "eventCategory": ["Compliance"],
                "createdOrUpdatedBy": "someone@example.com"
            }
        }))
        .unwrap();

        assert_eq!(rule.id(), "TECHALLY_1");
        assert_eq!(rule.filter.status(), "Enabled");
        assert_eq!(
            rule.filter.severities,
            vec![AlertSeverity::Critical, AlertSeverity::High]
        );
        assert_eq!(rule.filter.event_categories, vec!["Compliance"]);
    }

    #[test]
    fn test_unknown_severity_level_is_rejected() {
        let err = serde_json::from_value::<Vec<AlertSeverity>>(json!([9])).unwrap_err();
        assert!(err.to_string().contains("unknown alert severity level 9"));
    }

    #[test]
    fn test_new_rule_body() {
        let rule = AlertRule::new(
            "rule",
            vec!["TECHALLY_2".to_string()],
            vec![AlertSeverity::High],
        );
        assert_eq!(
            serde_json::to_value(&rule).unwrap(),
            json!({
                "type": "Event",
                "intgGuidList": ["TECHALLY_2"],
                "filters": {"name": "rule", "enabled": 1, "severity": [2]}
            })
        );
    }
}
