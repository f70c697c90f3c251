//! Agent access tokens (`v2/AgentAccessTokens`)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentAccessToken {
    pub access_token: String,
    pub created_time: DateTime<Utc>,
    #[serde(default)]
    pub props: AgentAccessTokenProps,
    pub token_alias: String,
    #[serde(rename = "tokenEnabled")]
    pub enabled: u8,
    #[serde(default)]
    pub version: String,
}

impl AgentAccessToken {
    pub fn is_enabled(&self) -> bool {
        self.enabled == 1
    }

    pub fn pretty_state(&self) -> &'static str {
        if self.is_enabled() {
            "Enabled"
        } else {
            "Disabled"
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentAccessTokenProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Body of create and update calls
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentAccessTokenRequest {
    #[serde(rename = "tokenEnabled")]
    pub enabled: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_alias: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub props: Option<AgentAccessTokenProps>,
}

impl AgentAccessTokenRequest {
    /// Request creating an enabled token
    pub fn new(alias: impl Into<String>, description: impl Into<String>) -> Self {
        let description = description.into();
        Self {
            enabled: 1,
            token_alias: Some(alias.into()),
            props: Some(AgentAccessTokenProps {
                created_time: None,
                description: (!description.is_empty()).then_some(description),
            }),
        }
    }

    /// Request touching only the enabled flag
    pub fn state(enabled: bool) -> Self {
        Self {
            enabled: u8::from(enabled),
            ..Default::default()
        }
    }
}

/// Search body: every filter must match
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchFilter {
    pub filters: Vec<Filter>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Filter {
    pub field: String,
    pub expression: String,
    pub value: String,
}

impl SearchFilter {
    /// Single `field eq value` filter
    pub fn equals(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            filters: vec![Filter {
                field: field.into(),
                expression: "eq".to_string(),
                value: value.into(),
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_token() {
        let token: AgentAccessToken = serde_json::from_value(json!({
            "accessToken": "0123456789ABCDEF",
            "createdTime": "2021-06-01T18:10:40.745Z",
            "props": {"createdTime": "2021-06-01T18:10:40.745Z", "description": "k8s"},
            "tokenAlias": "k8s-deployment",
            "tokenEnabled": 1,
            "version": "1.0"
        }))
        .unwrap();
        assert!(token.is_enabled());
        assert_eq!(token.pretty_state(), "Enabled");
        assert_eq!(token.props.description.as_deref(), Some("k8s"));
    }

    #[test]
    fn test_state_request_only_sends_flag() {
        assert_eq!(
            serde_json::to_value(AgentAccessTokenRequest::state(false)).unwrap(),
            json!({"tokenEnabled": 0})
        );
    }

    #[test]
    fn test_search_filter() {
        assert_eq!(
            serde_json::to_value(SearchFilter::equals("tokenAlias", "k8s")).unwrap(),
            json!({"filters": [{"field": "tokenAlias", "expression": "eq", "value": "k8s"}]})
        );
    }
}
