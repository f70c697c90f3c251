//! Email recipients adapter
//!
//! Some API deployments return an email channel's recipients as one
//! comma-separated string instead of an array. Both shapes are accepted
//! here and always exposed as a list.

use serde::{Deserialize, Deserializer};

/// Recipients as found on the wire
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Recipients {
    List(Vec<String>),
    Csv(String),
}

impl Recipients {
    /// The recipients as a list. Arrays pass through unchanged; a string is
    /// split on commas, trimming whitespace and dropping empty entries.
    pub fn normalize(self) -> Vec<String> {
        match self {
            Recipients::List(list) => list,
            Recipients::Csv(csv) => csv
                .split(',')
                .map(str::trim)
                .filter(|address| !address.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }
}

/// `deserialize_with` helper producing the normalized list
pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Recipients>::deserialize(deserializer)
        .map(|recipients| recipients.map(Recipients::normalize).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Props {
        #[serde(default, deserialize_with = "deserialize")]
        recipients: Vec<String>,
    }

    fn parse(json: &str) -> Vec<String> {
        serde_json::from_str::<Props>(json).unwrap().recipients
    }

    #[test]
    fn test_string_is_split() {
        assert_eq!(
            parse(r#"{"recipients": "foo@example.com,bar@example.com"}"#),
            vec!["foo@example.com", "bar@example.com"]
        );
    }

    #[test]
    fn test_string_with_spaces_and_trailing_comma() {
        assert_eq!(
            parse(r#"{"recipients": " foo@example.com , bar@example.com,"}"#),
            vec!["foo@example.com", "bar@example.com"]
        );
    }

    #[test]
    fn test_array_is_unchanged() {
        assert_eq!(
            parse(r#"{"recipients": ["foo@example.com", "bar@example.com"]}"#),
            vec!["foo@example.com", "bar@example.com"]
        );
    }

    #[test]
    fn test_missing_or_null_is_empty() {
        assert!(parse("{}").is_empty());
        assert!(parse(r#"{"recipients": null}"#).is_empty());
    }
}
