//! Feature flags enabled for the account (`v2/FeatureFlags`)

use serde::{Deserialize, Serialize};

/// Flags matching a prefix query
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureFlags {
    #[serde(default)]
    pub flags: Vec<String>,
}

impl FeatureFlags {
    pub fn contains(&self, flag: &str) -> bool {
        self.flags.iter().any(|enabled| enabled == flag)
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}
