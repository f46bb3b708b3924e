//! Access policy source configuration.

use serde::{Deserialize, Serialize};

/// Where the role/permission policy is loaded from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccessConfig {
    /// Path to a TOML or JSON policy file. The built-in policy is used when unset.
    #[serde(default)]
    pub policy_file: Option<String>,
}
