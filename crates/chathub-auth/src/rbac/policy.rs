//! Static policy definition: presets, roles, and their grants.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::PolicyError;

use super::condition::Condition;

/// A reusable, named set of conditions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Conditions that must all hold.
    pub conditions: Vec<Condition>,
}

/// Permission to perform one action on a resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Permission {
    /// Action name, e.g. `"read"`.
    pub action: String,
    /// Preset whose conditions apply in addition to `conditions`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<String>,
    /// Conditions that must all hold.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
}

impl Permission {
    /// An unconditional permission.
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            preset: None,
            conditions: Vec::new(),
        }
    }

    /// A permission gated by a preset.
    pub fn with_preset(action: impl Into<String>, preset: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            preset: Some(preset.into()),
            conditions: Vec::new(),
        }
    }
}

/// A role: its own grants plus everything its parents grant.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Role {
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Permissions keyed by resource name.
    #[serde(default)]
    pub grants: HashMap<String, Vec<Permission>>,
    /// Roles whose grants this role inherits.
    #[serde(default)]
    pub parents: Vec<String>,
}

/// The complete policy: presets and roles keyed by id.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PolicyDefinition {
    /// Presets keyed by id.
    #[serde(default)]
    pub presets: HashMap<String, Preset>,
    /// Roles keyed by id.
    #[serde(default)]
    pub roles: HashMap<String, Role>,
}

impl PolicyDefinition {
    /// Read a policy from a `.json` or `.toml` file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PolicyError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| PolicyError::Load(format!("{}: {e}", path.display())))?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_str(&raw)
                .map_err(|e| PolicyError::Load(format!("{}: {e}", path.display()))),
            Some("toml") => {
                toml::from_str(&raw).map_err(|e| PolicyError::Load(format!("{}: {e}", path.display())))
            }
            _ => Err(PolicyError::Load(format!(
                "{}: expected a .json or .toml file",
                path.display()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOML_POLICY: &str = r#"
[presets.accessOwn]
description = "Owner only"

[[presets.accessOwn.conditions]]
type = "Equal"
id = "own"
left = { source = "resource", field = "created_by" }
right = { source = "subject", field = "id" }

[roles.READER]
grants = { Note = [{ action = "read" }, { action = "delete", preset = "accessOwn" }] }

[roles.EDITOR]
parents = ["READER"]
grants = { Note = [{ action = "update" }] }
"#;

    #[test]
    fn parses_toml_policy() {
        let policy: PolicyDefinition = toml::from_str(TOML_POLICY).unwrap();
        assert_eq!(policy.presets["accessOwn"].conditions.len(), 1);
        assert_eq!(policy.roles["EDITOR"].parents, vec!["READER".to_string()]);
        let reader_notes = &policy.roles["READER"].grants["Note"];
        assert_eq!(reader_notes[1].preset.as_deref(), Some("accessOwn"));
    }

    #[test]
    fn loads_from_file_by_extension() {
        let dir = std::env::temp_dir().join(format!("chathub-policy-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();

        let toml_path = dir.join("policy.toml");
        std::fs::write(&toml_path, TOML_POLICY).unwrap();
        let from_toml = PolicyDefinition::from_file(&toml_path).unwrap();

        let json_path = dir.join("policy.json");
        std::fs::write(&json_path, serde_json::to_string(&from_toml).unwrap()).unwrap();
        let from_json = PolicyDefinition::from_file(&json_path).unwrap();
        assert_eq!(from_toml, from_json);

        let yaml_path = dir.join("policy.yaml");
        std::fs::write(&yaml_path, "roles: {}").unwrap();
        assert!(matches!(
            PolicyDefinition::from_file(&yaml_path),
            Err(PolicyError::Load(_))
        ));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_file_is_a_load_error() {
        assert!(matches!(
            PolicyDefinition::from_file("/definitely/not/here.toml"),
            Err(PolicyError::Load(_))
        ));
    }
}
