//! Attribute values compared by access conditions.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A typed attribute value read from a subject, a resource, or a literal.
///
/// Literal values come from policy files, where identifiers are written as
/// strings; [`FieldValue::matches`] therefore treats a UUID and its canonical
/// string form as equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// UUID value.
    Uuid(Uuid),
    /// String value.
    Str(String),
}

impl FieldValue {
    /// Loose equality used by `Equal`/`NotEqual` conditions.
    pub fn matches(&self, other: &FieldValue) -> bool {
        match (self, other) {
            (Self::Uuid(a), Self::Str(b)) | (Self::Str(b), Self::Uuid(a)) => {
                Uuid::parse_str(b).is_ok_and(|parsed| parsed == *a)
            }
            _ => self == other,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Uuid(v) => write!(f, "{v}"),
            Self::Str(v) => f.write_str(v),
        }
    }
}

impl From<Uuid> for FieldValue {
    fn from(value: Uuid) -> Self {
        Self::Uuid(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuid_matches_its_string_form() {
        let id = Uuid::new_v4();
        assert!(FieldValue::Uuid(id).matches(&FieldValue::Str(id.to_string())));
        assert!(FieldValue::Str(id.to_string()).matches(&FieldValue::Uuid(id)));
        assert!(!FieldValue::Uuid(id).matches(&FieldValue::Str("nope".into())));
    }

    #[test]
    fn different_variants_do_not_match() {
        assert!(!FieldValue::Int(1).matches(&FieldValue::Str("1".into())));
        assert!(!FieldValue::Bool(true).matches(&FieldValue::Int(1)));
    }

    #[test]
    fn literals_deserialize_untagged() {
        let v: FieldValue = serde_json::from_str("true").unwrap();
        assert_eq!(v, FieldValue::Bool(true));
        let v: FieldValue = serde_json::from_str("7").unwrap();
        assert_eq!(v, FieldValue::Int(7));
        let v: FieldValue = serde_json::from_str("\"ADMIN\"").unwrap();
        assert_eq!(v, FieldValue::Str("ADMIN".into()));
    }
}
