//! Attribute conditions attached to permissions.

use serde::{Deserialize, Serialize};

use chathub_core::traits::{Resource, Subject};
use chathub_core::types::FieldValue;

use crate::error::AccessError;

/// Where a compared value comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum ValueDescriptor {
    /// A field of the resource instance being accessed.
    Resource {
        /// Field name.
        field: String,
    },
    /// A field of the acting subject.
    Subject {
        /// Field name.
        field: String,
    },
    /// A literal value.
    Explicit {
        /// The value.
        value: FieldValue,
    },
}

impl ValueDescriptor {
    /// Shorthand for a resource field.
    pub fn resource(field: impl Into<String>) -> Self {
        Self::Resource {
            field: field.into(),
        }
    }

    /// Shorthand for a subject field.
    pub fn subject(field: impl Into<String>) -> Self {
        Self::Subject {
            field: field.into(),
        }
    }

    /// Resolve to a value. `Ok(None)` means the value refers to a resource
    /// instance and none was supplied.
    fn resolve(
        &self,
        instance: Option<&dyn Resource>,
        subject: &dyn Subject,
    ) -> Result<Option<FieldValue>, AccessError> {
        match self {
            Self::Resource { field } => match instance {
                None => Ok(None),
                Some(resource) => resource.field(field).map(Some).ok_or_else(|| {
                    AccessError::MissingField {
                        side: "resource",
                        field: field.clone(),
                    }
                }),
            },
            Self::Subject { field } => {
                subject
                    .field(field)
                    .map(Some)
                    .ok_or_else(|| AccessError::MissingField {
                        side: "subject",
                        field: field.clone(),
                    })
            }
            Self::Explicit { value } => Ok(Some(value.clone())),
        }
    }
}

/// A predicate over subject and resource attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Condition {
    /// Holds when both sides are equal.
    Equal {
        /// Identifier used in logs.
        #[serde(default)]
        id: String,
        /// Left operand.
        left: ValueDescriptor,
        /// Right operand.
        right: ValueDescriptor,
    },
    /// Holds when the sides differ.
    NotEqual {
        /// Identifier used in logs.
        #[serde(default)]
        id: String,
        /// Left operand.
        left: ValueDescriptor,
        /// Right operand.
        right: ValueDescriptor,
    },
}

impl Condition {
    /// Identifier of the condition, possibly empty.
    pub fn id(&self) -> &str {
        match self {
            Self::Equal { id, .. } | Self::NotEqual { id, .. } => id,
        }
    }

    /// Evaluate against an optional resource instance.
    ///
    /// With no instance, any condition reading a resource field is false:
    /// it cannot hold for every instance.
    pub fn evaluate(
        &self,
        instance: Option<&dyn Resource>,
        subject: &dyn Subject,
    ) -> Result<bool, AccessError> {
        let (left, right, negate) = match self {
            Self::Equal { left, right, .. } => (left, right, false),
            Self::NotEqual { left, right, .. } => (left, right, true),
        };
        let (Some(l), Some(r)) = (
            left.resolve(instance, subject)?,
            right.resolve(instance, subject)?,
        ) else {
            return Ok(false);
        };
        Ok(l.matches(&r) != negate)
    }
}
