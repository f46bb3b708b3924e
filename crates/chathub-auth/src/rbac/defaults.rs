//! The built-in chat policy.

use std::collections::HashMap;

use chathub_entity::resource::{CONVERSATION, MESSAGE, USER};

use super::condition::{Condition, ValueDescriptor};
use super::policy::{Permission, PolicyDefinition, Preset, Role};

/// Preset: the resource was created by the subject.
pub const ACCESS_OWN: &str = "accessOwn";
/// Preset: the resource is the subject itself.
pub const ACCESS_SELF: &str = "accessSelf";

/// Role id of regular users.
pub const ROLE_USER: &str = "USER";
/// Role id of administrators.
pub const ROLE_ADMIN: &str = "ADMIN";
/// Role id of the seeded operator.
pub const ROLE_SUPER_ADMIN: &str = "SUPER_ADMIN";

/// Policy used when no policy file is configured.
///
/// | Role          | Parent | Grants                                                     |
/// |---------------|--------|------------------------------------------------------------|
/// | `USER`        |        | Message create/read/update/delete (own), Conversation create/read/delete (own), User read/update (self) |
/// | `ADMIN`       | USER   | User create/read/update/delete                             |
/// | `SUPER_ADMIN` | ADMIN  |                                                            |
pub fn default_policy() -> PolicyDefinition {
    let presets = HashMap::from([
        (
            ACCESS_OWN.to_string(),
            Preset {
                description: "Resource was created by the acting user".into(),
                conditions: vec![Condition::Equal {
                    id: "createdByEqualsSubject".into(),
                    left: ValueDescriptor::resource("created_by"),
                    right: ValueDescriptor::subject("id"),
                }],
            },
        ),
        (
            ACCESS_SELF.to_string(),
            Preset {
                description: "Resource is the acting user".into(),
                conditions: vec![Condition::Equal {
                    id: "idEqualsSubject".into(),
                    left: ValueDescriptor::resource("id"),
                    right: ValueDescriptor::subject("id"),
                }],
            },
        ),
    ]);

    let user = Role {
        description: "Regular chat user".into(),
        grants: HashMap::from([
            (
                MESSAGE.to_string(),
                vec![
                    Permission::new("create"),
                    Permission::with_preset("read", ACCESS_OWN),
                    Permission::with_preset("update", ACCESS_OWN),
                    Permission::with_preset("delete", ACCESS_OWN),
                ],
            ),
            (
                CONVERSATION.to_string(),
                vec![
                    Permission::new("create"),
                    Permission::new("read"),
                    Permission::with_preset("delete", ACCESS_OWN),
                ],
            ),
            (
                USER.to_string(),
                vec![
                    Permission::with_preset("read", ACCESS_SELF),
                    Permission::with_preset("update", ACCESS_SELF),
                ],
            ),
        ]),
        parents: Vec::new(),
    };

    let admin = Role {
        description: "Manages user accounts".into(),
        grants: HashMap::from([(
            USER.to_string(),
            ["create", "read", "update", "delete"]
                .into_iter()
                .map(Permission::new)
                .collect(),
        )]),
        parents: vec![ROLE_USER.to_string()],
    };

    let super_admin = Role {
        description: "Seeded operator account".into(),
        grants: HashMap::new(),
        parents: vec![ROLE_ADMIN.to_string()],
    };

    PolicyDefinition {
        presets,
        roles: HashMap::from([
            (ROLE_USER.to_string(), user),
            (ROLE_ADMIN.to_string(), admin),
            (ROLE_SUPER_ADMIN.to_string(), super_admin),
        ]),
    }
}
