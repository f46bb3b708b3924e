//! Access evaluation over a validated policy.

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::{debug, info};

use chathub_core::config::AccessConfig;
use chathub_core::traits::{Resource, Subject};

use crate::error::{AccessError, PolicyError};

use super::condition::Condition;
use super::defaults::default_policy;
use super::policy::PolicyDefinition;

/// A permission with its preset expanded, as seen by one role.
#[derive(Debug, Clone)]
struct EffectivePermission {
    action: String,
    conditions: Vec<Condition>,
    granted_by: String,
}

impl EffectivePermission {
    /// All conditions must hold. Stops at the first one that does not.
    fn holds(
        &self,
        instance: Option<&dyn Resource>,
        subject: &dyn Subject,
    ) -> Result<bool, AccessError> {
        for condition in &self.conditions {
            if !condition.evaluate(instance, subject)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// One row of a role's effective grants, for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrantSummary {
    /// Resource name.
    pub resource: String,
    /// Action name.
    pub action: String,
    /// Ids of the conditions attached (preset first).
    pub conditions: Vec<String>,
    /// Role in the closure that declares the grant.
    pub granted_by: String,
}

/// Answers access questions for a fixed, validated policy.
///
/// Role closures and preset expansion are computed once at construction;
/// evaluation afterwards only reads shared data.
#[derive(Debug, Clone)]
pub struct AccessManager {
    policy: PolicyDefinition,
    closures: HashMap<String, Vec<String>>,
    effective: HashMap<String, HashMap<String, Vec<EffectivePermission>>>,
}

impl AccessManager {
    /// Validate `policy` and compile it.
    ///
    /// Rejects unknown parents, inheritance cycles, unknown presets, and
    /// empty actions.
    pub fn new(policy: PolicyDefinition) -> Result<Self, PolicyError> {
        validate(&policy)?;

        let closures: HashMap<String, Vec<String>> = policy
            .roles
            .keys()
            .map(|id| (id.clone(), closure_of(&policy, id)))
            .collect();

        let effective = closures
            .iter()
            .map(|(id, closure)| (id.clone(), compile(&policy, closure)))
            .collect();

        info!(
            roles = policy.roles.len(),
            presets = policy.presets.len(),
            "Access policy loaded"
        );

        Ok(Self {
            policy,
            closures,
            effective,
        })
    }

    /// Load the configured policy file, or the built-in policy when none is set.
    pub fn from_config(config: &AccessConfig) -> Result<Self, PolicyError> {
        match &config.policy_file {
            Some(path) => {
                info!(path = %path, "Loading access policy from file");
                Self::new(PolicyDefinition::from_file(path)?)
            }
            None => Self::new(default_policy()),
        }
    }

    /// Whether `role` may perform `action` on `resource`.
    ///
    /// Permissions for the same action are alternatives; conditions within
    /// one permission must all hold. Without an `instance`, conditional
    /// permissions do not grant. A missing field is reported only if no
    /// other permission grants.
    pub fn is_granted(
        &self,
        role: &str,
        resource: &str,
        action: &str,
        instance: Option<&dyn Resource>,
        subject: &dyn Subject,
    ) -> Result<bool, AccessError> {
        let grants = self
            .effective
            .get(role)
            .ok_or_else(|| AccessError::UnknownRole(role.to_string()))?;

        let Some(permissions) = grants.get(resource) else {
            debug!(role, resource, action, "No grants for resource");
            return Ok(false);
        };

        let mut deferred: Option<AccessError> = None;
        for permission in permissions.iter().filter(|p| p.action == action) {
            match permission.holds(instance, subject) {
                Ok(true) => {
                    debug!(
                        role,
                        resource,
                        action,
                        granted_by = %permission.granted_by,
                        "Access granted"
                    );
                    return Ok(true);
                }
                Ok(false) => {}
                Err(e) => {
                    deferred.get_or_insert(e);
                }
            }
        }

        match deferred {
            Some(e) => Err(e),
            None => {
                debug!(role, resource, action, "Access denied");
                Ok(false)
            }
        }
    }

    /// Role ids, sorted.
    pub fn roles(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.closures.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// The role followed by all its ancestors, nearest first.
    pub fn closure(&self, role: &str) -> Option<&[String]> {
        self.closures.get(role).map(Vec::as_slice)
    }

    /// Effective grants of `role`, sorted by resource then action.
    pub fn effective_grants(&self, role: &str) -> Result<Vec<GrantSummary>, AccessError> {
        let grants = self
            .effective
            .get(role)
            .ok_or_else(|| AccessError::UnknownRole(role.to_string()))?;

        let mut rows: Vec<GrantSummary> = grants
            .iter()
            .flat_map(|(resource, permissions)| {
                permissions.iter().map(move |p| GrantSummary {
                    resource: resource.clone(),
                    action: p.action.clone(),
                    conditions: p.conditions.iter().map(|c| c.id().to_string()).collect(),
                    granted_by: p.granted_by.clone(),
                })
            })
            .collect();
        rows.sort_by(|a, b| (&a.resource, &a.action).cmp(&(&b.resource, &b.action)));
        Ok(rows)
    }

    /// The policy this manager was built from.
    pub fn policy(&self) -> &PolicyDefinition {
        &self.policy
    }
}

fn validate(policy: &PolicyDefinition) -> Result<(), PolicyError> {
    let mut ids: Vec<&String> = policy.roles.keys().collect();
    ids.sort();

    for id in &ids {
        let Some(role) = policy.roles.get(*id) else {
            continue;
        };
        for parent in &role.parents {
            if !policy.roles.contains_key(parent) {
                return Err(PolicyError::UnknownParent {
                    role: (*id).clone(),
                    parent: parent.clone(),
                });
            }
        }

        let mut resources: Vec<_> = role.grants.iter().collect();
        resources.sort_by_key(|(resource, _)| *resource);
        for (resource, permissions) in resources {
            for permission in permissions {
                if permission.action.trim().is_empty() {
                    return Err(PolicyError::EmptyAction {
                        role: (*id).clone(),
                        resource: resource.clone(),
                    });
                }
                if let Some(preset) = &permission.preset {
                    if !policy.presets.contains_key(preset) {
                        return Err(PolicyError::UnknownPreset {
                            role: (*id).clone(),
                            resource: resource.clone(),
                            preset: preset.clone(),
                        });
                    }
                }
            }
        }
    }

    let mut marks = HashMap::new();
    for id in ids {
        visit(policy, id, &mut marks)?;
    }
    Ok(())
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    InProgress,
    Done,
}

fn visit<'a>(
    policy: &'a PolicyDefinition,
    id: &'a str,
    marks: &mut HashMap<&'a str, Mark>,
) -> Result<(), PolicyError> {
    match marks.get(id) {
        Some(Mark::Done) => return Ok(()),
        Some(Mark::InProgress) => {
            return Err(PolicyError::Cycle {
                role: id.to_string(),
            });
        }
        None => {}
    }

    marks.insert(id, Mark::InProgress);
    if let Some(role) = policy.roles.get(id) {
        for parent in &role.parents {
            visit(policy, parent, marks)?;
        }
    }
    marks.insert(id, Mark::Done);
    Ok(())
}

fn closure_of(policy: &PolicyDefinition, id: &str) -> Vec<String> {
    let mut order = Vec::new();
    let mut seen = HashSet::new();
    let mut queue = VecDeque::from([id]);

    while let Some(current) = queue.pop_front() {
        if !seen.insert(current) {
            continue;
        }
        order.push(current.to_string());
        if let Some(role) = policy.roles.get(current) {
            queue.extend(role.parents.iter().map(String::as_str));
        }
    }
    order
}

fn compile(
    policy: &PolicyDefinition,
    closure: &[String],
) -> HashMap<String, Vec<EffectivePermission>> {
    let mut effective: HashMap<String, Vec<EffectivePermission>> = HashMap::new();

    for role_id in closure {
        let Some(role) = policy.roles.get(role_id) else {
            continue;
        };
        for (resource, permissions) in &role.grants {
            for permission in permissions {
                let mut conditions = permission
                    .preset
                    .as_ref()
                    .and_then(|preset| policy.presets.get(preset))
                    .map(|preset| preset.conditions.clone())
                    .unwrap_or_default();
                conditions.extend(permission.conditions.iter().cloned());

                effective
                    .entry(resource.clone())
                    .or_default()
                    .push(EffectivePermission {
                        action: permission.action.clone(),
                        conditions,
                        granted_by: role_id.clone(),
                    });
            }
        }
    }
    effective
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use uuid::Uuid;

    use chathub_core::types::FieldValue;
    use chathub_entity::{Conversation, Message, User, UserRole};

    use super::*;
    use crate::context::ContextUser;
    use crate::rbac::condition::ValueDescriptor;
    use crate::rbac::defaults::{ROLE_ADMIN, ROLE_SUPER_ADMIN, ROLE_USER};
    use crate::rbac::policy::{Permission, Role};

    fn subject(role: &str) -> ContextUser {
        ContextUser {
            id: Uuid::new_v4(),
            auth_uuid: Uuid::new_v4(),
            email: "someone@example.com".into(),
            role: role.to_string(),
        }
    }

    fn manager() -> AccessManager {
        AccessManager::new(default_policy()).unwrap()
    }

    fn role(parents: &[&str], grants: &[(&str, Vec<Permission>)]) -> Role {
        Role {
            description: String::new(),
            grants: grants
                .iter()
                .map(|(r, p)| (r.to_string(), p.clone()))
                .collect(),
            parents: parents.iter().map(|p| p.to_string()).collect(),
        }
    }

    #[test]
    fn builtin_roles_match_user_role_ids() {
        let access = manager();
        for r in [UserRole::User, UserRole::Admin, UserRole::SuperAdmin] {
            assert!(access.closure(r.as_str()).is_some(), "{r} missing");
        }
        assert_eq!(access.roles(), vec![ROLE_ADMIN, ROLE_SUPER_ADMIN, ROLE_USER]);
    }

    #[test]
    fn closure_lists_nearest_first() {
        let access = manager();
        assert_eq!(
            access.closure(ROLE_SUPER_ADMIN).unwrap(),
            &["SUPER_ADMIN".to_string(), "ADMIN".into(), "USER".into()]
        );
    }

    #[test]
    fn inherited_grants_apply_to_descendants() {
        let access = manager();
        for role in [ROLE_USER, ROLE_ADMIN, ROLE_SUPER_ADMIN] {
            let me = subject(role);
            assert!(access.is_granted(role, "Message", "create", None, &me).unwrap());
        }
        let admin = subject(ROLE_ADMIN);
        assert!(access.is_granted(ROLE_SUPER_ADMIN, "User", "delete", None, &admin).unwrap());
        assert!(!access
            .is_granted(ROLE_USER, "User", "delete", None, &subject(ROLE_USER))
            .unwrap());
    }

    #[test]
    fn ownership_condition_checks_creator() {
        let access = manager();
        let me = subject(ROLE_USER);
        let conv = Conversation::new(me.id, vec![]);
        let mine = Message::new(conv.id, me.id, "hi");
        let theirs = Message::new(conv.id, Uuid::new_v4(), "hello");

        assert!(access.is_granted(ROLE_USER, "Message", "update", Some(&mine), &me).unwrap());
        assert!(!access.is_granted(ROLE_USER, "Message", "update", Some(&theirs), &me).unwrap());
        assert!(access.is_granted(ROLE_USER, "Conversation", "delete", Some(&conv), &me).unwrap());
    }

    #[test]
    fn conditional_grant_without_instance_denies() {
        let access = manager();
        let me = subject(ROLE_USER);
        assert!(!access.is_granted(ROLE_USER, "Message", "read", None, &me).unwrap());
        assert!(!access.is_granted(ROLE_USER, "User", "read", None, &me).unwrap());
    }

    #[test]
    fn unconditional_inherited_grant_beats_conditional_one() {
        let access = manager();
        let admin = subject(ROLE_ADMIN);
        let other = User::create(chathub_entity::user::NewUser {
            email: "other@example.com".into(),
            password_hash: String::new(),
            first_name: "O".into(),
            last_name: "T".into(),
            role: UserRole::User,
        });
        assert!(access.is_granted(ROLE_ADMIN, "User", "update", Some(&other), &admin).unwrap());
        let user = subject(ROLE_USER);
        assert!(!access.is_granted(ROLE_USER, "User", "update", Some(&other), &user).unwrap());
    }

    #[test]
    fn self_preset_grants_on_own_record() {
        let access = manager();
        let account = User::create(chathub_entity::user::NewUser {
            email: "me@example.com".into(),
            password_hash: String::new(),
            first_name: "M".into(),
            last_name: "E".into(),
            role: UserRole::User,
        });
        let me = ContextUser {
            id: account.id,
            auth_uuid: Uuid::new_v4(),
            email: account.email.clone(),
            role: ROLE_USER.into(),
        };
        assert!(access.is_granted(ROLE_USER, "User", "read", Some(&account), &me).unwrap());
    }

    #[test]
    fn unknown_role_is_an_error() {
        let access = manager();
        let err = access
            .is_granted("GUEST", "Message", "read", None, &subject("GUEST"))
            .unwrap_err();
        assert_eq!(err, AccessError::UnknownRole("GUEST".into()));
    }

    #[test]
    fn missing_field_surfaces_only_when_nothing_grants() {
        let broken = Permission {
            action: "read".into(),
            preset: None,
            conditions: vec![Condition::Equal {
                id: "broken".into(),
                left: ValueDescriptor::resource("owner_id"),
                right: ValueDescriptor::subject("id"),
            }],
        };
        let only_broken = PolicyDefinition {
            presets: HashMap::new(),
            roles: HashMap::from([(
                "R".to_string(),
                role(&[], &[("Message", vec![broken.clone()])]),
            )]),
        };
        let with_fallback = PolicyDefinition {
            presets: HashMap::new(),
            roles: HashMap::from([(
                "R".to_string(),
                role(&[], &[("Message", vec![broken, Permission::new("read")])]),
            )]),
        };

        let me = subject("R");
        let msg = Message::new(Uuid::new_v4(), me.id, "x");

        let err = AccessManager::new(only_broken)
            .unwrap()
            .is_granted("R", "Message", "read", Some(&msg), &me)
            .unwrap_err();
        assert!(matches!(err, AccessError::MissingField { side: "resource", .. }));

        assert!(AccessManager::new(with_fallback)
            .unwrap()
            .is_granted("R", "Message", "read", Some(&msg), &me)
            .unwrap());
    }

    #[test]
    fn explicit_conditions_combine_with_preset() {
        let mut policy = default_policy();
        policy.roles.insert(
            "MODERATOR".into(),
            role(
                &[],
                &[(
                    "Message",
                    vec![Permission {
                        action: "delete".into(),
                        preset: Some("accessOwn".into()),
                        conditions: vec![Condition::Equal {
                            id: "isModerator".into(),
                            left: ValueDescriptor::subject("role"),
                            right: ValueDescriptor::Explicit {
                                value: FieldValue::Str("MODERATOR".into()),
                            },
                        }],
                    }],
                )],
            ),
        );
        let access = AccessManager::new(policy).unwrap();
        let moderator = subject("MODERATOR");
        let own = Message::new(Uuid::new_v4(), moderator.id, "x");
        assert!(access
            .is_granted("MODERATOR", "Message", "delete", Some(&own), &moderator)
            .unwrap());

        let rows = access.effective_grants("MODERATOR").unwrap();
        assert_eq!(rows[0].conditions, vec!["createdByEqualsSubject", "isModerator"]);
    }

    #[test]
    fn unknown_parent_is_rejected() {
        let policy = PolicyDefinition {
            presets: HashMap::new(),
            roles: HashMap::from([("A".to_string(), role(&["GHOST"], &[]))]),
        };
        assert_eq!(
            AccessManager::new(policy).unwrap_err(),
            PolicyError::UnknownParent {
                role: "A".into(),
                parent: "GHOST".into()
            }
        );
    }

    #[test]
    fn cycle_is_rejected() {
        let policy = PolicyDefinition {
            presets: HashMap::new(),
            roles: HashMap::from([
                ("A".to_string(), role(&["B"], &[])),
                ("B".to_string(), role(&["C"], &[])),
                ("C".to_string(), role(&["A"], &[])),
            ]),
        };
        assert!(matches!(
            AccessManager::new(policy),
            Err(PolicyError::Cycle { .. })
        ));
    }

    #[test]
    fn self_parent_is_a_cycle() {
        let policy = PolicyDefinition {
            presets: HashMap::new(),
            roles: HashMap::from([("A".to_string(), role(&["A"], &[]))]),
        };
        assert_eq!(
            AccessManager::new(policy).unwrap_err(),
            PolicyError::Cycle { role: "A".into() }
        );
    }

    #[test]
    fn diamond_inheritance_is_not_a_cycle() {
        let policy = PolicyDefinition {
            presets: HashMap::new(),
            roles: HashMap::from([
                ("BASE".to_string(), role(&[], &[("Doc", vec![Permission::new("read")])])),
                ("LEFT".to_string(), role(&["BASE"], &[])),
                ("RIGHT".to_string(), role(&["BASE"], &[])),
                ("TOP".to_string(), role(&["LEFT", "RIGHT"], &[])),
            ]),
        };
        let access = AccessManager::new(policy).unwrap();
        assert_eq!(access.closure("TOP").unwrap().len(), 4);
        assert_eq!(access.effective_grants("TOP").unwrap().len(), 1);
    }

    #[test]
    fn unknown_preset_is_rejected() {
        let policy = PolicyDefinition {
            presets: HashMap::new(),
            roles: HashMap::from([(
                "A".to_string(),
                role(&[], &[("Doc", vec![Permission::with_preset("read", "nope")])]),
            )]),
        };
        assert!(matches!(
            AccessManager::new(policy),
            Err(PolicyError::UnknownPreset { .. })
        ));
    }

    #[test]
    fn empty_action_is_rejected() {
        let policy = PolicyDefinition {
            presets: HashMap::new(),
            roles: HashMap::from([(
                "A".to_string(),
                role(&[], &[("Doc", vec![Permission::new(" ")])]),
            )]),
        };
        assert!(matches!(
            AccessManager::new(policy),
            Err(PolicyError::EmptyAction { .. })
        ));
    }

    #[test]
    fn from_config_defaults_to_builtin_policy() {
        let access = AccessManager::from_config(&AccessConfig::default()).unwrap();
        assert_eq!(access.policy(), &default_policy());
    }
}
