//! Access control types
//!
//! Core value types used by the authorization engine: roles, capability
//! keys and the principal that carries them.

use crate::error::RequirementError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Role identifier
///
/// Roles are compared case-insensitively; the stored value is always the
/// lowercase form. An empty role string does not produce a `Role`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Role(String);

impl Role {
    pub const ADMIN: &'static str = "admin";
    pub const HR: &'static str = "hr";

    /// Normalize a raw role string, returning `None` when it is empty
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.is_empty() {
            return None;
        }
        Some(Self(raw.to_lowercase()))
    }

    pub fn admin() -> Self {
        Self(Self::ADMIN.to_string())
    }

    pub fn hr() -> Self {
        Self(Self::HR.to_string())
    }

    /// Get the normalized role name
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_admin(&self) -> bool {
        self.0 == Self::ADMIN
    }

    /// Admin implicitly satisfies HR checks
    pub fn is_hr(&self) -> bool {
        self.0 == Self::HR || self.is_admin()
    }
}

impl TryFrom<String> for Role {
    type Error = RequirementError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Role::parse(&raw).ok_or(RequirementError::EmptyRole)
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.0
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A `(resource, action)` capability such as `("biometric", "read")`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PermissionKey {
    resource: String,
    action: String,
}

impl PermissionKey {
    /// Create a key without validation
    ///
    /// Keys with an empty resource or action are representable so that
    /// evaluation can report them as malformed rather than panic.
    pub fn new(resource: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            action: action.into(),
        }
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn is_well_formed(&self) -> bool {
        !self.resource.is_empty() && !self.action.is_empty()
    }

    /// Return an error if either half of the key is empty
    pub fn validate(&self) -> Result<(), RequirementError> {
        if self.is_well_formed() {
            Ok(())
        } else {
            Err(RequirementError::EmptyPermissionKey {
                resource: self.resource.clone(),
                action: self.action.clone(),
            })
        }
    }
}

impl FromStr for PermissionKey {
    type Err = RequirementError;

    /// Parse `resource:action`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (resource, action) = s
            .split_once(':')
            .ok_or_else(|| RequirementError::MalformedPermissionKey(s.to_string()))?;
        let key = PermissionKey::new(resource, action);
        key.validate()?;
        Ok(key)
    }
}

impl TryFrom<String> for PermissionKey {
    type Error = RequirementError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        raw.parse()
    }
}

impl From<PermissionKey> for String {
    fn from(key: PermissionKey) -> Self {
        key.to_string()
    }
}

impl fmt::Display for PermissionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.resource, self.action)
    }
}

/// The acting identity for one authorization check
///
/// Supplied by the authentication layer; the engine only ever reads it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Principal {
    id: Option<String>,
    role: Option<Role>,
    permissions: HashSet<PermissionKey>,
}

impl Principal {
    /// Create a principal from a raw role string
    pub fn new(role: &str) -> Self {
        Self {
            id: None,
            role: Role::parse(role),
            permissions: HashSet::new(),
        }
    }

    /// A principal with no role and no permissions; every check denies
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_permissions(mut self, keys: impl IntoIterator<Item = PermissionKey>) -> Self {
        self.permissions.extend(keys);
        self
    }

    pub fn with_permission(mut self, resource: &str, action: &str) -> Self {
        self.permissions.insert(PermissionKey::new(resource, action));
        self
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn role(&self) -> Option<&Role> {
        self.role.as_ref()
    }

    pub fn permissions(&self) -> &HashSet<PermissionKey> {
        &self.permissions
    }

    pub fn holds(&self, key: &PermissionKey) -> bool {
        self.permissions.contains(key)
    }

    /// Identifier used in log fields and denial messages
    pub fn subject(&self) -> &str {
        self.id
            .as_deref()
            .or(self.role.as_ref().map(Role::as_str))
            .unwrap_or("anonymous")
    }
}
