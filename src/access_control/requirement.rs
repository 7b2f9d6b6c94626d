//! Access requirements
//!
//! Declarations attached to guarded operations. A requirement is made of up
//! to four clauses, all of which must pass:
//! role, any-of capabilities, all-of capabilities and route path.

use crate::access_control::types::{PermissionKey, Role};
use crate::error::RequirementError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Role clause
///
/// Serialized in externally tagged form: `"is_admin"`, `"is_hr"`,
/// `{ exact = "manager" }` or `{ one_of = ["hr", "manager"] }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleRequirement {
    /// Principal's role equals this role
    Exact(Role),
    /// Principal's role is one of these roles
    OneOf(Vec<Role>),
    /// Principal is an admin
    IsAdmin,
    /// Principal is HR or admin
    IsHr,
}

impl RoleRequirement {
    pub fn exact(role: &str) -> Result<Self, RequirementError> {
        Role::parse(role)
            .map(RoleRequirement::Exact)
            .ok_or(RequirementError::EmptyRole)
    }

    pub fn one_of<I, S>(roles: I) -> Result<Self, RequirementError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let roles = roles
            .into_iter()
            .map(|r| Role::parse(r.as_ref()).ok_or(RequirementError::EmptyRole))
            .collect::<Result<Vec<_>, _>>()?;

        if roles.is_empty() {
            return Err(RequirementError::EmptyRoleList);
        }
        Ok(RoleRequirement::OneOf(roles))
    }

    pub fn validate(&self) -> Result<(), RequirementError> {
        match self {
            RoleRequirement::OneOf(roles) if roles.is_empty() => {
                Err(RequirementError::EmptyRoleList)
            }
            _ => Ok(()),
        }
    }
}

impl fmt::Display for RoleRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoleRequirement::Exact(role) => write!(f, "role {}", role),
            RoleRequirement::OneOf(roles) => {
                let names: Vec<&str> = roles.iter().map(Role::as_str).collect();
                write!(f, "one of roles [{}]", names.join(", "))
            }
            RoleRequirement::IsAdmin => write!(f, "admin"),
            RoleRequirement::IsHr => write!(f, "hr or admin"),
        }
    }
}

/// Identifies which clause of a requirement decided a denial
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Clause {
    Role,
    AnyOf,
    AllOf,
    Path,
}

impl Clause {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Clause::Role => "role",
            Clause::AnyOf => "any_of",
            Clause::AllOf => "all_of",
            Clause::Path => "path",
        }
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Access requirement for one guarded operation or route
///
/// Assemble with the `with_*` methods and finish with [`build`](Self::build)
/// at setup time so an empty or malformed requirement fails early.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessRequirement {
    role: Option<RoleRequirement>,
    any_of: Option<Vec<PermissionKey>>,
    all_of: Option<Vec<PermissionKey>>,
    path: Option<String>,
}

impl AccessRequirement {
    /// Start an empty requirement (not valid until a clause is added)
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_role(mut self, role: RoleRequirement) -> Self {
        self.role = Some(role);
        self
    }

    pub fn with_any_of(mut self, keys: impl IntoIterator<Item = PermissionKey>) -> Self {
        self.any_of = Some(keys.into_iter().collect());
        self
    }

    pub fn with_all_of(mut self, keys: impl IntoIterator<Item = PermissionKey>) -> Self {
        self.all_of = Some(keys.into_iter().collect());
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Validate and return the requirement
    pub fn build(self) -> Result<Self, RequirementError> {
        self.validate()?;
        Ok(self)
    }

    /// Check that at least one clause is present and every clause is well formed
    ///
    /// An empty `all_of` on its own passes for any principal, so it is
    /// rejected unless another clause constrains the requirement.
    pub fn validate(&self) -> Result<(), RequirementError> {
        if self.is_empty() {
            return Err(RequirementError::NoClauses);
        }

        if self.is_vacuous() {
            return Err(RequirementError::EmptyKeyList);
        }

        if let Some(role) = &self.role {
            role.validate()?;
        }

        for key in self.any_of.iter().chain(self.all_of.iter()).flatten() {
            key.validate()?;
        }

        if self.path.as_deref() == Some("") {
            return Err(RequirementError::EmptyPath);
        }

        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.role.is_none() && self.any_of.is_none() && self.all_of.is_none() && self.path.is_none()
    }

    fn is_vacuous(&self) -> bool {
        self.role.is_none()
            && self.any_of.is_none()
            && self.path.is_none()
            && self.all_of.as_ref().is_some_and(Vec::is_empty)
    }

    pub fn role(&self) -> Option<&RoleRequirement> {
        self.role.as_ref()
    }

    pub fn any_of(&self) -> Option<&[PermissionKey]> {
        self.any_of.as_deref()
    }

    pub fn all_of(&self) -> Option<&[PermissionKey]> {
        self.all_of.as_deref()
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Present clauses in evaluation order
    pub fn clauses(&self) -> Vec<Clause> {
        [
            self.role.as_ref().map(|_| Clause::Role),
            self.any_of.as_ref().map(|_| Clause::AnyOf),
            self.all_of.as_ref().map(|_| Clause::AllOf),
            self.path.as_ref().map(|_| Clause::Path),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_requirement_rejected() {
        assert_eq!(
            AccessRequirement::new().build(),
            Err(RequirementError::NoClauses)
        );
    }

    #[test]
    fn test_empty_key_rejected() {
        let result = AccessRequirement::new()
            .with_any_of([PermissionKey::new("biometric", "")])
            .build();
        assert!(matches!(
            result,
            Err(RequirementError::EmptyPermissionKey { .. })
        ));

        let result = AccessRequirement::new()
            .with_role(RoleRequirement::IsHr)
            .with_all_of([PermissionKey::new("", "read")])
            .build();
        assert!(matches!(
            result,
            Err(RequirementError::EmptyPermissionKey { .. })
        ));
    }

    #[test]
    fn test_empty_all_of_alone_rejected() {
        let result = AccessRequirement::new().with_all_of(Vec::new()).build();
        assert_eq!(result, Err(RequirementError::EmptyKeyList));

        // Alongside another clause it is a no-op, not a loophole
        let result = AccessRequirement::new()
            .with_role(RoleRequirement::IsHr)
            .with_all_of(Vec::new())
            .build();
        assert!(result.is_ok());

        // An empty any_of can never pass, so it stays valid
        let result = AccessRequirement::new().with_any_of(Vec::new()).build();
        assert!(result.is_ok());
    }

    #[test]
    fn test_empty_path_rejected() {
        let result = AccessRequirement::new().with_path("").build();
        assert_eq!(result, Err(RequirementError::EmptyPath));
    }

    #[test]
    fn test_clauses_in_evaluation_order() {
        let req = AccessRequirement::new()
            .with_path("/leave")
            .with_all_of([PermissionKey::new("leave", "read")])
            .with_role(RoleRequirement::IsHr)
            .build()
            .unwrap();
        assert_eq!(req.clauses(), vec![Clause::Role, Clause::AllOf, Clause::Path]);
    }

    #[test]
    fn test_role_requirement_constructors() {
        assert_eq!(RoleRequirement::exact(""), Err(RequirementError::EmptyRole));
        assert_eq!(
            RoleRequirement::one_of(Vec::<&str>::new()),
            Err(RequirementError::EmptyRoleList)
        );
        assert_eq!(
            RoleRequirement::one_of(["HR", "Manager"]).unwrap(),
            RoleRequirement::OneOf(vec![
                Role::parse("hr").unwrap(),
                Role::parse("manager").unwrap()
            ])
        );
    }

    #[test]
    fn test_role_requirement_deserialize() {
        let req: RoleRequirement = serde_json::from_str(r#""is_admin""#).unwrap();
        assert_eq!(req, RoleRequirement::IsAdmin);

        let req: RoleRequirement = serde_json::from_str(r#""is_hr""#).unwrap();
        assert_eq!(req, RoleRequirement::IsHr);

        let req: RoleRequirement = serde_json::from_str(r#"{"exact":"Manager"}"#).unwrap();
        assert_eq!(req, RoleRequirement::exact("manager").unwrap());

        let req: RoleRequirement = serde_json::from_str(r#"{"one_of":["hr","admin"]}"#).unwrap();
        assert_eq!(req, RoleRequirement::one_of(["hr", "admin"]).unwrap());

        assert!(serde_json::from_str::<RoleRequirement>(r#"{"exact":""}"#).is_err());
    }
}
