//! Permission evaluator
//!
//! Answers individual questions about a principal: may it visit a path,
//! does it hold a capability, is it an admin. Every method is total and
//! pure given its inputs; a `false` result is a normal denial.

use crate::access_control::policy::RolePolicyTable;
use crate::access_control::requirement::RoleRequirement;
use crate::access_control::types::{PermissionKey, Principal};
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Evaluates principals against a shared, immutable policy table
#[derive(Debug, Clone)]
pub struct PermissionEvaluator {
    policy: Arc<RolePolicyTable>,
}

impl PermissionEvaluator {
    pub fn new(policy: Arc<RolePolicyTable>) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &RolePolicyTable {
        &self.policy
    }

    /// Check whether the principal's role grants access to a route
    ///
    /// Unknown roles, principals without a role and roles with no patterns
    /// are all denied.
    pub fn is_authorized_for_path(&self, principal: &Principal, path: &str) -> bool {
        let Some(role) = principal.role() else {
            trace!(path, "No role on principal, denying path");
            return false;
        };

        debug!(role = %role, path, "Checking path access");

        let Some(matcher) = self.policy.matcher_for(role) else {
            trace!(role = %role, "Role not present in policy table");
            return false;
        };

        match matcher.find_match(path) {
            Some(pattern) => {
                trace!(role = %role, pattern, "Matched path pattern");
                true
            }
            None => false,
        }
    }

    /// Check whether the principal holds a capability
    pub fn has_permission(&self, principal: &Principal, key: &PermissionKey) -> bool {
        if !key.is_well_formed() {
            warn!(
                key = %key,
                "Malformed permission key in check, treating as denied"
            );
            return false;
        }
        principal.holds(key)
    }

    /// Ad hoc `(resource, action)` form of [`has_permission`](Self::has_permission)
    pub fn can(&self, principal: &Principal, resource: &str, action: &str) -> bool {
        self.has_permission(principal, &PermissionKey::new(resource, action))
    }

    /// True iff `keys` is non-empty and at least one key is held
    pub fn has_any_permission(&self, principal: &Principal, keys: &[PermissionKey]) -> bool {
        keys.iter().any(|k| self.has_permission(principal, k))
    }

    /// True iff every key is held; an empty list is trivially satisfied
    pub fn has_all_permissions(&self, principal: &Principal, keys: &[PermissionKey]) -> bool {
        keys.iter().all(|k| self.has_permission(principal, k))
    }

    pub fn is_admin(&self, principal: &Principal) -> bool {
        principal.role().is_some_and(|r| r.is_admin())
    }

    /// Admins are HR as well; HR is not admin
    pub fn is_hr(&self, principal: &Principal) -> bool {
        principal.role().is_some_and(|r| r.is_hr())
    }

    /// Check a role requirement
    ///
    /// All branches compare normalized (lowercase) role names.
    pub fn satisfies_role_requirement(
        &self,
        principal: &Principal,
        requirement: &RoleRequirement,
    ) -> bool {
        match requirement {
            RoleRequirement::IsAdmin => self.is_admin(principal),
            RoleRequirement::IsHr => self.is_hr(principal),
            RoleRequirement::Exact(role) => principal.role() == Some(role),
            RoleRequirement::OneOf(roles) => principal.role().is_some_and(|r| roles.contains(r)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evaluator() -> PermissionEvaluator {
        let table = RolePolicyTable::new([
            ("admin", vec!["/employees", "/settings/*"]),
            ("employee", vec![]),
        ])
        .unwrap();
        PermissionEvaluator::new(Arc::new(table))
    }

    #[test]
    fn test_path_scenario() {
        let eval = evaluator();
        assert!(eval.is_authorized_for_path(&Principal::new("admin"), "/settings/profile"));
        assert!(!eval.is_authorized_for_path(&Principal::new("employee"), "/employees"));
        assert!(!eval.is_authorized_for_path(&Principal::new("guest"), "/employees"));
    }

    #[test]
    fn test_path_role_is_case_insensitive() {
        let eval = evaluator();
        assert!(eval.is_authorized_for_path(&Principal::new("Admin"), "/employees"));
        assert!(eval.is_authorized_for_path(&Principal::new("ADMIN"), "/employees/"));
    }

    #[test]
    fn test_anonymous_principal_denied_everything() {
        let eval = evaluator();
        let anon = Principal::anonymous();
        assert!(!eval.is_authorized_for_path(&anon, "/employees"));
        assert!(!eval.can(&anon, "biometric", "read"));
        assert!(!eval.is_admin(&anon));
        assert!(!eval.is_hr(&anon));
    }

    #[test]
    fn test_has_permission() {
        let eval = evaluator();
        let p = Principal::new("employee").with_permission("biometric", "read");
        assert!(eval.has_permission(&p, &PermissionKey::new("biometric", "read")));
        assert!(!eval.has_permission(&p, &PermissionKey::new("biometric", "write")));
        assert!(eval.can(&p, "biometric", "read"));
    }

    #[test]
    fn test_malformed_key_is_denied() {
        let eval = evaluator();
        let p = Principal::new("employee").with_permission("", "read");
        assert!(!eval.has_permission(&p, &PermissionKey::new("", "read")));
        assert!(!eval.has_all_permissions(&p, &[PermissionKey::new("", "read")]));
    }

    #[test]
    fn test_any_and_all_with_empty_lists() {
        let eval = evaluator();
        let p = Principal::new("admin").with_permission("leave", "approve");
        assert!(!eval.has_any_permission(&p, &[]));
        assert!(eval.has_all_permissions(&p, &[]));
        assert!(eval.has_all_permissions(&Principal::anonymous(), &[]));
    }

    #[test]
    fn test_any_and_all() {
        let eval = evaluator();
        let p = Principal::new("hr")
            .with_permission("leave", "read")
            .with_permission("leave", "approve");
        let read = PermissionKey::new("leave", "read");
        let approve = PermissionKey::new("leave", "approve");
        let delete = PermissionKey::new("leave", "delete");

        assert!(eval.has_any_permission(&p, &[delete.clone(), read.clone()]));
        assert!(!eval.has_any_permission(&p, std::slice::from_ref(&delete)));
        assert!(eval.has_all_permissions(&p, &[read.clone(), approve]));
        assert!(!eval.has_all_permissions(&p, &[read, delete]));
    }

    #[test]
    fn test_role_requirement_variants() {
        let eval = evaluator();
        let admin = Principal::new("admin");
        let hr = Principal::new("hr");
        let manager = Principal::new("Manager");

        assert!(eval.satisfies_role_requirement(&admin, &RoleRequirement::IsHr));
        assert!(eval.satisfies_role_requirement(&hr, &RoleRequirement::IsHr));
        assert!(!eval.satisfies_role_requirement(&hr, &RoleRequirement::IsAdmin));

        let exact = RoleRequirement::exact("manager").unwrap();
        assert!(eval.satisfies_role_requirement(&manager, &exact));
        assert!(!eval.satisfies_role_requirement(&hr, &exact));
    }

    #[test]
    fn test_one_of_compares_normalized_roles() {
        // Mixed-case principals satisfy lowercase role lists
        let eval = evaluator();
        let req = RoleRequirement::one_of(["hr", "manager"]).unwrap();
        assert!(eval.satisfies_role_requirement(&Principal::new("HR"), &req));
        assert!(eval.satisfies_role_requirement(&Principal::new("Manager"), &req));
        assert!(!eval.satisfies_role_requirement(&Principal::new("employee"), &req));
        assert!(!eval.satisfies_role_requirement(&Principal::anonymous(), &req));
    }
}
