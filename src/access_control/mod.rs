//! Access control module
//!
//! Deny-by-default authorization for roles, capabilities and routes.
//!
//! ## Access Control Model
//!
//! A [`Principal`] carries exactly one role and a set of
//! `(resource, action)` capabilities. Questions about it are answered by:
//!
//! 1. **Path patterns** - the [`RolePolicyTable`] maps each role to route
//!    patterns; a path is allowed iff any pattern for the role matches it
//! 2. **Capabilities** - explicit [`PermissionKey`] membership checks
//!    (`has_permission`, `has_any_permission`, `has_all_permissions`)
//! 3. **Role predicates** - `is_admin`, `is_hr` (admin implies HR)
//!
//! An [`AccessGuard`] combines these for an [`AccessRequirement`]; every
//! clause present must pass. Unknown roles, missing principals and
//! requirements with no clauses are denied.
//!
//! ## Example Configuration
//!
//! ```toml
//! [[policy.roles]]
//! name = "admin"
//! patterns = ["/*"]
//!
//! [[policy.roles]]
//! name = "hr"
//! patterns = ["/employees/*", "/leave/*"]
//!
//! [[capabilities]]
//! resource = "biometric"
//! action = "read"
//! any_of = ["biometric:read"]
//! ```

pub mod capabilities;
pub mod evaluator;
pub mod guard;
pub mod patterns;
pub mod policy;
pub mod principal;
pub mod requirement;
pub mod types;

pub use capabilities::{CapabilitySet, CapabilityTable};
pub use evaluator::PermissionEvaluator;
pub use guard::{AccessGuard, Decision, Denial};
pub use patterns::{PathPattern, PatternMatcher};
pub use policy::RolePolicyTable;
pub use principal::{PrincipalProvider, StaticPrincipalProvider};
pub use requirement::{AccessRequirement, Clause, RoleRequirement};
pub use types::{PermissionKey, Principal, Role};
