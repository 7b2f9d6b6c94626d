//! Role and capability authorization engine
//!
//! A pure, synchronous, deny-by-default decision engine for role-based
//! route access and `(resource, action)` capability checks.
//!
//! ## Features
//!
//! - **Path patterns** per role: exact routes and `/*` prefix wildcards
//! - **Capability checks**: `has_permission`, `has_any_permission`, `has_all_permissions`
//! - **Role predicates**: `is_admin`, `is_hr` (admin implies HR)
//! - **Guards** combining role, capability and path clauses with a fallback on denial
//! - **Capability table** resolved once per navigation for menus and sidebars
//! - **Flexible configuration** via TOML files and environment variables
//!
//! ## Decision Model
//!
//! ```text
//! principal + requirement → role? → any_of? → all_of? → path? → allow
//! ```
//!
//! Any failing clause denies. Unknown roles, missing principals and empty
//! requirements are denied. Denials are values, not errors.
//!
//! ## Example Configuration
//!
//! ```toml
//! [[policy.roles]]
//! name = "admin"
//! patterns = ["/employees", "/settings/*"]
//!
//! [[policy.roles]]
//! name = "employee"
//! patterns = []
//!
//! [[capabilities]]
//! resource = "settings"
//! action = "write"
//! role = "is_admin"
//! ```

pub mod access_control;
pub mod authorizer;
pub mod config;
pub mod error;

// Re-export main types
pub use access_control::{AccessGuard, AccessRequirement, Decision, PermissionEvaluator, Principal};
pub use authorizer::Authorizer;
pub use config::{AppConfig, load_config};
pub use error::{AppError, Result};
