//! Configuration types for roleguard
//!
//! This module defines the configuration structure that can be loaded from
//! TOML files and/or environment variables.

use crate::access_control::{AccessRequirement, PermissionKey, RoleRequirement};
use crate::error::RequirementError;
use clap::ValueEnum;
use serde::Deserialize;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Role → route pattern table
    pub policy: PolicyConfig,

    /// Declared capabilities and their requirements
    pub capabilities: Vec<CapabilityConfig>,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Route policy configuration
///
/// Roles are an array of tables so declaration order survives loading and
/// duplicate declarations can be detected.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    pub roles: Vec<RoleConfig>,
}

/// One role entry in `[[policy.roles]]`
#[derive(Debug, Clone, Deserialize)]
pub struct RoleConfig {
    /// Role name (matched case-insensitively)
    pub name: String,

    /// Allowed route patterns: exact (`/employees`) or prefix (`/admin/*`)
    #[serde(default)]
    pub patterns: Vec<String>,
}

/// One capability entry in `[[capabilities]]`
///
/// Every present clause must pass for the capability to be granted.
#[derive(Debug, Clone, Deserialize)]
pub struct CapabilityConfig {
    pub resource: String,

    pub action: String,

    /// Role clause: `"is_admin"`, `"is_hr"`, `{ exact = "..." }` or `{ one_of = [...] }`
    #[serde(default)]
    pub role: Option<RoleRequirement>,

    /// Held capabilities, at least one required (`"resource:action"`)
    #[serde(default)]
    pub any_of: Option<Vec<String>>,

    /// Held capabilities, all required (`"resource:action"`)
    #[serde(default)]
    pub all_of: Option<Vec<String>>,

    /// Route the principal's role must be allowed to visit
    #[serde(default)]
    pub path: Option<String>,
}

impl CapabilityConfig {
    /// Convert into a validated requirement
    pub fn to_requirement(&self) -> Result<AccessRequirement, RequirementError> {
        let mut requirement = AccessRequirement::new();

        if let Some(role) = &self.role {
            requirement = requirement.with_role(role.clone());
        }
        if let Some(keys) = &self.any_of {
            requirement = requirement.with_any_of(parse_keys(keys)?);
        }
        if let Some(keys) = &self.all_of {
            requirement = requirement.with_all_of(parse_keys(keys)?);
        }
        if let Some(path) = &self.path {
            requirement = requirement.with_path(path.clone());
        }

        requirement.build()
    }
}

fn parse_keys(keys: &[String]) -> Result<Vec<PermissionKey>, RequirementError> {
    keys.iter().map(|k| k.parse()).collect()
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Output format (pretty, json)
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable output
    #[default]
    Pretty,
    /// JSON structured output
    Json,
}
