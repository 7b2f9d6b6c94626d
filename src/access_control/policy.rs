//! Role policy table
//!
//! Static mapping from role to the ordered list of route patterns that role
//! may visit. Built once at startup and immutable afterwards; share it
//! behind an `Arc`.
//!
//! Roles that are not listed are authorized for nothing. There is no
//! "any role" entry.

use crate::access_control::patterns::{PathPattern, PatternMatcher};
use crate::access_control::types::Role;
use crate::config::PolicyConfig;
use crate::error::ConfigError;
use std::collections::HashMap;
use tracing::info;

/// Immutable role → patterns table
#[derive(Debug, Clone, Default)]
pub struct RolePolicyTable {
    /// Entries in declaration order
    entries: Vec<(Role, PatternMatcher)>,
    /// Normalized role → index into `entries`
    index: HashMap<Role, usize>,
}

impl RolePolicyTable {
    /// Build a table from `(role, patterns)` pairs
    ///
    /// Fails on an empty role name, a role declared twice (after lowercase
    /// normalization), or any empty or malformed pattern. Errors name the
    /// offending entry as `policy.roles[i]`, its position in `entries`.
    pub fn new<I, R, P>(entries: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (R, P)>,
        R: AsRef<str>,
        P: IntoIterator,
        P::Item: Into<String>,
    {
        let mut table = Self::default();

        for (i, (name, patterns)) in entries.into_iter().enumerate() {
            let role = Role::parse(name.as_ref()).ok_or_else(|| ConfigError::Missing {
                field: format!("policy.roles[{}].name", i),
            })?;

            if table.index.contains_key(&role) {
                return Err(ConfigError::DuplicateRole {
                    role: role.to_string(),
                });
            }

            let patterns: Vec<String> = patterns.into_iter().map(Into::into).collect();
            if patterns.iter().any(String::is_empty) {
                return Err(ConfigError::EmptyPattern {
                    role: role.to_string(),
                });
            }

            let matcher = PatternMatcher::new(&patterns).map_err(|e| match e {
                ConfigError::InvalidPattern { pattern, reason } => ConfigError::InvalidPattern {
                    pattern,
                    reason: format!("in policy.roles[{}].patterns: {}", i, reason),
                },
                other => other,
            })?;
            table.index.insert(role.clone(), table.entries.len());
            table.entries.push((role, matcher));
        }

        Ok(table)
    }

    /// Build a table from the `[[policy.roles]]` configuration section
    pub fn from_config(config: &PolicyConfig) -> Result<Self, ConfigError> {
        let table = Self::new(
            config
                .roles
                .iter()
                .map(|r| (r.name.as_str(), r.patterns.iter().cloned())),
        )?;

        info!(
            roles = table.len(),
            patterns = table.entries.iter().map(|(_, m)| m.len()).sum::<usize>(),
            "Loaded role policy table"
        );

        Ok(table)
    }

    /// Patterns for a raw role string, empty if the role is unknown
    pub fn patterns_for(&self, role: &str) -> &[PathPattern] {
        Role::parse(role)
            .and_then(|r| self.matcher_for(&r))
            .map(PatternMatcher::as_slice)
            .unwrap_or(&[])
    }

    /// Compiled matcher for an already normalized role
    pub fn matcher_for(&self, role: &Role) -> Option<&PatternMatcher> {
        self.index.get(role).map(|&i| &self.entries[i].1)
    }

    /// Roles in declaration order
    pub fn roles(&self) -> impl Iterator<Item = &Role> {
        self.entries.iter().map(|(role, _)| role)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
