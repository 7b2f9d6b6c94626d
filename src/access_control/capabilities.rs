//! Capability table
//!
//! Central declaration of which `(resource, action)` capabilities exist and
//! what each one requires. Navigation surfaces (menus, sidebars, action
//! buttons) resolve the whole table once per navigation into a
//! [`CapabilitySet`] and then ask it `can(resource, action)`, instead of
//! scattering inline checks through the call sites.

use crate::access_control::guard::AccessGuard;
use crate::access_control::requirement::AccessRequirement;
use crate::access_control::types::{PermissionKey, Principal};
use crate::config::CapabilityConfig;
use crate::error::ConfigError;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use tracing::info;

/// Declared capabilities and their requirements, in declaration order
#[derive(Debug, Clone, Default)]
pub struct CapabilityTable {
    entries: Vec<(PermissionKey, AccessRequirement)>,
    index: HashMap<PermissionKey, usize>,
}

impl CapabilityTable {
    /// Build a table, validating every key and requirement
    pub fn new(
        entries: impl IntoIterator<Item = (PermissionKey, AccessRequirement)>,
    ) -> Result<Self, ConfigError> {
        let mut table = Self::default();

        for (key, requirement) in entries {
            key.validate()
                .and_then(|_| requirement.validate())
                .map_err(|source| ConfigError::Requirement {
                    context: format!("capability '{}'", key),
                    source,
                })?;

            if table.index.contains_key(&key) {
                return Err(ConfigError::DuplicateCapability {
                    resource: key.resource().to_string(),
                    action: key.action().to_string(),
                });
            }

            table.index.insert(key.clone(), table.entries.len());
            table.entries.push((key, requirement));
        }

        Ok(table)
    }

    /// Build a table from the `[[capabilities]]` configuration section
    pub fn from_config(configs: &[CapabilityConfig]) -> Result<Self, ConfigError> {
        let entries = configs
            .iter()
            .enumerate()
            .map(|(i, c)| {
                c.to_requirement()
                    .map(|req| (PermissionKey::new(&c.resource, &c.action), req))
                    .map_err(|source| ConfigError::Requirement {
                        context: format!("capabilities[{}] ({}:{})", i, c.resource, c.action),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let table = Self::new(entries)?;
        info!(capabilities = table.len(), "Loaded capability table");
        Ok(table)
    }

    pub fn requirement_for(&self, resource: &str, action: &str) -> Option<&AccessRequirement> {
        self.index
            .get(&PermissionKey::new(resource, action))
            .map(|&i| &self.entries[i].1)
    }

    /// Check a single capability; undeclared capabilities are denied
    pub fn can(
        &self,
        guard: &AccessGuard,
        principal: Option<&Principal>,
        resource: &str,
        action: &str,
    ) -> bool {
        self.requirement_for(resource, action)
            .is_some_and(|req| guard.evaluate(principal, req).is_allowed())
    }

    /// Evaluate every declared capability for one principal
    pub fn resolve(&self, guard: &AccessGuard, principal: Option<&Principal>) -> CapabilitySet {
        let allowed = self
            .entries
            .iter()
            .filter(|(_, req)| guard.evaluate(principal, req).is_allowed())
            .map(|(key, _)| key.clone())
            .collect();

        CapabilitySet { allowed }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Capabilities granted to one principal, resolved from a [`CapabilityTable`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CapabilitySet {
    allowed: BTreeSet<PermissionKey>,
}

impl CapabilitySet {
    pub fn can(&self, resource: &str, action: &str) -> bool {
        self.allowed.contains(&PermissionKey::new(resource, action))
    }

    pub fn iter(&self) -> impl Iterator<Item = &PermissionKey> {
        self.allowed.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty()
    }

    pub fn len(&self) -> usize {
        self.allowed.len()
    }
}
