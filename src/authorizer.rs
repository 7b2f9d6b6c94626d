//! Assembled authorization engine
//!
//! Ties the policy table, evaluator, guard and capability table together so
//! an application builds them once at startup from [`AppConfig`].

use crate::access_control::{
    AccessGuard, CapabilitySet, CapabilityTable, PermissionEvaluator, Principal, RolePolicyTable,
};
use crate::config::AppConfig;
use crate::error::Result;
use std::sync::Arc;

/// Immutable authorization engine; cheap to clone and safe to share
#[derive(Debug, Clone)]
pub struct Authorizer {
    guard: AccessGuard,
    capabilities: Arc<CapabilityTable>,
}

impl Authorizer {
    pub fn new(policy: RolePolicyTable, capabilities: CapabilityTable) -> Self {
        Self {
            guard: AccessGuard::new(PermissionEvaluator::new(Arc::new(policy))),
            capabilities: Arc::new(capabilities),
        }
    }

    /// Build the engine from a loaded configuration
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let policy = RolePolicyTable::from_config(&config.policy)?;
        let capabilities = CapabilityTable::from_config(&config.capabilities)?;
        Ok(Self::new(policy, capabilities))
    }

    pub fn guard(&self) -> &AccessGuard {
        &self.guard
    }

    pub fn evaluator(&self) -> &PermissionEvaluator {
        self.guard.evaluator()
    }

    pub fn policy(&self) -> &RolePolicyTable {
        self.guard.evaluator().policy()
    }

    pub fn capabilities(&self) -> &CapabilityTable {
        &self.capabilities
    }

    /// Resolve every declared capability for a principal, once per navigation
    pub fn navigation(&self, principal: Option<&Principal>) -> CapabilitySet {
        self.capabilities.resolve(&self.guard, principal)
    }

    /// Single capability check against the declared table
    pub fn can(&self, principal: Option<&Principal>, resource: &str, action: &str) -> bool {
        self.capabilities
            .can(&self.guard, principal, resource, action)
    }
}
