//! Access guard
//!
//! Boundary adapter between the evaluator and the surrounding application.
//! It turns a principal plus an [`AccessRequirement`] into a [`Decision`]
//! and dispatches to an allow or fallback branch. The guard has no side
//! effects: it does not log, redirect or mutate anything.

use crate::access_control::evaluator::PermissionEvaluator;
use crate::access_control::principal::PrincipalProvider;
use crate::access_control::requirement::{AccessRequirement, Clause};
use crate::access_control::types::Principal;
use crate::error::{AccessDeniedError, RequirementError};
use std::fmt;

/// Why access was denied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Denial {
    /// No principal was supplied
    Unauthenticated,
    /// A clause was evaluated and did not pass
    Unauthorized { clause: Clause },
    /// The requirement itself is malformed
    Misconfigured { reason: RequirementError },
}

impl fmt::Display for Denial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Denial::Unauthenticated => write!(f, "no authenticated principal"),
            Denial::Unauthorized { clause } => write!(f, "{} requirement not satisfied", clause),
            Denial::Misconfigured { reason } => write!(f, "misconfigured requirement: {}", reason),
        }
    }
}

/// Result of a guard evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allowed,
    Denied(Denial),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allowed)
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, Decision::Denied(_))
    }

    /// True when the denial stems from a malformed requirement
    pub fn is_misconfigured(&self) -> bool {
        matches!(self, Decision::Denied(Denial::Misconfigured { .. }))
    }
}

/// Decision and dispatch point for protected operations
#[derive(Debug, Clone)]
pub struct AccessGuard {
    evaluator: PermissionEvaluator,
}

impl AccessGuard {
    pub fn new(evaluator: PermissionEvaluator) -> Self {
        Self { evaluator }
    }

    pub fn evaluator(&self) -> &PermissionEvaluator {
        &self.evaluator
    }

    /// Evaluate every clause present in `requirement`
    ///
    /// Clauses are checked in order role, any-of, all-of, path; the first
    /// failing clause is reported. A requirement with no clauses denies.
    pub fn evaluate(
        &self,
        principal: Option<&Principal>,
        requirement: &AccessRequirement,
    ) -> Decision {
        if let Err(reason) = requirement.validate() {
            return Decision::Denied(Denial::Misconfigured { reason });
        }

        let Some(principal) = principal else {
            return Decision::Denied(Denial::Unauthenticated);
        };

        let eval = &self.evaluator;

        if let Some(role) = requirement.role()
            && !eval.satisfies_role_requirement(principal, role)
        {
            return Decision::Denied(Denial::Unauthorized {
                clause: Clause::Role,
            });
        }

        if let Some(keys) = requirement.any_of()
            && !eval.has_any_permission(principal, keys)
        {
            return Decision::Denied(Denial::Unauthorized {
                clause: Clause::AnyOf,
            });
        }

        if let Some(keys) = requirement.all_of()
            && !eval.has_all_permissions(principal, keys)
        {
            return Decision::Denied(Denial::Unauthorized {
                clause: Clause::AllOf,
            });
        }

        if let Some(path) = requirement.path()
            && !eval.is_authorized_for_path(principal, path)
        {
            return Decision::Denied(Denial::Unauthorized {
                clause: Clause::Path,
            });
        }

        Decision::Allowed
    }

    /// Evaluate against whatever principal the authentication layer reports
    pub fn evaluate_current(
        &self,
        provider: &dyn PrincipalProvider,
        requirement: &AccessRequirement,
    ) -> Decision {
        let principal = provider.current_principal();
        self.evaluate(principal.as_ref(), requirement)
    }

    /// Run `on_allow` when permitted, otherwise `on_deny` with the reason
    pub fn guard<T>(
        &self,
        principal: Option<&Principal>,
        requirement: &AccessRequirement,
        on_allow: impl FnOnce() -> T,
        on_deny: impl FnOnce(&Denial) -> T,
    ) -> T {
        match self.evaluate(principal, requirement) {
            Decision::Allowed => on_allow(),
            Decision::Denied(denial) => on_deny(&denial),
        }
    }

    /// Like [`guard`](Self::guard) with `T::default()` as the fallback
    pub fn guard_or_default<T: Default>(
        &self,
        principal: Option<&Principal>,
        requirement: &AccessRequirement,
        on_allow: impl FnOnce() -> T,
    ) -> T {
        self.guard(principal, requirement, on_allow, |_| T::default())
    }

    /// Evaluate and convert a denial into an error for `?` propagation
    pub fn require(
        &self,
        principal: Option<&Principal>,
        requirement: &AccessRequirement,
    ) -> Result<(), AccessDeniedError> {
        match self.evaluate(principal, requirement) {
            Decision::Allowed => Ok(()),
            Decision::Denied(Denial::Unauthenticated) => Err(AccessDeniedError::unauthenticated()),
            Decision::Denied(denial) => Err(AccessDeniedError::new(
                principal.map(Principal::subject).unwrap_or("anonymous"),
                denial.to_string(),
            )),
        }
    }
}
