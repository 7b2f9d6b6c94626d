//! Principal source
//!
//! Narrow interface to the authentication layer. Session handling, token
//! refresh and multi-factor verification live outside this crate; all the
//! guard needs is the principal they produce, or `None` when nobody is
//! (fully) signed in.

use crate::access_control::types::Principal;

/// Supplies the currently authenticated principal
pub trait PrincipalProvider: Send + Sync {
    /// The current principal, or `None` when unauthenticated
    fn current_principal(&self) -> Option<Principal>;
}

impl<F> PrincipalProvider for F
where
    F: Fn() -> Option<Principal> + Send + Sync,
{
    fn current_principal(&self) -> Option<Principal> {
        self()
    }
}

/// Provider returning a fixed principal
#[derive(Debug, Clone, Default)]
pub struct StaticPrincipalProvider {
    principal: Option<Principal>,
}

impl StaticPrincipalProvider {
    pub fn new(principal: Principal) -> Self {
        Self {
            principal: Some(principal),
        }
    }

    pub fn logged_out() -> Self {
        Self { principal: None }
    }
}

impl PrincipalProvider for StaticPrincipalProvider {
    fn current_principal(&self) -> Option<Principal> {
        self.principal.clone()
    }
}
