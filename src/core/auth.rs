//! Explicit operator context for mutating operations
//!
//! Every mutating catalog operation takes an `AuthContext` by reference.
//! There is no ambient "current user" state anywhere in the core; whoever
//! drives the store must resolve an operator identity up front and pass it
//! down. Credential storage and verification live outside this crate.

use crate::core::Config;

/// The operator on whose behalf mutations are performed
#[derive(Debug, Clone)]
pub struct AuthContext {
    operator: String,
}

impl AuthContext {
    /// Context for a named operator
    pub fn new(operator: impl Into<String>) -> Self {
        Self {
            operator: operator.into(),
        }
    }

    /// Resolve the operator from configuration (config file, env, git, $USER)
    pub fn resolve(config: &Config) -> Self {
        Self::new(config.operator())
    }

    /// The operator name recorded in the audit trail
    pub fn operator(&self) -> &str {
        &self.operator
    }
}
