//! Application state management
//!
//! Contains shared state accessible across all handlers.

use crate::catalog::{Catalog, EvaluationPolicy, GovernanceRules};
use std::sync::Arc;

/// Application state shared across all handlers
pub struct AppState {
    /// Published fact store, swapped whole on every load
    pub catalog: Catalog,

    /// Governance rule catalog
    pub rules: GovernanceRules,

    /// PII markers and traversal bound
    pub policy: EvaluationPolicy,
}

impl AppState {
    pub fn new(policy: EvaluationPolicy) -> Self {
        Self {
            catalog: Catalog::new(),
            rules: GovernanceRules::new(),
            policy,
        }
    }
}

/// Type alias for shared state
pub type SharedState = Arc<AppState>;
