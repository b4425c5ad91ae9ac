use serde::{Deserialize, Serialize};
use std::fmt;

crate::lifecycle_identifier! {
    /// Name of a lifecycle state, unique within its workflow
    StateName, "state name"
}

/// A named stage in an entity's life (draft, open, mediated, completed, ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LifecycleState {
    name: StateName,
    is_initial: bool,
    is_terminal: bool,
}

impl LifecycleState {
    pub fn new(name: StateName, is_initial: bool, is_terminal: bool) -> Self {
        Self {
            name,
            is_initial,
            is_terminal,
        }
    }

    /// State that new entities enter the workflow in
    pub fn initial(name: StateName) -> Self {
        Self::new(name, true, false)
    }

    /// State with no outgoing transitions
    pub fn terminal(name: StateName) -> Self {
        Self::new(name, false, true)
    }

    pub fn intermediate(name: StateName) -> Self {
        Self::new(name, false, false)
    }

    pub fn name(&self) -> &StateName {
        &self.name
    }

    /// Check if entities start in this state
    pub fn is_initial(&self) -> bool {
        self.is_initial
    }

    /// Check if this is a terminal state (no further transitions allowed)
    pub fn is_terminal(&self) -> bool {
        self.is_terminal
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
