//! # Gate Errors
//!
//! Programmer and configuration errors. Authorization outcomes are never
//! reported through this type: a denied transition is a
//! [`Decision`](crate::access::Decision), not an error. What lands here is a
//! misconfigured workflow, a lookup for a name that was never declared, or an
//! ownership chain that violates its construction invariants.

use crate::access::EntityId;
use thiserror::Error;

/// Errors raised while building or querying lifecycle configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateError {
    #[error("Identifier for {kind} must not be empty")]
    EmptyIdentifier { kind: &'static str },

    #[error("Unknown lifecycle state '{state}' in workflow '{workflow}'")]
    UnknownState { workflow: String, state: String },

    #[error("Unknown transition '{transition}' in workflow '{workflow}'")]
    UnknownTransition { workflow: String, transition: String },

    #[error("Unknown workflow '{0}'")]
    UnknownWorkflow(String),

    #[error("Workflow '{workflow}' is invalid: {reason}")]
    InvalidWorkflow { workflow: String, reason: String },

    #[error("Ownership chain for {entity} has {depth} ancestors, exceeding the limit of {max_depth}")]
    ChainTooDeep {
        entity: EntityId,
        depth: usize,
        max_depth: usize,
    },

    #[error("Ownership chain for {entity} visits {repeated} more than once")]
    ChainCycle { entity: EntityId, repeated: EntityId },

    #[error("Invalid permission '{0}'")]
    InvalidPermission(String),
}

impl GateError {
    /// Stable error code for programmatic handling
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyIdentifier { .. } => "EMPTY_IDENTIFIER",
            Self::UnknownState { .. } => "UNKNOWN_STATE",
            Self::UnknownTransition { .. } => "UNKNOWN_TRANSITION",
            Self::UnknownWorkflow(_) => "UNKNOWN_WORKFLOW",
            Self::InvalidWorkflow { .. } => "INVALID_WORKFLOW",
            Self::ChainTooDeep { .. } => "CHAIN_TOO_DEEP",
            Self::ChainCycle { .. } => "CHAIN_CYCLE",
            Self::InvalidPermission(_) => "INVALID_PERMISSION",
        }
    }

    pub(crate) fn invalid_workflow(workflow: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidWorkflow {
            workflow: workflow.into(),
            reason: reason.into(),
        }
    }
}

pub type GateResult<T> = std::result::Result<T, GateError>;
