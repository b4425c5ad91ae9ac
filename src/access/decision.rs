use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a request was denied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    /// The transition name is empty or not declared by the workflow
    InvalidTransition,
    /// The transition is not legal from the entity's current state
    IllegalState,
    /// Permission, readiness or relationship requirements are not met
    Forbidden,
}

impl DenyReason {
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidTransition => "INVALID_TRANSITION",
            Self::IllegalState => "ILLEGAL_STATE",
            Self::Forbidden => "FORBIDDEN",
        }
    }
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A denial with a message suitable for user feedback
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Denial {
    pub reason: DenyReason,
    pub message: String,
}

impl Denial {
    pub fn new(reason: DenyReason, message: impl Into<String>) -> Self {
        Self {
            reason,
            message: message.into(),
        }
    }

    pub fn invalid_transition(message: impl Into<String>) -> Self {
        Self::new(DenyReason::InvalidTransition, message)
    }

    pub fn illegal_state(message: impl Into<String>) -> Self {
        Self::new(DenyReason::IllegalState, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(DenyReason::Forbidden, message)
    }
}

impl fmt::Display for Denial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.reason, self.message)
    }
}

/// Outcome of an authorization check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum Decision {
    Allowed,
    Denied(Denial),
    /// Not applicable; the caller should defer to other checks
    Neutral,
}

impl Decision {
    pub fn denied(reason: DenyReason, message: impl Into<String>) -> Self {
        Self::Denied(Denial::new(reason, message))
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, Self::Denied(_))
    }

    pub fn is_neutral(&self) -> bool {
        matches!(self, Self::Neutral)
    }

    pub fn reason(&self) -> Option<DenyReason> {
        match self {
            Self::Denied(denial) => Some(denial.reason),
            _ => None,
        }
    }

    /// Short label used in structured logs
    pub fn label(&self) -> &'static str {
        match self {
            Self::Allowed => "allowed",
            Self::Denied(_) => "denied",
            Self::Neutral => "neutral",
        }
    }
}

impl<T> From<Result<T, Denial>> for Decision {
    fn from(result: Result<T, Denial>) -> Self {
        match result {
            Ok(_) => Self::Allowed,
            Err(denial) => Self::Denied(denial),
        }
    }
}
