//! Typed permissions
//!
//! Permissions keep their conventional textual forms for interop with the
//! host platform's role configuration, but inside the crate they are an enum:
//!
//! - `use <workflow> transition <transition>`
//! - `restful <method> <resource>`
//! - any other string, kept as a named permission

use crate::error::{GateError, GateResult};
use crate::state_machine::{TransitionName, WorkflowId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// HTTP methods that appear in REST resource permissions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
    Delete,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "get"),
            Self::Post => write!(f, "post"),
            Self::Patch => write!(f, "patch"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

impl FromStr for HttpMethod {
    type Err = GateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "get" => Ok(Self::Get),
            "post" => Ok(Self::Post),
            "patch" => Ok(Self::Patch),
            "delete" => Ok(Self::Delete),
            _ => Err(GateError::InvalidPermission(format!(
                "unsupported HTTP method: {s}"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Permission {
    /// Permission to use one transition of one workflow
    UseTransition {
        workflow: WorkflowId,
        transition: TransitionName,
    },
    /// Permission to call a REST resource with a given method
    Restful { method: HttpMethod, resource: String },
    /// Free-form permission; build through [`Permission::named`]
    Named(String),
}

impl Permission {
    pub fn use_transition(workflow: &WorkflowId, transition: &TransitionName) -> Self {
        Self::UseTransition {
            workflow: workflow.clone(),
            transition: transition.clone(),
        }
    }

    /// REST permission. The resource must be a single non-empty token so the
    /// textual form parses back to the same value.
    pub fn restful(method: HttpMethod, resource: impl AsRef<str>) -> GateResult<Self> {
        let resource = resource.as_ref().trim();
        if resource.is_empty() || resource.contains(char::is_whitespace) {
            return Err(GateError::InvalidPermission(format!(
                "invalid REST resource '{resource}'"
            )));
        }
        Ok(Self::Restful {
            method,
            resource: resource.to_string(),
        })
    }

    /// Permission from its textual form. Text following the transition or
    /// REST convention yields the structured permission.
    pub fn named(name: impl AsRef<str>) -> GateResult<Self> {
        name.as_ref().parse()
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UseTransition {
                workflow,
                transition,
            } => write!(f, "use {workflow} transition {transition}"),
            Self::Restful { method, resource } => write!(f, "restful {method} {resource}"),
            Self::Named(name) => f.write_str(name),
        }
    }
}

impl FromStr for Permission {
    type Err = GateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = s.split_whitespace().collect();
        match tokens.as_slice() {
            [] => Err(GateError::InvalidPermission(s.to_string())),
            ["use", workflow, "transition", transition] => Ok(Self::UseTransition {
                workflow: WorkflowId::new(workflow)?,
                transition: TransitionName::new(transition)?,
            }),
            ["restful", method, resource] => Self::restful(method.parse()?, resource),
            _ => Ok(Self::Named(tokens.join(" "))),
        }
    }
}

impl TryFrom<String> for Permission {
    type Error = GateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Permission> for String {
    fn from(value: Permission) -> Self {
        value.to_string()
    }
}

/// Capability to answer whether a permission is granted
pub trait PermissionOracle {
    fn has_permission(&self, permission: &Permission) -> bool;
}

/// Set of granted permissions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionSet {
    granted: HashSet<Permission>,
}

impl PermissionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse permissions from their textual form
    pub fn parse<I, S>(permissions: I) -> GateResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        permissions
            .into_iter()
            .map(|p| p.as_ref().parse::<Permission>())
            .collect()
    }

    pub fn grant(&mut self, permission: Permission) {
        self.granted.insert(permission);
    }

    pub fn contains(&self, permission: &Permission) -> bool {
        self.granted.contains(permission)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Permission> {
        self.granted.iter()
    }

    pub fn len(&self) -> usize {
        self.granted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.granted.is_empty()
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<T: IntoIterator<Item = Permission>>(iter: T) -> Self {
        Self {
            granted: iter.into_iter().collect(),
        }
    }
}

impl PermissionOracle for PermissionSet {
    fn has_permission(&self, permission: &Permission) -> bool {
        self.contains(permission)
    }
}
