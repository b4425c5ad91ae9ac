//! # Lifecycle Gate Configuration
//!
//! Workflows and the access policy are declared in a YAML file
//! (`config/lifecycle-gate.yaml`). The file may carry `development`, `test`
//! and `production` sections that are deep-merged over the base values for
//! the active environment.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use lifecycle_gate::config::ConfigManager;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = ConfigManager::load()?;
//! let gate = manager.gate_for("project_lifecycle")?;
//! let checks = manager.dependent_access_checks();
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod loader;

use crate::access::{AccessPolicy, Permission};
use crate::constants::{DEFAULT_MANAGE_PERMISSION, DEFAULT_MAX_CHAIN_DEPTH, PROJECT_WORKFLOW};
use crate::state_machine::{
    LifecycleState, StateName, Transition, TransitionName, TransitionTable, WorkflowId,
    WorkflowRegistry,
};
use serde::{Deserialize, Serialize};

pub use error::{ConfigResult, ConfigurationError};
pub use loader::ConfigManager;

/// Root configuration structure mirroring lifecycle-gate.yaml
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GateConfig {
    /// Declared workflows, one transition table each
    pub workflows: Vec<WorkflowConfig>,

    /// Dependent access policy
    #[serde(default)]
    pub access: AccessConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WorkflowConfig {
    pub id: WorkflowId,
    #[serde(default)]
    pub label: Option<String>,
    pub states: Vec<StateConfig>,
    #[serde(default)]
    pub transitions: Vec<TransitionConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StateConfig {
    pub name: StateName,
    #[serde(default)]
    pub initial: bool,
    #[serde(default)]
    pub terminal: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TransitionConfig {
    pub name: TransitionName,
    pub from: Vec<StateName>,
    pub to: StateName,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AccessConfig {
    #[serde(default = "default_manage_permission")]
    pub manage_permission: Permission,

    #[serde(default = "default_max_chain_depth")]
    pub max_chain_depth: usize,

    #[serde(default = "default_completed_states")]
    pub completed_states: Vec<StateName>,
}

fn default_manage_permission() -> Permission {
    Permission::Named(DEFAULT_MANAGE_PERMISSION.to_string())
}

fn default_max_chain_depth() -> usize {
    DEFAULT_MAX_CHAIN_DEPTH
}

fn default_completed_states() -> Vec<StateName> {
    vec![StateName::new_unchecked(
        crate::constants::project_states::COMPLETED,
    )]
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            manage_permission: default_manage_permission(),
            max_chain_depth: default_max_chain_depth(),
            completed_states: default_completed_states(),
        }
    }
}

impl WorkflowConfig {
    /// Build and validate the transition table for this workflow
    pub fn to_table(&self) -> ConfigResult<TransitionTable> {
        let mut builder = TransitionTable::builder(self.id.clone());
        if let Some(label) = &self.label {
            builder = builder.label(label.clone());
        }
        for state in &self.states {
            builder = builder.state(LifecycleState::new(
                state.name.clone(),
                state.initial,
                state.terminal,
            ));
        }
        for transition in &self.transitions {
            builder = builder.transition(Transition::new(
                transition.name.clone(),
                transition.from.iter().cloned(),
                transition.to.clone(),
            ));
        }
        Ok(builder.build()?)
    }
}

impl GateConfig {
    /// Validate configuration values that the type system cannot express
    pub fn validate(&self) -> ConfigResult<()> {
        if self.workflows.is_empty() {
            return Err(ConfigurationError::missing_required_field(
                "workflows",
                "lifecycle gate configuration",
            ));
        }

        if self.access.max_chain_depth == 0 {
            return Err(ConfigurationError::invalid_value(
                "access.max_chain_depth",
                "0",
                "chain depth must be greater than 0",
            ));
        }

        if self.access.completed_states.is_empty() {
            return Err(ConfigurationError::missing_required_field(
                "access.completed_states",
                "access configuration",
            ));
        }

        // Completion is a project readiness predicate
        let Some(project) = self
            .workflows
            .iter()
            .find(|workflow| workflow.id.as_str() == PROJECT_WORKFLOW)
        else {
            return Err(ConfigurationError::missing_required_field(
                format!("workflows[id = {PROJECT_WORKFLOW}]"),
                "access.completed_states",
            ));
        };
        for state in &self.access.completed_states {
            if !project.states.iter().any(|declared| declared.name == *state) {
                return Err(ConfigurationError::invalid_value(
                    "access.completed_states",
                    state.as_str(),
                    format!("state is not declared by workflow '{PROJECT_WORKFLOW}'"),
                ));
            }
        }

        Ok(())
    }

    /// Build every declared workflow into a registry; the first invalid
    /// workflow aborts the whole load
    pub fn build_registry(&self) -> ConfigResult<WorkflowRegistry> {
        let mut registry = WorkflowRegistry::new();
        for workflow in &self.workflows {
            registry.register(workflow.to_table()?)?;
        }
        Ok(registry)
    }

    pub fn access_policy(&self) -> AccessPolicy {
        AccessPolicy::new(
            self.access.manage_permission.clone(),
            self.access.completed_states.iter().cloned(),
        )
        .with_max_chain_depth(self.access.max_chain_depth)
    }
}
