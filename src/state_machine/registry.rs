//! # Workflow Registry
//!
//! Holds every declared [`TransitionTable`] keyed by workflow id. The
//! registry is assembled once during configuration loading and shared
//! read-only afterwards.

use super::transitions::{TransitionTable, WorkflowId};
use crate::access::TransitionGate;
use crate::error::{GateError, GateResult};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Immutable collection of workflow transition tables
#[derive(Debug, Clone, Default)]
pub struct WorkflowRegistry {
    workflows: BTreeMap<WorkflowId, Arc<TransitionTable>>,
}

impl WorkflowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a table, rejecting a second table for the same workflow id
    pub fn register(&mut self, table: TransitionTable) -> GateResult<()> {
        let id = table.workflow().clone();
        if self.workflows.contains_key(&id) {
            return Err(GateError::invalid_workflow(
                id.as_str(),
                "workflow declared more than once",
            ));
        }

        debug!(
            workflow = %id,
            states = table.states().count(),
            transitions = table.transitions().count(),
            "Registered workflow"
        );
        self.workflows.insert(id, Arc::new(table));
        Ok(())
    }

    pub fn get(&self, workflow: &str) -> GateResult<Arc<TransitionTable>> {
        self.workflows
            .get(workflow)
            .cloned()
            .ok_or_else(|| GateError::UnknownWorkflow(workflow.to_string()))
    }

    /// Build a gate over the named workflow
    pub fn gate_for(&self, workflow: &str) -> GateResult<TransitionGate> {
        self.get(workflow).map(TransitionGate::new)
    }

    pub fn workflow_ids(&self) -> impl Iterator<Item = &WorkflowId> {
        self.workflows.keys()
    }

    pub fn len(&self) -> usize {
        self.workflows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workflows.is_empty()
    }
}
