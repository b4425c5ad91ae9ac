//! Transition tables
//!
//! A [`TransitionTable`] is the declared schema of one workflow: its states
//! and the named, directed transitions between them. Tables are validated
//! once when built and are read-only afterwards; the gate consults them but
//! never executes a transition.

use super::states::{LifecycleState, StateName};
use crate::error::{GateError, GateResult};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

crate::lifecycle_identifier! {
    /// Name of a transition, unique within its workflow
    TransitionName, "transition name"
}

crate::lifecycle_identifier! {
    /// Identifier of a declared workflow (project_lifecycle, feedback_lifecycle, ...)
    WorkflowId, "workflow id"
}

/// A named, directed edge between lifecycle states
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    name: TransitionName,
    from_states: BTreeSet<StateName>,
    to_state: StateName,
}

impl Transition {
    pub fn new(
        name: TransitionName,
        from_states: impl IntoIterator<Item = StateName>,
        to_state: StateName,
    ) -> Self {
        Self {
            name,
            from_states: from_states.into_iter().collect(),
            to_state,
        }
    }

    pub fn name(&self) -> &TransitionName {
        &self.name
    }

    pub fn from_states(&self) -> &BTreeSet<StateName> {
        &self.from_states
    }

    pub fn to_state(&self) -> &StateName {
        &self.to_state
    }

    /// Check whether this transition may be taken from `state`
    pub fn is_legal_from(&self, state: &StateName) -> bool {
        self.from_states.contains(state)
    }
}

/// Validated states and transitions of a single workflow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionTable {
    workflow: WorkflowId,
    label: Option<String>,
    states: BTreeMap<StateName, LifecycleState>,
    transitions: BTreeMap<TransitionName, Transition>,
    initial: StateName,
}

impl TransitionTable {
    pub fn builder(workflow: WorkflowId) -> TransitionTableBuilder {
        TransitionTableBuilder {
            workflow,
            label: None,
            states: Vec::new(),
            transitions: Vec::new(),
        }
    }

    pub fn workflow(&self) -> &WorkflowId {
        &self.workflow
    }

    /// Human readable label, falling back to the workflow id
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(self.workflow.as_str())
    }

    /// Look up a declared state, failing loudly on a miss
    pub fn state(&self, name: &str) -> GateResult<&LifecycleState> {
        self.states.get(name).ok_or_else(|| GateError::UnknownState {
            workflow: self.workflow.to_string(),
            state: name.to_string(),
        })
    }

    /// Look up a declared transition, failing loudly on a miss
    pub fn transition(&self, name: &str) -> GateResult<&Transition> {
        self.find_transition(name)
            .ok_or_else(|| GateError::UnknownTransition {
                workflow: self.workflow.to_string(),
                transition: name.to_string(),
            })
    }

    /// Request-time lookup; an unknown name is a denial, not a fault
    pub fn find_transition(&self, name: &str) -> Option<&Transition> {
        self.transitions.get(name)
    }

    pub fn initial_state(&self) -> &LifecycleState {
        // The builder guarantees the initial state is declared
        &self.states[&self.initial]
    }

    pub fn states(&self) -> impl Iterator<Item = &LifecycleState> {
        self.states.values()
    }

    pub fn transitions(&self) -> impl Iterator<Item = &Transition> {
        self.transitions.values()
    }

    /// Transitions legal from `state`, in name order
    pub fn transitions_from<'a>(
        &'a self,
        state: &StateName,
    ) -> impl Iterator<Item = &'a Transition> + 'a {
        let state = state.clone();
        self.transitions
            .values()
            .filter(move |transition| transition.is_legal_from(&state))
    }

    pub fn is_terminal(&self, state: &str) -> bool {
        self.states
            .get(state)
            .is_some_and(LifecycleState::is_terminal)
    }
}

/// Collects states and transitions, validating everything in [`build`](Self::build)
#[derive(Debug, Clone)]
pub struct TransitionTableBuilder {
    workflow: WorkflowId,
    label: Option<String>,
    states: Vec<LifecycleState>,
    transitions: Vec<Transition>,
}

impl TransitionTableBuilder {
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn state(mut self, state: LifecycleState) -> Self {
        self.states.push(state);
        self
    }

    pub fn transition(mut self, transition: Transition) -> Self {
        self.transitions.push(transition);
        self
    }

    pub fn build(self) -> GateResult<TransitionTable> {
        let workflow = self.workflow;
        let invalid = |reason: String| GateError::invalid_workflow(workflow.as_str(), reason);

        if self.states.is_empty() {
            return Err(invalid("no states declared".to_string()));
        }

        let mut states = BTreeMap::new();
        for state in self.states {
            let name = state.name().clone();
            if states.insert(name.clone(), state).is_some() {
                return Err(invalid(format!("state '{name}' declared more than once")));
            }
        }

        let initial: Vec<&StateName> = states
            .values()
            .filter(|s| s.is_initial())
            .map(LifecycleState::name)
            .collect();
        let initial = match initial.as_slice() {
            [single] => (*single).clone(),
            [] => return Err(invalid("no initial state declared".to_string())),
            many => {
                let names: Vec<&str> = many.iter().map(|n| n.as_str()).collect();
                return Err(invalid(format!(
                    "multiple initial states declared: {}",
                    names.join(", ")
                )));
            }
        };

        let mut transitions = BTreeMap::new();
        for transition in self.transitions {
            let name = transition.name().clone();
            if transition.from_states().is_empty() {
                return Err(invalid(format!("transition '{name}' has no source states")));
            }

            let unknown = |state: &StateName| GateError::UnknownState {
                workflow: workflow.to_string(),
                state: state.to_string(),
            };
            if !states.contains_key(transition.to_state()) {
                return Err(unknown(transition.to_state()));
            }
            for from in transition.from_states() {
                let Some(source) = states.get(from) else {
                    return Err(unknown(from));
                };
                if source.is_terminal() {
                    return Err(invalid(format!(
                        "transition '{name}' leaves terminal state '{from}'"
                    )));
                }
            }

            if transitions.insert(name.clone(), transition).is_some() {
                return Err(invalid(format!(
                    "transition '{name}' declared more than once"
                )));
            }
        }

        Ok(TransitionTable {
            workflow,
            label: self.label,
            states,
            transitions,
            initial,
        })
    }
}
