//! # Transition Gate
//!
//! Single decision point for lifecycle state changes. The gate answers
//! whether an actor may take a named transition on an entity right now; it
//! never changes state. The host workflow engine performs the mutation and
//! must re-check the source state at commit time through
//! [`AuthorizedTransition::revalidate`], because the decision and the
//! mutation are not atomic with respect to each other.
//!
//! Checks run in a fixed order so the reported reason is deterministic:
//!
//! 1. the transition exists (`InvalidTransition`)
//! 2. it is legal from the entity's current state (`IllegalState`)
//! 3. the actor holds `use <workflow> transition <name>` (`Forbidden`)

use super::actor::Actor;
use super::decision::{Decision, Denial};
use super::entity::{ActorId, EntityId, LifecycleEntity};
use super::permissions::{Permission, PermissionOracle};
use crate::logging::log_gate_decision;
use crate::state_machine::{
    StateName, Transition, TransitionCompleted, TransitionName, TransitionTable, WorkflowId,
};
use chrono::Utc;
use std::sync::Arc;

/// A transition the gate approved, handed to the workflow engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizedTransition {
    pub workflow: WorkflowId,
    pub transition: TransitionName,
    pub entity: EntityId,
    pub actor: ActorId,
    pub from_state: StateName,
    pub to_state: StateName,
}

impl AuthorizedTransition {
    /// Commit-time guard: the entity must still be in the state the decision
    /// was made for. A racing transition that committed first turns this into
    /// `IllegalState`.
    pub fn revalidate(&self, observed_state: Option<&StateName>) -> Result<(), Denial> {
        match observed_state {
            Some(state) if *state == self.from_state => Ok(()),
            Some(state) => Err(Denial::illegal_state(format!(
                "{} moved from '{}' to '{}' before '{}' was applied",
                self.entity, self.from_state, state, self.transition
            ))),
            None => Err(Denial::illegal_state(format!(
                "{} no longer has a lifecycle state",
                self.entity
            ))),
        }
    }

    /// Completion notification to publish once the engine has committed
    pub fn completed_event(&self) -> TransitionCompleted {
        TransitionCompleted {
            workflow: self.workflow.clone(),
            transition: self.transition.clone(),
            entity: self.entity,
            actor: self.actor,
            from_state: self.from_state.clone(),
            to_state: self.to_state.clone(),
            occurred_at: Utc::now(),
        }
    }
}

/// Authorizes transitions of a single workflow
#[derive(Debug, Clone)]
pub struct TransitionGate {
    table: Arc<TransitionTable>,
}

impl TransitionGate {
    pub fn new(table: Arc<TransitionTable>) -> Self {
        Self { table }
    }

    pub fn workflow(&self) -> &WorkflowId {
        self.table.workflow()
    }

    pub fn table(&self) -> &TransitionTable {
        &self.table
    }

    /// Decide whether `actor` may take `transition_name` on `entity`
    pub fn authorize<E>(&self, actor: &Actor, entity: &E, transition_name: &str) -> Decision
    where
        E: LifecycleEntity + ?Sized,
    {
        let decision = Decision::from(self.authorize_transition(actor, entity, transition_name));
        log_gate_decision(
            "transition_gate",
            self.workflow().as_str(),
            transition_name,
            entity.entity_id(),
            actor.id(),
            &decision,
        );
        decision
    }

    /// Same checks as [`authorize`](Self::authorize), returning the approved
    /// transition for the workflow engine on success
    pub fn authorize_transition<E>(
        &self,
        actor: &Actor,
        entity: &E,
        transition_name: &str,
    ) -> Result<AuthorizedTransition, Denial>
    where
        E: LifecycleEntity + ?Sized,
    {
        let name = transition_name.trim();
        if name.is_empty() {
            return Err(Denial::invalid_transition("transition name is empty"));
        }
        let Some(transition) = self.table.find_transition(name) else {
            return Err(Denial::invalid_transition(format!(
                "workflow '{}' has no transition '{}'",
                self.workflow(),
                name
            )));
        };

        let from_state = self.check_source_state(transition, entity)?;

        let required = Permission::use_transition(self.workflow(), transition.name());
        if !actor.has_permission(&required) {
            return Err(Denial::forbidden(format!(
                "{} lacks permission '{}'",
                actor.id(),
                required
            )));
        }

        Ok(AuthorizedTransition {
            workflow: self.workflow().clone(),
            transition: transition.name().clone(),
            entity: entity.entity_id(),
            actor: actor.id(),
            from_state,
            to_state: transition.to_state().clone(),
        })
    }

    /// Transitions `actor` may take from the entity's current state
    pub fn available_transitions<E>(&self, actor: &Actor, entity: &E) -> Vec<&Transition>
    where
        E: LifecycleEntity + ?Sized,
    {
        let Some(current) = entity.current_state() else {
            return Vec::new();
        };
        self.table
            .transitions_from(current)
            .filter(|transition| {
                actor.has_permission(&Permission::use_transition(
                    self.workflow(),
                    transition.name(),
                ))
            })
            .collect()
    }

    fn check_source_state<E>(&self, transition: &Transition, entity: &E) -> Result<StateName, Denial>
    where
        E: LifecycleEntity + ?Sized,
    {
        let Some(current) = entity.current_state() else {
            return Err(Denial::illegal_state(format!(
                "{} has no lifecycle state in workflow '{}'",
                entity.entity_id(),
                self.workflow()
            )));
        };

        if !transition.is_legal_from(current) {
            return Err(Denial::illegal_state(format!(
                "transition '{}' is not allowed from state '{}'",
                transition.name(),
                current
            )));
        }

        Ok(current.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::{DenyReason, EntityKind, EntityNode};
    use crate::state_machine::LifecycleState;

    fn s(name: &str) -> StateName {
        StateName::new(name).unwrap()
    }

    fn t(name: &str) -> TransitionName {
        TransitionName::new(name).unwrap()
    }

    fn gate() -> TransitionGate {
        let table = TransitionTable::builder(WorkflowId::new("article").unwrap())
            .state(LifecycleState::initial(s("draft")))
            .state(LifecycleState::terminal(s("published")))
            .transition(Transition::new(t("publish"), [s("draft")], s("published")))
            .build()
            .unwrap();
        TransitionGate::new(Arc::new(table))
    }

    fn entity(state: &str) -> EntityNode {
        EntityNode::new(EntityId(1), EntityKind::Project).in_state(s(state))
    }

    fn publisher() -> Actor {
        Actor::new(ActorId(2)).with_permission("use article transition publish".parse().unwrap())
    }

    #[test]
    fn test_allows_with_permission_from_source_state() {
        let decision = gate().authorize(&publisher(), &entity("draft"), "publish");
        assert_eq!(decision, Decision::Allowed);
    }

    #[test]
    fn test_forbidden_without_permission() {
        let decision = gate().authorize(&Actor::new(ActorId(3)), &entity("draft"), "publish");
        assert_eq!(decision.reason(), Some(DenyReason::Forbidden));
    }

    #[test]
    fn test_illegal_state_even_with_permission() {
        let decision = gate().authorize(&publisher(), &entity("published"), "publish");
        assert_eq!(decision.reason(), Some(DenyReason::IllegalState));
    }

    #[test]
    fn test_unknown_and_empty_transition_names() {
        let actor = Actor::new(ActorId(3));
        for name in ["", "  ", "archive"] {
            let decision = gate().authorize(&actor, &entity("draft"), name);
            assert_eq!(decision.reason(), Some(DenyReason::InvalidTransition));
        }
    }

    #[test]
    fn test_entity_without_state_is_illegal_state() {
        let stateless = EntityNode::new(EntityId(5), EntityKind::Project);
        let decision = gate().authorize(&publisher(), &stateless, "publish");
        assert_eq!(decision.reason(), Some(DenyReason::IllegalState));
    }

    #[test]
    fn test_authorized_transition_payload() {
        let approved = gate()
            .authorize_transition(&publisher(), &entity("draft"), "publish")
            .unwrap();
        assert_eq!(approved.from_state, s("draft"));
        assert_eq!(approved.to_state, s("published"));
        assert_eq!(approved.actor, ActorId(2));

        let event = approved.completed_event();
        assert_eq!(event.entity, EntityId(1));
        assert_eq!(event.to_state, s("published"));
    }

    #[test]
    fn test_revalidate_detects_race() {
        let approved = gate()
            .authorize_transition(&publisher(), &entity("draft"), "publish")
            .unwrap();
        assert!(approved.revalidate(Some(&s("draft"))).is_ok());

        let late = approved.revalidate(Some(&s("published"))).unwrap_err();
        assert_eq!(late.reason, DenyReason::IllegalState);
        assert_eq!(
            approved.revalidate(None).unwrap_err().reason,
            DenyReason::IllegalState
        );
    }

    #[test]
    fn test_available_transitions() {
        let gate = gate();
        let names: Vec<&str> = gate
            .available_transitions(&publisher(), &entity("draft"))
            .into_iter()
            .map(|tr| tr.name().as_str())
            .collect();
        assert_eq!(names, vec!["publish"]);

        assert!(gate
            .available_transitions(&Actor::new(ActorId(3)), &entity("draft"))
            .is_empty());
        assert!(gate
            .available_transitions(&publisher(), &entity("published"))
            .is_empty());
    }
}
