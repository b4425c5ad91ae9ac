//! # Dependent Access Checks
//!
//! Access rules whose outcome depends on the lifecycle of related entities:
//! feedback can only be submitted once its project is completed, and a
//! questionnaire answer only while the owning course and lecture are
//! published. The combined rule is
//!
//! ```text
//! allowed = has(required) AND ancestors ready AND relationship(actor, anchor)
//! ```
//!
//! Holders of the blanket manage permission skip the readiness of ancestors
//! but never the required permission.

use super::actor::Actor;
use super::decision::{Decision, Denial};
use super::entity::{EntityKind, EntityNode, OwnershipChain, Readiness, Resource};
use super::permissions::{Permission, PermissionOracle};
use super::relationships::{first_relationship, standard_checks, RelationshipCheck};
use crate::constants::DEFAULT_MAX_CHAIN_DEPTH;
use crate::error::GateResult;
use crate::logging::log_gate_decision;
use crate::state_machine::StateName;
use std::collections::BTreeSet;
use std::fmt;
use tracing::trace;

/// Policy values that come from configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessPolicy {
    /// Blanket permission that bypasses ancestor readiness
    pub manage_permission: Permission,
    /// Project states that count as completed
    pub completed_states: BTreeSet<StateName>,
    /// Most ancestors a chain may carry
    pub max_chain_depth: usize,
}

impl AccessPolicy {
    pub fn new(
        manage_permission: Permission,
        completed_states: impl IntoIterator<Item = StateName>,
    ) -> Self {
        Self {
            manage_permission,
            completed_states: completed_states.into_iter().collect(),
            max_chain_depth: DEFAULT_MAX_CHAIN_DEPTH,
        }
    }

    pub fn with_max_chain_depth(mut self, max_chain_depth: usize) -> Self {
        self.max_chain_depth = max_chain_depth;
        self
    }

    /// Build an ownership chain bounded by this policy
    pub fn chain(&self, resource: EntityNode, ancestors: Vec<EntityNode>) -> GateResult<OwnershipChain> {
        OwnershipChain::new(resource, ancestors, self.max_chain_depth)
    }

    /// Evaluate the readiness predicate of `node`'s kind
    pub fn is_ready(&self, node: &EntityNode) -> bool {
        match node.kind.readiness() {
            Readiness::Published => node.status.published,
            Readiness::Enabled => node.status.enabled,
            Readiness::Completed => node
                .status
                .lifecycle_state
                .as_ref()
                .is_some_and(|state| self.completed_states.contains(state)),
        }
    }
}

pub struct DependentAccessChecks {
    policy: AccessPolicy,
    relationship_checks: Vec<Box<dyn RelationshipCheck>>,
}

impl fmt::Debug for DependentAccessChecks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let checks: Vec<_> = self
            .relationship_checks
            .iter()
            .map(|check| check.description())
            .collect();
        f.debug_struct("DependentAccessChecks")
            .field("policy", &self.policy)
            .field("relationship_checks", &checks)
            .finish()
    }
}

impl DependentAccessChecks {
    /// Checks with the owner, participant and manager relationships
    pub fn new(policy: AccessPolicy) -> Self {
        Self::with_relationship_checks(policy, standard_checks())
    }

    pub fn with_relationship_checks(
        policy: AccessPolicy,
        relationship_checks: Vec<Box<dyn RelationshipCheck>>,
    ) -> Self {
        Self {
            policy,
            relationship_checks,
        }
    }

    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    /// Resolve a host bundle into a resource whose chain respects the
    /// configured depth. `load` returns the resource node and its ancestors,
    /// nearest first, and is only called for recognized bundles.
    pub fn resolve(
        &self,
        bundle: &str,
        load: impl FnOnce(EntityKind) -> GateResult<(EntityNode, Vec<EntityNode>)>,
    ) -> GateResult<Resource> {
        Resource::resolve(bundle, |kind| {
            let (resource, ancestors) = load(kind)?;
            self.policy.chain(resource, ancestors)
        })
    }

    /// Decide access to `resource` for `actor` requiring `required`.
    /// Returns `Neutral` for resources this crate has no rules for.
    pub fn check_access(&self, actor: &Actor, resource: &Resource, required: &Permission) -> Decision {
        let Resource::Entity(chain) = resource else {
            trace!(?resource, "No dependent access rules for resource");
            return Decision::Neutral;
        };

        let decision = Decision::from(self.evaluate(actor, chain, required));
        let node = chain.resource();
        log_gate_decision(
            "dependent_access",
            node.kind.as_str(),
            &required.to_string(),
            node.id,
            actor.id(),
            &decision,
        );
        decision
    }

    fn evaluate(&self, actor: &Actor, chain: &OwnershipChain, required: &Permission) -> Result<(), Denial> {
        if chain.depth() > self.policy.max_chain_depth {
            return Err(Denial::forbidden(format!(
                "{} {} has {} ancestors, more than the allowed {}",
                chain.resource().kind,
                chain.resource().id,
                chain.depth(),
                self.policy.max_chain_depth
            )));
        }

        if !actor.has_permission(required) {
            return Err(Denial::forbidden(format!(
                "{} lacks permission '{}'",
                actor.id(),
                required
            )));
        }

        if !actor.has_permission(&self.policy.manage_permission) {
            if let Some(blocking) = chain
                .ancestors()
                .iter()
                .find(|ancestor| !self.policy.is_ready(ancestor))
            {
                return Err(Denial::forbidden(format!(
                    "{} {} is not {}",
                    blocking.kind,
                    blocking.id,
                    blocking.kind.readiness()
                )));
            }
        }

        let resource = chain.resource();
        let Some(anchor) = chain.relationship_anchor() else {
            return Err(Denial::forbidden(format!(
                "{} {} has no related {}",
                resource.kind,
                resource.id,
                resource
                    .kind
                    .relationship_anchor()
                    .map_or("owner", |kind| kind.as_str())
            )));
        };

        match first_relationship(&self.relationship_checks, actor, anchor) {
            Some(relationship) => {
                trace!(actor = %actor.id(), anchor = %anchor.id, %relationship, "Relationship satisfied");
                Ok(())
            }
            None => Err(Denial::forbidden(format!(
                "{} is not owner, participant or manager of {} {}",
                actor.id(),
                anchor.kind,
                anchor.id
            ))),
        }
    }
}
