//! Relationship checks
//!
//! An actor relates to an entity as its owner, as a declared participant, or
//! as a manager of the organization the owner belongs to. Each relationship
//! is a [`RelationshipCheck`]; dependent access accepts any one of them.

use super::actor::Actor;
use super::entity::EntityNode;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relationship {
    Owner,
    Participant,
    Manager,
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Owner => write!(f, "owner"),
            Self::Participant => write!(f, "participant"),
            Self::Manager => write!(f, "manager"),
        }
    }
}

/// Trait for implementing relationship checks between an actor and an entity
pub trait RelationshipCheck: Send + Sync {
    fn holds(&self, actor: &Actor, entity: &EntityNode) -> bool;

    fn relationship(&self) -> Relationship;

    /// Get a description of this check for logging
    fn description(&self) -> &'static str;
}

/// Actor owns the entity
pub struct OwnerCheck;

impl RelationshipCheck for OwnerCheck {
    fn holds(&self, actor: &Actor, entity: &EntityNode) -> bool {
        entity.owner == Some(actor.id())
    }

    fn relationship(&self) -> Relationship {
        Relationship::Owner
    }

    fn description(&self) -> &'static str {
        "Actor must own the entity"
    }
}

/// Actor is a declared participant of the entity
pub struct ParticipantCheck;

impl RelationshipCheck for ParticipantCheck {
    fn holds(&self, actor: &Actor, entity: &EntityNode) -> bool {
        entity.participants.contains(&actor.id())
    }

    fn relationship(&self) -> Relationship {
        Relationship::Participant
    }

    fn description(&self) -> &'static str {
        "Actor must participate in the entity"
    }
}

/// Actor manages the organization of the entity's owner
pub struct ManagerCheck;

impl RelationshipCheck for ManagerCheck {
    fn holds(&self, actor: &Actor, entity: &EntityNode) -> bool {
        entity
            .organization
            .is_some_and(|organization| actor.manages(organization))
    }

    fn relationship(&self) -> Relationship {
        Relationship::Manager
    }

    fn description(&self) -> &'static str {
        "Actor must manage the owner's organization"
    }
}

/// Owner, participant and manager checks, in that order
pub fn standard_checks() -> Vec<Box<dyn RelationshipCheck>> {
    vec![
        Box::new(OwnerCheck),
        Box::new(ParticipantCheck),
        Box::new(ManagerCheck),
    ]
}

/// First relationship among `checks` that holds
pub fn first_relationship(
    checks: &[Box<dyn RelationshipCheck>],
    actor: &Actor,
    entity: &EntityNode,
) -> Option<Relationship> {
    checks
        .iter()
        .find(|check| check.holds(actor, entity))
        .map(|check| check.relationship())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::{ActorId, EntityId, EntityKind, OrganizationId};

    fn project() -> EntityNode {
        EntityNode::new(EntityId(1), EntityKind::Project)
            .owned_by(ActorId(10))
            .with_participant(ActorId(20))
            .in_organization(OrganizationId(5))
    }

    #[test]
    fn test_each_relationship() {
        let project = project();
        assert!(OwnerCheck.holds(&Actor::new(ActorId(10)), &project));
        assert!(!OwnerCheck.holds(&Actor::new(ActorId(20)), &project));
        assert!(ParticipantCheck.holds(&Actor::new(ActorId(20)), &project));
        assert!(ManagerCheck.holds(&Actor::new(ActorId(30)).managing(OrganizationId(5)), &project));
        assert!(!ManagerCheck.holds(&Actor::new(ActorId(30)).managing(OrganizationId(6)), &project));
    }

    #[test]
    fn test_manager_needs_an_organization() {
        let unaffiliated = EntityNode::new(EntityId(2), EntityKind::Project).owned_by(ActorId(10));
        let manager = Actor::new(ActorId(30)).managing(OrganizationId(5));
        assert!(!ManagerCheck.holds(&manager, &unaffiliated));
    }

    #[test]
    fn test_first_relationship() {
        let checks = standard_checks();
        let project = project();
        assert_eq!(
            first_relationship(&checks, &Actor::new(ActorId(10)), &project),
            Some(Relationship::Owner)
        );
        assert_eq!(
            first_relationship(&checks, &Actor::new(ActorId(20)), &project),
            Some(Relationship::Participant)
        );
        assert_eq!(
            first_relationship(&checks, &Actor::new(ActorId(99)), &project),
            None
        );
    }

    #[test]
    fn test_check_descriptions() {
        assert_eq!(OwnerCheck.description(), "Actor must own the entity");
        assert_eq!(ManagerCheck.relationship().to_string(), "manager");
    }
}
