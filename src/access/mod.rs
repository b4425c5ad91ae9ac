//! # Access
//!
//! Authorization decisions layered on the lifecycle schema:
//!
//! - [`TransitionGate`] decides whether an actor may take a transition
//! - [`DependentAccessChecks`] decides access that depends on the lifecycle
//!   of a resource's ancestors
//!
//! Both are pure and synchronous. Denials are values ([`Decision`]), never
//! errors.

pub mod actor;
pub mod decision;
pub mod dependent;
pub mod entity;
pub mod gate;
pub mod permissions;
pub mod relationships;

pub use actor::Actor;
pub use decision::{Decision, Denial, DenyReason};
pub use dependent::{AccessPolicy, DependentAccessChecks};
pub use entity::{
    ActorId, EntityId, EntityKind, EntityNode, EntityStatus, LifecycleEntity, OrganizationId,
    OwnershipChain, Readiness, Resource,
};
pub use gate::{AuthorizedTransition, TransitionGate};
pub use permissions::{HttpMethod, Permission, PermissionOracle, PermissionSet};
pub use relationships::{
    standard_checks, ManagerCheck, OwnerCheck, ParticipantCheck, Relationship, RelationshipCheck,
};
