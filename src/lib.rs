#![allow(clippy::doc_markdown)] // Allow technical terms like JSON:API, YAML in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Lifecycle Gate
//!
//! Transition gating and lifecycle-dependent access control for projects,
//! feedback, courses and questionnaires.
//!
//! ## Overview
//!
//! Entities on the platform move through declared lifecycles (a project goes
//! from `draft` to `open` to `completed`). This crate decides two things:
//!
//! - whether an actor may take a named transition on an entity, and
//! - whether an actor may act on a resource whose ancestors must first reach
//!   a given lifecycle stage (feedback needs a completed project, a
//!   questionnaire answer needs a published course and lecture).
//!
//! Persistence, transport and the workflow engine that performs the state
//! mutation live outside this crate. Everything here is a pure synchronous
//! computation over loaded data.
//!
//! ## Module Organization
//!
//! - [`state_machine`] - States, transition tables and the workflow registry
//! - [`access`] - Transition gate, dependent access checks and decisions
//! - [`config`] - YAML configuration with environment overrides
//! - [`logging`] - Structured logging setup and decision logging
//! - [`error`] - Structured error handling
//!
//! ## Quick Start
//!
//! ```rust
//! use lifecycle_gate::access::{Actor, ActorId, EntityId, EntityKind, EntityNode, Permission};
//! use lifecycle_gate::state_machine::{LifecycleState, StateName, Transition, TransitionName,
//!     TransitionTable, WorkflowId};
//! use lifecycle_gate::access::TransitionGate;
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let workflow = WorkflowId::new("article")?;
//! let table = TransitionTable::builder(workflow.clone())
//!     .state(LifecycleState::initial(StateName::new("draft")?))
//!     .state(LifecycleState::terminal(StateName::new("published")?))
//!     .transition(Transition::new(
//!         TransitionName::new("publish")?,
//!         [StateName::new("draft")?],
//!         StateName::new("published")?,
//!     ))
//!     .build()?;
//! let gate = TransitionGate::new(Arc::new(table));
//!
//! let editor = Actor::new(ActorId(7)).with_permission(Permission::use_transition(
//!     &workflow,
//!     &TransitionName::new("publish")?,
//! ));
//! let article = EntityNode::new(EntityId(1), EntityKind::Project)
//!     .in_state(StateName::new("draft")?);
//!
//! assert!(gate.authorize(&editor, &article, "publish").is_allowed());
//! # Ok(())
//! # }
//! ```

#[macro_use]
pub mod macros;

pub mod access;
pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod state_machine;

pub use access::{
    AccessPolicy, Actor, ActorId, AuthorizedTransition, Decision, Denial, DenyReason,
    DependentAccessChecks, EntityId, EntityKind, EntityNode, OrganizationId, OwnershipChain,
    Permission, PermissionOracle, PermissionSet, Resource, TransitionGate,
};
pub use config::{ConfigManager, ConfigResult, ConfigurationError, GateConfig};
pub use error::{GateError, GateResult};
pub use state_machine::{
    EventSink, LifecycleState, StateName, TracingEventSink, Transition, TransitionCompleted,
    TransitionName, TransitionTable, WorkflowId, WorkflowRegistry,
};
