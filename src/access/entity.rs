//! Entities and ownership chains
//!
//! Entities reach this crate already loaded: callers describe the resource
//! under check plus its ancestors, and the crate validates the shape once in
//! [`OwnershipChain::new`]. Entity subtypes are resolved into [`EntityKind`]
//! at the boundary; anything else becomes [`Resource::Unrecognized`].

use crate::error::{GateError, GateResult};
use crate::state_machine::StateName;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fmt;

crate::numeric_id! {
    /// Identifier of a content entity
    EntityId, "entity"
}

crate::numeric_id! {
    /// Identifier of a user account
    ActorId, "actor"
}

crate::numeric_id! {
    /// Identifier of an organization that owns projects
    OrganizationId, "organization"
}

/// Entity kinds the access checks understand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Project,
    Feedback,
    Course,
    Lecture,
    Paragraph,
    Questionnaire,
    QuestionnaireSubmission,
}

/// Predicate an entity must satisfy before its descendants become accessible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Readiness {
    Published,
    Enabled,
    Completed,
}

impl fmt::Display for Readiness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Published => write!(f, "published"),
            Self::Enabled => write!(f, "enabled"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

impl EntityKind {
    pub const ALL: [EntityKind; 7] = [
        Self::Project,
        Self::Feedback,
        Self::Course,
        Self::Lecture,
        Self::Paragraph,
        Self::Questionnaire,
        Self::QuestionnaireSubmission,
    ];

    /// Resolve a host bundle name; unknown bundles yield `None`
    pub fn from_bundle(bundle: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == bundle.trim())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Feedback => "feedback",
            Self::Course => "course",
            Self::Lecture => "lecture",
            Self::Paragraph => "paragraph",
            Self::Questionnaire => "questionnaire",
            Self::QuestionnaireSubmission => "questionnaire_submission",
        }
    }

    /// Readiness predicate applied when this kind appears as an ancestor
    pub fn readiness(&self) -> Readiness {
        match self {
            Self::Project => Readiness::Completed,
            Self::Course | Self::Lecture | Self::Feedback | Self::QuestionnaireSubmission => {
                Readiness::Published
            }
            Self::Paragraph | Self::Questionnaire => Readiness::Enabled,
        }
    }

    /// Kind of the ancestor whose relationships govern access to this kind.
    /// `None` means the resource itself.
    pub fn relationship_anchor(&self) -> Option<EntityKind> {
        match self {
            Self::Feedback => Some(Self::Project),
            _ => None,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle-relevant flags of an entity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityStatus {
    pub lifecycle_state: Option<StateName>,
    pub published: bool,
    pub enabled: bool,
}

/// A loaded entity together with its relationship data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityNode {
    pub id: EntityId,
    pub kind: EntityKind,
    pub owner: Option<ActorId>,
    #[serde(default)]
    pub participants: BTreeSet<ActorId>,
    /// Organization the owner belongs to
    pub organization: Option<OrganizationId>,
    #[serde(default)]
    pub status: EntityStatus,
}

impl EntityNode {
    pub fn new(id: EntityId, kind: EntityKind) -> Self {
        Self {
            id,
            kind,
            owner: None,
            participants: BTreeSet::new(),
            organization: None,
            status: EntityStatus::default(),
        }
    }

    pub fn owned_by(mut self, owner: ActorId) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn with_participant(mut self, participant: ActorId) -> Self {
        self.participants.insert(participant);
        self
    }

    pub fn in_organization(mut self, organization: OrganizationId) -> Self {
        self.organization = Some(organization);
        self
    }

    pub fn in_state(mut self, state: StateName) -> Self {
        self.status.lifecycle_state = Some(state);
        self
    }

    pub fn published(mut self, published: bool) -> Self {
        self.status.published = published;
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.status.enabled = enabled;
        self
    }
}

/// Anything that sits in a workflow and exposes its current state
pub trait LifecycleEntity {
    fn entity_id(&self) -> EntityId;

    /// Current state, or `None` if the entity never entered the workflow
    fn current_state(&self) -> Option<&StateName>;
}

impl LifecycleEntity for EntityNode {
    fn entity_id(&self) -> EntityId {
        self.id
    }

    fn current_state(&self) -> Option<&StateName> {
        self.status.lifecycle_state.as_ref()
    }
}

/// A resource followed by its ancestors, nearest first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnershipChain {
    nodes: Vec<EntityNode>,
}

impl OwnershipChain {
    /// Build a chain, enforcing the depth bound and rejecting repeated entities
    pub fn new(
        resource: EntityNode,
        ancestors: Vec<EntityNode>,
        max_depth: usize,
    ) -> GateResult<Self> {
        if ancestors.len() > max_depth {
            return Err(GateError::ChainTooDeep {
                entity: resource.id,
                depth: ancestors.len(),
                max_depth,
            });
        }

        let mut seen = HashSet::with_capacity(ancestors.len() + 1);
        seen.insert(resource.id);
        for ancestor in &ancestors {
            if !seen.insert(ancestor.id) {
                return Err(GateError::ChainCycle {
                    entity: resource.id,
                    repeated: ancestor.id,
                });
            }
        }

        let mut nodes = Vec::with_capacity(ancestors.len() + 1);
        nodes.push(resource);
        nodes.extend(ancestors);
        Ok(Self { nodes })
    }

    /// Chain with no ancestors
    pub fn single(resource: EntityNode) -> Self {
        Self {
            nodes: vec![resource],
        }
    }

    pub fn resource(&self) -> &EntityNode {
        &self.nodes[0]
    }

    pub fn ancestors(&self) -> &[EntityNode] {
        &self.nodes[1..]
    }

    /// Nearest ancestor of the given kind
    pub fn nearest(&self, kind: EntityKind) -> Option<&EntityNode> {
        self.ancestors().iter().find(|node| node.kind == kind)
    }

    /// Node whose relationships decide access to the resource
    pub fn relationship_anchor(&self) -> Option<&EntityNode> {
        match self.resource().kind.relationship_anchor() {
            Some(kind) => self.nearest(kind),
            None => Some(self.resource()),
        }
    }

    pub fn depth(&self) -> usize {
        self.nodes.len() - 1
    }
}

/// Resource under an access check, resolved once at the boundary
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    Entity(OwnershipChain),
    /// A bundle this crate has no rules for
    Unrecognized(String),
}

impl Resource {
    /// Resolve a host bundle name. Unknown bundles become `Unrecognized`
    /// without inspecting the supplied nodes.
    pub fn resolve(
        bundle: &str,
        build: impl FnOnce(EntityKind) -> GateResult<OwnershipChain>,
    ) -> GateResult<Self> {
        match EntityKind::from_bundle(bundle) {
            Some(kind) => build(kind).map(Self::Entity),
            None => Ok(Self::Unrecognized(bundle.to_string())),
        }
    }

    pub fn chain(&self) -> Option<&OwnershipChain> {
        match self {
            Self::Entity(chain) => Some(chain),
            Self::Unrecognized(_) => None,
        }
    }
}

impl From<OwnershipChain> for Resource {
    fn from(chain: OwnershipChain) -> Self {
        Self::Entity(chain)
    }
}
