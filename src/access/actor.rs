use super::entity::{ActorId, OrganizationId};
use super::permissions::{Permission, PermissionOracle, PermissionSet};
use std::collections::BTreeSet;

/// The account a decision is made for. Built per request from the session
/// and never stored by this crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    id: ActorId,
    permissions: PermissionSet,
    managed_organizations: BTreeSet<OrganizationId>,
}

impl Actor {
    pub fn new(id: ActorId) -> Self {
        Self {
            id,
            permissions: PermissionSet::new(),
            managed_organizations: BTreeSet::new(),
        }
    }

    pub fn with_permission(mut self, permission: Permission) -> Self {
        self.permissions.grant(permission);
        self
    }

    pub fn with_permissions(mut self, permissions: impl IntoIterator<Item = Permission>) -> Self {
        for permission in permissions {
            self.permissions.grant(permission);
        }
        self
    }

    /// Mark the actor as a manager of `organization`
    pub fn managing(mut self, organization: OrganizationId) -> Self {
        self.managed_organizations.insert(organization);
        self
    }

    pub fn id(&self) -> ActorId {
        self.id
    }

    pub fn permissions(&self) -> &PermissionSet {
        &self.permissions
    }

    pub fn manages(&self, organization: OrganizationId) -> bool {
        self.managed_organizations.contains(&organization)
    }
}

impl PermissionOracle for Actor {
    fn has_permission(&self, permission: &Permission) -> bool {
        self.permissions.has_permission(permission)
    }
}
