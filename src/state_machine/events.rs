use crate::access::{ActorId, EntityId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{StateName, TransitionName, WorkflowId};

/// Notification published by the workflow engine after it has committed an
/// authorized transition. Mailer notifications and stats consume it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionCompleted {
    pub workflow: WorkflowId,
    pub transition: TransitionName,
    pub entity: EntityId,
    pub actor: ActorId,
    pub from_state: StateName,
    pub to_state: StateName,
    pub occurred_at: DateTime<Utc>,
}

impl TransitionCompleted {
    pub const EVENT_NAME: &'static str = "lifecycle.transition_completed";

    /// Get a string representation of the event type for logging
    pub fn event_name(&self) -> &'static str {
        Self::EVENT_NAME
    }
}

/// Receiver of completion notifications, shared across threads like the
/// tables that produce them
pub trait EventSink: Send + Sync {
    fn publish(&self, event: &TransitionCompleted);
}

/// Sink that records completions in the structured log
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn publish(&self, event: &TransitionCompleted) {
        info!(
            event = event.event_name(),
            workflow = %event.workflow,
            transition = %event.transition,
            entity = %event.entity,
            actor = %event.actor,
            from_state = %event.from_state,
            to_state = %event.to_state,
            occurred_at = %event.occurred_at.to_rfc3339(),
            "Lifecycle transition completed"
        );
    }
}
