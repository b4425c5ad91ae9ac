// State machine schema for entity lifecycles
//
// Declares workflow states and transitions. Execution of transitions belongs
// to the host workflow engine; this module only describes what is legal.

pub mod events;
pub mod registry;
pub mod states;
pub mod transitions;

// Re-export main types for convenient access
pub use events::{EventSink, TracingEventSink, TransitionCompleted};
pub use registry::WorkflowRegistry;
pub use states::{LifecycleState, StateName};
pub use transitions::{
    Transition, TransitionName, TransitionTable, TransitionTableBuilder, WorkflowId,
};
