use lifecycle_gate::access::{
    Actor, ActorId, EntityId, EntityKind, EntityNode, HttpMethod, Permission,
};
use lifecycle_gate::state_machine::{StateName, TransitionName, WorkflowId};
use proptest::prelude::*;
use proptest::strategy::Just;

use super::builders::{manage_permission, project_workflow};

pub const PROJECT_STATES: [&str; 4] = ["draft", "open", "mediated", "completed"];
pub const PROJECT_TRANSITIONS: [&str; 4] = ["publish", "unpublish", "mediate", "complete"];

/// Strategy for valid identifier text
pub fn identifier_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,31}"
}

/// Any declared project state, or no state at all
pub fn project_state_strategy() -> impl Strategy<Value = Option<String>> {
    prop::option::weighted(
        0.9,
        prop::sample::select(PROJECT_STATES.to_vec()).prop_map(str::to_string),
    )
}

/// Declared transition names mixed with names the workflow does not know
pub fn transition_name_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => prop::sample::select(PROJECT_TRANSITIONS.to_vec()).prop_map(str::to_string),
        1 => identifier_strategy(),
        1 => Just(String::new()),
    ]
}

/// REST permissions with single-token resources
pub fn restful_permission_strategy() -> impl Strategy<Value = Permission> {
    let methods = prop::sample::select(vec![
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Patch,
        HttpMethod::Delete,
    ]);
    (methods, "[a-z][a-z_]{0,23}")
        .prop_map(|(method, resource)| Permission::restful(method, resource).unwrap())
}

/// Free-form permissions outside the transition and REST conventions
pub fn named_permission_strategy() -> impl Strategy<Value = Permission> {
    (
        prop::sample::select(vec!["administer", "access", "view", "edit"]),
        prop::collection::vec("[a-z][a-z_]{0,11}", 1..4),
    )
        .prop_map(|(verb, words)| {
            Permission::named(format!("{verb} {}", words.join(" "))).unwrap()
        })
}

/// Permissions an actor may hold: transition permissions for the project
/// workflow and a neighbouring one, plus the blanket manage permission
pub fn transition_permission_strategy() -> impl Strategy<Value = Permission> {
    let workflows = prop::sample::select(vec!["project_lifecycle", "feedback_lifecycle"]);
    let transitions = prop::sample::select(PROJECT_TRANSITIONS.to_vec());
    prop_oneof![
        4 => (workflows, transitions).prop_map(|(workflow, transition)| {
            Permission::use_transition(
                &WorkflowId::new(workflow).unwrap(),
                &TransitionName::new(transition).unwrap(),
            )
        }),
        1 => Just(manage_permission()),
    ]
}

/// Any permission form
pub fn permission_strategy() -> impl Strategy<Value = Permission> {
    prop_oneof![
        2 => transition_permission_strategy(),
        1 => restful_permission_strategy(),
        1 => named_permission_strategy(),
    ]
}

pub fn actor_strategy() -> impl Strategy<Value = Actor> {
    (1u64..50, prop::collection::vec(permission_strategy(), 0..6))
        .prop_map(|(id, permissions)| Actor::new(ActorId(id)).with_permissions(permissions))
}

pub fn project_strategy() -> impl Strategy<Value = EntityNode> {
    (1u64..1000, project_state_strategy()).prop_map(|(id, lifecycle_state)| {
        let node = EntityNode::new(EntityId(id), EntityKind::Project);
        match lifecycle_state {
            Some(name) => node.in_state(StateName::new(name).unwrap()),
            None => node,
        }
    })
}

/// Reference answer for the project workflow, computed without the gate
pub fn expected_allowed(actor: &Actor, entity: &EntityNode, transition: &str) -> bool {
    let table = project_workflow();
    let Some(declared) = table.find_transition(transition) else {
        return false;
    };
    let Some(current) = entity.status.lifecycle_state.as_ref() else {
        return false;
    };
    declared.from_states().contains(current)
        && actor.permissions().contains(&Permission::use_transition(
            table.workflow(),
            declared.name(),
        ))
}
