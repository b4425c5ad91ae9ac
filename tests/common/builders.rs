use lifecycle_gate::access::{
    Actor, ActorId, EntityId, EntityKind, EntityNode, HttpMethod, OrganizationId, OwnershipChain,
    Permission, Resource,
};
use lifecycle_gate::constants::project_states::{COMPLETED, DRAFT, MEDIATED, OPEN};
use lifecycle_gate::constants::PROJECT_WORKFLOW;
use lifecycle_gate::state_machine::{
    LifecycleState, StateName, Transition, TransitionName, TransitionTable, WorkflowId,
};

pub const MANAGE_PERMISSION: &str = "administer lifecycle entities";

pub fn state(name: &str) -> StateName {
    StateName::new(name).unwrap()
}

pub fn transition_name(name: &str) -> TransitionName {
    TransitionName::new(name).unwrap()
}

pub fn use_permission(workflow: &str, transition: &str) -> Permission {
    Permission::use_transition(
        &WorkflowId::new(workflow).unwrap(),
        &transition_name(transition),
    )
}

pub fn restful(method: HttpMethod, resource: &str) -> Permission {
    Permission::restful(method, resource).unwrap()
}

pub fn manage_permission() -> Permission {
    Permission::named(MANAGE_PERMISSION).unwrap()
}

/// Builder for transition tables used across tests
pub struct WorkflowBuilder {
    id: String,
    states: Vec<LifecycleState>,
    transitions: Vec<(String, Vec<String>, String)>,
}

impl WorkflowBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            states: Vec::new(),
            transitions: Vec::new(),
        }
    }

    pub fn initial(mut self, name: &str) -> Self {
        self.states.push(LifecycleState::initial(state(name)));
        self
    }

    pub fn state(mut self, name: &str) -> Self {
        self.states.push(LifecycleState::intermediate(state(name)));
        self
    }

    pub fn terminal(mut self, name: &str) -> Self {
        self.states.push(LifecycleState::terminal(state(name)));
        self
    }

    pub fn transition(mut self, name: &str, from: &[&str], to: &str) -> Self {
        self.transitions.push((
            name.to_string(),
            from.iter().map(|s| s.to_string()).collect(),
            to.to_string(),
        ));
        self
    }

    pub fn build(self) -> TransitionTable {
        let mut builder = TransitionTable::builder(WorkflowId::new(&self.id).unwrap());
        for lifecycle_state in self.states {
            builder = builder.state(lifecycle_state);
        }
        for (name, from, to) in self.transitions {
            builder = builder.transition(Transition::new(
                transition_name(&name),
                from.iter().map(|s| state(s)),
                state(&to),
            ));
        }
        builder.build().unwrap()
    }
}

/// The two-state article workflow: draft -> published
pub fn article_workflow() -> TransitionTable {
    WorkflowBuilder::new("article")
        .initial("draft")
        .terminal("published")
        .transition("publish", &["draft"], "published")
        .build()
}

/// Project lifecycle as shipped in config/lifecycle-gate.yaml
pub fn project_workflow() -> TransitionTable {
    WorkflowBuilder::new(PROJECT_WORKFLOW)
        .initial(DRAFT)
        .state(OPEN)
        .state(MEDIATED)
        .terminal(COMPLETED)
        .transition("publish", &[DRAFT], OPEN)
        .transition("unpublish", &[OPEN], DRAFT)
        .transition("mediate", &[OPEN], MEDIATED)
        .transition("complete", &[OPEN, MEDIATED], COMPLETED)
        .build()
}

pub fn actor(id: u64) -> Actor {
    Actor::new(ActorId(id))
}

pub fn project(id: u64, owner: u64, lifecycle_state: &str) -> EntityNode {
    EntityNode::new(EntityId(id), EntityKind::Project)
        .owned_by(ActorId(owner))
        .in_state(state(lifecycle_state))
}

/// Course -> lecture -> paragraph -> questionnaire -> submission, all ready
pub struct CourseTree {
    pub course_published: bool,
    pub lecture_published: bool,
    pub paragraph_enabled: bool,
    pub questionnaire_enabled: bool,
    pub submitter: u64,
}

impl Default for CourseTree {
    fn default() -> Self {
        Self {
            course_published: true,
            lecture_published: true,
            paragraph_enabled: true,
            questionnaire_enabled: true,
            submitter: 5,
        }
    }
}

impl CourseTree {
    pub fn submission(&self) -> Resource {
        OwnershipChain::new(
            EntityNode::new(EntityId(500), EntityKind::QuestionnaireSubmission)
                .owned_by(ActorId(self.submitter)),
            vec![
                EntityNode::new(EntityId(400), EntityKind::Questionnaire)
                    .enabled(self.questionnaire_enabled),
                EntityNode::new(EntityId(300), EntityKind::Paragraph)
                    .enabled(self.paragraph_enabled),
                EntityNode::new(EntityId(200), EntityKind::Lecture)
                    .published(self.lecture_published),
                EntityNode::new(EntityId(100), EntityKind::Course)
                    .published(self.course_published)
                    .in_organization(OrganizationId(9)),
            ],
            4,
        )
        .unwrap()
        .into()
    }
}

/// Feedback owned by `author` on a project in `project_state`
pub fn feedback_on_project(author: u64, project_owner: u64, project_state: &str) -> Resource {
    OwnershipChain::new(
        EntityNode::new(EntityId(2000), EntityKind::Feedback)
            .owned_by(ActorId(author))
            .published(true),
        vec![project(1000, project_owner, project_state).in_organization(OrganizationId(3))],
        4,
    )
    .unwrap()
    .into()
}
