//! # Constants
//!
//! Workflow ids, state names and environment variable names shared between
//! the configuration loader, the CLI and the default access policy.

/// Workflow id of the project lifecycle
pub const PROJECT_WORKFLOW: &str = "project_lifecycle";

/// Workflow id of the feedback lifecycle
pub const FEEDBACK_WORKFLOW: &str = "feedback_lifecycle";

/// Project state names
pub mod project_states {
    pub const DRAFT: &str = "draft";
    pub const OPEN: &str = "open";
    pub const MEDIATED: &str = "mediated";
    pub const COMPLETED: &str = "completed";
}

/// Blanket permission that bypasses lifecycle readiness of ancestors
pub const DEFAULT_MANAGE_PERMISSION: &str = "administer lifecycle entities";

/// Default bound on ancestors walked for dependent access checks.
/// Paragraph -> Lecture -> Course is the deepest chain the platform builds.
pub const DEFAULT_MAX_CHAIN_DEPTH: usize = 4;

/// Environment variables consulted during configuration and logging setup
pub mod env_vars {
    pub const ENVIRONMENT: &str = "LIFECYCLE_GATE_ENV";
    pub const APP_ENVIRONMENT: &str = "APP_ENV";
    pub const CONFIG_DIR: &str = "LIFECYCLE_GATE_CONFIG_DIR";
    pub const LOG_FORMAT: &str = "LIFECYCLE_GATE_LOG_FORMAT";
}

/// Configuration file names searched in the config directory
pub const CONFIG_FILE_NAMES: [&str; 2] = ["lifecycle-gate.yaml", "lifecycle-gate.yml"];

/// Environment override sections recognized in the configuration file
pub const ENVIRONMENT_SECTIONS: [&str; 3] = ["development", "test", "production"];
