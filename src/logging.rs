//! # Structured Logging Module
//!
//! Environment-aware structured logging for gate decisions and configuration
//! loading. Console output is human readable by default and switches to JSON
//! lines when `LIFECYCLE_GATE_LOG_FORMAT=json`.

use crate::access::{ActorId, Decision, EntityId};
use crate::constants::env_vars;
use chrono::Utc;
use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize structured logging with environment-specific configuration.
/// Safe to call more than once; only the first call installs a subscriber.
pub fn init_structured_logging() {
    LOGGER_INITIALIZED.get_or_init(|| {
        let environment = get_environment();
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(get_log_level(&environment)));
        let json = wants_json_output();

        let console = if json {
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_ansi(false)
                .json()
                .boxed()
        } else {
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_level(true)
                .with_ansi(true)
                .boxed()
        };

        // Use try_init to avoid panic if global subscriber already set
        if tracing_subscriber::registry()
            .with(console.with_filter(filter))
            .try_init()
            .is_err()
        {
            tracing::debug!("Global tracing subscriber already initialized - continuing with existing subscriber");
        }

        tracing::info!(
            environment = %environment,
            json = json,
            "Structured logging initialized"
        );
    });
}

/// Get current environment from environment variables
pub fn get_environment() -> String {
    std::env::var(env_vars::ENVIRONMENT)
        .or_else(|_| std::env::var(env_vars::APP_ENVIRONMENT))
        .unwrap_or_else(|_| "development".to_string())
        .to_lowercase()
}

/// Get log level based on environment
fn get_log_level(environment: &str) -> String {
    match environment {
        "test" => "debug".to_string(),
        "development" => "debug".to_string(),
        "production" => "info".to_string(),
        _ => "debug".to_string(),
    }
}

fn wants_json_output() -> bool {
    std::env::var(env_vars::LOG_FORMAT).is_ok_and(|format| format.eq_ignore_ascii_case("json"))
}

/// Log an authorization decision.
///
/// Allowed decisions log at debug, denials at info, neutral results at trace.
pub fn log_gate_decision(
    component: &str,
    scope: &str,
    action: &str,
    entity: EntityId,
    actor: ActorId,
    decision: &Decision,
) {
    let timestamp = Utc::now().to_rfc3339();
    match decision {
        Decision::Allowed => tracing::debug!(
            component = %component,
            scope = %scope,
            action = %action,
            entity = %entity,
            actor = %actor,
            decision = decision.label(),
            timestamp = %timestamp,
            "GATE_DECISION"
        ),
        Decision::Denied(denial) => tracing::info!(
            component = %component,
            scope = %scope,
            action = %action,
            entity = %entity,
            actor = %actor,
            decision = decision.label(),
            reason = denial.reason.code(),
            details = %denial.message,
            timestamp = %timestamp,
            "GATE_DECISION"
        ),
        Decision::Neutral => tracing::trace!(
            component = %component,
            scope = %scope,
            action = %action,
            entity = %entity,
            actor = %actor,
            decision = decision.label(),
            timestamp = %timestamp,
            "GATE_DECISION"
        ),
    }
}

/// Log error with full context
pub fn log_error(component: &str, operation: &str, error: &str, context: Option<&str>) {
    tracing::error!(
        component = %component,
        operation = %operation,
        error = %error,
        context = context,
        timestamp = %Utc::now().to_rfc3339(),
        "ERROR"
    );
}

/// Log configuration events with a uniform field layout
#[macro_export]
macro_rules! log_config {
    ($level:ident, $operation:expr $(,)?) => {
        tracing::$level!(
            operation = %$operation,
            timestamp = %chrono::Utc::now().to_rfc3339(),
            "{}", $operation
        );
    };
    ($level:ident, $operation:expr, $($key:ident: $value:expr),+ $(,)?) => {
        tracing::$level!(
            operation = %$operation,
            $($key = ?$value,)*
            timestamp = %chrono::Utc::now().to_rfc3339(),
            "{}", $operation
        );
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::DenyReason;

    #[test]
    fn test_log_level_mapping() {
        assert_eq!(get_log_level("test"), "debug");
        assert_eq!(get_log_level("development"), "debug");
        assert_eq!(get_log_level("production"), "info");
        assert_eq!(get_log_level("unknown"), "debug");
    }

    #[test]
    fn test_logging_helpers_do_not_panic() {
        init_structured_logging();
        init_structured_logging();

        for decision in [
            Decision::Allowed,
            Decision::denied(DenyReason::Forbidden, "missing permission"),
            Decision::Neutral,
        ] {
            log_gate_decision(
                "transition_gate",
                "project_lifecycle",
                "publish",
                EntityId(1),
                ActorId(2),
                &decision,
            );
        }
        log_error("config", "load", "file missing", Some("test"));
        crate::log_config!(info, "Configuration loaded", workflows: 2);
    }
}
