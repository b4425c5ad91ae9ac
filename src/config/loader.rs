//! Configuration Loader
//!
//! Environment-aware configuration loading. Handles YAML file discovery,
//! environment detection and merging of environment override sections, then
//! builds the workflow registry. Any invalid declaration fails the load.

use super::error::{ConfigResult, ConfigurationError};
use super::GateConfig;
use crate::access::{DependentAccessChecks, TransitionGate};
use crate::constants::{env_vars, CONFIG_FILE_NAMES, ENVIRONMENT_SECTIONS};
use crate::state_machine::WorkflowRegistry;
use serde_yaml::Value as YamlValue;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Loaded configuration together with the registry built from it
#[derive(Debug)]
pub struct ConfigManager {
    config: GateConfig,
    registry: WorkflowRegistry,
    environment: String,
    config_directory: PathBuf,
}

impl ConfigManager {
    /// Load configuration with environment auto-detection
    pub fn load() -> ConfigResult<Arc<ConfigManager>> {
        Self::load_from_directory(None)
    }

    /// Load configuration from a specific directory
    pub fn load_from_directory(config_dir: Option<PathBuf>) -> ConfigResult<Arc<ConfigManager>> {
        let environment = Self::detect_environment();
        Self::load_from_directory_with_env(config_dir, &environment)
    }

    /// Load configuration from a specific directory with explicit environment
    /// This is useful for testing without modifying global environment variables
    pub fn load_from_directory_with_env(
        config_dir: Option<PathBuf>,
        environment: &str,
    ) -> ConfigResult<Arc<ConfigManager>> {
        let config_directory = config_dir.unwrap_or_else(Self::default_config_directory);

        debug!(
            "Loading configuration for environment '{}' from directory: {}",
            environment,
            config_directory.display()
        );

        let config_file = Self::find_config_file(&config_directory)?;
        let yaml_content = Self::read_config_file_safely(&config_file)?;
        let manager = Self::from_yaml(
            &yaml_content,
            &config_file.display().to_string(),
            environment,
            config_directory,
        )?;
        Ok(Arc::new(manager))
    }

    /// Load configuration from YAML text, as if read from `source`
    pub fn load_from_str(yaml: &str, environment: &str) -> ConfigResult<Arc<ConfigManager>> {
        Self::from_yaml(yaml, "<inline>", environment, PathBuf::from("."))
            .map(Arc::new)
    }

    fn from_yaml(
        yaml: &str,
        source: &str,
        environment: &str,
        config_directory: PathBuf,
    ) -> ConfigResult<ConfigManager> {
        let config = Self::parse_and_merge(yaml, source, environment)?;

        // Validate the loaded configuration before anything is registered
        config.validate()?;
        let registry = config.build_registry()?;

        debug!(
            "Configuration loaded successfully: {}",
            serde_json::to_string_pretty(&config)
                .unwrap_or_else(|_| "[serialization error]".to_string())
        );

        crate::log_config!(info, "Configuration loaded successfully",
            environment: environment,
            source: source,
            workflows: registry.len()
        );

        Ok(ConfigManager {
            config,
            registry,
            environment: environment.to_string(),
            config_directory,
        })
    }

    /// Get the loaded configuration
    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    pub fn registry(&self) -> &WorkflowRegistry {
        &self.registry
    }

    /// Gate for one declared workflow
    pub fn gate_for(&self, workflow: &str) -> ConfigResult<TransitionGate> {
        Ok(self.registry.gate_for(workflow)?)
    }

    /// Dependent access checks using the configured policy
    pub fn dependent_access_checks(&self) -> DependentAccessChecks {
        DependentAccessChecks::new(self.config.access_policy())
    }

    /// Ancestor bound enforced by [`dependent_access_checks`](Self::dependent_access_checks)
    pub fn max_chain_depth(&self) -> usize {
        self.config.access.max_chain_depth
    }

    /// Configuration as JSON, for diagnostics
    pub fn debug_config(&self) -> serde_json::Value {
        serde_json::to_value(&self.config).unwrap_or(serde_json::Value::Null)
    }

    /// Get the current environment
    pub fn environment(&self) -> &str {
        &self.environment
    }

    /// Get the configuration directory
    pub fn config_directory(&self) -> &Path {
        &self.config_directory
    }

    /// Detect current environment from environment variables
    pub fn detect_environment() -> String {
        crate::logging::get_environment()
    }

    /// Configuration directory from `LIFECYCLE_GATE_CONFIG_DIR`, else `./config`
    fn default_config_directory() -> PathBuf {
        env::var(env_vars::CONFIG_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config"))
    }

    /// Find the configuration file
    fn find_config_file(config_directory: &Path) -> ConfigResult<PathBuf> {
        let mut searched_paths = Vec::new();

        for name in CONFIG_FILE_NAMES {
            let config_path = config_directory.join(name);
            searched_paths.push(config_path.clone());

            if config_path.exists() {
                debug!("Found configuration file: {}", config_path.display());
                return Ok(config_path);
            }
        }

        Err(ConfigurationError::config_file_not_found(searched_paths))
    }

    /// Safely read a configuration file with a size limit
    fn read_config_file_safely(path: &Path) -> ConfigResult<String> {
        const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024; // 1MB limit

        let metadata = std::fs::metadata(path)
            .map_err(|e| ConfigurationError::file_read_error(path.display().to_string(), e))?;

        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigurationError::invalid_value(
                "file_size",
                metadata.len().to_string(),
                format!(
                    "Configuration file too large ({} bytes > {} bytes limit)",
                    metadata.len(),
                    MAX_CONFIG_FILE_SIZE
                ),
            ));
        }

        if !metadata.is_file() {
            return Err(ConfigurationError::invalid_value(
                "file_type",
                "directory or special file",
                "Configuration path must point to a regular file",
            ));
        }

        std::fs::read_to_string(path)
            .map_err(|e| ConfigurationError::file_read_error(path.display().to_string(), e))
    }

    /// Parse YAML and merge the section for `environment` over the base
    fn parse_and_merge(yaml: &str, source: &str, environment: &str) -> ConfigResult<GateConfig> {
        let mut yaml_data: YamlValue =
            serde_yaml::from_str(yaml).map_err(|e| ConfigurationError::invalid_yaml(source, e))?;

        if let Some(env_overrides) = yaml_data
            .get(YamlValue::String(environment.to_string()))
            .cloned()
        {
            debug!("Applying environment-specific overrides for: {}", environment);
            Self::merge_yaml_values(&mut yaml_data, env_overrides);
        }

        // Remove environment sections to avoid confusion
        if let YamlValue::Mapping(ref mut map) = yaml_data {
            for section in ENVIRONMENT_SECTIONS {
                map.remove(YamlValue::String(section.to_string()));
            }
            map.remove(YamlValue::String(environment.to_string()));
        }

        serde_yaml::from_value(yaml_data).map_err(|e| {
            ConfigurationError::invalid_yaml(
                source,
                format!("Failed to deserialize configuration: {e}"),
            )
        })
    }

    /// Deep merge: mappings merge key by key, everything else is replaced
    fn merge_yaml_values(base: &mut YamlValue, override_value: YamlValue) {
        match (&mut *base, override_value) {
            (YamlValue::Mapping(base_map), YamlValue::Mapping(override_map)) => {
                for (key, value) in override_map {
                    if let Some(existing_value) = base_map.get_mut(&key) {
                        // Recursively merge nested objects
                        Self::merge_yaml_values(existing_value, value);
                    } else {
                        base_map.insert(key, value);
                    }
                }
            }
            (base_ref, override_val) => {
                *base_ref = override_val;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"
workflows:
  - id: project_lifecycle
    states:
      - { name: draft, initial: true }
      - { name: completed, terminal: true }
    transitions:
      - { name: complete, from: [draft], to: completed }
access:
  max_chain_depth: 4
test:
  access:
    max_chain_depth: 2
"#;

    #[test]
    fn test_environment_override_applied() {
        let manager = ConfigManager::load_from_str(CONFIG, "test").unwrap();
        assert_eq!(manager.max_chain_depth(), 2);
        assert_eq!(manager.environment(), "test");

        let manager = ConfigManager::load_from_str(CONFIG, "production").unwrap();
        assert_eq!(manager.max_chain_depth(), 4);
    }

    #[test]
    fn test_merge_yaml_values() {
        let mut base: YamlValue = serde_yaml::from_str("a: { b: 1, c: 2 }\nlist: [1, 2]").unwrap();
        let overrides: YamlValue = serde_yaml::from_str("a: { c: 3, d: 4 }\nlist: [9]").unwrap();
        ConfigManager::merge_yaml_values(&mut base, overrides);

        let expected: YamlValue =
            serde_yaml::from_str("a: { b: 1, c: 3, d: 4 }\nlist: [9]").unwrap();
        assert_eq!(base, expected);
    }

    #[test]
    fn test_invalid_yaml_reports_source() {
        let err = ConfigManager::load_from_str("workflows: [", "test").unwrap_err();
        match err {
            ConfigurationError::InvalidYaml { file_path, .. } => assert_eq!(file_path, "<inline>"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_file_lists_searched_paths() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = ConfigManager::load_from_directory_with_env(Some(dir.path().to_path_buf()), "test")
            .unwrap_err();
        match err {
            ConfigurationError::ConfigFileNotFound { searched_paths } => {
                assert_eq!(searched_paths.len(), CONFIG_FILE_NAMES.len())
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_accessors() {
        let manager = ConfigManager::load_from_str(CONFIG, "development").unwrap();
        assert!(manager.gate_for("project_lifecycle").is_ok());
        assert!(manager.gate_for("course_lifecycle").is_err());
        assert_eq!(manager.registry().len(), 1);
        assert_eq!(
            manager.debug_config()["workflows"][0]["id"],
            "project_lifecycle"
        );
        assert_eq!(
            manager.dependent_access_checks().policy().completed_states.len(),
            1
        );
    }
}
