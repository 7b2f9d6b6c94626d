//! Configuration loader with layered sources
//!
//! Loads configuration from multiple sources with the following precedence
//! (highest to lowest):
//! 1. Environment variables (ROLEGUARD__*)
//! 2. Configuration file (TOML)
//! 3. Default values
//!
//! The loaded policy is validated before it is returned; a malformed table
//! is rejected as a whole.

use crate::access_control::RolePolicyTable;
use crate::config::types::{AppConfig, CapabilityConfig, RoleConfig};
use crate::error::ConfigError;
use config::{Config, Environment, File, FileFormat};
use std::collections::HashSet;
use std::path::Path;

/// Default configuration file paths to check (in order)
const DEFAULT_CONFIG_PATHS: &[&str] = &[
    "roleguard.toml",
    ".roleguard.toml",
    "~/.config/roleguard/config.toml",
    "/etc/roleguard/config.toml",
];

/// Load configuration from a TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from_str(toml_str, FileFormat::Toml))
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// Load configuration from files and environment
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. Start with defaults (handled by serde defaults on AppConfig)

    // 2. Add configuration file
    if let Some(path) = config_path {
        // Explicit path provided - must exist
        if !Path::new(path).exists() {
            return Err(ConfigError::Load(format!(
                "Configuration file not found: {}",
                path
            )));
        }
        builder = builder.add_source(File::new(path, FileFormat::Toml));
    } else {
        // Try default paths (first existing one wins)
        for path in DEFAULT_CONFIG_PATHS {
            let expanded = shellexpand::tilde(path);
            if Path::new(expanded.as_ref()).exists() {
                builder = builder.add_source(File::new(&expanded, FileFormat::Toml));
                break;
            }
        }
    }

    // 3. Add environment variables with ROLEGUARD__ prefix
    // e.g., ROLEGUARD__LOGGING__LEVEL, ROLEGUARD__LOGGING__FORMAT
    // Double underscore (__) maps to nested keys (logging.level)
    builder = builder.add_source(
        Environment::with_prefix("ROLEGUARD")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// Validate configuration values
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    validate_roles(&config.policy.roles)?;
    validate_capabilities(&config.capabilities)?;

    if config.logging.level.is_empty() {
        return Err(ConfigError::Missing {
            field: "logging.level".to_string(),
        });
    }

    Ok(())
}

/// Validate role names and their patterns
///
/// Compiles the table the same way [`RolePolicyTable::from_config`] does so
/// the loader and the engine reject identical inputs.
fn validate_roles(roles: &[RoleConfig]) -> Result<(), ConfigError> {
    RolePolicyTable::new(roles.iter().map(|r| (r.name.as_str(), r.patterns.iter().cloned())))?;
    Ok(())
}

/// Validate capability requirements and reject duplicate declarations
fn validate_capabilities(capabilities: &[CapabilityConfig]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();

    for (i, capability) in capabilities.iter().enumerate() {
        if capability.resource.is_empty() || capability.action.is_empty() {
            return Err(ConfigError::Missing {
                field: format!("capabilities[{}].resource/action", i),
            });
        }

        capability
            .to_requirement()
            .map_err(|source| ConfigError::Requirement {
                context: format!(
                    "capabilities[{}] ({}:{})",
                    i, capability.resource, capability.action
                ),
                source,
            })?;

        if !seen.insert((capability.resource.as_str(), capability.action.as_str())) {
            return Err(ConfigError::DuplicateCapability {
                resource: capability.resource.clone(),
                action: capability.action.clone(),
            });
        }
    }

    Ok(())
}
