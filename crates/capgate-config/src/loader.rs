//! TOML loading and validation for `GateConfig`.
//!
//! Loading steps:
//!
//! 1. Parse the document; every missing field takes its default.
//! 2. Validate: the staff role and the three keys must be non-empty, the
//!    keys must be distinct, and the report limit must be positive.
//! 3. Return the config, or `CapgateError::ConfigError` naming the problem.

use std::path::Path;

use tracing::debug;

use capgate_contracts::{
    config::GateConfig,
    error::{CapgateError, CapgateResult},
};

/// Parse `s` as TOML and validate the resulting `GateConfig`.
///
/// ```toml
/// staff_role = "staff"
/// default_granted_roles = ["staff", "administrator"]
/// report_limit = 100
///
/// [keys]
/// role_grants = "amelia_role_access_settings"
/// ```
pub fn from_toml_str(s: &str) -> CapgateResult<GateConfig> {
    let config: GateConfig = toml::from_str(s).map_err(|e| CapgateError::ConfigError {
        reason: format!("failed to parse gate config TOML: {}", e),
    })?;
    validate(&config)?;
    debug!(
        staff_role = %config.staff_role,
        report_limit = config.report_limit,
        "gate config loaded"
    );
    Ok(config)
}

/// Read the file at `path` and parse it as gate configuration.
pub fn from_file(path: &Path) -> CapgateResult<GateConfig> {
    let contents = std::fs::read_to_string(path).map_err(|e| CapgateError::ConfigError {
        reason: format!("failed to read gate config '{}': {}", path.display(), e),
    })?;
    from_toml_str(&contents)
}

/// Read `path` if given, otherwise return the defaults.
pub fn load_or_default(path: Option<&Path>) -> CapgateResult<GateConfig> {
    match path {
        Some(path) => from_file(path),
        None => Ok(GateConfig::default()),
    }
}

fn validate(config: &GateConfig) -> CapgateResult<()> {
    if config.staff_role.trim().is_empty() {
        return Err(invalid("staff_role must not be empty"));
    }
    if config.report_limit == 0 {
        return Err(invalid("report_limit must be at least 1"));
    }

    let keys = config.keys.all();
    if keys.iter().any(|k| k.trim().is_empty()) {
        return Err(invalid("settings keys must not be empty"));
    }
    if keys[0] == keys[1] || keys[0] == keys[2] || keys[1] == keys[2] {
        return Err(invalid("settings keys must be distinct"));
    }
    Ok(())
}

fn invalid(reason: &str) -> CapgateError {
    CapgateError::ConfigError {
        reason: reason.to_string(),
    }
}
