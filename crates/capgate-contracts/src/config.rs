//! Deployment configuration for a capgate instance.
//!
//! Every field has a default, so an empty TOML document is a valid config.
//! Loading from disk lives in `capgate-config`.

use serde::{Deserialize, Serialize};

use crate::grant::SettingsKeys;

/// Default number of users the access report scans.
pub const DEFAULT_REPORT_LIMIT: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// The role that is always granted, whatever the saved role map says.
    pub staff_role: String,

    /// Roles switched on when activation finds no saved role map.
    pub default_granted_roles: Vec<String>,

    /// Option-store key names.
    pub keys: SettingsKeys,

    /// Maximum number of users the access report scans.
    pub report_limit: usize,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            staff_role: "staff".to_string(),
            default_granted_roles: vec!["staff".to_string(), "administrator".to_string()],
            keys: SettingsKeys::default(),
            report_limit: DEFAULT_REPORT_LIMIT,
        }
    }
}
