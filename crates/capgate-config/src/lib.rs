//! # capgate-config
//!
//! TOML-driven deployment configuration for capgate.
//!
//! ## Overview
//!
//! A deployment names its staff sentinel role, the option-store keys the
//! grant settings live under, the roles activation switches on by default,
//! and how many users the access report scans. Every field is optional; an
//! empty document yields `GateConfig::default()`.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::path::Path;
//!
//! let config = capgate_config::from_file(Path::new("capgate.toml"))?;
//! // Pass `config` to `capgate_core::AccessManager::new(...)`.
//! ```

pub mod loader;

pub use loader::{from_file, from_toml_str, load_or_default};

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::io::Write;

    use capgate_contracts::{config::GateConfig, error::CapgateError};

    use crate::{from_file, from_toml_str, load_or_default};

    fn config_error(result: Result<GateConfig, CapgateError>) -> String {
        match result {
            Err(CapgateError::ConfigError { reason }) => reason,
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }

    // ── 1. defaults ───────────────────────────────────────────────────────────

    /// An empty document is a valid config with every default in place.
    #[test]
    fn test_empty_document_uses_defaults() {
        let config = from_toml_str("").unwrap();
        assert_eq!(config, GateConfig::default());
    }

    // ── 2. overrides ──────────────────────────────────────────────────────────

    #[test]
    fn test_fields_override_defaults() {
        let toml = r#"
            staff_role = "front_desk"
            default_granted_roles = ["front_desk"]
            report_limit = 25

            [keys]
            user_ids = "booking_user_ids"
        "#;

        let config = from_toml_str(toml).unwrap();

        assert_eq!(config.staff_role, "front_desk");
        assert_eq!(config.default_granted_roles, vec!["front_desk"]);
        assert_eq!(config.report_limit, 25);
        assert_eq!(config.keys.user_ids, "booking_user_ids");
        // Unlisted keys keep their defaults.
        assert_eq!(config.keys.role_grants, "amelia_role_access_settings");
    }

    // ── 3. validation ─────────────────────────────────────────────────────────

    #[test]
    fn test_empty_staff_role_is_rejected() {
        let reason = config_error(from_toml_str(r#"staff_role = "  ""#));
        assert!(reason.contains("staff_role"), "unexpected reason: {reason}");
    }

    #[test]
    fn test_zero_report_limit_is_rejected() {
        let reason = config_error(from_toml_str("report_limit = 0"));
        assert!(reason.contains("report_limit"), "unexpected reason: {reason}");
    }

    #[test]
    fn test_duplicate_keys_are_rejected() {
        let toml = r#"
            [keys]
            role_grants = "same"
            user_ids = "same"
        "#;
        let reason = config_error(from_toml_str(toml));
        assert!(reason.contains("distinct"), "unexpected reason: {reason}");
    }

    // ── 4. parse and I/O errors ───────────────────────────────────────────────

    #[test]
    fn test_toml_parse_error() {
        let reason = config_error(from_toml_str("this is not valid toml ][[["));
        assert!(
            reason.contains("failed to parse gate config TOML"),
            "expected parse error message, got: {reason}"
        );
    }

    #[test]
    fn test_wrong_type_is_a_parse_error() {
        let reason = config_error(from_toml_str("report_limit = \"lots\""));
        assert!(reason.contains("failed to parse"), "unexpected reason: {reason}");
    }

    #[test]
    fn test_from_file_reads_and_parses() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "staff_role = \"crew\"").unwrap();

        let config = from_file(file.path()).unwrap();
        assert_eq!(config.staff_role, "crew");

        let loaded = load_or_default(Some(file.path())).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let reason = config_error(from_file(&dir.path().join("absent.toml")));
        assert!(reason.contains("failed to read gate config"), "unexpected reason: {reason}");
    }

    #[test]
    fn test_load_or_default_without_path() {
        assert_eq!(load_or_default(None).unwrap(), GateConfig::default());
    }
}
