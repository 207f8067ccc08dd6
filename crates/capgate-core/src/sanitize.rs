//! Admin-form input sanitation.
//!
//! Form input is untrusted and loosely typed. Everything here narrows bad
//! input to a safe default instead of failing: unknown roles are dropped,
//! unparseable flags read as false, invalid user IDs disappear.

use serde_json::Value;

use capgate_contracts::{
    actor::UserId,
    grant::RoleGrantMap,
};

use crate::resolver::parse_user_ids;

/// Coerce a loosely typed form value to a bool.
///
/// `true`, the number 1, and the strings "1", "true", "on", "yes"
/// (trimmed, case-insensitive) are true. Everything else, including null,
/// arrays, and objects, is false.
pub fn coerce_bool(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64() == Some(1.0),
        Value::String(s) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "on" | "yes"
        ),
        Value::Null | Value::Array(_) | Value::Object(_) => false,
    }
}

/// Build a complete role map from raw checkbox input.
///
/// The result has exactly one entry per known role: the coerced input value
/// if the form sent one, otherwise false. Keys for roles the host does not
/// know are discarded. Non-object input yields an all-false map.
pub fn sanitize_role_grants<S: AsRef<str>>(input: &Value, all_role_names: &[S]) -> RoleGrantMap {
    let submitted = input.as_object();
    all_role_names
        .iter()
        .map(AsRef::as_ref)
        .map(|role| {
            let granted = submitted
                .and_then(|map| map.get(role))
                .map(coerce_bool)
                .unwrap_or(false);
            (role, granted)
        })
        .collect()
}

/// Sanitize the free-text user ID field to its canonical stored form.
pub fn sanitize_user_ids<F>(raw: &str, user_exists: F) -> String
where
    F: Fn(UserId) -> bool,
{
    parse_user_ids(raw, user_exists).to_text()
}
