//! Row validation for DST sheet records.
//!
//! Centralizes the required-field and machine-name checks so each entity
//! kind does not re-derive its own length/character rules. The only per-kind
//! variation is the allowed separator set and maximum length, both carried
//! by [`IdentifierRules`].
//!
//! All functions are pure: no side effects, same inputs always give the
//! same result.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{ValidationError, ValidationResult};
use crate::models::{EntityKind, IdentifierRules, RawRecord};

/// Machine names start with a letter; separators are checked separately so
/// the error can name the offending rule.
static LEADING_LETTER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z]").unwrap());

/// Check that a record has every required field and a well-formed machine
/// name for the given kind.
///
/// Returns the first problem found; callers report it and skip the row.
pub fn validate(record: &RawRecord, kind: EntityKind) -> ValidationResult<()> {
    check_required_fields(record, kind.required_fields())?;

    // required_fields always includes machine_name, so unwrap of the checked
    // field cannot fire here; still, stay defensive.
    let machine_name = record.get_non_empty("machine_name").unwrap_or_default();
    validate_machine_name(machine_name, kind.identifier_rules())
}

/// Fail with [`ValidationError::MissingRequiredField`] if any listed field is
/// absent or empty.
pub fn check_required_fields(record: &RawRecord, required: &[&str]) -> ValidationResult<()> {
    for field in required {
        if record.get_non_empty(field).is_none() {
            return Err(ValidationError::MissingRequiredField((*field).to_string()));
        }
    }
    Ok(())
}

/// Check a machine name against `^[A-Za-z][A-Za-z0-9<separators>]*$` with the
/// rules' maximum length.
pub fn validate_machine_name(name: &str, rules: IdentifierRules) -> ValidationResult<()> {
    if name.is_empty() {
        return Err(invalid(name, "must not be empty"));
    }
    if name.len() > rules.max_length {
        return Err(invalid(
            name,
            format!("exceeds maximum length of {}", rules.max_length),
        ));
    }
    if !LEADING_LETTER.is_match(name) {
        return Err(invalid(name, "must start with a letter"));
    }
    for c in name.chars() {
        if !c.is_ascii_alphanumeric() && !rules.separators.contains(c) {
            return Err(invalid(
                name,
                format!("character '{}' not in allowed set [A-Za-z0-9{}]", c, rules.separators),
            ));
        }
    }
    Ok(())
}

/// Quick boolean check, for callers that do not need the reason.
pub fn is_valid_machine_name(name: &str, rules: IdentifierRules) -> bool {
    validate_machine_name(name, rules).is_ok()
}

fn invalid(value: &str, reason: impl Into<String>) -> ValidationError {
    ValidationError::InvalidIdentifier { value: value.to_string(), reason: reason.into() }
}
