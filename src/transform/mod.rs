//! Record → entity-spec mapping.
//!
//! Converts a validated [`RawRecord`] into the kind-specific
//! [`EntitySpec`] payload: deterministic field renaming plus per-kind
//! defaulting. Assumes the record already passed
//! [`crate::validate::validate`]; mapping itself never fails.

use crate::models::{EntityKind, EntitySpec, RawRecord};

/// Map a validated record to its entity-creation payload.
///
/// - Block type: `machine_name → id`, `name → label`, description passed
///   through (empty allowed).
/// - Menu: `machine_name → id` with underscores normalized to hyphens (menu
///   ids are hyphenated on the target), `title → label`, description
///   defaulting to `"<name-or-title> menu."` when absent.
/// - User role: `machine_name → id`, `name → label`.
pub fn map_record(record: &RawRecord, kind: EntityKind) -> EntitySpec {
    match kind {
        EntityKind::BlockType => EntitySpec::BlockType {
            id: machine_name(record),
            label: field(record, "name"),
            description: field(record, "description"),
        },
        EntityKind::Menu => EntitySpec::Menu {
            id: machine_name(record).replace('_', "-"),
            label: field(record, "title"),
            description: menu_description(record),
        },
        EntityKind::UserRole => EntitySpec::UserRole {
            id: machine_name(record),
            label: field(record, "name"),
        },
    }
}

fn machine_name(record: &RawRecord) -> String {
    field(record, "machine_name")
}

fn field(record: &RawRecord, column: &str) -> String {
    record.get(column).unwrap_or_default().to_string()
}

/// Menus without a description get `"<name> menu."`, falling back to the
/// title when the sheet has no name column for menus.
fn menu_description(record: &RawRecord) -> String {
    if let Some(description) = record.get_non_empty("description") {
        return description.to_string();
    }
    let base = record
        .get_non_empty("name")
        .or_else(|| record.get_non_empty("title"))
        .unwrap_or_default();
    format!("{} menu.", base)
}
