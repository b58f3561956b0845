//! Domain models for the dsteg generation pipeline.
//!
//! This module contains the core data structures used throughout the run:
//!
//! - [`EntityKind`] - the generated configuration entity kinds and their per-kind rules
//! - [`RawRecord`] - one DST sheet row as a column → value mapping
//! - [`EntitySpec`] - validated, kind-specific entity-creation payload
//! - [`EntityHandle`] - opaque handle to an entity already in the target system
//! - [`ReconcileOutcome`] - terminal per-record result of a reconciliation run
//! - [`Mode`] - create-only vs. create-or-update

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Sheet column holding the implementation flag for a row.
pub const IMPLEMENTATION_FLAG_COLUMN: &str = "x";

/// Flag value marking a row's entity as approved for update.
pub const UPDATE_FLAG: &str = "c";

// =============================================================================
// Entity Kind
// =============================================================================

/// Identifier syntax rules for an entity kind's machine name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentifierRules {
    /// Maximum machine-name length.
    pub max_length: usize,
    /// Separator characters allowed after the leading letter.
    pub separators: &'static str,
}

/// The configuration entity kinds generated from the DST sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Custom block type (a bundle of the block_content entity).
    BlockType,
    /// Site menu.
    Menu,
    /// User role.
    UserRole,
}

impl EntityKind {
    /// Human-readable name used in report lines.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::BlockType => "Custom block type",
            Self::Menu => "Menu",
            Self::UserRole => "User role",
        }
    }

    /// Columns that must be present and non-empty for a row to be usable.
    pub fn required_fields(&self) -> &'static [&'static str] {
        match self {
            Self::BlockType => &["name", "machine_name"],
            Self::Menu => &["title", "machine_name"],
            Self::UserRole => &["name", "machine_name"],
        }
    }

    /// Machine-name syntax for this kind. Menus allow hyphens on top of the
    /// default underscore-only alphabet.
    pub fn identifier_rules(&self) -> IdentifierRules {
        match self {
            Self::Menu => IdentifierRules { max_length: 32, separators: "-_" },
            _ => IdentifierRules { max_length: 32, separators: "_" },
        }
    }

    /// Named DST sheet range supplying rows for this kind.
    pub fn sheet_range(&self) -> &'static str {
        match self {
            Self::BlockType => crate::sheet::BUNDLES,
            Self::Menu => crate::sheet::MENUS,
            Self::UserRole => crate::sheet::USER_ROLES,
        }
    }

    /// JSON:API resource path on the Drupal target.
    pub fn jsonapi_path(&self) -> &'static str {
        match self {
            Self::BlockType => "block_content_type/block_content_type",
            Self::Menu => "menu/menu",
            Self::UserRole => "user_role/user_role",
        }
    }

    /// JSON:API resource type name.
    pub fn resource_type(&self) -> &'static str {
        match self {
            Self::BlockType => "block_content_type--block_content_type",
            Self::Menu => "menu--menu",
            Self::UserRole => "user_role--user_role",
        }
    }

    /// Value of the FIELDS range's `entity_type` column selecting field rows
    /// for this kind, when the kind carries fields.
    pub fn field_filter_key(&self) -> Option<&'static str> {
        match self {
            Self::BlockType => Some("bundle"),
            _ => None,
        }
    }
}

// =============================================================================
// Raw Record
// =============================================================================

/// One DST sheet row: a column-name → string-value mapping.
///
/// Keys are normalized (lower-cased, trimmed, spaces collapsed to
/// underscores) so sheet header cosmetics do not leak into the pipeline.
/// Values are stored as-is; the validator treats empty values as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    values: BTreeMap<String, String>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from header/value pairs, normalizing the keys.
    /// Rows shorter than the header get empty values for the tail columns.
    pub fn from_row(headers: &[String], row: &[String]) -> Self {
        let mut values = BTreeMap::new();
        for (i, header) in headers.iter().enumerate() {
            let key = normalize_header(header);
            if key.is_empty() {
                continue;
            }
            let value = row.get(i).map(|v| v.trim().to_string()).unwrap_or_default();
            values.insert(key, value);
        }
        Self { values }
    }

    /// Insert a column value (key is normalized).
    pub fn set(&mut self, column: &str, value: impl Into<String>) {
        self.values.insert(normalize_header(column), value.into());
    }

    /// Get a column value. Present-but-empty values are returned as `Some("")`.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.values.get(&normalize_header(column)).map(String::as_str)
    }

    /// Get a column value, treating empty strings as absent.
    pub fn get_non_empty(&self, column: &str) -> Option<&str> {
        self.get(column).filter(|v| !v.is_empty())
    }

    /// Whether the row's implementation flag marks it as update-approved.
    pub fn update_approved(&self) -> bool {
        self.get(IMPLEMENTATION_FLAG_COLUMN) == Some(UPDATE_FLAG)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Normalize a sheet header into a record key.
fn normalize_header(header: &str) -> String {
    header.trim().to_lowercase().split_whitespace().collect::<Vec<_>>().join("_")
}

// =============================================================================
// Entity Spec
// =============================================================================

/// A validated, mapped entity-creation payload.
///
/// One variant per [`EntityKind`], so field-name mismatches between kinds are
/// compile errors rather than silent key typos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntitySpec {
    BlockType {
        id: String,
        label: String,
        description: String,
    },
    Menu {
        id: String,
        label: String,
        description: String,
    },
    UserRole {
        id: String,
        label: String,
    },
}

impl EntitySpec {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::BlockType { .. } => EntityKind::BlockType,
            Self::Menu { .. } => EntityKind::Menu,
            Self::UserRole { .. } => EntityKind::UserRole,
        }
    }

    /// Stable machine name of the entity.
    pub fn id(&self) -> &str {
        match self {
            Self::BlockType { id, .. } | Self::Menu { id, .. } | Self::UserRole { id, .. } => id,
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &str {
        match self {
            Self::BlockType { label, .. }
            | Self::Menu { label, .. }
            | Self::UserRole { label, .. } => label,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            Self::BlockType { description, .. } | Self::Menu { description, .. } => {
                Some(description)
            }
            Self::UserRole { .. } => None,
        }
    }

    /// JSON:API attribute object for create/update calls.
    pub fn attributes(&self) -> serde_json::Value {
        match self {
            Self::BlockType { id, label, description } => serde_json::json!({
                "drupal_internal__id": id,
                "label": label,
                "description": description,
            }),
            Self::Menu { id, label, description } => serde_json::json!({
                "drupal_internal__id": id,
                "label": label,
                "description": description,
            }),
            Self::UserRole { id, label } => serde_json::json!({
                "drupal_internal__id": id,
                "label": label,
            }),
        }
    }
}

// =============================================================================
// Existing-Entity Snapshot
// =============================================================================

/// Opaque handle to an entity already present in the target system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityHandle {
    /// Remote resource identifier (JSON:API UUID).
    pub uuid: String,
    /// Machine name of the entity.
    pub id: String,
    /// Raw attributes as returned by the target.
    #[serde(default)]
    pub attributes: serde_json::Value,
}

/// Snapshot of existing entities, taken once per run before reconciliation.
/// Staleness during the run is accepted; the snapshot is never refreshed.
pub type ExistingSnapshot = HashMap<String, EntityHandle>;

// =============================================================================
// Mode & Outcome
// =============================================================================

/// Reconciliation mode. Always passed explicitly, never stored as ambient
/// state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Create missing entities, skip existing ones.
    CreateOnly,
    /// Create missing entities, update existing ones whose row is flagged.
    CreateOrUpdate,
}

/// Terminal per-record result of a run. No retries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ReconcileOutcome {
    /// The target reported a genuinely new resource.
    Created { id: String, label: String },
    /// An existing entity was updated with the spec's fields.
    Updated { id: String, label: String },
    /// The entity already exists and updates were not requested.
    SkippedExists { id: String, label: String },
    /// The row failed validation, or the target rejected the create as a
    /// duplicate.
    SkippedInvalid { id: String, reason: String },
    /// The create/update call failed; the rest of the run continued.
    Failed { id: String, label: String, error: String },
}

impl ReconcileOutcome {
    pub fn id(&self) -> &str {
        match self {
            Self::Created { id, .. }
            | Self::Updated { id, .. }
            | Self::SkippedExists { id, .. }
            | Self::SkippedInvalid { id, .. }
            | Self::Failed { id, .. } => id,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_header_normalization() {
        let headers = vec!["Machine Name".to_string(), " Description ".to_string()];
        let row = vec!["hero_block".to_string(), "Homepage hero".to_string()];
        let record = RawRecord::from_row(&headers, &row);

        assert_eq!(record.get("machine_name"), Some("hero_block"));
        assert_eq!(record.get("description"), Some("Homepage hero"));
    }

    #[test]
    fn test_record_short_row_padded() {
        let headers = vec!["name".to_string(), "description".to_string()];
        let row = vec!["Hero".to_string()];
        let record = RawRecord::from_row(&headers, &row);

        assert_eq!(record.get("description"), Some(""));
        assert_eq!(record.get_non_empty("description"), None);
    }

    #[test]
    fn test_update_flag() {
        let mut record = RawRecord::new();
        assert!(!record.update_approved());
        record.set("x", "w");
        assert!(!record.update_approved());
        record.set("x", "c");
        assert!(record.update_approved());
    }

    #[test]
    fn test_kind_rules() {
        assert_eq!(EntityKind::Menu.identifier_rules().separators, "-_");
        assert_eq!(EntityKind::BlockType.identifier_rules().separators, "_");
        assert_eq!(EntityKind::UserRole.required_fields(), &["name", "machine_name"]);
        assert!(EntityKind::BlockType.field_filter_key().is_some());
        assert!(EntityKind::Menu.field_filter_key().is_none());
    }

    #[test]
    fn test_spec_accessors() {
        let spec = EntitySpec::Menu {
            id: "main-nav".into(),
            label: "Main Nav".into(),
            description: "Main Nav menu.".into(),
        };
        assert_eq!(spec.id(), "main-nav");
        assert_eq!(spec.label(), "Main Nav");
        assert_eq!(spec.kind(), EntityKind::Menu);

        let role = EntitySpec::UserRole { id: "editor".into(), label: "Editor".into() };
        assert_eq!(role.description(), None);
    }

    #[test]
    fn test_spec_attributes() {
        let spec = EntitySpec::BlockType {
            id: "hero_block".into(),
            label: "Hero Block".into(),
            description: "Homepage hero".into(),
        };
        let attrs = spec.attributes();
        assert_eq!(attrs["drupal_internal__id"], "hero_block");
        assert_eq!(attrs["label"], "Hero Block");
    }
}
