//! Field Applier boundary.
//!
//! After bundle types are reconciled, their spreadsheet-defined fields are
//! applied through the [`FieldApplier`] collaborator. Field generation itself
//! is outside this crate's core; what is owned here is the boundary contract
//! plus the helpers that prepare its inputs: filtering FIELDS rows down to
//! the bundle kind being generated, and the bundle label → id map.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::error::TargetResult;
use crate::models::{EntitySpec, Mode, RawRecord};
use crate::report;

/// Column on the FIELDS range naming the entity type a field row belongs to.
pub const ENTITY_TYPE_COLUMN: &str = "entity_type";

/// Collaborator applying spreadsheet-defined fields to generated bundles.
#[async_trait]
pub trait FieldApplier {
    /// Apply `field_rows` to the bundles in `bundle_label_to_id`.
    async fn apply_fields(
        &self,
        bundle_kind: &str,
        field_rows: &[RawRecord],
        bundle_label_to_id: &HashMap<String, String>,
        mode: Mode,
    ) -> TargetResult<()>;
}

/// Keep the FIELDS rows whose entity-type column matches `entity_type`
/// (case-insensitive). Rows without the column are dropped.
pub fn filter_rows_for_entity(rows: &[RawRecord], entity_type: &str) -> Vec<RawRecord> {
    rows.iter()
        .filter(|row| {
            row.get_non_empty(ENTITY_TYPE_COLUMN)
                .is_some_and(|v| v.eq_ignore_ascii_case(entity_type))
        })
        .cloned()
        .collect()
}

/// Build the bundle label → id map handed to the applier.
/// Later specs win on label collisions, matching the sheet's row order.
pub fn bundle_label_map(specs: &[EntitySpec]) -> HashMap<String, String> {
    specs
        .iter()
        .map(|spec| (spec.label().to_string(), spec.id().to_string()))
        .collect()
}

/// Console implementation of the boundary: reports the planned per-bundle
/// application instead of touching the target.
pub struct ConsoleFieldApplier;

#[async_trait]
impl FieldApplier for ConsoleFieldApplier {
    async fn apply_fields(
        &self,
        bundle_kind: &str,
        field_rows: &[RawRecord],
        bundle_label_to_id: &HashMap<String, String>,
        _mode: Mode,
    ) -> TargetResult<()> {
        for (label, id) in bundle_label_to_id {
            let count = field_rows
                .iter()
                .filter(|row| {
                    row.get_non_empty("bundle").is_some_and(|b| b == label || b == id)
                })
                .count();
            report::info(format!(
                "{} '{}' ({}): {} field row(s) to apply",
                bundle_kind, label, id, count
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntitySpec;

    fn field_row(entity_type: &str, bundle: &str, machine_name: &str) -> RawRecord {
        let mut row = RawRecord::new();
        row.set("entity_type", entity_type);
        row.set("bundle", bundle);
        row.set("machine_name", machine_name);
        row
    }

    #[test]
    fn test_filter_rows_for_entity() {
        let rows = vec![
            field_row("bundle", "Hero Block", "field_cta"),
            field_row("Content type", "Article", "field_body"),
            field_row("BUNDLE", "Card", "field_image"),
        ];

        let filtered = filter_rows_for_entity(&rows, "bundle");
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered[0].get("machine_name"), Some("field_cta"));
        assert_eq!(filtered[1].get("machine_name"), Some("field_image"));
    }

    #[test]
    fn test_filter_drops_rows_without_entity_type() {
        let mut row = RawRecord::new();
        row.set("machine_name", "field_orphan");
        assert!(filter_rows_for_entity(&[row], "bundle").is_empty());
    }

    #[test]
    fn test_bundle_label_map() {
        let specs = vec![
            EntitySpec::BlockType {
                id: "hero_block".into(),
                label: "Hero Block".into(),
                description: String::new(),
            },
            EntitySpec::BlockType {
                id: "card".into(),
                label: "Card".into(),
                description: String::new(),
            },
        ];

        let map = bundle_label_map(&specs);
        assert_eq!(map.get("Hero Block"), Some(&"hero_block".to_string()));
        assert_eq!(map.get("Card"), Some(&"card".to_string()));
    }

    #[tokio::test]
    async fn test_console_applier_is_side_effect_free() {
        let applier = ConsoleFieldApplier;
        let map = HashMap::from([("Hero Block".to_string(), "hero_block".to_string())]);
        let rows = vec![field_row("bundle", "Hero Block", "field_cta")];

        let result = applier.apply_fields("Block type", &rows, &map, Mode::CreateOnly).await;
        assert!(result.is_ok());
    }
}
