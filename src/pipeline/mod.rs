//! Per-kind generation runs.
//!
//! [`generate`] ties the stages together for one entity kind:
//!
//! ```text
//! sheet rows → validate → map → dedupe by id → snapshot → reconcile
//! ```
//!
//! Invalid rows become `SkippedInvalid` outcomes and never abort the run.
//! Empty input is a warning no-op. The only errors surfacing from a run are
//! collaborator failures (sheet fetch happens in the caller; the snapshot
//! load happens here).

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::error::{GenerateResult, TargetResult};
use crate::fields::{bundle_label_map, filter_rows_for_entity, FieldApplier};
use crate::models::{EntityKind, EntitySpec, ExistingSnapshot, Mode, RawRecord, ReconcileOutcome};
use crate::reconcile::{reconcile, TargetClient};
use crate::report;
use crate::transform::map_record;
use crate::validate::validate;

/// Result of one generation run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub kind: EntityKind,
    pub started_at: DateTime<Utc>,
    /// Terminal outcome per input record, validation skips first (in row
    /// order), then reconciliation outcomes (in spec order).
    pub outcomes: Vec<ReconcileOutcome>,
    /// The deduplicated specs that were reconciled, for follow-up passes
    /// such as field application.
    pub specs: Vec<EntitySpec>,
}

impl RunReport {
    fn empty(kind: EntityKind, started_at: DateTime<Utc>) -> Self {
        Self { kind, started_at, outcomes: Vec::new(), specs: Vec::new() }
    }

    pub fn created(&self) -> usize {
        self.count(|o| matches!(o, ReconcileOutcome::Created { .. }))
    }

    pub fn updated(&self) -> usize {
        self.count(|o| matches!(o, ReconcileOutcome::Updated { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| {
            matches!(o, ReconcileOutcome::SkippedExists { .. } | ReconcileOutcome::SkippedInvalid { .. })
        })
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, ReconcileOutcome::Failed { .. }))
    }

    fn count(&self, pred: impl Fn(&ReconcileOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(o)).count()
    }
}

/// Run generation for one kind against the given sheet records.
pub async fn generate<C: TargetClient>(
    kind: EntityKind,
    records: &[RawRecord],
    client: &C,
    mode: Mode,
) -> GenerateResult<RunReport> {
    let started_at = Utc::now();

    if records.is_empty() {
        report::warning(format!(
            "There is no data for the {} entity in the DST sheet.",
            kind.display_name()
        ));
        return Ok(RunReport::empty(kind, started_at));
    }

    // Validate and map. Invalid rows are reported and skipped.
    let mut outcomes = Vec::new();
    let mut desired: Vec<(EntitySpec, bool)> = Vec::new();
    for record in records {
        match validate(record, kind) {
            Ok(()) => {
                let spec = map_record(record, kind);
                desired.push((spec, record.update_approved()));
            }
            Err(e) => {
                let id = record.get("machine_name").unwrap_or_default().to_string();
                report::warning(format!("{} row skipped: {}", kind.display_name(), e));
                outcomes.push(ReconcileOutcome::SkippedInvalid { id, reason: e.to_string() });
            }
        }
    }

    // The reconciler requires unique ids; dedupe last-wins so a corrected
    // re-entry further down the sheet supersedes the original row.
    let (desired, duplicates) = dedupe_last_wins(desired);
    for id in &duplicates {
        report::warning(format!(
            "Duplicate machine name '{}' in sheet; keeping the last occurrence.",
            id
        ));
    }

    let update_flags: HashMap<String, bool> =
        desired.iter().map(|(spec, approved)| (spec.id().to_string(), *approved)).collect();
    let specs: Vec<EntitySpec> = desired.into_iter().map(|(spec, _)| spec).collect();

    // One-shot snapshot; staleness during the run is accepted.
    let existing = take_snapshot(client, kind, &specs).await?;

    let reconciled = reconcile(client, &specs, &existing, mode, &update_flags).await;
    for outcome in &reconciled {
        emit_outcome(kind, outcome);
    }
    outcomes.extend(reconciled);

    let run = RunReport { kind, started_at, outcomes, specs };
    report::info(format!(
        "{}: {} created, {} updated, {} skipped, {} failed.",
        kind.display_name(),
        run.created(),
        run.updated(),
        run.skipped(),
        run.failed()
    ));
    Ok(run)
}

/// Apply the FIELDS rows to the bundles of a finished run, when the kind
/// carries fields. Skips with a warning when no field rows match.
pub async fn apply_bundle_fields<F: FieldApplier>(
    run: &RunReport,
    field_rows: &[RawRecord],
    applier: &F,
    mode: Mode,
) -> GenerateResult<()> {
    let Some(filter_key) = run.kind.field_filter_key() else {
        return Ok(());
    };

    let rows = filter_rows_for_entity(field_rows, filter_key);
    if rows.is_empty() {
        report::warning(format!(
            "There is no field data in the sheet. Skipping field generation for {}.",
            run.kind.display_name()
        ));
        return Ok(());
    }

    let bundles = bundle_label_map(&run.specs);
    applier.apply_fields(run.kind.display_name(), &rows, &bundles, mode).await?;
    Ok(())
}

/// Take the existing-entity snapshot for a run. Block types are looked up
/// individually by machine name; the other kinds come back in one bulk load.
async fn take_snapshot<C: TargetClient>(
    client: &C,
    kind: EntityKind,
    specs: &[EntitySpec],
) -> TargetResult<ExistingSnapshot> {
    match kind {
        EntityKind::BlockType => {
            let mut snapshot = ExistingSnapshot::new();
            for spec in specs {
                if let Some(handle) = client.load(kind, spec.id()).await? {
                    snapshot.insert(spec.id().to_string(), handle);
                }
            }
            Ok(snapshot)
        }
        _ => client.load_multiple(kind).await,
    }
}

/// Remove duplicate ids keeping each id's last occurrence at its position.
/// Returns the deduped list and the ids that had duplicates.
fn dedupe_last_wins(
    desired: Vec<(EntitySpec, bool)>,
) -> (Vec<(EntitySpec, bool)>, Vec<String>) {
    let mut last_index: HashMap<String, usize> = HashMap::new();
    let mut duplicates = Vec::new();
    for (i, (spec, _)) in desired.iter().enumerate() {
        if let Some(_previous) = last_index.insert(spec.id().to_string(), i) {
            if !duplicates.contains(&spec.id().to_string()) {
                duplicates.push(spec.id().to_string());
            }
        }
    }

    let deduped = desired
        .into_iter()
        .enumerate()
        .filter(|(i, (spec, _))| last_index.get(spec.id()) == Some(i))
        .map(|(_, entry)| entry)
        .collect();
    (deduped, duplicates)
}

fn emit_outcome(kind: EntityKind, outcome: &ReconcileOutcome) {
    let name = kind.display_name();
    match outcome {
        ReconcileOutcome::Created { id, .. } => {
            report::success(format!("{} {} is successfully created...", name, id));
        }
        ReconcileOutcome::Updated { label, .. } => {
            report::success(format!("{} {} updated.", name, label));
        }
        ReconcileOutcome::SkippedExists { id, .. } => {
            report::warning(format!("{} {} Already exists. Skipping creation...", name, id));
        }
        ReconcileOutcome::SkippedInvalid { id, reason } => {
            report::warning(format!("{} {} skipped: {}", name, id, reason));
        }
        ReconcileOutcome::Failed { id, error, .. } => {
            report::error(format!("{} {} failed: {}", name, id, error));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TargetResult;
    use crate::models::{EntityHandle, ExistingSnapshot};
    use crate::reconcile::CreateStatus;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockTarget {
        existing: Vec<String>,
        create_calls: Mutex<Vec<String>>,
        update_calls: Mutex<Vec<String>>,
    }

    #[async_trait::async_trait]
    impl TargetClient for MockTarget {
        async fn load(&self, _kind: EntityKind, id: &str) -> TargetResult<Option<EntityHandle>> {
            Ok(self.existing.iter().find(|e| *e == id).map(|id| handle(id)))
        }

        async fn load_multiple(&self, _kind: EntityKind) -> TargetResult<ExistingSnapshot> {
            Ok(self.existing.iter().map(|id| (id.clone(), handle(id))).collect())
        }

        async fn create(&self, spec: &EntitySpec) -> TargetResult<CreateStatus> {
            self.create_calls.lock().unwrap().push(spec.id().to_string());
            Ok(CreateStatus::New)
        }

        async fn update(&self, _handle: &EntityHandle, spec: &EntitySpec) -> TargetResult<()> {
            self.update_calls.lock().unwrap().push(spec.id().to_string());
            Ok(())
        }
    }

    fn handle(id: &str) -> EntityHandle {
        EntityHandle { uuid: format!("uuid-{}", id), id: id.to_string(), attributes: serde_json::Value::Null }
    }

    fn record(pairs: &[(&str, &str)]) -> RawRecord {
        let mut r = RawRecord::new();
        for (k, v) in pairs {
            r.set(k, *v);
        }
        r
    }

    #[tokio::test]
    async fn test_empty_input_is_a_warning_noop() {
        let target = MockTarget::default();
        let run = generate(EntityKind::Menu, &[], &target, Mode::CreateOnly).await.unwrap();

        assert!(run.outcomes.is_empty());
        assert!(target.create_calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_happy_path_block_type() {
        let target = MockTarget::default();
        let records = vec![record(&[
            ("name", "Hero Block"),
            ("machine_name", "hero_block"),
            ("description", "Homepage hero"),
        ])];

        let run =
            generate(EntityKind::BlockType, &records, &target, Mode::CreateOnly).await.unwrap();

        assert_eq!(run.created(), 1);
        assert_eq!(
            run.specs[0],
            EntitySpec::BlockType {
                id: "hero_block".into(),
                label: "Hero Block".into(),
                description: "Homepage hero".into(),
            }
        );
    }

    #[tokio::test]
    async fn test_invalid_rows_skipped_not_fatal() {
        let target = MockTarget::default();
        let records = vec![
            record(&[("machine_name", "no_name")]),          // missing name
            record(&[("name", "Bad"), ("machine_name", "9bad")]), // bad identifier
            record(&[("name", "Good"), ("machine_name", "good")]),
        ];

        let run =
            generate(EntityKind::BlockType, &records, &target, Mode::CreateOnly).await.unwrap();

        assert_eq!(run.created(), 1);
        assert_eq!(run.skipped(), 2);
        assert_eq!(*target.create_calls.lock().unwrap(), vec!["good"]);
    }

    #[tokio::test]
    async fn test_dedupe_last_wins() {
        let target = MockTarget::default();
        let records = vec![
            record(&[("name", "Hero v1"), ("machine_name", "hero")]),
            record(&[("name", "Hero v2"), ("machine_name", "hero")]),
        ];

        let run =
            generate(EntityKind::BlockType, &records, &target, Mode::CreateOnly).await.unwrap();

        assert_eq!(run.specs.len(), 1);
        assert_eq!(run.specs[0].label(), "Hero v2");
        assert_eq!(*target.create_calls.lock().unwrap(), vec!["hero"]);
    }

    #[tokio::test]
    async fn test_update_mode_uses_row_flag() {
        let target = MockTarget { existing: vec!["editor".into()], ..Default::default() };
        let records = vec![
            record(&[("name", "Editor"), ("machine_name", "editor"), ("x", "c")]),
        ];

        let run =
            generate(EntityKind::UserRole, &records, &target, Mode::CreateOrUpdate).await.unwrap();

        assert_eq!(run.updated(), 1);
        assert_eq!(*target.update_calls.lock().unwrap(), vec!["editor"]);
    }

    #[tokio::test]
    async fn test_existing_without_flag_skipped_in_update_mode() {
        let target = MockTarget { existing: vec!["editor".into()], ..Default::default() };
        let records = vec![record(&[("name", "Editor"), ("machine_name", "editor")])];

        let run =
            generate(EntityKind::UserRole, &records, &target, Mode::CreateOrUpdate).await.unwrap();

        assert_eq!(run.updated(), 0);
        assert_eq!(run.skipped(), 1);
    }

    #[tokio::test]
    async fn test_menu_pipeline_normalizes_ids() {
        let target = MockTarget::default();
        let records = vec![record(&[("title", "Main Nav"), ("machine_name", "main_nav")])];

        let run = generate(EntityKind::Menu, &records, &target, Mode::CreateOnly).await.unwrap();

        assert_eq!(run.specs[0].id(), "main-nav");
        assert_eq!(run.specs[0].description(), Some("Main Nav menu."));
    }

    #[tokio::test]
    async fn test_apply_bundle_fields_filters_rows() {
        use crate::fields::FieldApplier;
        use std::collections::HashMap;

        struct RecordingApplier {
            calls: Mutex<Vec<(String, usize, HashMap<String, String>)>>,
        }

        #[async_trait::async_trait]
        impl FieldApplier for RecordingApplier {
            async fn apply_fields(
                &self,
                bundle_kind: &str,
                field_rows: &[RawRecord],
                bundle_label_to_id: &HashMap<String, String>,
                _mode: Mode,
            ) -> TargetResult<()> {
                self.calls.lock().unwrap().push((
                    bundle_kind.to_string(),
                    field_rows.len(),
                    bundle_label_to_id.clone(),
                ));
                Ok(())
            }
        }

        let target = MockTarget::default();
        let records = vec![record(&[("name", "Hero Block"), ("machine_name", "hero_block")])];
        let run =
            generate(EntityKind::BlockType, &records, &target, Mode::CreateOnly).await.unwrap();

        let field_rows = vec![
            record(&[("entity_type", "bundle"), ("bundle", "Hero Block"), ("machine_name", "field_cta")]),
            record(&[("entity_type", "Content type"), ("bundle", "Article"), ("machine_name", "field_body")]),
        ];
        let applier = RecordingApplier { calls: Mutex::new(Vec::new()) };

        apply_bundle_fields(&run, &field_rows, &applier, Mode::CreateOnly).await.unwrap();

        let calls = applier.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        let (kind_name, row_count, bundles) = &calls[0];
        assert_eq!(kind_name, "Custom block type");
        assert_eq!(*row_count, 1);
        assert_eq!(bundles.get("Hero Block"), Some(&"hero_block".to_string()));
    }

    #[tokio::test]
    async fn test_apply_bundle_fields_noop_for_kinds_without_fields() {
        let target = MockTarget::default();
        let records = vec![record(&[("title", "Main Nav"), ("machine_name", "main-nav")])];
        let run = generate(EntityKind::Menu, &records, &target, Mode::CreateOnly).await.unwrap();

        let applier = crate::fields::ConsoleFieldApplier;
        // Menus carry no fields; the call is a no-op even with matching rows.
        let field_rows = vec![record(&[("entity_type", "bundle"), ("machine_name", "field_x")])];
        apply_bundle_fields(&run, &field_rows, &applier, Mode::CreateOnly).await.unwrap();
    }
}
