//! Create-vs-update-vs-skip reconciliation.
//!
//! [`reconcile`] walks desired entity specs in input order and compares each
//! against a one-shot snapshot of existing entities, issuing create/update
//! calls through an injected [`TargetClient`]. Each spec lands in exactly one
//! terminal [`ReconcileOutcome`]; a failing call is reported for that id and
//! never aborts the remaining specs.
//!
//! The snapshot is not refreshed mid-run. Specs sharing an id will therefore
//! each attempt creation against the same snapshot: callers must
//! pre-deduplicate specs by id (the pipeline does, last-wins). This is a
//! precondition, not behavior the reconciler corrects.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::error::TargetResult;
use crate::models::{
    EntityHandle, EntityKind, EntitySpec, ExistingSnapshot, Mode, ReconcileOutcome,
};

/// What the target reported for a create call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateStatus {
    /// A genuinely new resource was created.
    New,
    /// The target no-opped or rejected the create as a duplicate.
    Existing,
}

/// Target-system client seam. Implemented by the Drupal JSON:API client and
/// by recording mocks in tests.
#[async_trait]
pub trait TargetClient {
    /// Load a single entity by machine name.
    async fn load(&self, kind: EntityKind, id: &str) -> TargetResult<Option<EntityHandle>>;

    /// Load all entities of a kind, keyed by machine name.
    async fn load_multiple(&self, kind: EntityKind) -> TargetResult<ExistingSnapshot>;

    /// Create an entity from a spec.
    async fn create(&self, spec: &EntitySpec) -> TargetResult<CreateStatus>;

    /// Merge a spec's fields onto an existing entity.
    async fn update(&self, handle: &EntityHandle, spec: &EntitySpec) -> TargetResult<()>;
}

/// Reconcile desired specs against the existing-entity snapshot.
///
/// Per spec, in input order:
/// 1. id in `existing` and mode is [`Mode::CreateOrUpdate`] with the id
///    flagged in `update_flags`: issue an update, outcome `Updated`.
/// 2. id in `existing` otherwise: outcome `SkippedExists`, no side effect.
/// 3. id absent: issue a create; `Created` when the target reports a new
///    resource, `SkippedInvalid` when it deduplicated the call.
///
/// Target errors become `Failed` outcomes and processing continues.
pub async fn reconcile<C: TargetClient>(
    client: &C,
    specs: &[EntitySpec],
    existing: &ExistingSnapshot,
    mode: Mode,
    update_flags: &HashMap<String, bool>,
) -> Vec<ReconcileOutcome> {
    let mut outcomes = Vec::with_capacity(specs.len());

    for spec in specs {
        let id = spec.id().to_string();
        let label = spec.label().to_string();

        let outcome = match existing.get(&id) {
            Some(handle) => {
                let update_requested =
                    mode == Mode::CreateOrUpdate && update_flags.get(&id).copied().unwrap_or(false);
                if update_requested {
                    match client.update(handle, spec).await {
                        Ok(()) => ReconcileOutcome::Updated { id, label },
                        Err(e) => ReconcileOutcome::Failed { id, label, error: e.to_string() },
                    }
                } else {
                    ReconcileOutcome::SkippedExists { id, label }
                }
            }
            None => match client.create(spec).await {
                Ok(CreateStatus::New) => ReconcileOutcome::Created { id, label },
                Ok(CreateStatus::Existing) => ReconcileOutcome::SkippedInvalid {
                    id,
                    reason: "target reported the entity as already existing".to_string(),
                },
                Err(e) => ReconcileOutcome::Failed { id, label, error: e.to_string() },
            },
        };

        outcomes.push(outcome);
    }

    outcomes
}
