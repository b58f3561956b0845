//! # dsteg - DST-sheet driven Drupal configuration generation
//!
//! dsteg reads entity definitions from a DST specification spreadsheet and
//! creates or updates the matching configuration entities (custom block
//! types, menus, user roles) on a Drupal site.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  DST sheet  │────▶│  Validator  │────▶│  Reconciler │────▶│   Drupal    │
//! │ (API / CSV) │     │  + Mapper   │     │ (vs. site)  │     │  JSON:API   │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use dsteg::{generate, EntityKind, Mode, DrupalClient};
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = DrupalClient::new("https://example.com", "admin", "secret");
//!     let report = generate(EntityKind::Menu, &records, &client, Mode::CreateOnly)
//!         .await
//!         .unwrap();
//!     println!("{} menus created", report.created());
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Domain models (EntityKind, EntitySpec, outcomes)
//! - [`sheet`] - DST sheet sources (Sheets API, CSV exports)
//! - [`validate`] - Row validation
//! - [`transform`] - Record → entity-spec mapping
//! - [`reconcile`] - Create/update/skip reconciliation
//! - [`target`] - Drupal JSON:API client
//! - [`fields`] - Field Applier boundary
//! - [`pipeline`] - Per-kind run orchestration
//! - [`config`] - Environment configuration
//! - [`report`] - Console reporting

// Core modules
pub mod error;
pub mod models;

// Sheet ingestion
pub mod sheet;

// Validation and mapping
pub mod transform;
pub mod validate;

// Reconciliation
pub mod reconcile;
pub mod target;

// Field application boundary
pub mod fields;

// Orchestration
pub mod pipeline;

// Ambient
pub mod config;
pub mod report;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{ConfigError, GenerateError, SheetError, TargetError, ValidationError};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    EntityHandle, EntityKind, EntitySpec, ExistingSnapshot, IdentifierRules, Mode, RawRecord,
    ReconcileOutcome,
};

// =============================================================================
// Re-exports - Validation & Mapping
// =============================================================================

pub use transform::map_record;
pub use validate::{validate, validate_machine_name};

// =============================================================================
// Re-exports - Reconciliation
// =============================================================================

pub use reconcile::{reconcile, CreateStatus, TargetClient};
pub use target::DrupalClient;

// =============================================================================
// Re-exports - Fields
// =============================================================================

pub use fields::{bundle_label_map, filter_rows_for_entity, ConsoleFieldApplier, FieldApplier};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use pipeline::{apply_bundle_fields, generate, RunReport};

// =============================================================================
// Re-exports - Sheet sources
// =============================================================================

pub use sheet::csv::CsvDirSource;
pub use sheet::google::GoogleSheetClient;
pub use sheet::{BUNDLES, FIELDS, MENUS, USER_ROLES};
