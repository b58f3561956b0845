//! dsteg CLI - Generate Drupal configuration entities from a DST sheet
//!
//! # Commands
//!
//! ```bash
//! dsteg block-types            # Create custom block types (and their fields)
//! dsteg block-types --update   # Also update existing, flagged block types
//! dsteg menus                  # Create menus
//! dsteg user-roles             # Create user roles
//! ```
//!
//! Rows come from the Google Sheets API by default; pass `--csv-dir` to use
//! a directory of per-tab CSV exports instead. Target-site credentials and
//! the sheet id come from the environment (see `config`).

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use dsteg::config::{SheetConfig, TargetConfig};
use dsteg::error::SheetResult;
use dsteg::sheet::FIELDS;
use dsteg::{
    apply_bundle_fields, generate, ConsoleFieldApplier, CsvDirSource, DrupalClient, EntityKind,
    GoogleSheetClient, Mode, RawRecord,
};

#[derive(Parser)]
#[command(name = "dsteg")]
#[command(about = "Generate Drupal configuration entities from a DST sheet", long_about = None)]
struct Cli {
    /// Read ranges from per-tab CSV exports in this directory instead of the
    /// Sheets API
    #[arg(long, global = true)]
    csv_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate custom block types, then apply their sheet-defined fields
    BlockTypes {
        /// Update existing entities whose sheet row is flagged for update
        #[arg(long)]
        update: bool,
    },

    /// Generate menus
    Menus {
        /// Update existing entities whose sheet row is flagged for update
        #[arg(long)]
        update: bool,
    },

    /// Generate user roles
    UserRoles {
        /// Update existing entities whose sheet row is flagged for update
        #[arg(long)]
        update: bool,
    },
}

/// DST sheet source selected by the CLI.
enum Source {
    Google(GoogleSheetClient),
    CsvDir(CsvDirSource),
}

impl Source {
    async fn fetch(&self, range: &str) -> SheetResult<Vec<RawRecord>> {
        match self {
            Source::Google(client) => client.fetch(range).await,
            Source::CsvDir(source) => source.fetch(range).await,
        }
    }
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::BlockTypes { update } => {
            run(EntityKind::BlockType, mode(update), cli.csv_dir).await
        }
        Commands::Menus { update } => run(EntityKind::Menu, mode(update), cli.csv_dir).await,
        Commands::UserRoles { update } => {
            run(EntityKind::UserRole, mode(update), cli.csv_dir).await
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn mode(update: bool) -> Mode {
    if update {
        Mode::CreateOrUpdate
    } else {
        Mode::CreateOnly
    }
}

async fn run(
    kind: EntityKind,
    mode: Mode,
    csv_dir: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("Generating Drupal {}s...", kind.display_name());

    let source = match csv_dir {
        Some(dir) => Source::CsvDir(CsvDirSource::new(dir)),
        None => {
            let sheet = SheetConfig::from_env()?;
            Source::Google(GoogleSheetClient::new(sheet.spreadsheet_id, sheet.api_key))
        }
    };

    let target = TargetConfig::from_env()?;
    let client = DrupalClient::new(target.base_url, target.username, target.password);

    let records = source.fetch(kind.sheet_range()).await?;
    let report = generate(kind, &records, &client, mode).await?;

    // Block types carry sheet-defined fields; hand them to the applier.
    if kind.field_filter_key().is_some() && !report.specs.is_empty() {
        let field_rows = source.fetch(FIELDS).await?;
        apply_bundle_fields(&report, &field_rows, &ConsoleFieldApplier, mode).await?;
    }

    Ok(())
}
