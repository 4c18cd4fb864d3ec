//! Saved-list subcommands: listing, removal and report export.

use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use clap::Subcommand;
use parcelmap_core::{render_report, SavedStore};
use uuid::Uuid;

#[derive(Debug, Subcommand)]
pub enum SavedCommands {
    /// List saved properties
    List,
    /// Remove a saved property by id
    Remove {
        /// Saved property id
        id: Uuid,
    },
    /// Write a plain-text property report
    Export {
        /// Output file; prints to stdout when omitted
        #[arg(long, short)]
        output: Option<PathBuf>,
        /// Export only these ids (repeatable); exports everything when omitted
        #[arg(long = "id")]
        ids: Vec<Uuid>,
    },
}

pub(crate) fn run_saved(store: &mut SavedStore, command: SavedCommands) -> anyhow::Result<()> {
    match command {
        SavedCommands::List => {
            let entries = store.entries();
            if entries.is_empty() {
                println!("no saved properties");
                return Ok(());
            }
            println!("{:<36}  {:<16}  {:<28}  ADDRESS", "ID", "SAVED", "OWNER");
            for entry in entries.iter() {
                let view = entry.property.view();
                println!(
                    "{:<36}  {:<16}  {:<28}  {}",
                    entry.id,
                    entry.saved_at.format("%Y-%m-%d %H:%M"),
                    view.owner,
                    view.full_address
                );
            }
        }
        SavedCommands::Remove { id } => {
            let removed = store.remove(id)?;
            println!(
                "removed {} ({})",
                removed.id,
                removed.property.view().full_address
            );
        }
        SavedCommands::Export { output, ids } => {
            let entries = store.entries();
            let report = if ids.is_empty() {
                render_report(entries.iter(), Utc::now())
            } else {
                let selected = entries.select(&ids);
                if selected.len() < ids.len() {
                    tracing::warn!(
                        requested = ids.len(),
                        found = selected.len(),
                        "some requested ids are not in the saved list"
                    );
                }
                render_report(selected, Utc::now())
            };

            match output {
                Some(path) => {
                    std::fs::write(&path, report)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    println!("report written to {}", path.display());
                }
                None => print!("{report}"),
            }
        }
    }
    Ok(())
}
