//! Main CLI application structure

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use crate::manager::DocumentManager;
use crate::storage::Config;

#[derive(Parser)]
#[command(name = "chronica")]
#[command(author, version, about = "Local-first timeline documents")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Use an alternate config file
    #[arg(long, global = true, env = "CHRONICA_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new timeline document
    New {
        /// Where to write the document (conventionally `.jsonlo`)
        path: PathBuf,

        /// Document name (defaults to a generated "New Document {n}")
        #[arg(long)]
        name: Option<String>,

        /// Skip the starter event
        #[arg(long)]
        empty: bool,
    },

    /// Print a document
    Show {
        path: PathBuf,
    },

    /// Manage events in a document
    #[command(subcommand)]
    Event(EventCommands),

    /// Sort a document's events by ascending year
    Sort {
        path: PathBuf,
    },

    /// List recently used documents
    Recent,
}

#[derive(Subcommand)]
pub enum EventCommands {
    /// Add an event to a document
    Add {
        path: PathBuf,

        /// Event year; negative years are BC
        #[arg(long, allow_hyphen_values = true)]
        year: i32,

        #[arg(long, default_value = "")]
        headline: String,

        #[arg(long, default_value = "")]
        description: String,
    },

    /// Remove an event from a document by id
    Remove {
        path: PathBuf,

        #[arg(long)]
        id: u64,
    },
}

/// Parses arguments and runs the requested command.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => Config::default_path()?,
    };
    let mut config = Config::load(&config_path)?;

    match cli.command {
        Commands::New { path, name, empty } => {
            let mut manager = DocumentManager::new();
            let doc = manager.create_document();
            if let Some(name) = name {
                doc.name = name;
            }
            doc.state.set_zoom(config.default_zoom);
            if !empty {
                doc.add_event(config.default_year, "New event", "");
            }
            manager.save_current_as(&path)?;
            println!("Created {} ({})", manager.document(0).name, path.display());

            config.remember_file(path);
            config.save(&config_path)?;
        }

        Commands::Show { path } => {
            let mut manager = DocumentManager::new();
            let index = manager.load_document(&path)?;
            let doc = manager.document(index);

            println!("{}", doc.name);
            println!(
                "  zoom {} offset {} years {}..{}",
                doc.state.zoom, doc.state.offset, doc.state.min_year, doc.state.max_year
            );
            println!("  {} event(s)", doc.events().len());
            for event in doc.events() {
                println!("  [{}] {}: {}", event.id, format_year(event.year), event.headline);
                if !event.description.is_empty() {
                    println!("      {}", event.description);
                }
            }

            config.remember_file(path);
            config.save(&config_path)?;
        }

        Commands::Event(command) => {
            run_event(command, &mut config)?;
            config.save(&config_path)?;
        }

        Commands::Sort { path } => {
            let mut manager = DocumentManager::new();
            let index = manager.load_document(&path)?;

            if !manager.start_sort(index) {
                bail!("A sort is already running");
            }
            manager.finish_sort();
            manager
                .save_current()
                .with_context(|| format!("Failed to save {}", path.display()))?;
            println!("Sorted {} event(s)", manager.document(index).events().len());

            config.remember_file(path);
            config.save(&config_path)?;
        }

        Commands::Recent => {
            if config.recent_files.is_empty() {
                println!("No recent documents");
            }
            for path in &config.recent_files {
                println!("{}", path.display());
            }
        }
    }

    Ok(())
}

fn run_event(command: EventCommands, config: &mut Config) -> Result<()> {
    match command {
        EventCommands::Add {
            path,
            year,
            headline,
            description,
        } => {
            let mut manager = DocumentManager::new();
            let index = manager.load_document(&path)?;
            let id = manager.document_mut(index).add_event(year, headline, description);
            manager.save_current()?;
            println!("Added event {} ({})", id, format_year(year));
            config.remember_file(path);
        }

        EventCommands::Remove { path, id } => {
            let mut manager = DocumentManager::new();
            let index = manager.load_document(&path)?;
            if !manager.document_mut(index).remove_event(id) {
                bail!("No event with id {} in {}", id, path.display());
            }
            manager.save_current()?;
            println!("Removed event {}", id);
            config.remember_file(path);
        }
    }
    Ok(())
}

fn format_year(year: i32) -> String {
    if year < 0 {
        format!("{} BC", -(year as i64))
    } else {
        year.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn years_format_with_bc_suffix() {
        assert_eq!(format_year(1990), "1990");
        assert_eq!(format_year(-500), "500 BC");
        assert_eq!(format_year(0), "0");
        assert_eq!(format_year(i32::MIN), format!("{} BC", -(i32::MIN as i64)));
    }
}
