mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process;

use crate::commands::{
    cmd_add, cmd_delete, cmd_export, cmd_import, cmd_rescale, cmd_show,
};
use crate::config::Config;
use ratio_core::db::Database;
use ratio_core::models::DEFAULT_RECIPE;
use ratio_core::scaler::Rescaler;

#[derive(Parser)]
#[command(
    name = "ratio",
    version,
    about = "A simple recipe scaling CLI",
    long_about = "\n\n  ██████╗  █████╗ ████████╗██╗ ██████╗
  ██╔══██╗██╔══██╗╚══██╔══╝██║██╔═══██╗
  ██████╔╝███████║   ██║   ██║██║   ██║
  ██╔══██╗██╔══██║   ██║   ██║██║   ██║
  ██║  ██║██║  ██║   ██║   ██║╚██████╔╝
  ╚═╝  ╚═╝╚═╝  ╚═╝   ╚═╝   ╚═╝ ╚═════╝
     edit one weight, keep the ratios.
"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add an ingredient to the recipe
    Add {
        /// Ingredient name
        name: String,
        /// Weight in grams (e.g. "250" or "250g")
        weight: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set one ingredient's weight, rescaling all others proportionally
    Rescale {
        /// Ingredient ID (see `ratio show`)
        id: i64,
        /// New weight in grams (e.g. "200" or "200g")
        weight: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete an ingredient by ID
    Delete {
        /// Ingredient ID to delete
        id: i64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the current ingredient list
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Export the recipe as JSON
    Export {
        /// Write to a file instead of stdout
        #[arg(short, long, value_name = "PATH")]
        output: Option<std::path::PathBuf>,
    },
    /// Import a recipe from a JSON export, replacing the current list
    Import {
        /// Path to the JSON file
        file: std::path::PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let db = Database::open(&config.db_path)?;
    let mut scaler = Rescaler::open(db, DEFAULT_RECIPE)?;

    match cli.command {
        Commands::Add { name, weight, json } => cmd_add(&mut scaler, &name, &weight, json),
        Commands::Rescale { id, weight, json } => cmd_rescale(&mut scaler, id, &weight, json),
        Commands::Delete { id, json } => cmd_delete(&mut scaler, id, json),
        Commands::Show { json } => cmd_show(&scaler, json),
        Commands::Export { output } => cmd_export(&scaler, output.as_deref()),
        Commands::Import { file, json } => cmd_import(&mut scaler, &file, json),
    }
}
