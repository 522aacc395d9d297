mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "coursecal")]
#[command(about = "Export course calendars as .ics files and inspect calendar documents")]
struct Cli {
    /// Configuration file (defaults to ./coursecal.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a calendar for a session, an assignment or a student's schedule
    Export {
        #[command(subcommand)]
        target: commands::export::Target,

        /// Seed data file (overrides `seed_path` from the config)
        #[arg(short, long)]
        seed: Option<PathBuf>,

        /// Output file, or a directory to place the default filename in (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Parse an .ics file and print its structure
    Check { file: PathBuf },
    /// Write a configuration file with default values
    InitConfig {
        #[arg(default_value = coursecal_core::app_config::DEFAULT_CONFIG_FILE)]
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Export {
            target,
            seed,
            output,
        } => commands::export::run(cli.config.as_deref(), target, seed, output),
        Commands::Check { file } => commands::check::run(&file),
        Commands::InitConfig { path } => commands::init_config::run(&path),
    }
}
