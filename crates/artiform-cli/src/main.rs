//! Artiform CLI - manage artifact server repositories from declarative YAML

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod display;
mod error;
mod exit_codes;
mod manifest;
mod state;

const DEFAULT_STATE: &str = "artiform.state.json";

#[derive(Parser)]
#[command(name = "artiform")]
#[command(author = "Artiform Contributors")]
#[command(version)]
#[command(about = "Manage artifact server repositories from declarative YAML", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Provider configuration file (default: ~/.config/artiform/provider.yaml)
    #[arg(long, global = true, env = "ARTIFORM_CONFIG")]
    config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List supported resource types
    Types {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the fields of a resource type
    Schema {
        /// Resource type, e.g. artifactory_remote_cargo_repository
        resource_type: String,

        /// Print a draft-07 JSON Schema instead of a table
        #[arg(long)]
        json_schema: bool,
    },

    /// Validate a manifest without contacting the server
    Validate {
        /// Manifest file
        file: PathBuf,

        /// Output validation results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the changes apply would make
    Plan {
        /// Manifest file
        file: PathBuf,

        /// State file
        #[arg(short, long, default_value = DEFAULT_STATE)]
        state: PathBuf,

        /// Compare against the state file as is, without reading the server
        #[arg(long)]
        no_refresh: bool,

        /// Output the plan as JSON
        #[arg(long)]
        json: bool,

        /// Exit with a distinct code when changes are pending
        #[arg(long)]
        detailed_exitcode: bool,
    },

    /// Create, update and delete repositories to match a manifest
    Apply {
        /// Manifest file
        file: PathBuf,

        /// State file
        #[arg(short, long, default_value = DEFAULT_STATE)]
        state: PathBuf,
    },

    /// Adopt an existing repository
    Import {
        /// Resource address, e.g. artifactory_local_generic_repository.files
        address: String,

        /// Repository key on the server
        key: String,

        /// State file
        #[arg(short, long, default_value = DEFAULT_STATE)]
        state: PathBuf,
    },

    /// Read every managed repository back into the state
    Refresh {
        /// State file
        #[arg(short, long, default_value = DEFAULT_STATE)]
        state: PathBuf,
    },

    /// Delete managed repositories
    Destroy {
        /// State file
        #[arg(short, long, default_value = DEFAULT_STATE)]
        state: PathBuf,

        /// Only destroy these addresses
        #[arg(long = "target")]
        targets: Vec<String>,
    },

    /// Show the managed resources recorded in the state
    Show {
        /// State file
        #[arg(short, long, default_value = DEFAULT_STATE)]
        state: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

async fn run(cli: Cli) -> error::Result<()> {
    let config = cli.config.as_deref();

    match cli.command {
        Commands::Types { json } => commands::types::run(json),

        Commands::Schema {
            resource_type,
            json_schema,
        } => commands::schema::run(&resource_type, json_schema),

        Commands::Validate { file, json } => commands::validate::run(&file, json),

        Commands::Plan {
            file,
            state,
            no_refresh,
            json,
            detailed_exitcode,
        } => {
            commands::plan::run(&file, &state, config, !no_refresh, json, detailed_exitcode).await
        }

        Commands::Apply { file, state } => commands::apply::run(&file, &state, config).await,

        Commands::Import {
            address,
            key,
            state,
        } => commands::import::run(&address, &key, &state, config).await,

        Commands::Refresh { state } => commands::refresh::run(&state, config).await,

        Commands::Destroy { state, targets } => {
            commands::destroy::run(&state, config, &targets).await
        }

        Commands::Show { state, json } => commands::show::run(&state, json),
    }
}

#[tokio::main]
async fn main() {
    // Setup miette for nice error display
    miette::set_panic_hook();

    let cli = Cli::parse();

    if cli.debug {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_max_level(tracing::Level::DEBUG)
            .init();
    }

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}
