//! Plenum CLI
//!
//! Command-line interface for Plenum

use clap::{Parser, Subcommand};
use plenum_core::logging_facility;

mod commands;

use commands::Context;

#[derive(Debug, Parser)]
#[command(name = "plenum")]
#[command(about = "Plenum - Conference registration management", long_about = None)]
struct Cli {
    /// Path to the SQLite database
    #[arg(long, global = true, default_value = ".plenum/store.db")]
    db: String,

    /// Email of the calling user; first use mints an account
    #[arg(long = "as", global = true, value_name = "EMAIL")]
    caller: Option<String>,

    /// Logging profile: development, production, or test
    #[arg(long, global = true, default_value = "production")]
    log_profile: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Profile operations
    Profile(commands::profile::ProfileArgs),
    /// Conference operations
    Conference(commands::conference::ConferenceArgs),
    /// Filtered conference queries
    Query(commands::query::QueryArgs),
    /// Register the caller for a conference
    Register(commands::registration::RegisterArgs),
    /// Drop the caller's registration for a conference
    Unregister(commands::registration::UnregisterArgs),
    /// List conferences the caller is registered for
    Attending,
    /// Seed import operations
    Seed(commands::seed::SeedArgs),
    /// Scan the store for invariant violations
    Check,
}

fn main() {
    let cli = Cli::parse();

    let Some(profile) = log_profile(&cli.log_profile) else {
        eprintln!("Error: unknown log profile: {}", cli.log_profile);
        std::process::exit(2);
    };
    logging_facility::init(profile);

    let ctx = Context {
        db: cli.db,
        caller: cli.caller,
    };

    let result = match cli.command {
        Commands::Profile(args) => commands::profile::execute(&ctx, args),
        Commands::Conference(args) => commands::conference::execute(&ctx, args),
        Commands::Query(args) => commands::query::execute(&ctx, args),
        Commands::Register(args) => commands::registration::execute_register(&ctx, args),
        Commands::Unregister(args) => commands::registration::execute_unregister(&ctx, args),
        Commands::Attending => commands::registration::execute_attending(&ctx),
        Commands::Seed(args) => commands::seed::execute(&ctx, args),
        Commands::Check => commands::check::execute(&ctx),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn log_profile(name: &str) -> Option<logging_facility::Profile> {
    match name {
        "development" | "dev" => Some(logging_facility::Profile::Development),
        "production" | "prod" => Some(logging_facility::Profile::Production),
        "test" => Some(logging_facility::Profile::Test),
        _ => None,
    }
}
