//! Seed import command
//!
//! Usage: plenum seed import <PATH>

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};

use super::{open_database, Context};

#[derive(Debug, Args)]
pub struct SeedArgs {
    #[command(subcommand)]
    pub command: SeedCommand,
}

#[derive(Debug, Subcommand)]
pub enum SeedCommand {
    /// Import a seed file into the database
    Import(ImportArgs),
}

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Path to seed YAML file or directory
    pub path: PathBuf,
}

pub fn execute(ctx: &Context, args: SeedArgs) -> Result<()> {
    match args.command {
        SeedCommand::Import(import_args) => execute_import(ctx, import_args),
    }
}

fn execute_import(ctx: &Context, args: ImportArgs) -> Result<()> {
    let mut conn = open_database(&ctx.db)?;

    if args.path.is_dir() {
        // Import directory of seeds (sorted for determinism)
        let mut seed_files: Vec<PathBuf> = std::fs::read_dir(&args.path)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| {
                p.extension()
                    .map(|ext| ext == "yaml" || ext == "yml")
                    .unwrap_or(false)
            })
            .collect();

        seed_files.sort();

        for seed_file in seed_files {
            println!("Importing {}...", seed_file.display());
            let digest = plenum_store::seed::import_seed(&seed_file, &mut conn)?;
            println!("✓ Imported (digest: {})", digest);
        }
    } else {
        println!("Importing {}...", args.path.display());
        let digest = plenum_store::seed::import_seed(&args.path, &mut conn)?;
        println!("✓ Imported (digest: {})", digest);
    }

    Ok(())
}
