//! Profile commands
//!
//! Usage: plenum profile get | plenum profile save [--display-name NAME] [--tee-shirt-size SIZE]

use anyhow::Result;
use clap::{Args, Subcommand};
use plenum_core::model::{ProfileForm, TeeShirtSize};
use plenum_core::queue::LoggingNotificationQueue;
use plenum_engine::commands::engine_command::{
    apply_engine_command, EngineCommand, EngineCommandResult,
};
use plenum_engine::commands::engine_query::{apply_engine_query, EngineQuery, EngineQueryResult};

use super::{print_json, with_store, Context};

#[derive(Debug, Args)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub command: ProfileCommand,
}

#[derive(Debug, Subcommand)]
pub enum ProfileCommand {
    /// Show the caller's profile, or its defaults when none is saved
    Get,
    /// Create or update the caller's profile
    Save(SaveArgs),
}

#[derive(Debug, Args)]
pub struct SaveArgs {
    /// Display name; an absent name falls back to the email local part
    #[arg(long)]
    pub display_name: Option<String>,

    /// Tee shirt size (XS, S, M, L, XL, XXL, XXXL, or NOT_SPECIFIED)
    #[arg(long)]
    pub tee_shirt_size: Option<TeeShirtSize>,
}

pub fn execute(ctx: &Context, args: ProfileArgs) -> Result<()> {
    match args.command {
        ProfileCommand::Get => execute_get(ctx),
        ProfileCommand::Save(save_args) => execute_save(ctx, save_args),
    }
}

fn execute_get(ctx: &Context) -> Result<()> {
    let auth = ctx.auth();
    let profile = with_store(ctx, |store| {
        let result = apply_engine_query(EngineQuery::ProfileGet, auth.as_ref(), store)?;
        let EngineQueryResult::ProfileGet(profile) = result else {
            anyhow::bail!("unexpected engine result for profile get");
        };
        Ok(profile)
    })?;
    print_json(&profile)
}

fn execute_save(ctx: &Context, args: SaveArgs) -> Result<()> {
    let auth = ctx.auth();
    let form = ProfileForm {
        display_name: args.display_name,
        tee_shirt_size: args.tee_shirt_size,
    };
    let profile = with_store(ctx, |store| {
        let cmd = EngineCommand::ProfileSave { form };
        let result = apply_engine_command(cmd, auth.as_ref(), store, &LoggingNotificationQueue)?;
        let EngineCommandResult::ProfileSave(profile) = result else {
            anyhow::bail!("unexpected engine result for profile save");
        };
        Ok(profile)
    })?;
    print_json(&profile)
}
