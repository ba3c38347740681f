//! Registration commands
//!
//! Usage: plenum register KEY | plenum unregister KEY | plenum attending

use anyhow::Result;
use clap::Args;
use plenum_core::queue::LoggingNotificationQueue;
use plenum_engine::commands::engine_command::{
    apply_engine_command, EngineCommand, EngineCommandResult,
};
use plenum_engine::commands::engine_query::{apply_engine_query, EngineQuery, EngineQueryResult};

use super::{print_conferences, with_store, Context};

#[derive(Debug, Args)]
pub struct RegisterArgs {
    /// Websafe conference key
    pub key: String,
}

#[derive(Debug, Args)]
pub struct UnregisterArgs {
    /// Websafe conference key
    pub key: String,
}

pub fn execute_register(ctx: &Context, args: RegisterArgs) -> Result<()> {
    let auth = ctx.auth();
    let key = args.key;
    let registered = with_store(ctx, |store| {
        let cmd = EngineCommand::Register {
            websafe_key: key.clone(),
        };
        let result = apply_engine_command(cmd, auth.as_ref(), store, &LoggingNotificationQueue)?;
        let EngineCommandResult::Register(registered) = result else {
            anyhow::bail!("unexpected engine result for register");
        };
        Ok(registered)
    })?;
    if registered {
        println!("Registered for conference {}", key);
    }
    Ok(())
}

pub fn execute_unregister(ctx: &Context, args: UnregisterArgs) -> Result<()> {
    let auth = ctx.auth();
    let key = args.key;
    let removed = with_store(ctx, |store| {
        let cmd = EngineCommand::Unregister {
            websafe_key: key.clone(),
        };
        let result = apply_engine_command(cmd, auth.as_ref(), store, &LoggingNotificationQueue)?;
        let EngineCommandResult::Unregister(removed) = result else {
            anyhow::bail!("unexpected engine result for unregister");
        };
        Ok(removed)
    })?;
    if removed {
        println!("Registration removed for conference {}", key);
    } else {
        println!("No registration found for conference {}", key);
    }
    Ok(())
}

pub fn execute_attending(ctx: &Context) -> Result<()> {
    let auth = ctx.auth();
    let conferences = with_store(ctx, |store| {
        let result = apply_engine_query(EngineQuery::ConferencesToAttend, auth.as_ref(), store)?;
        let EngineQueryResult::ConferencesToAttend(conferences) = result else {
            anyhow::bail!("unexpected engine result for attending");
        };
        Ok(conferences)
    })?;
    print_conferences(&conferences)
}
