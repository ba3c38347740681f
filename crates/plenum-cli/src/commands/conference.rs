//! Conference commands
//!
//! Usage: plenum conference create --name NAME [FORM FLAGS]
//!        plenum conference get KEY
//!        plenum conference update KEY --name NAME [FORM FLAGS]
//!        plenum conference created

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};
use plenum_core::model::ConferenceForm;
use plenum_core::queue::LoggingNotificationQueue;
use plenum_engine::commands::engine_command::{
    apply_engine_command, EngineCommand, EngineCommandResult,
};
use plenum_engine::commands::engine_query::{apply_engine_query, EngineQuery, EngineQueryResult};

use super::{print_conferences, print_json, with_store, ConferenceView, Context};

#[derive(Debug, Args)]
pub struct ConferenceArgs {
    #[command(subcommand)]
    pub command: ConferenceCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConferenceCommand {
    /// Create a conference owned by the caller
    Create(CreateArgs),
    /// Show one conference
    Get(GetArgs),
    /// Update a conference the caller organizes
    Update(UpdateArgs),
    /// List conferences the caller created
    Created,
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    #[command(flatten)]
    pub form: FormArgs,
}

#[derive(Debug, Args)]
pub struct GetArgs {
    /// Websafe conference key
    pub key: String,
}

#[derive(Debug, Args)]
pub struct UpdateArgs {
    /// Websafe conference key
    pub key: String,

    #[command(flatten)]
    pub form: FormArgs,
}

/// Form fields shared by create and update. An update replaces the whole
/// form, so omitted flags reset those fields to their defaults.
#[derive(Debug, Args)]
pub struct FormArgs {
    /// Conference name
    #[arg(long)]
    pub name: Option<String>,

    /// Free-form description
    #[arg(long)]
    pub description: Option<String>,

    /// Topic tag; repeat the flag for multiple topics
    #[arg(long = "topic")]
    pub topics: Vec<String>,

    /// Host city
    #[arg(long)]
    pub city: Option<String>,

    /// Start date, RFC 3339 (e.g. 2026-03-25T09:00:00Z)
    #[arg(long)]
    pub start_date: Option<DateTime<Utc>>,

    /// End date, RFC 3339
    #[arg(long)]
    pub end_date: Option<DateTime<Utc>>,

    /// Seat capacity
    #[arg(long, default_value_t = 0)]
    pub max_attendees: u32,
}

impl FormArgs {
    fn into_form(self) -> ConferenceForm {
        ConferenceForm {
            name: self.name,
            description: self.description,
            topics: self.topics,
            city: self.city,
            start_date: self.start_date,
            end_date: self.end_date,
            max_attendees: self.max_attendees,
        }
    }
}

pub fn execute(ctx: &Context, args: ConferenceArgs) -> Result<()> {
    match args.command {
        ConferenceCommand::Create(create_args) => execute_create(ctx, create_args),
        ConferenceCommand::Get(get_args) => execute_get(ctx, get_args),
        ConferenceCommand::Update(update_args) => execute_update(ctx, update_args),
        ConferenceCommand::Created => execute_created(ctx),
    }
}

fn execute_create(ctx: &Context, args: CreateArgs) -> Result<()> {
    let auth = ctx.auth();
    let form = args.form.into_form();
    let conference = with_store(ctx, |store| {
        let cmd = EngineCommand::ConferenceCreate { form };
        let result = apply_engine_command(cmd, auth.as_ref(), store, &LoggingNotificationQueue)?;
        let EngineCommandResult::ConferenceCreate(conference) = result else {
            anyhow::bail!("unexpected engine result for conference create");
        };
        Ok(conference)
    })?;
    print_json(&ConferenceView::new(&conference))
}

fn execute_get(ctx: &Context, args: GetArgs) -> Result<()> {
    // Conference lookup is public; no caller needed
    let conference = with_store(ctx, |store| {
        let query = EngineQuery::ConferenceGet {
            websafe_key: args.key,
        };
        let result = apply_engine_query(query, None, store)?;
        let EngineQueryResult::ConferenceGet(conference) = result else {
            anyhow::bail!("unexpected engine result for conference get");
        };
        Ok(conference)
    })?;
    print_json(&ConferenceView::new(&conference))
}

fn execute_update(ctx: &Context, args: UpdateArgs) -> Result<()> {
    let auth = ctx.auth();
    let UpdateArgs { key, form } = args;
    let form = form.into_form();
    let conference = with_store(ctx, |store| {
        let cmd = EngineCommand::ConferenceUpdate {
            websafe_key: key,
            form,
        };
        let result = apply_engine_command(cmd, auth.as_ref(), store, &LoggingNotificationQueue)?;
        let EngineCommandResult::ConferenceUpdate(conference) = result else {
            anyhow::bail!("unexpected engine result for conference update");
        };
        Ok(conference)
    })?;
    print_json(&ConferenceView::new(&conference))
}

fn execute_created(ctx: &Context) -> Result<()> {
    let auth = ctx.auth();
    let conferences = with_store(ctx, |store| {
        let result = apply_engine_query(EngineQuery::ConferencesCreated, auth.as_ref(), store)?;
        let EngineQueryResult::ConferencesCreated(conferences) = result else {
            anyhow::bail!("unexpected engine result for conference created");
        };
        Ok(conferences)
    })?;
    print_conferences(&conferences)
}
