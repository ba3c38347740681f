//! Filtered conference query command
//!
//! Usage: plenum query run "city == London" "maxAttendees < 100"

use anyhow::Result;
use clap::{Args, Subcommand};
use plenum_core::query::{Filter, QueryField, QueryOperator};
use plenum_engine::commands::engine_query::{apply_engine_query, EngineQuery, EngineQueryResult};

use super::{print_conferences, with_store, Context};

#[derive(Debug, Args)]
pub struct QueryArgs {
    #[command(subcommand)]
    pub command: QueryCommand,
}

#[derive(Debug, Subcommand)]
pub enum QueryCommand {
    /// Run a query built from filter strings
    Run(RunArgs),
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Filters of the form "<field> <operator> <value>".
    /// Fields: city, topics, month, maxAttendees. Operators: ==, !=, <, >, <=, >=.
    #[arg(value_name = "FILTER")]
    pub filters: Vec<String>,
}

pub fn execute(ctx: &Context, args: QueryArgs) -> Result<()> {
    match args.command {
        QueryCommand::Run(run_args) => execute_run(ctx, run_args),
    }
}

fn execute_run(ctx: &Context, args: RunArgs) -> Result<()> {
    let filters = args
        .filters
        .iter()
        .map(|raw| parse_filter(raw))
        .collect::<Result<Vec<_>>>()?;
    let conferences = with_store(ctx, |store| {
        let result = apply_engine_query(EngineQuery::QueryConferences { filters }, None, store)?;
        let EngineQueryResult::QueryConferences(conferences) = result else {
            anyhow::bail!("unexpected engine result for query run");
        };
        Ok(conferences)
    })?;
    print_conferences(&conferences)
}

/// Split one filter string into field, operator, and value.
///
/// The value keeps any embedded spaces ("city == San Francisco").
fn parse_filter(raw: &str) -> Result<Filter> {
    let mut parts = raw.trim().splitn(3, char::is_whitespace);
    let (Some(field), Some(operator), Some(value)) = (parts.next(), parts.next(), parts.next())
    else {
        anyhow::bail!(
            "filter must look like \"<field> <operator> <value>\", got: {}",
            raw
        );
    };
    let field: QueryField = field.parse()?;
    let operator: QueryOperator = operator.parse()?;
    Ok(Filter::new(field, operator, value.trim()))
}
