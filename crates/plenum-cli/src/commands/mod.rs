//! CLI command modules
//!
//! Every command runs the same way: open the SQLite database, hydrate the
//! in-memory datastore, run one engine command or query against it, and
//! write the store back. The helpers here carry that shared plumbing.

pub mod check;
pub mod conference;
pub mod profile;
pub mod query;
pub mod registration;
pub mod seed;

use std::path::Path;

use anyhow::Result;
use plenum_core::model::Conference;
use plenum_core::store::Datastore;
use plenum_engine::identity::AuthUser;
use serde::Serialize;

/// Shared command context assembled from the global CLI flags
#[derive(Debug)]
pub struct Context {
    pub db: String,
    pub caller: Option<String>,
}

impl Context {
    /// The caller as engine auth, when `--as` was given
    pub fn auth(&self) -> Option<AuthUser> {
        self.caller.as_deref().map(AuthUser::new)
    }
}

/// Open the database, creating parent directories and applying migrations
pub fn open_database(db: &str) -> Result<rusqlite::Connection> {
    if let Some(parent) = Path::new(db).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut conn = plenum_store::db::open(db)?;
    plenum_store::db::configure(&conn)?;
    plenum_store::migrations::apply_migrations(&mut conn)?;
    Ok(conn)
}

/// Run one engine interaction against the hydrated store.
///
/// The store is written back only when `f` succeeds. Queries go through the
/// same path because resolving a caller can mint an account mapping, and
/// persisting it keeps identities stable across invocations.
pub fn with_store<T>(ctx: &Context, f: impl FnOnce(&Datastore) -> Result<T>) -> Result<T> {
    let mut conn = open_database(&ctx.db)?;
    let store = plenum_store::repo::hydration::load_datastore(&conn)?;
    let value = f(&store)?;
    plenum_store::repo::hydration::persist_datastore(&mut conn, &store)?;
    Ok(value)
}

/// A conference as printed: the entity fields plus the websafe key clients
/// need for registration and updates
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConferenceView<'a> {
    pub websafe_key: String,
    #[serde(flatten)]
    pub conference: &'a Conference,
}

impl<'a> ConferenceView<'a> {
    pub fn new(conference: &'a Conference) -> Self {
        Self {
            websafe_key: conference.key().websafe(),
            conference,
        }
    }
}

/// Pretty-print one JSON document to stdout
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a conference list as a JSON array
pub fn print_conferences(conferences: &[Conference]) -> Result<()> {
    let views: Vec<ConferenceView<'_>> = conferences.iter().map(ConferenceView::new).collect();
    print_json(&views)
}
