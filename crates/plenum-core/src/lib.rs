//! Plenum Core - Conference management semantic kernel
//!
//! This crate provides the foundational data structures and operations for
//! Plenum, including:
//! - Conference and Profile models with full CRUD semantics
//! - An in-memory datastore partitioned into per-user entity groups
//! - Group-scoped transactions with staged writes and atomic commit
//! - Registration operations that move seats and attendance together
//! - A query builder enforcing the single-inequality-field rule
//! - Store-wide invariant checks for externally loaded data
//!
//! Persistence and the outer API surface live in sibling crates; everything
//! here works against the in-memory [`store::Datastore`].

pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod ops;
pub mod query;
pub mod queue;
pub mod rules;
pub mod store;

// Re-export commonly used types
pub use errors::{ApiError, ApiErrorKind, ApiFault, Result};
pub use model::{
    CallerIdentity, Conference, ConferenceForm, Profile, ProfileForm, TeeShirtSize, UserAccount,
};
pub use query::{ConferenceQuery, Filter, QueryField, QueryOperator};
pub use store::{ConfirmationTask, Datastore, TxCommit};
