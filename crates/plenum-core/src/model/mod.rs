//! Domain model types
//!
//! Entities keep their fields private and expose read-only views plus the
//! mutators that preserve their invariants. Everything that crosses the core
//! boundary is either a copy or an immutable borrow; callers never hold an
//! alias into engine-owned mutable state.

pub mod account;
pub mod conference;
pub mod forms;
pub mod profile;

pub use account::{CallerIdentity, UserAccount};
pub use conference::{Conference, ConferenceRecord, DEFAULT_CITY, DEFAULT_TOPICS};
pub use forms::{ConferenceForm, ProfileForm};
pub use profile::{Profile, ProfileRecord, TeeShirtSize};
