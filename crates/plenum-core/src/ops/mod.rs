//! Operations over the entity store
//!
//! Each operation is a free function taking the storage handle explicitly.
//! Mutating operations run a single transaction attempt and return the
//! commit; retry policy lives with the caller, which also owns dispatching
//! any notification tasks the commit released.

pub mod conference_ops;
pub mod profile_ops;
pub mod registration_ops;

pub use conference_ops::{
    conferences_created_by, conferences_to_attend, create_conference, get_conference,
    update_conference,
};
pub use profile_ops::{load_or_default_profile, save_profile};
pub use registration_ops::{register, unregister};
