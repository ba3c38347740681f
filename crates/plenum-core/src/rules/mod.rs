//! Validation rules and store-wide invariant checks

pub mod invariants;
pub mod validation;

pub use invariants::{check_invariants, InvariantReport};
pub use validation::validate_conference_form;
