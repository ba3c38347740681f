//! Conference query surface
//!
//! Clients describe a search as a list of `(field, operator, value)`
//! filters. [`builder::ConferenceQuery::build`] validates the list (one
//! inequality field at most), coerces values to their fields' types, and
//! fixes the result ordering that the inequality rule demands. The compiled
//! query then runs against the store.

pub mod builder;
pub mod filter;

pub use builder::{ConferenceQuery, FilterValue};
pub use filter::{FieldType, Filter, QueryField, QueryOperator};
