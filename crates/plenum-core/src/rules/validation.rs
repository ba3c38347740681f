//! Form validation at the API boundary

use crate::errors::{ApiError, Result};
use crate::model::ConferenceForm;

/// Validate a conference form before any transaction work starts.
///
/// Only the name is mandatory; every other field has a defined default or
/// is allowed to be absent. Checking here lets callers fail fast before an
/// id gets allocated or a group lock taken. Entity-dependent checks (like
/// capacity against seats already allocated) can only run inside the
/// transaction and stay with [`crate::model::Conference::apply_form`].
///
/// # Errors
///
/// Returns [`ApiError::MissingConferenceName`] when the form has no name.
pub fn validate_conference_form(form: &ConferenceForm) -> Result<()> {
    if form.name.is_none() {
        return Err(ApiError::MissingConferenceName);
    }
    Ok(())
}
