//! Profile operations

use crate::errors::Result;
use crate::model::{CallerIdentity, Profile, ProfileForm};
use crate::store::Datastore;

/// Load the caller's saved profile, or build the default one if they have
/// never saved a profile. The default is not persisted; it only becomes
/// durable when some operation saves it.
pub fn load_or_default_profile(store: &Datastore, caller: &CallerIdentity) -> Profile {
    store
        .get_profile(&caller.user_id)
        .unwrap_or_else(|| Profile::default_for(caller.user_id.clone(), &caller.email))
}

/// Create or update the caller's profile from a partial form.
///
/// On first save, absent fields get defaults derived from the caller's
/// identity. On later saves, only the fields present in the form are
/// written. The load-modify-save runs inside the caller's group transaction
/// so two concurrent saves cannot interleave.
///
/// # Errors
///
/// Returns [`crate::errors::ApiError::DatastoreContention`] when the commit
/// loses a race for the caller's group.
pub fn save_profile(
    store: &Datastore,
    caller: &CallerIdentity,
    form: &ProfileForm,
) -> Result<Profile> {
    let commit = store.run_in_transaction(&[caller.user_id.clone()], |txn| {
        let mut profile = txn
            .get_profile(&caller.user_id)
            .unwrap_or_else(|| Profile::default_for(caller.user_id.clone(), &caller.email));
        profile.apply_update(form);
        txn.put_profile(profile.clone())?;
        Ok(profile)
    })?;
    Ok(commit.value)
}
