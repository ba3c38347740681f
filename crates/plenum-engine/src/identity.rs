//! Caller identity resolution
//!
//! The platform hands the engine a raw authenticated user: an email that is
//! always present and a stable id that sometimes is not. Operations key
//! everything off the stable id, so when the provider supplies none the
//! engine consults the account table and mints one on first contact. The
//! email-to-id mapping never changes after that, so the same email always
//! resolves to the same ownership group.

use plenum_core::errors::{ApiError, Result};
use plenum_core::model::{CallerIdentity, UserAccount};
use plenum_core::store::Datastore;
use plenum_core_types::UserId;
use uuid::Uuid;

/// Authenticated user as the platform presents it
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    /// Login email; always present for an authenticated user
    pub email: String,
    /// Stable id from the identity provider, when it supplies one
    pub user_id: Option<String>,
}

impl AuthUser {
    /// An authenticated user whose provider supplied no stable id
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            user_id: None,
        }
    }

    /// An authenticated user with a provider-supplied stable id
    pub fn with_id(email: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            user_id: Some(user_id.into()),
        }
    }
}

/// Resolve the caller to a stable identity.
///
/// A provider-supplied id passes through untouched. Without one, the account
/// table supplies the id minted for this email, creating it on first
/// contact.
///
/// # Errors
///
/// Returns [`ApiError::Unauthorized`] when there is no authenticated user.
pub fn resolve_caller(store: &Datastore, auth: Option<&AuthUser>) -> Result<CallerIdentity> {
    let auth = auth.ok_or(ApiError::Unauthorized)?;
    let user_id = match &auth.user_id {
        Some(id) => UserId::new(id.clone()),
        None => {
            let account = store.get_or_insert_account(&auth.email, || {
                UserAccount::new(
                    auth.email.clone(),
                    UserId::new(Uuid::now_v7().to_string()),
                )
            });
            account.user_id
        }
    };
    Ok(CallerIdentity::new(user_id, auth.email.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_identity_is_unauthorized() {
        let store = Datastore::new();
        let err = resolve_caller(&store, None).unwrap_err();
        assert_eq!(err, ApiError::Unauthorized);
        assert!(store.all_accounts().is_empty());
    }

    #[test]
    fn test_provider_id_passes_through_without_minting() {
        let store = Datastore::new();
        let auth = AuthUser::with_id("organizer@example.com", "provider-1");

        let caller = resolve_caller(&store, Some(&auth)).unwrap();
        assert_eq!(caller.user_id.as_str(), "provider-1");
        assert_eq!(caller.email, "organizer@example.com");
        assert!(store.all_accounts().is_empty());
    }

    #[test]
    fn test_minted_id_is_stable_across_calls() {
        let store = Datastore::new();
        let auth = AuthUser::new("attendee@example.com");

        let first = resolve_caller(&store, Some(&auth)).unwrap();
        let second = resolve_caller(&store, Some(&auth)).unwrap();
        assert_eq!(first.user_id, second.user_id);
        assert_eq!(store.all_accounts().len(), 1);
    }

    #[test]
    fn test_different_emails_get_different_ids() {
        let store = Datastore::new();
        let a = resolve_caller(&store, Some(&AuthUser::new("a@example.com"))).unwrap();
        let b = resolve_caller(&store, Some(&AuthUser::new("b@example.com"))).unwrap();
        assert_ne!(a.user_id, b.user_id);
        assert_eq!(store.all_accounts().len(), 2);
    }
}
