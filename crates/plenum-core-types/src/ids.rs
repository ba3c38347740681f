//! Identifiers for profiles and conferences.
//!
//! A profile is keyed directly by the user id handed out by the identity
//! layer. A conference is keyed by the pair of its organizer's user id and a
//! numeric id allocated under that organizer, which makes the organizer's
//! ownership group explicit in the key itself. External surfaces never see
//! the pair directly; they see the websafe form produced by
//! [`ConferenceKey::websafe`].

use serde::{Deserialize, Serialize};

/// Identifies a registered user. Doubles as the name of that user's
/// ownership group: every conference the user organizes lives under it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for UserId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Numeric conference identifier, unique within one organizer's ownership
/// group. Allocated by the datastore before the creating transaction runs,
/// so a retried create reuses the same id instead of minting a duplicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ConferenceId(i64);

impl ConferenceId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for ConferenceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fully-qualified conference key: the organizer's user id plus the numeric
/// id allocated under that organizer.
///
/// Serializes as its websafe string form, so keys embedded in JSON or YAML
/// look exactly like the keys clients pass on the wire.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ConferenceKey {
    owner: UserId,
    id: ConferenceId,
}

impl ConferenceKey {
    pub fn new(owner: UserId, id: ConferenceId) -> Self {
        Self { owner, id }
    }

    /// The organizer whose ownership group this conference lives in.
    pub fn owner(&self) -> &UserId {
        &self.owner
    }

    pub fn id(&self) -> ConferenceId {
        self.id
    }

    /// Encode the key in its websafe form: URL-safe base64 (no padding) of
    /// `"{owner}/{id}"`. The result is safe to put in URLs and filenames.
    pub fn websafe(&self) -> String {
        let raw = format!("{}/{}", self.owner.as_str(), self.id.value());
        base64::Engine::encode(
            &base64::engine::general_purpose::URL_SAFE_NO_PAD,
            raw.as_bytes(),
        )
    }

    /// Decode a websafe key produced by [`ConferenceKey::websafe`].
    ///
    /// # Errors
    ///
    /// Returns [`ParseKeyError`] if the input is not valid base64, does not
    /// decode to UTF-8, or does not contain an owner and a numeric id.
    pub fn from_websafe(input: &str) -> Result<Self, ParseKeyError> {
        let bytes =
            base64::Engine::decode(&base64::engine::general_purpose::URL_SAFE_NO_PAD, input)
                .map_err(|_| ParseKeyError::new(input))?;
        let raw = String::from_utf8(bytes).map_err(|_| ParseKeyError::new(input))?;
        let (owner, id) = raw.rsplit_once('/').ok_or_else(|| ParseKeyError::new(input))?;
        if owner.is_empty() {
            return Err(ParseKeyError::new(input));
        }
        let id: i64 = id.parse().map_err(|_| ParseKeyError::new(input))?;
        Ok(Self::new(UserId::new(owner), ConferenceId::new(id)))
    }
}

impl std::fmt::Display for ConferenceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.websafe())
    }
}

impl std::str::FromStr for ConferenceKey {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_websafe(s)
    }
}

impl TryFrom<String> for ConferenceKey {
    type Error = ParseKeyError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_websafe(&s)
    }
}

impl From<ConferenceKey> for String {
    fn from(key: ConferenceKey) -> Self {
        key.websafe()
    }
}

/// Error returned when a websafe key cannot be decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseKeyError {
    input: String,
}

impl ParseKeyError {
    fn new(input: &str) -> Self {
        Self {
            input: input.to_string(),
        }
    }

    /// The string that failed to decode.
    pub fn input(&self) -> &str {
        &self.input
    }
}

impl std::fmt::Display for ParseKeyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid conference key: {}", self.input)
    }
}

impl std::error::Error for ParseKeyError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn websafe_roundtrip_preserves_owner_and_id() {
        let key = ConferenceKey::new(UserId::new("user-123"), ConferenceId::new(42));
        let encoded = key.websafe();
        let decoded = ConferenceKey::from_websafe(&encoded).unwrap();
        assert_eq!(decoded, key);
        assert_eq!(decoded.owner().as_str(), "user-123");
        assert_eq!(decoded.id().value(), 42);
    }

    #[test]
    fn websafe_form_has_no_padding_or_url_unsafe_chars() {
        let key = ConferenceKey::new(UserId::new("someone@example.com"), ConferenceId::new(7));
        let encoded = key.websafe();
        assert!(!encoded.contains('='));
        assert!(!encoded.contains('+'));
        assert!(!encoded.contains('/'));
    }

    #[test]
    fn from_websafe_rejects_garbage() {
        assert!(ConferenceKey::from_websafe("not base64!!!").is_err());
    }

    #[test]
    fn from_websafe_rejects_missing_id() {
        let encoded = base64::Engine::encode(
            &base64::engine::general_purpose::URL_SAFE_NO_PAD,
            b"just-an-owner",
        );
        assert!(ConferenceKey::from_websafe(&encoded).is_err());
    }

    #[test]
    fn from_websafe_rejects_non_numeric_id() {
        let encoded = base64::Engine::encode(
            &base64::engine::general_purpose::URL_SAFE_NO_PAD,
            b"owner/abc",
        );
        assert!(ConferenceKey::from_websafe(&encoded).is_err());
    }

    #[test]
    fn owner_containing_slash_still_roundtrips() {
        let key = ConferenceKey::new(UserId::new("tenant/user"), ConferenceId::new(9));
        let decoded = ConferenceKey::from_websafe(&key.websafe()).unwrap();
        assert_eq!(decoded.owner().as_str(), "tenant/user");
        assert_eq!(decoded.id().value(), 9);
    }

    #[test]
    fn serde_uses_websafe_string_form() {
        let key = ConferenceKey::new(UserId::new("u1"), ConferenceId::new(3));
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, format!("\"{}\"", key.websafe()));
        let back: ConferenceKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }
}
