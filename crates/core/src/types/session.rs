//! Anonymous session identifier.
//!
//! A session identifier scopes cart rows and customization requests to one
//! client without requiring an account. It is generated once, persisted by the
//! caller, and never changes afterwards.

use core::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

const SUFFIX_LEN: usize = 9;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// An opaque, client-persisted session identifier.
///
/// Generated identifiers have the form `session_<unix millis>_<9 base-36 chars>`.
/// The random suffix keeps concurrent clients from colliding; it is not a
/// security token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Wrap an existing identifier (e.g. one read back from storage).
    ///
    /// Returns `None` for an empty or whitespace-only string, which storage
    /// treats the same as a missing entry.
    #[must_use]
    pub fn from_stored(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            None
        } else {
            Some(Self(value))
        }
    }

    /// Generate a new identifier from a millisecond timestamp and an RNG.
    #[must_use]
    pub fn generate_at<R: Rng + ?Sized>(timestamp_millis: i64, rng: &mut R) -> Self {
        let suffix: String = (0..SUFFIX_LEN)
            .map(|_| {
                let idx = rng.random_range(0..BASE36.len());
                char::from(BASE36.get(idx).copied().unwrap_or(b'0'))
            })
            .collect();
        Self(format!("session_{timestamp_millis}_{suffix}"))
    }

    /// Generate a new identifier for the current instant.
    #[must_use]
    pub fn generate() -> Self {
        Self::generate_at(chrono::Utc::now().timestamp_millis(), &mut rand::rng())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the identifier and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SessionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn test_generate_format() {
        let mut rng = StdRng::seed_from_u64(7);
        let id = SessionId::generate_at(1_718_000_000_123, &mut rng);
        let rest = id.as_str().strip_prefix("session_1718000000123_");
        assert!(rest.is_some());
        let suffix = rest.unwrap_or_default();
        assert_eq!(suffix.len(), 9);
        assert!(suffix.bytes().all(|b| BASE36.contains(&b)));
    }

    #[test]
    fn test_generate_is_random() {
        assert_ne!(SessionId::generate(), SessionId::generate());
    }

    #[test]
    fn test_from_stored_rejects_blank() {
        assert!(SessionId::from_stored("").is_none());
        assert!(SessionId::from_stored("   ").is_none());
        assert_eq!(
            SessionId::from_stored("session_1_abc").map(SessionId::into_inner),
            Some("session_1_abc".to_string())
        );
    }
}
