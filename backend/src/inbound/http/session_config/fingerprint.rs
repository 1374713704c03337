//! Short, loggable identifier for the session cookie key.
//!
//! Two deployments sharing a fingerprint accept each other's cookies. The
//! value is derived from the signing half of the key only, so logging it
//! reveals nothing that helps forge a session.

use std::fmt;

use actix_web::cookie::Key;
use sha2::{Digest, Sha256};

/// Digest bytes kept before hex encoding.
const KEPT_DIGEST_BYTES: usize = 8;

/// Truncated SHA-256 digest of a session key's signing material.
///
/// # Examples
///
/// ```rust
/// use actix_web::cookie::Key;
/// use daybook::inbound::http::session_config::fingerprint::KeyFingerprint;
///
/// let fingerprint = KeyFingerprint::of(&Key::generate());
/// assert_eq!(fingerprint.as_str().len(), 16);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyFingerprint(String);

impl KeyFingerprint {
    /// Fingerprint `key`.
    #[must_use]
    pub fn of(key: &Key) -> Self {
        let digest = Sha256::digest(key.signing());
        let kept = digest.get(..KEPT_DIGEST_BYTES).unwrap_or(digest.as_slice());
        Self(hex::encode(kept))
    }

    /// Lowercase hex form.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for KeyFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
