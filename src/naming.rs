//! Artifact naming.
//!
//! Artifact names are a pure function of the configured pattern, the chunk's
//! logical name, and a short digest of the final merged text. Re-running
//! aggregation on unchanged content yields an unchanged name, so downstream
//! caches bust exactly when content changes.
//!
//! The digest is a keyed SHA-256 (HMAC) of the content against itself as
//! key, truncated to 8 hex characters. It is computed over the merged text
//! as it exists after import injection and before URL rewriting.

use hmac::{Hmac, Mac};
use sha2::Sha256;

/// Compute the 8-character hex content digest for an artifact.
#[must_use]
pub fn content_hash(content: &str) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(content.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(content.as_bytes());
    let digest = mac.finalize().into_bytes();

    let mut hex = String::with_capacity(8);
    for byte in digest.iter().take(4) {
        use std::fmt::Write as _;
        let _ = write!(hex, "{byte:02x}");
    }
    hex
}

/// Substitute `[name]` and `[hash]` (first occurrence each) in a naming
/// pattern.
#[must_use]
pub fn substitute_pattern(pattern: &str, name: &str, hash: &str) -> String {
    pattern
        .replacen("[name]", name, 1)
        .replacen("[hash]", hash, 1)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
