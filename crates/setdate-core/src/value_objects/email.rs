//! Email normalisation and organiser identity derivation
//!
//! Organiser records are keyed by a salted SHA-256 hash of the normalised
//! email rather than the raw address, so the same mailbox always maps to
//! the same document key regardless of casing or surrounding whitespace.

use sha2::{Digest, Sha256};

/// Normalise an email address for use as an identity key.
///
/// Trims surrounding whitespace and lowercases; no structural validation
/// happens here (that belongs to the request DTOs).
pub fn normalise_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Derive the stable organiser identity key from an email address.
///
/// The salt keeps raw addresses out of primary keys; changing it would
/// orphan every existing organiser record, so it must stay constant per
/// deployment.
pub fn organiser_id_from_email(salt: &str, email: &str) -> String {
    let normalised = normalise_email(email);
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(normalised.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        use std::fmt::Write;
        let _ = write!(out, "{byte:02x}");
    }
    out
}
