//! # SHA-256 Hashing
//!
//! Deterministic digests over canonical JSON serializations.
//!
//! Every digest in the ledger (block hashes, transaction hashes, attendance
//! certificate hashes) is the SHA-256 of a canonical byte string, encoded as
//! lowercase hex.

use crate::CryptoError;
use serde::Serialize;
use sha2::{Digest, Sha256};

/// SHA-256 digest of raw bytes, hex-encoded.
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// SHA-256 digest of a value's canonical JSON serialization, hex-encoded.
///
/// Field order follows the struct declaration, so the digest is stable for a
/// given type.
pub fn hash_value<T: Serialize>(value: &T) -> Result<String, CryptoError> {
    let bytes = serde_json::to_vec(value)?;
    Ok(sha256_hex(&bytes))
}

/// Random 256-bit identifier, hex-encoded without hyphens.
///
/// Used for transaction ids and wallet secrets.
pub fn random_id() -> String {
    let a = uuid::Uuid::new_v4();
    let b = uuid::Uuid::new_v4();
    format!("{}{}", a.simple(), b.simple())
}
