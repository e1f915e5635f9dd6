//! Error types for cryptographic operations.

use thiserror::Error;

/// Errors produced by hashing, key handling and signature verification.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Public key bytes do not decode to a valid Ed25519 point.
    #[error("Invalid public key")]
    InvalidPublicKey,

    /// Signature bytes have the wrong length or encoding.
    #[error("Invalid signature encoding")]
    InvalidSignature,

    /// A hex field failed to decode.
    #[error("Invalid hex encoding: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    /// Canonical serialization for digesting failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
