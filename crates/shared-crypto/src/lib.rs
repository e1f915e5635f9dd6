//! # Shared Crypto - Cryptographic Primitives
//!
//! Fixed crypto contracts used across the Rollcall workspace.
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `hashing` | SHA-256 over canonical JSON | Block/transaction digests |
//! | `signatures` | Ed25519, seed derived from a secret | Attendance certificates |
//!
//! All digests and signatures cross the wire as lowercase hex strings so the
//! persisted JSON stays field-for-field readable.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod errors;
pub mod hashing;
pub mod signatures;

// Re-exports
pub use errors::CryptoError;
pub use hashing::{hash_value, random_id, sha256_hex};
pub use signatures::{verify_signature, Ed25519KeyPair};
