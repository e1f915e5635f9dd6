//! # Ed25519 Signatures
//!
//! Deterministic key derivation and certificate signing.
//!
//! Key material is derived from an opaque secret string: the Ed25519 seed is
//! the SHA-256 of the secret, so the same secret always yields the same
//! keypair. Public keys and signatures travel as hex strings.

use crate::{sha256_hex, CryptoError};
use ed25519_dalek::{Signer, SigningKey, Verifier, VerifyingKey};

/// Ed25519 keypair derived from a secret string.
pub struct Ed25519KeyPair {
    signing_key: SigningKey,
}

impl Ed25519KeyPair {
    /// Derive a keypair from a secret. Deterministic: the seed is
    /// SHA-256(secret).
    pub fn from_secret(secret: &str) -> Self {
        let digest = sha256_hex(secret.as_bytes());
        let mut seed = [0u8; 32];
        // The digest is always 64 hex chars, decoding cannot fail.
        hex::decode_to_slice(&digest, &mut seed).expect("sha256 digest is 32 bytes");
        let signing_key = SigningKey::from_bytes(&seed);
        Self { signing_key }
    }

    /// Hex-encoded public key (32 bytes).
    pub fn public_key_hex(&self) -> String {
        hex::encode(self.signing_key.verifying_key().to_bytes())
    }

    /// Sign a message, returning the signature hex-encoded (64 bytes).
    ///
    /// Ed25519 nonces are deterministic, so signing needs no RNG.
    pub fn sign_hex(&self, message: &[u8]) -> String {
        let signature = self.signing_key.sign(message);
        hex::encode(signature.to_bytes())
    }
}

/// Verify a hex signature over a message against a hex public key.
///
/// Returns `Ok(false)` when the signature does not match; `Err` only when the
/// key or signature fail to decode at all.
pub fn verify_signature(
    public_key_hex: &str,
    signature_hex: &str,
    message: &[u8],
) -> Result<bool, CryptoError> {
    let key_bytes: [u8; 32] = hex::decode(public_key_hex)?
        .try_into()
        .map_err(|_| CryptoError::InvalidPublicKey)?;
    let verifying_key =
        VerifyingKey::from_bytes(&key_bytes).map_err(|_| CryptoError::InvalidPublicKey)?;

    let sig_bytes: [u8; 64] = hex::decode(signature_hex)?
        .try_into()
        .map_err(|_| CryptoError::InvalidSignature)?;
    let signature = ed25519_dalek::Signature::from_bytes(&sig_bytes);

    Ok(verifying_key.verify(message, &signature).is_ok())
}
