//! Minting error types.

use rc_ledger::domain::error::LedgerError;
use shared_crypto::CryptoError;
use thiserror::Error;

pub type MintResult<T> = Result<T, MintError>;

#[derive(Debug, Error)]
pub enum MintError {
    #[error("solve cancelled before a solution was found")]
    Cancelled,

    #[error("ledger rejected the minted block: {0}")]
    Ledger(#[from] LedgerError),

    #[error("crypto failure during minting: {0}")]
    Crypto(#[from] CryptoError),
}
