//! Registrar error types.

use rc_ledger::LedgerError;
use shared_crypto::CryptoError;
use thiserror::Error;

pub type RegistrarResult<T> = Result<T, RegistrarError>;

#[derive(Debug, Error)]
pub enum RegistrarError {
    #[error("no secret stored for student: {student_id}")]
    UnknownStudent { student_id: String },

    #[error("ledger rejected the transaction: {0}")]
    Ledger(#[from] LedgerError),

    #[error("crypto failure: {0}")]
    Crypto(#[from] CryptoError),
}
