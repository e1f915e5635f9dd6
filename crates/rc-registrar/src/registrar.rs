//! Registration and attendance transaction construction.

use std::sync::Arc;

use rand::RngCore;
use rc_ledger::Ledger;
use shared_crypto::{random_id, Ed25519KeyPair};
use shared_types::{
    AttendanceCertificate, AttendancePayload, RegistrationPayload, Transaction, TransactionData,
    TransactionKind,
};
use tracing::info;

use crate::error::{RegistrarError, RegistrarResult};
use crate::wallet::SecretStore;

fn generate_secret() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Builds and submits student transactions against one ledger.
pub struct Registrar {
    ledger: Arc<Ledger>,
    wallet: Arc<dyn SecretStore>,
}

impl Registrar {
    pub fn new(ledger: Arc<Ledger>, wallet: Arc<dyn SecretStore>) -> Self {
        Self { ledger, wallet }
    }

    /// Register a student: derive a keypair from a fresh secret, submit a
    /// `student-registration` transaction carrying the public key, and keep
    /// the secret in the wallet for later attendance signing.
    ///
    /// The secret is stored only after the ledger admits the transaction.
    pub fn register(&self, student_id: &str) -> RegistrarResult<Transaction> {
        let secret = generate_secret();
        let keys = Ed25519KeyPair::from_secret(&secret);

        let tx = Transaction {
            id: random_id(),
            kind: TransactionKind::StudentRegistration,
            data: TransactionData::Registration(RegistrationPayload {
                student_id: student_id.to_owned(),
                public_key: keys.public_key_hex(),
            }),
            hash: None,
            signature: None,
        };

        let stored = self.ledger.add_transaction(tx, true)?;
        self.wallet.put(student_id, secret);
        info!("[rc-registrar] registered student {student_id}");
        Ok(stored)
    }

    /// Record attendance: sign the certificate over
    /// `{student_id, event_id, timestamp}` with the student's stored key and
    /// submit the `attendance` transaction.
    pub fn record_attendance(
        &self,
        student_id: &str,
        event_id: &str,
        timestamp: u64,
    ) -> RegistrarResult<Transaction> {
        let secret = self
            .wallet
            .get(student_id)
            .ok_or_else(|| RegistrarError::UnknownStudent {
                student_id: student_id.to_owned(),
            })?;
        let keys = Ed25519KeyPair::from_secret(&secret);

        let digest = AttendanceCertificate {
            student_id,
            event_id,
            timestamp,
        }
        .digest();

        let tx = Transaction {
            id: random_id(),
            kind: TransactionKind::Attendance,
            data: TransactionData::Attendance(AttendancePayload {
                student_id: student_id.to_owned(),
                event_id: event_id.to_owned(),
                timestamp,
                signature: keys.sign_hex(digest.as_bytes()),
                public_key: keys.public_key_hex(),
            }),
            hash: None,
            signature: None,
        };

        let stored = self.ledger.add_transaction(tx, true)?;
        info!("[rc-registrar] attendance recorded for {student_id} at {event_id}");
        Ok(stored)
    }
}
