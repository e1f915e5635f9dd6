//! Student-facing flows over the ledger.
//!
//! The [`Registrar`] constructs and submits the two application transaction
//! kinds: `student-registration` (a fresh keypair derived from a stored
//! secret) and `attendance` (an Ed25519 signature over the certificate
//! digest). Neither kind carries spendable value, so admission is structural
//! only; signature verification happens at minting time.
//!
//! [`reports`] projects attendance records back out of the chain and pool.

pub mod error;
pub mod registrar;
pub mod reports;
pub mod wallet;

pub use error::{RegistrarError, RegistrarResult};
pub use registrar::Registrar;
pub use reports::{query_attendance, query_event_attendance, AttendanceRecord};
pub use wallet::{InMemoryWallet, SecretStore};
