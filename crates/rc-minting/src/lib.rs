//! Block production for the attendance ledger.
//!
//! The [`AttendanceMinter`] drives the collect -> solve -> commit flow: it
//! pulls pending attendance transactions from the ledger, verifies each
//! certificate signature, assembles a candidate block with a reward
//! transaction, hands it to a [`BlockSolver`] and commits the solved block
//! back through the ledger. Solving is CPU-bound and cancellable; it never
//! runs under the ledger's lock.

pub mod adapters;
pub mod error;
pub mod ports;
pub mod service;

pub use adapters::PowSolver;
pub use error::{MintError, MintResult};
pub use ports::{BlockSolver, CancelToken};
pub use service::AttendanceMinter;
