//! # Core Ledger Entities
//!
//! Defines the entities shared by every Rollcall subsystem.
//!
//! ## Clusters
//!
//! - **Chain**: `Block`, genesis construction, proof-of-work measurement
//! - **Transactions**: `Transaction`, `TransactionKind`, per-kind payloads
//! - **Derived views**: `UnspentOutput`
//!
//! The wire format is JSON and stays field-for-field compatible with the
//! persisted collections (`blocks.json`, `transactions.json`).

#![warn(clippy::all)]

pub mod entities;

pub use entities::{
    Address, AttendanceCertificate, AttendancePayload, Block, BlockHash, RegistrationPayload,
    Transaction, TransactionData, TransactionKind, TxInput, TxOutput, UnspentOutput,
};
