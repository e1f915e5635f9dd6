//! # rc-ledger
//!
//! Ledger engine for Rollcall Chain.
//!
//! ## Architecture
//!
//! The ledger owns two collections — the committed chain and the pending
//! transaction pool — and every mutation entry point
//! (`add_block`, `add_transaction`, `replace_chain`, `clear_transactions`)
//! runs its full rule set before anything is committed. A failed operation
//! leaves both in-memory and durable state untouched.
//!
//! ```text
//! Registrar ──add_transaction──→ [pool] ──mint──→ candidate block
//!                                                       │
//!                                              solve (rc-minting)
//!                                                       │
//!                              add_block ←──────────────┘
//!                                  │
//!               check_block → stamp difficulty → append → prune pool
//!                                  │
//!                            [event bus] → BlockAdded
//! ```
//!
//! ## Layers
//!
//! - `domain` — pure validation rules and difficulty retargeting
//! - `ports` — the durable store contract
//! - `adapters` — in-memory and JSON-file store implementations
//! - `events` — fire-and-forget ledger notifications
//! - `service` — the `Ledger` itself, a single-writer mutation boundary

#![warn(clippy::all)]

pub mod adapters;
pub mod config;
pub mod domain;
pub mod events;
pub mod ports;
pub mod service;

pub use config::LedgerConfig;
pub use domain::difficulty::{DifficultyAdjuster, DifficultyConfig};
pub use domain::error::{LedgerError, LedgerResult, StoreError};
pub use events::{LedgerEvent, LedgerEventBus};
pub use ports::LedgerStore;
pub use service::Ledger;
