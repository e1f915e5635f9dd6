//! Outbound port: the durable store contract.

use crate::domain::error::StoreError;
use shared_types::{Block, Transaction};

/// Durable storage for the two ledger collections.
///
/// Collections are loaded in full at startup and rewritten in full after
/// each committed mutation. The ledger always writes the durable copy before
/// committing the in-memory mutation, so a failing store leaves both sides
/// on the previous state.
pub trait LedgerStore: Send + Sync {
    /// Load the committed chain (empty when bootstrapping a new ledger).
    fn load_blocks(&self) -> Result<Vec<Block>, StoreError>;

    /// Persist the committed chain.
    fn save_blocks(&self, blocks: &[Block]) -> Result<(), StoreError>;

    /// Load the pending transaction pool.
    fn load_transactions(&self) -> Result<Vec<Transaction>, StoreError>;

    /// Persist the pending transaction pool.
    fn save_transactions(&self, transactions: &[Transaction]) -> Result<(), StoreError>;
}
