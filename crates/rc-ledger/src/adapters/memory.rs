//! In-memory store for tests and ephemeral ledgers.

use crate::domain::error::StoreError;
use crate::ports::LedgerStore;
use parking_lot::Mutex;
use shared_types::{Block, Transaction};

/// Volatile store; contents are lost on drop.
#[derive(Default)]
pub struct InMemoryStore {
    blocks: Mutex<Vec<Block>>,
    transactions: Mutex<Vec<Transaction>>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl LedgerStore for InMemoryStore {
    fn load_blocks(&self) -> Result<Vec<Block>, StoreError> {
        Ok(self.blocks.lock().clone())
    }

    fn save_blocks(&self, blocks: &[Block]) -> Result<(), StoreError> {
        *self.blocks.lock() = blocks.to_vec();
        Ok(())
    }

    fn load_transactions(&self) -> Result<Vec<Transaction>, StoreError> {
        Ok(self.transactions.lock().clone())
    }

    fn save_transactions(&self, transactions: &[Transaction]) -> Result<(), StoreError> {
        *self.transactions.lock() = transactions.to_vec();
        Ok(())
    }
}
