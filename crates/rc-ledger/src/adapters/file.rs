//! JSON-file store.
//!
//! Persists each collection as a whole JSON document (`blocks.json`,
//! `transactions.json`) and rewrites it on every save. Writes go through a
//! temp file, fsync and rename so a crash mid-write cannot corrupt the
//! previous copy.

use crate::domain::error::StoreError;
use crate::ports::LedgerStore;
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared_types::{Block, Transaction};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

const BLOCKS_FILE: &str = "blocks.json";
const TRANSACTIONS_FILE: &str = "transactions.json";

/// File-backed ledger store rooted at a data directory.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (creating if needed) a store at `dir`.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        info!("[rc-ledger] file store at {}", dir.display());
        Ok(Self { dir })
    }

    fn load_collection<T: DeserializeOwned>(&self, file: &str) -> Result<Vec<T>, StoreError> {
        let path = self.dir.join(file);
        match fs::read(&path) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn save_collection<T: Serialize>(&self, file: &str, items: &[T]) -> Result<(), StoreError> {
        let path = self.dir.join(file);
        let bytes = serde_json::to_vec_pretty(items)?;

        // Write atomically via temp file.
        let temp_path = path.with_extension("tmp");
        let mut temp = fs::File::create(&temp_path)?;
        temp.write_all(&bytes)?;
        temp.sync_all()?;
        fs::rename(&temp_path, &path)?;

        Ok(())
    }
}

impl LedgerStore for FileStore {
    fn load_blocks(&self) -> Result<Vec<Block>, StoreError> {
        self.load_collection(BLOCKS_FILE)
    }

    fn save_blocks(&self, blocks: &[Block]) -> Result<(), StoreError> {
        self.save_collection(BLOCKS_FILE, blocks)
    }

    fn load_transactions(&self) -> Result<Vec<Transaction>, StoreError> {
        self.load_collection(TRANSACTIONS_FILE)
    }

    fn save_transactions(&self, transactions: &[Transaction]) -> Result<(), StoreError> {
        self.save_collection(TRANSACTIONS_FILE, transactions)
    }
}
