//! The `Ledger` service: single-writer owner of the chain and the pool.
//!
//! All mutation entry points take the write lock for their full
//! validate-persist-commit sequence, so interleaved mutations can never
//! corrupt the linkage or double-admit an input. Read queries share the read
//! lock and always observe the most recently committed mutation.
//!
//! Durable writes happen before the in-memory commit; a store failure rolls
//! the staged mutation back and surfaces the error.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::RwLock;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use shared_types::{
    Block, BlockHash, Transaction, TransactionData, TransactionKind, UnspentOutput,
};

use crate::config::LedgerConfig;
use crate::domain::difficulty::DifficultyAdjuster;
use crate::domain::error::{LedgerError, LedgerResult};
use crate::domain::validation;
use crate::events::{LedgerEvent, LedgerEventBus};
use crate::ports::LedgerStore;

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Everything guarded by the ledger's lock.
struct LedgerState {
    blocks: Vec<Block>,
    pool: Vec<Transaction>,
    /// Secondary index: block hash -> position in `blocks`.
    block_positions: HashMap<BlockHash, usize>,
    /// Secondary index: committed transaction id -> block index.
    committed_txs: HashMap<String, u64>,
}

impl LedgerState {
    fn index_block_at(&mut self, position: usize) {
        let block = &self.blocks[position];
        self.block_positions.insert(block.hash.clone(), position);
        for tx in &block.transactions {
            self.committed_txs.insert(tx.id.clone(), block.index);
        }
    }

    fn rebuild_indexes(&mut self) {
        self.block_positions.clear();
        self.committed_txs.clear();
        for position in 0..self.blocks.len() {
            self.index_block_at(position);
        }
    }
}

/// Append-only ledger of blocks plus a pending transaction pool.
pub struct Ledger {
    state: RwLock<LedgerState>,
    store: Arc<dyn LedgerStore>,
    events: LedgerEventBus,
    adjuster: DifficultyAdjuster,
    block_reward: u64,
}

impl Ledger {
    /// Open a ledger over a durable store.
    ///
    /// Bootstraps the fixed genesis block into an empty store, then prunes
    /// the pending pool of any transaction already committed.
    pub fn open(store: Arc<dyn LedgerStore>, config: LedgerConfig) -> LedgerResult<Self> {
        let mut blocks = store.load_blocks()?;
        if blocks.is_empty() {
            info!("[rc-ledger] blockchain empty, adding genesis block");
            blocks.push(Block::genesis());
            store.save_blocks(&blocks)?;
        }

        let mut state = LedgerState {
            blocks,
            pool: Vec::new(),
            block_positions: HashMap::new(),
            committed_txs: HashMap::new(),
        };
        state.rebuild_indexes();

        let mut pool = store.load_transactions()?;
        let before = pool.len();
        pool.retain(|tx| !state.committed_txs.contains_key(&tx.id));
        if pool.len() != before {
            debug!(
                "[rc-ledger] pruned {} already-committed transactions from the pool",
                before - pool.len()
            );
            store.save_transactions(&pool)?;
        }
        state.pool = pool;

        Ok(Self {
            state: RwLock::new(state),
            store,
            events: LedgerEventBus::new(),
            adjuster: DifficultyAdjuster::new(config.difficulty),
            block_reward: config.block_reward,
        })
    }

    /// Subscribe to ledger notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<LedgerEvent> {
        self.events.subscribe()
    }

    /// The fixed per-block reward.
    pub fn block_reward(&self) -> u64 {
        self.block_reward
    }

    /// Number of committed blocks (genesis included).
    pub fn block_count(&self) -> usize {
        self.state.read().blocks.len()
    }

    /// Snapshot of the committed chain.
    pub fn all_blocks(&self) -> Vec<Block> {
        self.state.read().blocks.clone()
    }

    /// Snapshot of the pending pool.
    pub fn pending_transactions(&self) -> Vec<Transaction> {
        self.state.read().pool.clone()
    }

    /// Look up a committed block by index.
    pub fn get_block_by_index(&self, index: u64) -> Option<Block> {
        let state = self.state.read();
        state.blocks.get(index as usize).cloned()
    }

    /// Look up a committed block by hash.
    pub fn get_block_by_hash(&self, hash: &str) -> Option<Block> {
        let state = self.state.read();
        let position = *state.block_positions.get(hash)?;
        state.blocks.get(position).cloned()
    }

    /// The most recently committed block.
    pub fn last_block(&self) -> Block {
        self.state
            .read()
            .blocks
            .last()
            .cloned()
            .expect("ledger always contains the genesis block")
    }

    /// Look up a pending transaction by id.
    pub fn get_pending_transaction(&self, id: &str) -> Option<Transaction> {
        let state = self.state.read();
        state.pool.iter().find(|tx| tx.id == id).cloned()
    }

    /// Required proof-of-work target for the block at `index`.
    pub fn required_difficulty(&self, index: u64) -> u64 {
        self.adjuster
            .required_difficulty(index, &self.state.read().blocks)
    }

    /// Validate a full candidate chain without mutating anything.
    pub fn check_chain(&self, chain: &[Block]) -> LedgerResult<()> {
        validation::check_chain(chain, &self.adjuster, self.block_reward)
    }

    /// Admit a transaction to the pending pool.
    ///
    /// Dispatches by kind: registration and attendance transactions are
    /// checked structurally, value transactions go through the UTXO rules
    /// plus a guard against inputs already claimed by another pooled
    /// transaction. Re-submitting a pooled id replaces the pooled entry.
    pub fn add_transaction(&self, tx: Transaction, emit: bool) -> LedgerResult<Transaction> {
        let mut state = self.state.write();

        validation::check_transaction(&tx, &state.blocks)?;
        if tx.kind.carries_value() {
            Self::check_pool_spends(&state, &tx)?;
        }

        let mut pool = state.pool.clone();
        match pool.iter().position(|t| t.id == tx.id) {
            Some(position) => {
                debug!("[rc-ledger] updating pooled transaction: {}", tx.id);
                pool[position] = tx.clone();
            }
            None => pool.push(tx.clone()),
        }
        self.store.save_transactions(&pool)?;
        state.pool = pool;

        match (&tx.kind, &tx.data) {
            (TransactionKind::StudentRegistration, TransactionData::Registration(payload)) => {
                info!(
                    "[rc-ledger] student registration added: {}",
                    payload.student_id
                );
                if emit {
                    self.events.publish(LedgerEvent::StudentRegistered(tx.clone()));
                }
            }
            (TransactionKind::Attendance, TransactionData::Attendance(payload)) => {
                info!(
                    "[rc-ledger] attendance recorded: {} at {}",
                    payload.student_id, payload.event_id
                );
                if emit {
                    self.events
                        .publish(LedgerEvent::AttendanceRecorded(tx.clone()));
                }
            }
            _ => {
                info!("[rc-ledger] transaction added: {}", tx.id);
                if emit {
                    self.events.publish(LedgerEvent::TransactionAdded(tx.clone()));
                }
            }
        }

        Ok(tx)
    }

    /// Validate and append a block to the chain.
    ///
    /// On success the block's difficulty is stamped, a missing timestamp is
    /// filled with the current time, the pool is pruned of transactions the
    /// block committed, and `blockAdded` is emitted.
    pub fn add_block(&self, block: Block, emit: bool) -> LedgerResult<Block> {
        let mut state = self.state.write();
        let committed = self.commit_block(&mut state, block)?;
        if emit {
            self.events.publish(LedgerEvent::BlockAdded(committed.clone()));
        }
        Ok(committed)
    }

    /// Fork choice: accept a strictly longer, fully valid candidate chain.
    ///
    /// The candidate is validated end to end first; then the local suffix
    /// past the divergence point is replaced, each new block re-validated
    /// individually on its way in. Emits one aggregate `blockchainReplaced`
    /// with the appended blocks. Any failure restores the previous state.
    pub fn replace_chain(&self, candidate: Vec<Block>) -> LedgerResult<Vec<Block>> {
        let mut state = self.state.write();

        if candidate.len() <= state.blocks.len() {
            return Err(LedgerError::ChainTooShort {
                candidate: candidate.len(),
                current: state.blocks.len(),
            });
        }

        validation::check_chain(&candidate, &self.adjuster, self.block_reward)?;
        info!("[rc-ledger] received blockchain is valid, replacing local suffix");

        // First position where the candidate disagrees with the local chain.
        let divergence = state
            .blocks
            .iter()
            .zip(candidate.iter())
            .position(|(ours, theirs)| ours.hash != theirs.hash)
            .unwrap_or(state.blocks.len());

        let snapshot_blocks = state.blocks.clone();
        let snapshot_pool = state.pool.clone();

        state.blocks.truncate(divergence);
        state.rebuild_indexes();

        let mut appended = Vec::with_capacity(candidate.len() - divergence);
        for block in candidate.into_iter().skip(divergence) {
            match self.commit_block(&mut state, block) {
                Ok(committed) => appended.push(committed),
                Err(e) => {
                    warn!("[rc-ledger] chain replacement failed, restoring previous state: {e}");
                    state.blocks = snapshot_blocks;
                    state.pool = snapshot_pool;
                    state.rebuild_indexes();
                    // Memory is the source of truth here; a store that also
                    // fails the restore write reconciles on the next save.
                    if let Err(restore) = self.store.save_blocks(&state.blocks) {
                        warn!("[rc-ledger] failed to persist restored chain: {restore}");
                    }
                    if let Err(restore) = self.store.save_transactions(&state.pool) {
                        warn!("[rc-ledger] failed to persist restored pool: {restore}");
                    }
                    return Err(e);
                }
            }
        }

        self.events
            .publish(LedgerEvent::ChainReplaced(appended.clone()));
        Ok(appended)
    }

    /// Live UTXO view: outputs with no matching input across committed
    /// blocks and the pending pool, optionally restricted to one address.
    ///
    /// Recomputed on demand; pending transactions count so a transaction
    /// chain can spend pool outputs.
    pub fn unspent_outputs_for_address(&self, address: Option<&str>) -> Vec<UnspentOutput> {
        let state = self.state.read();

        let mut outputs = Vec::new();
        let mut inputs = Vec::new();
        for block in &state.blocks {
            for tx in &block.transactions {
                Self::collect_value_flows(tx, address, &mut outputs, &mut inputs);
            }
        }
        for tx in &state.pool {
            Self::collect_value_flows(tx, address, &mut outputs, &mut inputs);
        }

        outputs.retain(|out| {
            !inputs
                .iter()
                .any(|(tx_id, index)| *tx_id == out.transaction && *index == out.index)
        });
        outputs
    }

    /// Empty the pending pool. Administrative/test operation.
    pub fn clear_transactions(&self) -> LedgerResult<()> {
        let mut state = self.state.write();
        info!("[rc-ledger] clearing all pending transactions");
        self.store.save_transactions(&[])?;
        state.pool.clear();
        Ok(())
    }

    /// Validate, stamp and append one block while holding the write lock.
    fn commit_block(&self, state: &mut LedgerState, block: Block) -> LedgerResult<Block> {
        let previous = state
            .blocks
            .last()
            .cloned()
            .expect("ledger always contains the genesis block");

        let required = self.adjuster.required_difficulty(block.index, &state.blocks);
        validation::check_block(&block, &previous, &state.blocks, required, self.block_reward)?;

        let mut block = block;
        block.difficulty = Some(required);
        if block.timestamp == 0 {
            block.timestamp = unix_now();
        }

        state.blocks.push(block);
        if let Err(e) = self.store.save_blocks(&state.blocks) {
            state.blocks.pop();
            return Err(e.into());
        }
        let position = state.blocks.len() - 1;
        state.index_block_at(position);
        let block = state.blocks[position].clone();

        // Drop pooled transactions the block just committed.
        let remaining: Vec<Transaction> = state
            .pool
            .iter()
            .filter(|tx| !block.transactions.iter().any(|committed| committed.id == tx.id))
            .cloned()
            .collect();
        if remaining.len() != state.pool.len() {
            match self.store.save_transactions(&remaining) {
                Ok(()) => state.pool = remaining,
                // The block is committed consistently on both sides; the
                // pool stays on its previous (also consistent) state.
                Err(e) => warn!("[rc-ledger] failed to persist pruned pool: {e}"),
            }
        }

        info!(
            "[rc-ledger] block added: {} (index {}, difficulty {})",
            block.hash, block.index, required
        );
        Ok(block)
    }

    /// Reject a value transaction whose inputs are already claimed by a
    /// different pooled transaction.
    fn check_pool_spends(state: &LedgerState, tx: &Transaction) -> LedgerResult<()> {
        let Some(inputs) = tx.data.inputs() else {
            return Ok(());
        };

        let mut keys = Vec::new();
        for input in inputs {
            let claimed = state.pool.iter().filter(|pooled| pooled.id != tx.id).any(|pooled| {
                pooled.data.inputs().is_some_and(|ins| {
                    ins.iter()
                        .any(|i| i.transaction == input.transaction && i.index == input.index)
                })
            });
            if claimed {
                keys.push(format!("{}|{}", input.transaction, input.index));
            }
        }

        if keys.is_empty() {
            Ok(())
        } else {
            Err(LedgerError::DoubleSpend { keys })
        }
    }

    fn collect_value_flows(
        tx: &Transaction,
        address: Option<&str>,
        outputs: &mut Vec<UnspentOutput>,
        inputs: &mut Vec<(String, u64)>,
    ) {
        if let Some(outs) = tx.data.outputs() {
            for (index, out) in outs.iter().enumerate() {
                if address.is_none_or(|a| a == out.address) {
                    outputs.push(UnspentOutput {
                        transaction: tx.id.clone(),
                        index: index as u64,
                        amount: out.amount,
                        address: out.address.clone(),
                    });
                }
            }
        }
        if let Some(ins) = tx.data.inputs() {
            for input in ins {
                if address.is_none_or(|a| a == input.address) {
                    inputs.push((input.transaction.clone(), input.index));
                }
            }
        }
    }
}
