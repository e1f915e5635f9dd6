//! The attendance minting flow: collect, solve, commit.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use rc_ledger::Ledger;
use shared_crypto::{verify_signature, CryptoError};
use shared_types::{
    Address, AttendanceCertificate, Block, Transaction, TransactionData, TransactionKind,
    TxOutput,
};
use tracing::{info, warn};

use crate::error::MintResult;
use crate::ports::{BlockSolver, CancelToken};

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Produces blocks out of pending attendance transactions.
///
/// One `mint` call is one pass: verify every pooled attendance certificate,
/// build a candidate from the valid ones plus a reward transaction crediting
/// the minter's address, solve it, commit it. If nothing valid is pending the
/// call is a no-op and returns `Ok(None)`.
pub struct AttendanceMinter {
    ledger: Arc<Ledger>,
    solver: Arc<dyn BlockSolver>,
    address: Address,
}

impl AttendanceMinter {
    pub fn new(ledger: Arc<Ledger>, solver: Arc<dyn BlockSolver>, address: Address) -> Self {
        Self {
            ledger,
            solver,
            address,
        }
    }

    /// Mint one block from the currently pending attendance transactions.
    ///
    /// The solve runs without holding any ledger lock; `add_block`
    /// re-validates the solved block independently, so a chain that moved
    /// under us surfaces as a linkage error rather than a silent overwrite.
    pub fn mint(&self, cancel: &CancelToken) -> MintResult<Option<Block>> {
        let valid = self.collect_attendance();
        if valid.is_empty() {
            info!("[rc-minting] no valid attendance pending, nothing to mint");
            return Ok(None);
        }

        let previous = self.ledger.last_block();
        let target = self.ledger.required_difficulty(previous.index + 1);

        let mut transactions = valid;
        transactions.push(self.reward_transaction());

        let candidate = Block {
            index: previous.index + 1,
            previous_hash: previous.hash.clone(),
            timestamp: unix_now(),
            nonce: 0,
            difficulty: None,
            transactions,
            miner: Some(self.address.clone()),
            hash: String::new(),
        };

        info!(
            "[rc-minting] solving block {} ({} transactions, target {})",
            candidate.index,
            candidate.transactions.len(),
            target
        );
        let solved = self.solver.solve(candidate, target, cancel)?;

        let committed = self.ledger.add_block(solved, true)?;
        Ok(Some(committed))
    }

    /// Pending attendance transactions whose certificate signature verifies.
    fn collect_attendance(&self) -> Vec<Transaction> {
        let mut valid = Vec::new();
        for tx in self.ledger.pending_transactions() {
            if tx.kind != TransactionKind::Attendance {
                continue;
            }
            match Self::verify_attendance(&tx) {
                Ok(true) => valid.push(tx),
                Ok(false) => {
                    warn!("[rc-minting] discarding attendance with bad signature: {}", tx.id);
                }
                Err(e) => {
                    warn!("[rc-minting] discarding unverifiable attendance {}: {e}", tx.id);
                }
            }
        }
        valid
    }

    fn verify_attendance(tx: &Transaction) -> Result<bool, CryptoError> {
        let TransactionData::Attendance(payload) = &tx.data else {
            return Ok(false);
        };

        let digest = AttendanceCertificate {
            student_id: &payload.student_id,
            event_id: &payload.event_id,
            timestamp: payload.timestamp,
        }
        .digest();

        verify_signature(&payload.public_key, &payload.signature, digest.as_bytes())
    }

    fn reward_transaction(&self) -> Transaction {
        let mut tx = Transaction {
            id: shared_crypto::random_id(),
            kind: TransactionKind::Reward,
            data: TransactionData::Value {
                inputs: vec![],
                outputs: vec![TxOutput {
                    amount: self.ledger.block_reward(),
                    address: self.address.clone(),
                }],
            },
            hash: None,
            signature: None,
        };
        tx.hash = Some(tx.compute_hash());
        tx
    }
}
