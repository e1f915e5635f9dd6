//! Brute-force proof-of-work solver.

use std::time::Instant;

use shared_types::Block;
use tracing::{debug, info};

use crate::error::{MintError, MintResult};
use crate::ports::{BlockSolver, CancelToken};

// Polling the atomic every iteration costs more than the hash itself saves.
const CANCEL_CHECK_INTERVAL: u64 = 1024;

/// Sequential nonce search over the block's hash preimage.
#[derive(Clone, Copy, Debug, Default)]
pub struct PowSolver;

impl PowSolver {
    pub fn new() -> Self {
        Self
    }
}

impl BlockSolver for PowSolver {
    fn solve(&self, mut candidate: Block, target: u64, cancel: &CancelToken) -> MintResult<Block> {
        let started = Instant::now();
        let mut attempts: u64 = 0;

        loop {
            if attempts % CANCEL_CHECK_INTERVAL == 0 && cancel.is_cancelled() {
                debug!(
                    "[rc-minting] solve for block {} cancelled after {attempts} attempts",
                    candidate.index
                );
                return Err(MintError::Cancelled);
            }

            candidate.hash = candidate.compute_hash();
            if candidate.measured_difficulty() <= target {
                info!(
                    "[rc-minting] solved block {} in {} attempts ({:?})",
                    candidate.index,
                    attempts + 1,
                    started.elapsed()
                );
                return Ok(candidate);
            }

            candidate.nonce = candidate.nonce.wrapping_add(1);
            attempts += 1;
        }
    }
}
