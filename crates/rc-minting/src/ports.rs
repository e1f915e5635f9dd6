//! Solver port and its cancellation handle.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use shared_types::Block;

use crate::error::MintResult;

/// Cooperative cancellation for an in-flight solve.
///
/// Clones share the flag, so the committing side can hold one clone and
/// cancel a solve that a competing block has made stale.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Finds a nonce/hash for a candidate block.
///
/// `solve` returns the candidate with `nonce` and `hash` populated so its
/// measured difficulty is at most `target`. It may run indefinitely and must
/// poll the token, returning `MintError::Cancelled` once it is set.
pub trait BlockSolver: Send + Sync {
    fn solve(&self, candidate: Block, target: u64, cancel: &CancelToken) -> MintResult<Block>;
}
