//! Proof-of-work difficulty retargeting.
//!
//! The difficulty target is a ceiling on the block hash's measured value
//! (leading 14 hex chars parsed as an integer): a block passes when its
//! measure is less than or equal to the target.
//!
//! Retargeting happens every `adjustment_interval` blocks: compare the time
//! the last interval actually took against the expected time. Mining faster
//! than half the expected time doubles the prior difficulty; slower than
//! twice the expected time halves it. The result never drops below the
//! configured base.

use shared_types::Block;

/// Difficulty retargeting configuration.
#[derive(Clone, Debug)]
pub struct DifficultyConfig {
    /// Target for index 0 and the floor for every retarget.
    pub base_difficulty: u64,

    /// Number of blocks between retargets.
    pub adjustment_interval: u64,

    /// Target time between blocks (seconds).
    pub target_block_time: u64,
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        Self {
            // Measure space is 56 bits (14 hex chars); 2^53 keeps roughly a
            // 1-in-8 chance per nonce, a few seconds of CPU search.
            base_difficulty: 1 << 53,
            adjustment_interval: 10,
            // 10 minutes
            target_block_time: 600,
        }
    }
}

/// Computes the required difficulty target for a block index, as a pure
/// function of the chain so far.
#[derive(Clone, Debug)]
pub struct DifficultyAdjuster {
    config: DifficultyConfig,
}

impl DifficultyAdjuster {
    /// Create a new adjuster.
    pub fn new(config: DifficultyConfig) -> Self {
        Self { config }
    }

    /// The configured base difficulty.
    pub fn base(&self) -> u64 {
        self.config.base_difficulty
    }

    /// Required difficulty target for the block at `index`, given the blocks
    /// committed before it.
    ///
    /// - Index 0 uses the base difficulty.
    /// - Off-interval indexes reuse the difficulty stamped on the last block.
    /// - On-interval indexes retarget from the elapsed time over the last
    ///   interval, clamped to never fall below the base.
    pub fn required_difficulty(&self, index: u64, blocks: &[Block]) -> u64 {
        let base = self.config.base_difficulty;

        if index == 0 {
            return base;
        }

        let Some(last) = blocks.last() else {
            return base;
        };

        if index % self.config.adjustment_interval != 0 {
            return last.difficulty.unwrap_or(base);
        }

        let window = self.config.adjustment_interval as usize;
        let anchor = &blocks[blocks.len().saturating_sub(window)];

        let time_expected = self.config.adjustment_interval * self.config.target_block_time;
        let time_taken = last.timestamp.saturating_sub(anchor.timestamp);
        let prior = anchor.difficulty.unwrap_or(base);

        let adjusted = if time_taken < time_expected / 2 {
            tracing::debug!(
                "[rc-ledger] retarget at index {index}: took {time_taken}s of {time_expected}s expected, doubling difficulty"
            );
            prior.saturating_mul(2)
        } else if time_taken > time_expected * 2 {
            tracing::debug!(
                "[rc-ledger] retarget at index {index}: took {time_taken}s of {time_expected}s expected, halving difficulty"
            );
            prior / 2
        } else {
            prior
        };

        adjusted.max(base)
    }
}
