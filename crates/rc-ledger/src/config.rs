//! Ledger configuration.

use crate::domain::difficulty::DifficultyConfig;

/// Configuration for a ledger instance.
#[derive(Clone, Debug)]
pub struct LedgerConfig {
    /// Fixed subsidy credited once per block in the balance rule and paid out
    /// by the minting reward transaction.
    pub block_reward: u64,

    /// Proof-of-work retargeting parameters.
    pub difficulty: DifficultyConfig,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            block_reward: 50,
            difficulty: DifficultyConfig::default(),
        }
    }
}
