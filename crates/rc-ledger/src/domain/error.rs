//! Error types for the ledger engine.

use thiserror::Error;

/// Result type for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Rejection reasons for blocks, transactions and chain replacements.
///
/// Every validator fails fast with one of these; the ledger performs no
/// mutation unless the whole rule set passed.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Block index does not follow the previous block.
    #[error("Invalid index: expected {expected}, got {actual}")]
    InvalidIndex {
        /// previous index + 1
        expected: u64,
        /// index carried by the candidate
        actual: u64,
    },

    /// Block does not link to the previous block's hash.
    #[error("Invalid previous hash: expected {expected}, got {actual}")]
    PreviousHashMismatch {
        /// hash of the previous block
        expected: String,
        /// previousHash carried by the candidate
        actual: String,
    },

    /// Recomputed digest differs from the block's recorded hash.
    #[error("Invalid hash: expected {expected}, got {actual}")]
    HashMismatch {
        /// digest recomputed from content
        expected: String,
        /// hash recorded on the block
        actual: String,
    },

    /// The block's measured proof-of-work exceeds the required target.
    #[error("Invalid proof-of-work: measured difficulty {measured} exceeds required {required}")]
    ProofOfWorkExceedsTarget {
        /// measure derived from the block hash
        measured: u64,
        /// target in effect for the block's index
        required: u64,
    },

    /// Reward-adjusted input sum does not cover the output sum.
    #[error("Invalid block balance: inputs sum {inputs}, outputs sum {outputs}")]
    InsufficientBalance {
        /// input amounts plus the block reward
        inputs: u64,
        /// total output amounts
        outputs: u64,
    },

    /// The same output is consumed more than once.
    #[error("Outputs spent more than once: {}", keys.join(", "))]
    DoubleSpend {
        /// offending `transaction|index` keys
        keys: Vec<String>,
    },

    /// Transaction id already committed to the chain.
    #[error("Transaction '{id}' is already in the blockchain")]
    DuplicateTransaction {
        /// duplicated transaction id
        id: String,
    },

    /// A transaction consumes outputs that are no longer unspent.
    #[error("Not all inputs are unspent for transaction '{id}': {}", keys.join(", "))]
    SpentInput {
        /// spending transaction id
        id: String,
        /// offending `transaction|index` keys
        keys: Vec<String>,
    },

    /// More than one fee or reward transaction in a block.
    #[error("Invalid {kind} transaction count: expected at most 1, got {count}")]
    TooManyOfKind {
        /// offending kind tag
        kind: &'static str,
        /// observed count
        count: usize,
    },

    /// Missing or malformed transaction fields.
    #[error("Invalid transaction '{id}': {reason}")]
    MalformedTransaction {
        /// offending transaction id
        id: String,
        /// which structural rule failed
        reason: &'static str,
    },

    /// Replacement candidate is not strictly longer than the local chain.
    #[error("Blockchain shorter than the current blockchain: {candidate} <= {current}")]
    ChainTooShort {
        /// candidate length
        candidate: usize,
        /// local length
        current: usize,
    },

    /// Candidate chain does not start from the fixed genesis block.
    #[error("Genesis blocks aren't the same")]
    GenesisMismatch,

    /// A block inside a candidate chain failed validation.
    #[error("Invalid block sequence at index {index}")]
    InvalidSequence {
        /// index of the failing block
        index: u64,
        /// the underlying rejection
        #[source]
        source: Box<LedgerError>,
    },

    /// Durable store failure.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Errors from the durable store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A persisted collection failed to encode or decode.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
