//! # Ledger Event Bus
//!
//! Fire-and-forget notifications emitted after committed mutations.
//!
//! Uses `tokio::sync::broadcast` for multi-consumer semantics so an API
//! layer, a broadcaster and a logger can attach independently. Publishing
//! never blocks and a subscriber's failure (or absence) has no effect on
//! ledger state.

use shared_types::{Block, Transaction};
use tokio::sync::broadcast;
use tracing::debug;

/// Default broadcast channel capacity.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Notifications emitted by the ledger.
#[derive(Clone, Debug)]
pub enum LedgerEvent {
    /// A block was validated and appended.
    BlockAdded(Block),

    /// A longer chain replaced the local suffix; carries the new blocks.
    ChainReplaced(Vec<Block>),

    /// A value transaction entered the pending pool.
    TransactionAdded(Transaction),

    /// A student-registration transaction entered the pending pool.
    StudentRegistered(Transaction),

    /// An attendance transaction entered the pending pool.
    AttendanceRecorded(Transaction),
}

impl LedgerEvent {
    /// Topic tag for logging and filtering.
    pub fn topic(&self) -> &'static str {
        match self {
            Self::BlockAdded(_) => "blockAdded",
            Self::ChainReplaced(_) => "blockchainReplaced",
            Self::TransactionAdded(_) => "transactionAdded",
            Self::StudentRegistered(_) => "studentRegistered",
            Self::AttendanceRecorded(_) => "attendanceRecorded",
        }
    }
}

/// In-memory ledger event bus.
pub struct LedgerEventBus {
    sender: broadcast::Sender<LedgerEvent>,
}

impl LedgerEventBus {
    /// Create a bus with the default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a bus with a specific channel capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to all future ledger events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<LedgerEvent> {
        self.sender.subscribe()
    }

    /// Publish an event. Returns the number of subscribers that received it;
    /// zero when nobody is listening (the event is simply dropped).
    pub fn publish(&self, event: LedgerEvent) -> usize {
        let topic = event.topic();
        match self.sender.send(event) {
            Ok(receivers) => {
                debug!("[rc-ledger] event published: {topic} ({receivers} receivers)");
                receivers
            }
            Err(_) => {
                debug!("[rc-ledger] event dropped (no receivers): {topic}");
                0
            }
        }
    }

    /// Number of active subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for LedgerEventBus {
    fn default() -> Self {
        Self::new()
    }
}
