//! Pure domain logic: validation rules and difficulty retargeting.

pub mod difficulty;
pub mod error;
pub mod validation;

pub use difficulty::{DifficultyAdjuster, DifficultyConfig};
pub use error::{LedgerError, LedgerResult, StoreError};
