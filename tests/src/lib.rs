//! # Rollcall Chain Test Suite
//!
//! Unified test crate exercising the ledger, minting and registrar crates
//! together.
//!
//! ## Structure
//!
//! ```text
//! tests/src/integration/
//! ├── end_to_end.rs    # register -> attend -> mint -> report
//! ├── fork_choice.rs   # chain replacement scenarios
//! ├── persistence.rs   # file-store durability across restarts
//! └── validation.rs    # admission rule rejections
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p rc-tests
//! cargo test -p rc-tests integration::fork_choice
//! ```

#![allow(dead_code)]
