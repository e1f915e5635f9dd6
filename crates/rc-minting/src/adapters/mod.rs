//! Solver adapters.

pub mod pow;

pub use pow::PowSolver;
