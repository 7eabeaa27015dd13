//! Reverse-mode adjoint propagation over the node arena.
pub mod engine;
pub mod ledger;

pub use engine::Engine;
pub use ledger::AdjointLedger;
