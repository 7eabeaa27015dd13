//! Structural checks and exports over the node arena.
pub mod topology;
