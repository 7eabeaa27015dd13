//! Text rendering of a priced expression graph.
pub mod trace;
