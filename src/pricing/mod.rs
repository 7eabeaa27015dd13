//! Pricing graph for the copper/zinc alloy rod.
pub mod graph;
pub mod metal;

pub use graph::{GraphInputs, PricingGraph};
pub use metal::{Metal, Quality};
