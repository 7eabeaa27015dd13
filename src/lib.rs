//! Pricing core for copper/zinc alloy rods.
//!
//! Each order is priced by a small scalar expression graph that also carries
//! reverse-mode adjoints, so the price and its sensitivities to the copper and
//! zinc prices come out of the same graph.

pub mod analysis;
pub mod book;
pub mod compute;
pub mod config;
pub mod display;
pub mod error;
pub mod pricing;
pub mod reference;
pub mod store;

pub use book::{ClientOrder, OrderBook, OrderRequest, PriceReport, ShockSurface};
pub use config::{ConfigError, PricingConfig};
pub use error::{PricingError, Result};
pub use pricing::{GraphInputs, Metal, PricingGraph, Quality};
pub use reference::{MarketData, StaticData};
