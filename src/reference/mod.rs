//! Inputs resolved before a pricing graph is built: static alloy data and
//! market prices.
pub mod market_data;
pub mod static_data;

pub use market_data::MarketData;
pub use static_data::{LabourBreakpoint, StaticData};
