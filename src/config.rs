//! JSON configuration: alloy composition, labour schedule, market quotes and
//! client orders in one document.
use crate::book::{OrderBook, OrderId, OrderRequest};
use crate::error::PricingError;
use crate::pricing::{Metal, Quality};
use crate::reference::{LabourBreakpoint, MarketData, StaticData};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub metal: Metal,
    #[serde(default)]
    pub quality: Quality,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderEntry {
    pub id: OrderId,
    #[serde(flatten)]
    pub request: OrderRequest,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    pub copper_fraction: f64,
    /// `(min_length, factor)` pairs in ascending length order.
    pub labour_factors: Vec<(f64, f64)>,
    #[serde(default)]
    pub prices: Vec<PriceQuote>,
    #[serde(default)]
    pub orders: Vec<OrderEntry>,
}

impl PricingConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        tracing::debug!(path = %path.as_ref().display(), "loading pricing config");
        Self::from_json_str(&raw)
    }

    pub fn static_data(&self) -> Result<StaticData, ConfigError> {
        let schedule = self.labour_factors.iter().copied().map(LabourBreakpoint::from);
        Ok(StaticData::new(self.copper_fraction, schedule)?)
    }

    pub fn market_data(&self) -> Result<MarketData, ConfigError> {
        let mut market = MarketData::new();
        for quote in &self.prices {
            market.set_price(quote.metal, quote.quality, quote.price)?;
        }
        Ok(market)
    }

    /// Builds the book and prices every configured order against the
    /// configured market.
    pub fn order_book(&self) -> Result<OrderBook, ConfigError> {
        let market = self.market_data()?;
        let mut book = OrderBook::new(self.static_data()?);
        book.add_orders(self.orders.iter().map(|o| (o.id, o.request.clone())), &market)?;
        Ok(book)
    }
}
