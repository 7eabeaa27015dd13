//! Commodity price quotes keyed by metal and quality grade.
use crate::error::{PricingError, Result};
use crate::pricing::{Metal, Quality};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarketData {
    prices: HashMap<(Metal, Quality), f64>,
}

impl MarketData {
    pub fn new() -> Self { Self::default() }

    pub fn set_price(&mut self, metal: Metal, quality: Quality, price: f64) -> Result<()> {
        if !(price.is_finite() && price > 0.0) {
            return Err(PricingError::InvalidPrice { metal: metal.to_string(), price });
        }
        self.prices.insert((metal, quality), price);
        Ok(())
    }

    pub fn set_price_by_name(&mut self, metal: &str, quality: Quality, price: f64) -> Result<()> {
        self.set_price(metal.parse()?, quality, price)
    }

    pub fn price(&self, metal: Metal, quality: Quality) -> Result<f64> {
        self.prices.get(&(metal, quality)).copied().ok_or_else(|| PricingError::MissingPrice {
            metal: metal.to_string(),
            quality: quality.to_string(),
        })
    }

    pub fn price_default(&self, metal: Metal) -> Result<f64> {
        self.price(metal, Quality::Default)
    }

    pub fn len(&self) -> usize { self.prices.len() }
    pub fn is_empty(&self) -> bool { self.prices.is_empty() }
}
