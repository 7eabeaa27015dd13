//! A single client order and the pricing graph built for it.
use crate::error::{PricingError, Result};
use crate::pricing::{GraphInputs, Metal, PricingGraph, Quality};
use crate::reference::{MarketData, StaticData};
use serde::{Deserialize, Serialize};

/// What the client asks for: `weight` in kg, `rod_length` in cm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub client: String,
    pub weight: f64,
    pub rod_length: f64,
    #[serde(default)]
    pub zinc_quality: Quality,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderQuote {
    pub client: String,
    pub price: f64,
    pub copper_sensitivity: f64,
    pub zinc_sensitivity: f64,
}

/// Static and market data are resolved once, when the order is created; the
/// resulting graph answers every later price/sensitivity query.
#[derive(Debug, Clone)]
pub struct ClientOrder {
    client: String,
    graph: PricingGraph,
}

impl ClientOrder {
    pub fn new(request: OrderRequest, static_data: &StaticData, market_data: &MarketData) -> Result<Self> {
        if !(request.weight.is_finite() && request.weight >= 0.0) {
            return Err(PricingError::InvalidGraphInput { field: "total_weight", value: request.weight });
        }

        let inputs = GraphInputs {
            total_weight: request.weight,
            copper_fraction: static_data.alloy_mass_fraction(Metal::Copper),
            copper_price: market_data.price_default(Metal::Copper)?,
            zinc_price: market_data.price(Metal::Zinc, request.zinc_quality)?,
            labour_factor: static_data.labour_factor(request.rod_length)?,
        };

        Ok(Self { client: request.client, graph: PricingGraph::new(inputs) })
    }

    pub fn client(&self) -> &str { &self.client }

    pub fn graph(&self) -> &PricingGraph { &self.graph }

    pub fn price(&self) -> f64 { self.graph.price() }

    pub fn sensitivity(&self, metal: Metal) -> f64 {
        self.graph.price_sensitivity(metal)
    }

    pub fn quote(&self) -> OrderQuote {
        OrderQuote {
            client: self.client.clone(),
            price: self.price(),
            copper_sensitivity: self.sensitivity(Metal::Copper),
            zinc_sensitivity: self.sensitivity(Metal::Zinc),
        }
    }
}
