//! Container of client orders: price table and commodity shock surface.
use super::kernel;
use super::order::{ClientOrder, OrderQuote, OrderRequest};
use crate::error::Result;
use crate::pricing::Metal;
use crate::reference::{MarketData, StaticData};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;

pub type OrderId = usize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderLine {
    /// One-based row number (`id + 1`).
    pub index: usize,
    pub client: String,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceReport {
    pub lines: Vec<OrderLine>,
    pub total: f64,
}

impl PriceReport {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Total price change over a grid of relative commodity price shocks.
/// `price_change` is row-major: one row per zinc shock, one column per copper shock.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShockSurface {
    pub zinc_shocks_pct: Vec<f64>,
    pub copper_shocks_pct: Vec<f64>,
    pub price_change: Vec<f64>,
}

impl ShockSurface {
    pub fn at(&self, zinc_idx: usize, copper_idx: usize) -> f64 {
        self.price_change[zinc_idx * self.copper_shocks_pct.len() + copper_idx]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.price_change.chunks(self.copper_shocks_pct.len().max(1))
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[derive(Debug, Clone)]
pub struct OrderBook {
    static_data: StaticData,
    orders: BTreeMap<OrderId, ClientOrder>,
}

impl OrderBook {
    pub fn new(static_data: StaticData) -> Self {
        Self { static_data, orders: BTreeMap::new() }
    }

    pub fn static_data(&self) -> &StaticData { &self.static_data }

    pub fn len(&self) -> usize { self.orders.len() }
    pub fn is_empty(&self) -> bool { self.orders.is_empty() }

    pub fn order(&self, id: OrderId) -> Option<&ClientOrder> { self.orders.get(&id) }

    /// Prices every request against the book's static data and the given
    /// market. Each order gets its own graph; graphs are built in parallel.
    /// If any request fails, the book is left untouched.
    pub fn add_orders(&mut self, requests: impl IntoIterator<Item = (OrderId, OrderRequest)>, market_data: &MarketData) -> Result<()> {
        let requests: Vec<(OrderId, OrderRequest)> = requests.into_iter().collect();
        let static_data = &self.static_data;

        let built: Vec<(OrderId, ClientOrder)> = requests
            .into_par_iter()
            .map(|(id, request)| ClientOrder::new(request, static_data, market_data).map(|order| (id, order)))
            .collect::<Result<_>>()?;

        for (id, order) in built {
            if self.orders.insert(id, order).is_some() {
                tracing::warn!(order_id = id, "Overwriting client order with the same id");
            }
        }
        tracing::debug!(orders = self.orders.len(), "order book updated");
        Ok(())
    }

    pub fn quotes(&self) -> Vec<(OrderId, OrderQuote)> {
        self.orders.iter().map(|(&id, order)| (id, order.quote())).collect()
    }

    pub fn order_prices(&self) -> PriceReport {
        let lines: Vec<OrderLine> = self
            .orders
            .iter()
            .map(|(&id, order)| OrderLine { index: id + 1, client: order.client().to_string(), price: order.price() })
            .collect();
        let total = lines.iter().map(|l| l.price).sum();
        PriceReport { lines, total }
    }

    pub fn total_price(&self) -> f64 {
        self.orders.values().map(ClientOrder::price).sum()
    }

    /// Grid of total price change for every pair of zinc/copper shocks.
    ///
    /// Ranges are `(low, high)` in percent; each ladder has `n_steps` evenly
    /// spaced points including both ends. Entry `(i, j)` is
    /// `Σ_orders zinc_sens * zinc_shock[i] + copper_sens * copper_shock[j]`,
    /// with shocks as fractions.
    pub fn price_shock_surface(&self, zinc_range_pct: (f64, f64), copper_range_pct: (f64, f64), n_steps: usize) -> ShockSurface {
        let zinc_ladder = kernel::linspace(zinc_range_pct.0 / 100.0, zinc_range_pct.1 / 100.0, n_steps);
        let copper_ladder = kernel::linspace(copper_range_pct.0 / 100.0, copper_range_pct.1 / 100.0, n_steps);

        // Graphs are not Sync; read their sensitivities once up front.
        let sensitivities: Vec<(f64, f64)> = self
            .orders
            .values()
            .map(|o| (o.sensitivity(Metal::Zinc), o.sensitivity(Metal::Copper)))
            .collect();

        let cols = copper_ladder.len();
        let mut price_change = vec![0.0; zinc_ladder.len() * cols];
        if cols > 0 {
            price_change
                .par_chunks_mut(cols)
                .zip(zinc_ladder.par_iter())
                .for_each(|(row, &zinc_shock)| {
                    for &(zinc_sens, copper_sens) in &sensitivities {
                        kernel::accumulate_row(row, &copper_ladder, copper_sens, zinc_sens * zinc_shock);
                    }
                });
        }

        ShockSurface {
            zinc_shocks_pct: zinc_ladder.iter().map(|s| s * 100.0).collect(),
            copper_shocks_pct: copper_ladder.iter().map(|s| s * 100.0).collect(),
            price_change,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PricingError;
    use crate::pricing::Quality;

    fn market() -> MarketData {
        let mut market = MarketData::new();
        market.set_price(Metal::Copper, Quality::Default, 8.22).unwrap();
        market.set_price(Metal::Zinc, Quality::Default, 2.5).unwrap();
        market.set_price(Metal::Zinc, Quality::AA, 2.9).unwrap();
        market
    }

    fn book() -> OrderBook {
        let static_data = StaticData::new(0.66, vec![(0.0, 1.0), (50.0, 1.2), (150.0, 1.6)]).unwrap();
        let mut book = OrderBook::new(static_data);
        book.add_orders(
            vec![
                (0, OrderRequest { client: "Foundry A".into(), weight: 950.0, rod_length: 120.0, zinc_quality: Quality::AA }),
                (1, OrderRequest { client: "Foundry B".into(), weight: 50.0, rod_length: 10.0, zinc_quality: Quality::Default }),
                (2, OrderRequest { client: "Foundry C".into(), weight: 300.0, rod_length: 200.0, zinc_quality: Quality::AA }),
            ],
            &market(),
        )
        .unwrap();
        book
    }

    #[test]
    fn test_order_prices_and_total() {
        let book = book();
        let report = book.order_prices();

        assert_eq!(report.lines.len(), 3);
        assert_eq!(report.lines[0].index, 1);
        assert_eq!(report.lines[2].client, "Foundry C");
        let sum: f64 = report.lines.iter().map(|l| l.price).sum();
        assert_eq!(report.total, sum);
        assert_eq!(book.total_price(), sum);

        let expected_b = 50.0 * 1.0 * (0.66 * 8.22 + (1.0 - 0.66) * 2.5);
        assert!((report.lines[1].price - expected_b).abs() < 1e-9);
    }

    #[test]
    fn test_failed_batch_leaves_book_untouched() {
        let mut book = book();
        let err = book
            .add_orders(
                vec![
                    (7, OrderRequest { client: "ok".into(), weight: 1.0, rod_length: 1.0, zinc_quality: Quality::Default }),
                    (8, OrderRequest { client: "bad".into(), weight: 1.0, rod_length: 1.0, zinc_quality: Quality::B }),
                ],
                &market(),
            )
            .unwrap_err();

        assert!(matches!(err, PricingError::MissingPrice { .. }));
        assert_eq!(book.len(), 3);
        assert!(book.order(7).is_none());
    }

    #[test]
    fn test_same_id_overwrites() {
        let mut book = book();
        book.add_orders(
            vec![(1, OrderRequest { client: "Replacement".into(), weight: 1.0, rod_length: 1.0, zinc_quality: Quality::Default })],
            &market(),
        )
        .unwrap();
        assert_eq!(book.len(), 3);
        assert_eq!(book.order(1).unwrap().client(), "Replacement");
    }

    #[test]
    fn test_shock_surface_is_linear_in_both_shocks() {
        let book = book();
        let surface = book.price_shock_surface((-10.0, 10.0), (-20.0, 20.0), 5);

        assert_eq!(surface.zinc_shocks_pct.len(), 5);
        for (got, want) in surface.copper_shocks_pct.iter().zip([-20.0, -10.0, 0.0, 10.0, 20.0]) {
            assert!((got - want).abs() < 1e-9);
        }
        assert_eq!(surface.price_change.len(), 25);
        assert_eq!(surface.rows().count(), 5);

        let (zn, cu): (f64, f64) = book
            .quotes()
            .iter()
            .fold((0.0, 0.0), |(z, c), (_, q)| (z + q.zinc_sensitivity, c + q.copper_sensitivity));

        for (i, &z) in surface.zinc_shocks_pct.iter().enumerate() {
            for (j, &c) in surface.copper_shocks_pct.iter().enumerate() {
                let expected = zn * z / 100.0 + cu * c / 100.0;
                assert!((surface.at(i, j) - expected).abs() < 1e-6, "({}, {})", i, j);
            }
        }

        // No shock, no change.
        assert!(surface.at(2, 2).abs() < 1e-9);
    }

    #[test]
    fn test_shock_surface_degenerate_sizes() {
        let book = book();
        let empty = book.price_shock_surface((-10.0, 10.0), (-10.0, 10.0), 0);
        assert!(empty.price_change.is_empty());

        let single = book.price_shock_surface((10.0, 50.0), (-10.0, 50.0), 1);
        assert_eq!(single.zinc_shocks_pct, vec![10.0]);
        assert_eq!(single.price_change.len(), 1);
    }

    #[test]
    fn test_empty_book_has_flat_surface() {
        let book = OrderBook::new(StaticData::new(0.5, vec![(0.0, 1.0)]).unwrap());
        let surface = book.price_shock_surface((-5.0, 5.0), (-5.0, 5.0), 3);
        assert!(surface.price_change.iter().all(|&v| v == 0.0));
        assert_eq!(book.order_prices().total, 0.0);
    }

    #[test]
    fn test_reports_serialize_to_json() {
        let book = book();
        let json = book.order_prices().to_json().unwrap();
        assert!(json.contains("\"client\": \"Foundry A\""));
        assert!(json.contains("\"total\""));

        let surface: serde_json::Value = serde_json::from_str(&book.price_shock_surface((0.0, 1.0), (0.0, 1.0), 2).to_json().unwrap()).unwrap();
        assert_eq!(surface["price_change"].as_array().unwrap().len(), 4);
    }
}
