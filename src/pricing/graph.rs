//! The alloy pricing expression, evaluated once with its adjoints.
use crate::analysis::topology;
use crate::compute::{AdjointLedger, Engine};
use crate::display::trace;
use crate::error::Result;
use crate::pricing::metal::Metal;
use crate::store::{NodeId, NodeMetadata, Registry};
use serde::{Deserialize, Serialize};

/// The five scalars a pricing graph is built from. They are expected to be
/// validated by the reference-data layer before reaching the graph.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GraphInputs {
    pub total_weight: f64,
    pub copper_fraction: f64,
    pub copper_price: f64,
    pub zinc_price: f64,
    pub labour_factor: f64,
}

/// `price = weight * labour_factor * (cu_frac * cu_price + zn_frac * zn_price)`
///
/// The graph owns its arena and adjoint cache outright; node ids never leave
/// it, so nodes cannot be reused across graphs. Once built it is immutable:
/// repricing with new inputs means building a new graph.
#[derive(Debug, Clone)]
pub struct PricingGraph {
    inputs: GraphInputs,
    registry: Registry,
    ledger: AdjointLedger,
    copper_price: NodeId,
    zinc_price: NodeId,
    root: NodeId,
}

impl PricingGraph {
    pub fn new(inputs: GraphInputs) -> Self {
        let mut registry = Registry::new();
        let leaf = |reg: &mut Registry, value: f64, name: &str| reg.add_leaf(value, NodeMetadata::named(name));

        let total_weight = leaf(&mut registry, inputs.total_weight, "total_weight");
        let copper_fraction = leaf(&mut registry, inputs.copper_fraction, "copper_fraction");
        // Independent leaf: only price sensitivities are reported, so the
        // coupling between the two fractions is not carried through the graph.
        let zinc_fraction = leaf(&mut registry, 1.0 - inputs.copper_fraction, "zinc_fraction");
        let copper_price = leaf(&mut registry, inputs.copper_price, "copper_price");
        let zinc_price = leaf(&mut registry, inputs.zinc_price, "zinc_price");
        let labour_factor = leaf(&mut registry, inputs.labour_factor, "labour_factor");

        let copper_cost = registry.multiply(copper_price, copper_fraction, NodeMetadata::named("copper_cost"));
        let zinc_cost = registry.multiply(zinc_price, zinc_fraction, NodeMetadata::named("zinc_cost"));
        let blended_rate = registry.add(copper_cost, zinc_cost, NodeMetadata::named("blended_rate"));
        let material_cost = registry.multiply(blended_rate, total_weight, NodeMetadata::named("material_cost"));
        let root = registry.multiply(material_cost, labour_factor, NodeMetadata::named("price"));

        debug_assert!(topology::sort(&registry).is_ok());

        let mut ledger = AdjointLedger::with_capacity(registry.count());
        ledger.seed(root, 1.0);

        tracing::debug!(
            weight = inputs.total_weight,
            copper_fraction = inputs.copper_fraction,
            price = registry.value(root),
            "pricing graph built"
        );

        Self { inputs, registry, ledger, copper_price, zinc_price, root }
    }

    pub fn inputs(&self) -> &GraphInputs { &self.inputs }

    pub fn node_count(&self) -> usize { self.registry.count() }

    pub fn price(&self) -> f64 {
        self.registry.value(self.root)
    }

    /// Dollar price change for a 100% relative move in the metal's price,
    /// i.e. `d(price)/d(metal_price) * metal_price`.
    pub fn price_sensitivity(&self, metal: Metal) -> f64 {
        let leaf = match metal {
            Metal::Copper => self.copper_price,
            Metal::Zinc => self.zinc_price,
        };
        let engine = Engine::new(&self.registry, &self.ledger);
        engine.adjoint(leaf) * engine.value(leaf)
    }

    /// Same as [`price_sensitivity`](Self::price_sensitivity) for an
    /// identifier coming from outside the type system (config, user input).
    pub fn price_sensitivity_by_name(&self, metal: &str) -> Result<f64> {
        Ok(self.price_sensitivity(metal.parse::<Metal>()?))
    }

    /// Raw partial derivative of the price with respect to a named node.
    pub fn adjoint_of(&self, name: &str) -> Option<f64> {
        let idx = self.registry.meta.iter().position(|m| m.name == name)?;
        Some(Engine::new(&self.registry, &self.ledger).adjoint(NodeId::new(idx)))
    }

    /// Human-readable audit trace of the expression, with values and any
    /// adjoints already materialised.
    pub fn trace(&self) -> String {
        trace::format_trace(&self.registry, &self.ledger, self.root)
    }

    pub fn to_dot(&self) -> String {
        topology::to_dot(&self.registry, &self.ledger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PricingError;
    use rstest::rstest;

    fn graph(w: f64, cf: f64, cp: f64, zp: f64, lf: f64) -> PricingGraph {
        PricingGraph::new(GraphInputs {
            total_weight: w,
            copper_fraction: cf,
            copper_price: cp,
            zinc_price: zp,
            labour_factor: lf,
        })
    }

    fn assert_close(actual: f64, expected: f64) {
        let tol = 1e-9 * expected.abs().max(1.0);
        assert!((actual - expected).abs() <= tol, "actual {} != expected {}", actual, expected);
    }

    #[rstest]
    #[case(1.0, 1.0, 20.0, 5.0, 1.0)]
    #[case(1.0, 0.5, 20.0, 5.0, 1.0)]
    #[case(1.0, 0.25, 20.0, 5.0, 1.0)]
    #[case(1.0, 0.0, 15.0, 5.0, 1.0)]
    #[case(2.0, 0.8, 10.54, 5.0, 1.2)]
    #[case(50.0, 0.7, 11.78, 5.0, 1.4)]
    #[case(100.0, 0.3, 12.025, 5.0, 1.1)]
    #[case(950.0, 0.66, 20.4, 5.0, 1.9)]
    fn test_price_matches_closed_form(#[case] w: f64, #[case] cf: f64, #[case] cp: f64, #[case] zp: f64, #[case] lf: f64) {
        let g = graph(w, cf, cp, zp, lf);
        assert_close(g.price(), w * lf * (cf * cp + (1.0 - cf) * zp));
    }

    #[rstest]
    #[case(1.0, 1.0, 8.22, 5.0, 1.0)]
    #[case(2.0, 0.8, 10.54, 5.0, 1.2)]
    #[case(50.0, 0.7, 11.78, 5.0, 1.4)]
    #[case(100.0, 0.3, 12.025, 5.0, 1.1)]
    #[case(950.0, 0.66, 20.4, 5.0, 1.9)]
    fn test_copper_sensitivity(#[case] w: f64, #[case] cf: f64, #[case] cp: f64, #[case] zp: f64, #[case] lf: f64) {
        let g = graph(w, cf, cp, zp, lf);
        assert_close(g.price_sensitivity(Metal::Copper), w * lf * cf * cp);
    }

    #[rstest]
    #[case(1.0, 0.0, 1.0, 51.5, 1.0)]
    #[case(2.0, 0.0, 1.0, 12.7, 1.2)]
    #[case(50.0, 0.0, 1.0, 5.3, 1.4)]
    #[case(100.0, 0.0, 1.0, 8.32, 1.1)]
    #[case(950.0, 0.0, 1.0, 15.0, 1.9)]
    #[case(950.0, 0.66, 20.4, 5.0, 1.9)]
    fn test_zinc_sensitivity(#[case] w: f64, #[case] cf: f64, #[case] cp: f64, #[case] zp: f64, #[case] lf: f64) {
        let g = graph(w, cf, cp, zp, lf);
        assert_close(g.price_sensitivity(Metal::Zinc), w * lf * (1.0 - cf) * zp);
    }

    #[test]
    fn test_pure_copper_rod() {
        let g = graph(1.0, 1.0, 20.0, 5.0, 1.0);
        assert_eq!(g.price(), 20.0);
        assert_eq!(g.price_sensitivity(Metal::Copper), 20.0);
        assert_eq!(g.price_sensitivity(Metal::Zinc), 0.0);
    }

    #[test]
    fn test_large_order_scenario() {
        let g = graph(950.0, 0.66, 20.4, 5.0, 1.9);
        assert_close(g.price(), 950.0 * 1.9 * (0.66 * 20.4 + 0.34 * 5.0));
        assert_close(g.price_sensitivity(Metal::Copper), 950.0 * 1.9 * 0.66 * 20.4);
    }

    #[test]
    fn test_fraction_boundaries() {
        let zinc_only = graph(10.0, 0.0, 12.0, 4.0, 1.5);
        assert_eq!(zinc_only.price_sensitivity(Metal::Copper), 0.0);
        assert_close(zinc_only.price_sensitivity(Metal::Zinc), zinc_only.price());

        let copper_only = graph(10.0, 1.0, 12.0, 4.0, 1.5);
        assert_eq!(copper_only.price_sensitivity(Metal::Zinc), 0.0);
        assert_close(copper_only.price_sensitivity(Metal::Copper), copper_only.price());
    }

    #[test]
    fn test_repeated_queries_are_bit_identical() {
        let g = graph(50.0, 0.7, 11.78, 5.0, 1.4);
        let price = g.price();
        let cu = g.price_sensitivity(Metal::Copper);
        let zn = g.price_sensitivity(Metal::Zinc);

        assert_eq!(g.price().to_bits(), price.to_bits());
        assert_eq!(g.price_sensitivity(Metal::Copper).to_bits(), cu.to_bits());
        assert_eq!(g.price_sensitivity(Metal::Zinc).to_bits(), zn.to_bits());
    }

    #[test]
    fn test_doubling_weight_doubles_everything() {
        let base = graph(100.0, 0.3, 12.025, 5.0, 1.1);
        let doubled = graph(200.0, 0.3, 12.025, 5.0, 1.1);

        assert_eq!(doubled.price(), 2.0 * base.price());
        assert_eq!(doubled.price_sensitivity(Metal::Copper), 2.0 * base.price_sensitivity(Metal::Copper));
        assert_eq!(doubled.price_sensitivity(Metal::Zinc), 2.0 * base.price_sensitivity(Metal::Zinc));
    }

    #[test]
    fn test_sensitivity_by_name() {
        let g = graph(2.0, 0.8, 10.54, 5.0, 1.2);
        assert_eq!(g.price_sensitivity_by_name("copper").unwrap(), g.price_sensitivity(Metal::Copper));
        assert_eq!(g.price_sensitivity_by_name("Zinc").unwrap(), g.price_sensitivity(Metal::Zinc));
        assert_eq!(
            g.price_sensitivity_by_name("Gold").unwrap_err(),
            PricingError::UnsupportedMetal("Gold".to_string())
        );
    }

    #[test]
    fn test_adjoint_of_named_nodes() {
        let g = graph(2.0, 0.5, 10.0, 4.0, 3.0);
        assert_eq!(g.adjoint_of("price"), Some(1.0));
        // d(price)/d(copper_price) = cf * w * lf
        assert_eq!(g.adjoint_of("copper_price"), Some(0.5 * (2.0 * 3.0)));
        assert_eq!(g.adjoint_of("labour_factor"), Some(2.0 * (0.5 * 10.0 + 0.5 * 4.0)));
        assert_eq!(g.adjoint_of("missing"), None);
    }

    #[test]
    fn test_trace_and_dot_show_materialised_adjoints() {
        let g = graph(1.0, 1.0, 20.0, 5.0, 1.0);
        assert!(g.trace().contains("copper_price[20.000] (adj ?)"));

        g.price_sensitivity(Metal::Copper);
        let trace = g.trace();
        assert!(trace.starts_with("AUDIT TRACE for node 'price':"));
        assert!(trace.contains("[L1] price[20.000] (adj 1.000) = material_cost[20.000] * labour_factor[1.000]"));
        assert!(trace.contains("copper_price[20.000] (adj 1.000) -> Input"));

        let dot = g.to_dot();
        assert!(dot.contains("blended_rate (+)"));
        assert!(dot.contains("price (*)"));
    }

    #[test]
    fn test_graph_shape() {
        let g = graph(1.0, 0.5, 1.0, 1.0, 1.0);
        // six leaves, two products, one sum, two scalings
        assert_eq!(g.node_count(), 11);
    }
}
