//! Pull-based reverse-mode sweep.
use crate::compute::ledger::AdjointLedger;
use crate::store::{NodeId, Registry};

pub struct Engine<'a> {
    registry: &'a Registry,
    ledger: &'a AdjointLedger,
}

impl<'a> Engine<'a> {
    pub fn new(registry: &'a Registry, ledger: &'a AdjointLedger) -> Self {
        Self { registry, ledger }
    }

    /// Returns d(root)/d(node).
    ///
    /// Instead of sweeping the tape in reverse topological order, a node asks
    /// each of its consumers for their adjoint and sums the contributions
    /// weighted by the local derivatives it recorded. Every result is cached,
    /// so each node is materialised at most once per ledger. Recursion ends
    /// because consumers always have strictly larger ids than producers and
    /// the seeded root terminates every path.
    pub fn adjoint(&self, node_id: NodeId) -> f64 {
        if let Some(cached) = self.ledger.get(node_id) {
            return cached;
        }

        let mut sum = 0.0;
        for edge in self.registry.edges(node_id) {
            debug_assert!(edge.consumer > node_id, "Cycle detected at node {:?}", node_id);
            sum += edge.weight * self.adjoint(edge.consumer);
        }

        tracing::trace!(node = %self.registry.name(node_id), adjoint = sum, "adjoint materialised");
        self.ledger.memoize(node_id, sum)
    }

    #[inline(always)]
    pub fn value(&self, node_id: NodeId) -> f64 {
        self.registry.value(node_id)
    }
}
