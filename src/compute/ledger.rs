//! ledger.rs
//! Memoized adjoint storage, one slot per registry node.

use crate::store::NodeId;
use std::cell::Cell;

/// Adjoint cache for a single seeded root.
///
/// A slot moves from `None` to `Some` exactly once and is never cleared.
/// Interior mutability lets read-only queries materialise adjoints lazily;
/// it also makes the ledger `!Sync`, so one graph is never queried from two
/// threads at once.
#[derive(Debug, Clone, Default)]
pub struct AdjointLedger {
    slots: Vec<Cell<Option<f64>>>,
}

impl AdjointLedger {
    pub fn new() -> Self { Self::default() }

    pub fn with_capacity(size: usize) -> Self {
        let mut ledger = Self::new();
        ledger.ensure_capacity(size);
        ledger
    }

    pub fn ensure_capacity(&mut self, size: usize) {
        if self.slots.len() < size {
            self.slots.resize(size, Cell::new(None));
        }
    }

    #[inline(always)]
    pub fn get(&self, node_id: NodeId) -> Option<f64> {
        self.slots.get(node_id.index()).and_then(Cell::get)
    }

    /// Force-sets an adjoint. Used once, on the root.
    pub fn seed(&mut self, node_id: NodeId, adjoint: f64) {
        self.ensure_capacity(node_id.index() + 1);
        self.slots[node_id.index()].set(Some(adjoint));
    }

    /// Caches a derived adjoint. An already cached slot keeps its value.
    #[inline(always)]
    pub(crate) fn memoize(&self, node_id: NodeId, adjoint: f64) -> f64 {
        match self.slots.get(node_id.index()) {
            Some(slot) => match slot.get() {
                Some(existing) => existing,
                None => {
                    slot.set(Some(adjoint));
                    adjoint
                }
            },
            None => adjoint,
        }
    }

    pub fn cached_count(&self) -> usize {
        self.slots.iter().filter(|s| s.get().is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_and_memoize_are_write_once() {
        let mut ledger = AdjointLedger::with_capacity(3);
        assert_eq!(ledger.get(NodeId(2)), None);

        ledger.seed(NodeId(2), 1.0);
        assert_eq!(ledger.get(NodeId(2)), Some(1.0));

        assert_eq!(ledger.memoize(NodeId(0), 4.5), 4.5);
        assert_eq!(ledger.memoize(NodeId(0), 9.0), 4.5);
        assert_eq!(ledger.get(NodeId(0)), Some(4.5));
        assert_eq!(ledger.cached_count(), 2);
    }

    #[test]
    fn test_seed_grows_ledger() {
        let mut ledger = AdjointLedger::new();
        ledger.seed(NodeId(5), 1.0);
        assert_eq!(ledger.get(NodeId(5)), Some(1.0));
        assert_eq!(ledger.get(NodeId(4)), None);
    }
}
