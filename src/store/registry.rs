use super::types::*;
use smallvec::SmallVec;
use std::collections::HashSet;

/// Append-only node arena for one expression graph.
///
/// Values are fixed when a node is pushed. Outgoing edges are appended to an
/// operand at the moment a consumer is built from it, so every edge points
/// from a lower id to a strictly higher one and the arena is acyclic by
/// construction.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    // Columnar Arrays
    pub kinds: Vec<NodeKind>,
    pub values: Vec<f64>,
    pub meta: Vec<NodeMetadata>,

    // Operands (CSR-ish), used for auditing and ordering checks
    pub parents_flat: Vec<NodeId>,
    pub parents_ranges: Vec<(u32, u32)>, // (start, count)

    // Forward edges carrying the local derivatives
    pub edges: Vec<SmallVec<[Edge; 2]>>,

    used_names: HashSet<String>,
}

impl Registry {
    pub fn new() -> Self { Self::default() }
    pub fn count(&self) -> usize { self.kinds.len() }

    fn push_node(&mut self, kind: NodeKind, value: f64, parents: &[NodeId], mut meta: NodeMetadata) -> NodeId {
        let id = NodeId(self.kinds.len() as u32);

        // --- Unique Name Enforcement ---
        let original_name = meta.name.clone();
        let mut candidate_name = original_name.clone();
        let mut counter = 1;

        while self.used_names.contains(&candidate_name) {
            candidate_name = format!("{}_{}", original_name, counter);
            counter += 1;
        }
        self.used_names.insert(candidate_name.clone());
        meta.name = candidate_name;

        let start = self.parents_flat.len() as u32;
        self.parents_flat.extend_from_slice(parents);
        self.parents_ranges.push((start, parents.len() as u32));

        self.kinds.push(kind);
        self.values.push(value);
        self.meta.push(meta);
        self.edges.push(SmallVec::new());

        id
    }

    fn record_edge(&mut self, producer: NodeId, weight: f64, consumer: NodeId) {
        debug_assert!(
            consumer > producer,
            "edge {:?} -> {:?} would break construction order",
            producer,
            consumer
        );
        self.edges[producer.index()].push(Edge { weight, consumer });
    }

    pub fn add_leaf(&mut self, value: f64, meta: NodeMetadata) -> NodeId {
        self.push_node(NodeKind::Leaf, value, &[], meta)
    }

    /// `z = a * b`. Product rule: dz/da = b, dz/db = a.
    pub fn multiply(&mut self, a: NodeId, b: NodeId, meta: NodeMetadata) -> NodeId {
        let (va, vb) = (self.value(a), self.value(b));
        let z = self.push_node(NodeKind::Formula(Operation::Multiply), va * vb, &[a, b], meta);
        self.record_edge(a, vb, z);
        self.record_edge(b, va, z);
        z
    }

    /// `z = a + b`. Both operands get unit weight.
    pub fn add(&mut self, a: NodeId, b: NodeId, meta: NodeMetadata) -> NodeId {
        let (va, vb) = (self.value(a), self.value(b));
        let z = self.push_node(NodeKind::Formula(Operation::Add), va + vb, &[a, b], meta);
        self.record_edge(a, 1.0, z);
        self.record_edge(b, 1.0, z);
        z
    }

    #[inline(always)]
    pub fn value(&self, id: NodeId) -> f64 { self.values[id.index()] }

    #[inline(always)]
    pub fn edges(&self, id: NodeId) -> &[Edge] { &self.edges[id.index()] }

    #[inline(always)]
    pub fn get_parents(&self, id: NodeId) -> &[NodeId] {
        let (start, count) = self.parents_ranges[id.index()];
        &self.parents_flat[start as usize..(start + count) as usize]
    }

    pub fn name(&self, id: NodeId) -> &str { &self.meta[id.index()].name }
}
