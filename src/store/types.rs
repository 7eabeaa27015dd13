/// Position of a node inside its `Registry`. Ids are handed out in
/// construction order, so a consumer always has a larger id than its operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline(always)]
    pub fn index(&self) -> usize { self.0 as usize }
    pub fn new(idx: usize) -> Self { Self(idx as u32) }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeMetadata {
    pub name: String,
}

impl NodeMetadata {
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Multiply,
}

impl Operation {
    pub fn symbol(&self) -> &'static str {
        match self {
            Operation::Add => "+",
            Operation::Multiply => "*",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeKind {
    Leaf,
    Formula(Operation),
}

/// "`producer` contributed to `consumer` with local derivative `weight`".
/// Stored on the producer side; the reverse sweep pulls through it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub weight: f64,
    pub consumer: NodeId,
}
