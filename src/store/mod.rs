//! Node arena for the scalar expression graph.
pub mod registry;
pub mod types;

pub use registry::Registry;
pub use types::{Edge, NodeId, NodeKind, NodeMetadata, Operation};
