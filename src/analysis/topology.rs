use crate::compute::AdjointLedger;
use crate::store::{NodeId, NodeKind, Registry};
use petgraph::dot::Dot;
use petgraph::graph::{DiGraph, NodeIndex};

/// Performs a Topological Sort using Depth-First Search (DFS).
///
/// Returns a list of NodeIds where every operand appears before its consumer.
/// The arena is acyclic by construction; this is the independent check used
/// in debug builds and by the tests that corrupt a registry on purpose.
pub fn sort(registry: &Registry) -> Result<Vec<NodeId>, String> {
    let count = registry.count();
    let mut order = Vec::with_capacity(count);
    let mut state = vec![VisitState::None; count];

    for i in 0..count {
        if state[i] == VisitState::None {
            visit(NodeId::new(i), registry, &mut state, &mut order)?;
        }
    }

    Ok(order)
}

#[derive(Clone, PartialEq, Eq)]
enum VisitState {
    None,
    Visiting, // Used for cycle detection
    Visited,
}

fn visit(
    node: NodeId,
    registry: &Registry,
    state: &mut Vec<VisitState>,
    order: &mut Vec<NodeId>,
) -> Result<(), String> {
    let idx = node.index();

    match state[idx] {
        VisitState::Visited => return Ok(()),
        VisitState::Visiting => return Err(format!("Cycle detected involving node {}", idx)),
        VisitState::None => state[idx] = VisitState::Visiting,
    }

    for &parent in registry.get_parents(node) {
        visit(parent, registry, state, order)?;
    }

    state[idx] = VisitState::Visited;
    order.push(node);
    Ok(())
}

/// Renders the expression graph in Graphviz format. Edges run from operand to
/// consumer and are labelled with their local derivative.
pub fn to_dot(registry: &Registry, ledger: &AdjointLedger) -> String {
    let mut graph: DiGraph<String, String> = DiGraph::with_capacity(registry.count(), registry.count());

    for i in 0..registry.count() {
        let id = NodeId::new(i);
        let op = match registry.kinds[i] {
            NodeKind::Leaf => String::new(),
            NodeKind::Formula(op) => format!(" ({})", op.symbol()),
        };
        let adj = ledger.get(id).map_or("?".to_string(), |a| format!("{:.4}", a));
        graph.add_node(format!("{}{}\nvalue: {:.4}\nadj: {}", registry.name(id), op, registry.value(id), adj));
    }

    for i in 0..registry.count() {
        for edge in registry.edges(NodeId::new(i)) {
            graph.add_edge(NodeIndex::new(i), NodeIndex::new(edge.consumer.index()), format!("{:.4}", edge.weight));
        }
    }

    format!("{}", Dot::new(&graph))
}
