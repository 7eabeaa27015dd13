use crate::compute::AdjointLedger;
use crate::store::{NodeId, NodeKind, Operation, Registry};
use std::collections::HashMap;
use std::fmt::Write;

pub fn format_trace(registry: &Registry, ledger: &AdjointLedger, target: NodeId) -> String {
    let mut tracer = Tracer {
        registry,
        ledger,
        visited_at_level: HashMap::new(),
        output: String::new(),
    };

    if target.index() < registry.count() {
        let _ = writeln!(tracer.output, "AUDIT TRACE for node '{}':", registry.name(target));
        let _ = writeln!(tracer.output, "--------------------------------------------------");
        tracer.trace_node(target, 1, "");
    } else {
        let _ = writeln!(tracer.output, "Error: Invalid Node ID {:?}", target);
    }
    tracer.output
}

struct Tracer<'a> {
    registry: &'a Registry,
    ledger: &'a AdjointLedger,
    visited_at_level: HashMap<NodeId, usize>,
    output: String,
}

impl<'a> Tracer<'a> {
    fn trace_node(&mut self, node_id: NodeId, level: usize, prefix: &str) {
        if let Some(&first_seen) = self.visited_at_level.get(&node_id) {
            let _ = writeln!(self.output, "{}-> (Ref to L{})", prefix, first_seen);
            return;
        }
        self.visited_at_level.insert(node_id, level);

        let line_header = format!(
            "[L{}] {}{}{}",
            level,
            self.registry.name(node_id),
            self.format_value(node_id),
            self.format_adjoint(node_id)
        );

        match self.registry.kinds[node_id.index()] {
            NodeKind::Leaf => {
                let _ = writeln!(self.output, "{}{} -> Input", prefix, line_header);
            }
            NodeKind::Formula(op) => {
                let parents = self.registry.get_parents(node_id);
                let formula_str = self.format_formula(op, parents);
                let _ = writeln!(self.output, "{}{} = {}", prefix, line_header, formula_str);
                self.recurse_children(prefix, parents, level);
            }
        }
    }

    fn recurse_children(&mut self, prefix: &str, children: &[NodeId], level: usize) {
        let stem = self.build_child_stem(prefix);
        for (i, &child) in children.iter().enumerate() {
            let connector = if i == children.len() - 1 { "`--" } else { "|--" };
            let full_prefix = format!("{}{}", stem, connector);
            self.trace_node(child, level + 1, &full_prefix);
        }
    }

    fn format_formula(&self, op: Operation, parents: &[NodeId]) -> String {
        if parents.len() == 2 {
            let lhs = self.format_parent_ref(parents[0]);
            let rhs = self.format_parent_ref(parents[1]);
            format!("{} {} {}", lhs, op.symbol(), rhs)
        } else {
            op.symbol().to_string()
        }
    }

    fn format_parent_ref(&self, id: NodeId) -> String {
        format!("{}{}", self.registry.name(id), self.format_value(id))
    }

    fn format_value(&self, id: NodeId) -> String {
        format!("[{:.3}]", self.registry.value(id))
    }

    fn format_adjoint(&self, id: NodeId) -> String {
        match self.ledger.get(id) {
            Some(adj) => format!(" (adj {:.3})", adj),
            None => " (adj ?)".to_string(),
        }
    }

    fn build_child_stem(&self, current_prefix: &str) -> String {
        current_prefix.replace("`--", "   ").replace("|--", "|  ")
    }
}
