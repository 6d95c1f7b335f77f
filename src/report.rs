//! Human-readable reports on a circuit.
//!
//! Every report is returned as a `String`, one line per item, so that callers
//! decide where it goes.

use std::fmt::Write;

use crate::{
    Aig, AigEdge, AigNode, NodeId, NodeKind, Result,
    dfs::{Direction, Order, Step, Visitor},
};

fn join_ids(ids: &[NodeId]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Prints a cone in preorder, one node per line, indented by depth.
struct ConePrinter {
    level: usize,
    out: String,
}

impl Visitor for ConePrinter {
    fn order(&self) -> Order {
        Order::Preorder
    }

    fn should_descend(&mut self, _node: &AigNode, depth: usize) -> bool {
        depth < self.level
    }

    fn visit(&mut self, step: Step<'_>) {
        self.out.push_str(&"  ".repeat(step.depth));
        if step.complement {
            self.out.push('!');
        }
        self.out.push_str(step.node.get_type_str());
        self.out.push(' ');
        self.out.push_str(&step.node.get_id().to_string());
        if step.revisit {
            self.out.push_str(" (*)");
        }
        self.out.push('\n');
    }
}

impl Aig {
    /// Fanin as printed in the netlist: `*` if undefined, `!` if inverted.
    fn netlist_fanin(&self, fanin: &AigEdge) -> Result<String> {
        let undefined = if self.node(fanin.node)?.is_undefined() {
            "*"
        } else {
            ""
        };
        let complement = if fanin.complement { "!" } else { "" };
        Ok(format!("{}{}{}", undefined, complement, fanin.node))
    }

    /// Circuit statistics table.
    pub fn summary(&self) -> String {
        let n_inputs = self.inputs.len();
        let n_outputs = self.outputs.len();
        let n_ands = self.get_ands().len();
        format!(
            "Circuit Statistics\n\
             ==================\n\
             \x20 PI{:>12}\n\
             \x20 PO{:>12}\n\
             \x20 AIG{:>11}\n\
             ------------------\n\
             \x20 Total{:>9}\n",
            n_inputs,
            n_outputs,
            n_ands,
            n_inputs + n_outputs + n_ands
        )
    }

    /// Nodes reachable from the outputs, producers first, one `[k]` line each.
    pub fn report_netlist(&mut self) -> Result<String> {
        let mut out = String::new();
        for (k, id) in self.dfs_list()?.into_iter().enumerate() {
            let node = self.node(id)?;
            write!(out, "[{}] ", k)?;
            match node.get_kind() {
                NodeKind::False => write!(out, "CONST 0")?,
                NodeKind::Input { .. } => write!(out, "PI {}", id)?,
                NodeKind::Output { fanin } => {
                    write!(out, "PO {} {}", id, self.netlist_fanin(fanin)?)?
                }
                NodeKind::And { fanin0, fanin1 } => write!(
                    out,
                    "AIG {} {} {}",
                    id,
                    self.netlist_fanin(fanin0)?,
                    self.netlist_fanin(fanin1)?
                )?,
                NodeKind::Undefined => write!(out, "UNDEF {}", id)?,
            }
            if let Some(name) = node.get_name() {
                write!(out, " ({})", name)?;
            }
            writeln!(out)?;
        }
        Ok(out)
    }

    pub fn report_inputs(&self) -> String {
        format!("PIs of the circuit: {}\n", join_ids(&self.inputs))
    }

    pub fn report_outputs(&self) -> String {
        format!("POs of the circuit: {}\n", join_ids(&self.outputs))
    }

    /// Gates and outputs with at least one undefined fanin, ascending.
    pub fn floating_gates(&self) -> Result<Vec<NodeId>> {
        let mut floating = Vec::new();
        for node in self.iter_nodes() {
            for fanin in node.get_fanins() {
                if self.node(fanin.node)?.is_undefined() {
                    floating.push(node.get_id());
                    break;
                }
            }
        }
        Ok(floating)
    }

    /// Inputs and gates that nothing consumes, ascending.
    pub fn unused_gates(&self) -> Vec<NodeId> {
        self.iter_nodes()
            .filter(|n| (n.is_input() || n.is_and()) && n.get_fanouts().is_empty())
            .map(|n| n.get_id())
            .collect()
    }

    pub fn report_floating(&self) -> Result<String> {
        let mut out = String::new();
        let floating = self.floating_gates()?;
        if !floating.is_empty() {
            writeln!(out, "Gates with floating fanin(s): {}", join_ids(&floating))?;
        }
        let unused = self.unused_gates();
        if !unused.is_empty() {
            writeln!(out, "Gates defined but not used  : {}", join_ids(&unused))?;
        }
        Ok(out)
    }

    /// Kind, name and line of `id`, its FEC peers for and gates, then its simulation value.
    ///
    /// Complemented peers are prefixed with `!`.
    pub fn report_gate(&self, id: NodeId) -> Result<String> {
        let node = self.node(id)?;
        let mut out = String::new();
        write!(out, "{}({})", node.get_type_str(), id)?;
        if let Some(name) = node.get_name() {
            write!(out, "\"{}\"", name)?;
        }
        writeln!(out, ", line {}", node.get_line())?;

        if node.is_and() {
            write!(out, "FECs:")?;
            if let Some((same, complement)) = self.get_fec_peers(id) {
                for peer in same {
                    write!(out, " {}", peer)?;
                }
                for peer in complement {
                    write!(out, " !{}", peer)?;
                }
            }
            writeln!(out)?;
        }
        writeln!(out, "Value: {}", node.get_signature_str())?;
        Ok(out)
    }

    fn report_cone(&mut self, id: NodeId, level: usize, direction: Direction) -> Result<String> {
        self.node(id)?;
        let mut printer = ConePrinter {
            level,
            out: String::new(),
        };
        self.traverse(&[(id, false)], direction, &mut printer)?;
        Ok(printer.out)
    }

    /// Fanin cone of `id`, down to `level` edges away.
    ///
    /// Nodes already printed are printed again with `(*)` and not expanded.
    pub fn report_fanin(&mut self, id: NodeId, level: usize) -> Result<String> {
        self.report_cone(id, level, Direction::Fanin)
    }

    /// Fanout cone of `id`, up to `level` edges away. `!` marks an inverted use.
    pub fn report_fanout(&mut self, id: NodeId, level: usize) -> Result<String> {
        self.report_cone(id, level, Direction::Fanout)
    }

    /// One `[k]` line per FEC candidate group.
    pub fn report_fec_pairs(&self) -> Result<String> {
        let mut out = String::new();
        for (k, group) in self.fec.candidates().enumerate() {
            writeln!(out, "[{}] {}", k, join_ids(group))?;
        }
        Ok(out)
    }
}
