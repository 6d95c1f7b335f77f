use std::collections::HashSet;

use crate::{Aig, AigEdge, AigError, AigNode, NodeId, NodeKind, Result};

impl Aig {
    /// Checking if the AIG structure is correct.
    /// The library is supposed to maintain integrity of the AIG at any moment,
    /// this is run after loading and is handy in tests.
    ///
    /// Checks that:
    /// - every node is stored under its own id, and only `False` has id 0
    /// - the input and output lists refer to inputs and outputs of the AIG
    /// - every edge points at a node of the AIG, never at an output
    /// - fanins and fanouts mirror each other
    /// - the AIG is acyclic.
    pub fn check_integrity(&self) -> Result<()> {
        for (&id, node) in &self.nodes {
            if node.get_id() != id {
                return Err(AigError::InvalidState(format!(
                    "incoherent node id: {} in map vs {} in node",
                    id,
                    node.get_id()
                )));
            }
            self.check_node_integrity(node)?;
        }

        for &id in &self.inputs {
            if !self.get_node(id).is_some_and(AigNode::is_input) {
                return Err(AigError::InvalidState(format!(
                    "input list refers to {} which is not an input of the AIG",
                    id
                )));
            }
        }
        for &id in &self.outputs {
            if !self.get_node(id).is_some_and(AigNode::is_output) {
                return Err(AigError::InvalidState(format!(
                    "output list refers to {} which is not an output of the AIG",
                    id
                )));
            }
        }

        self.check_acyclic()
    }

    /// Check the integrity for an individual node, that is:
    /// - check that only `False` have id 0
    /// - check that its fanins refer to a node of the AIG which lists it as a fanout
    /// - check that its fanouts refer to a node of the AIG which uses it as a fanin.
    fn check_node_integrity(&self, node: &AigNode) -> Result<()> {
        let id = node.get_id();
        match node.get_kind() {
            NodeKind::False => {
                if id != 0 {
                    return Err(AigError::InvalidState("invalid false node".to_string()));
                }
            }
            _ => {
                if id == 0 {
                    return Err(AigError::IdZeroButNotFalse);
                }
            }
        }

        for fanin in node.get_fanins() {
            self.check_edge_integrity(id, &fanin)?;
        }

        if node.is_output() && !node.get_fanouts().is_empty() {
            return Err(AigError::InvalidState(format!(
                "output {} is used as a fanin by {:?}",
                id,
                node.get_fanouts()
            )));
        }

        for &fanout_id in node.get_fanouts() {
            let fanout = self.get_node(fanout_id).ok_or(AigError::InvalidState(format!(
                "fanout {} of node {} is no longer in the AIG",
                fanout_id, id
            )))?;
            if !fanout.has_fanin(id) {
                return Err(AigError::InvalidState(format!(
                    "node {} lists {} as a fanout, but {} does not use it",
                    id, fanout_id, fanout_id
                )));
            }
        }
        Ok(())
    }

    fn check_edge_integrity(&self, consumer: NodeId, fanin: &AigEdge) -> Result<()> {
        let target = self.get_node(fanin.node).ok_or(AigError::InvalidState(format!(
            "edge of node {} pointing at node {} which is not in the AIG anymore",
            consumer, fanin.node
        )))?;
        if target.is_output() {
            return Err(AigError::OutputAsFanin(fanin.node));
        }
        if !target.get_fanouts().contains(&consumer) {
            return Err(AigError::InvalidState(format!(
                "node {} uses {} as a fanin, but is not one of its fanouts",
                consumer, fanin.node
            )));
        }
        Ok(())
    }

    /// Iterative DFS over every node (reachable or not) following fanins.
    /// A node met again while still on the current path closes a cycle.
    fn check_acyclic(&self) -> Result<()> {
        let mut seen = HashSet::new();
        let mut done = HashSet::new();

        for &root in self.nodes.keys() {
            if done.contains(&root) {
                continue;
            }
            // (node, fanins already pushed)
            let mut stack = vec![(root, false)];
            while let Some((id, expanded)) = stack.pop() {
                if expanded {
                    seen.remove(&id);
                    done.insert(id);
                    continue;
                }
                if done.contains(&id) {
                    continue;
                }
                if !seen.insert(id) {
                    return Err(AigError::InvalidState(format!(
                        "the AIG is cyclic (node {} reached from itself)",
                        id
                    )));
                }
                stack.push((id, true));
                if let Some(node) = self.get_node(id) {
                    for fanin in node.get_fanins() {
                        if !done.contains(&fanin.node) {
                            stack.push((fanin.node, false));
                        }
                    }
                }
            }
        }
        Ok(())
    }
}
