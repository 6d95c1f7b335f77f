//! Module defining the [`Aig`] struct, as well as [`AigNode`], [`AigEdge`] and some others relevant structs.
//!
//! The passes working on an [`Aig`] are implemented in their own modules:
//! [`crate::strash`], [`crate::opt`], [`crate::sim`], [`crate::fec`] and [`crate::fraig`].

pub mod dfs;
pub mod edge;
pub mod error;
mod integrity;
pub mod node;
mod parser;
mod writer;

use std::collections::{BTreeMap, BTreeSet};

pub use edge::{AigEdge, FaninId};
pub use error::{AigError, ParserError, Result};
pub use node::{AigNode, NodeId, NodeKind};

use crate::fec::FecGroups;

/// A whole combinational AIG.
///
/// The AIG is an arena: it exclusively owns every node, and edges refer to nodes by id.
/// Every node also records the ids of its consumers (its fanouts). Both sides of an edge
/// are only ever updated together, by the AIG itself, so that fanins and fanouts always
/// mirror each other.
///
/// Ids are unique across the whole AIG:
/// - `0` is the constant node [`NodeKind::False`]
/// - inputs, and gates and undefined placeholders use the ids they were declared/referenced with
/// - outputs get fresh ids above every other id (`M + 1`, `M + 2`, ... when loaded from a file).
///
/// Merging nodes ([`Aig::merge`]) never deletes anything: the merged node simply loses all
/// its consumers. Unreachable nodes are removed by [`Aig::sweep`].
#[derive(Debug, Clone)]
pub struct Aig {
    pub(crate) nodes: BTreeMap<NodeId, AigNode>,
    /// Input ids, ascending.
    pub(crate) inputs: Vec<NodeId>,
    /// Output ids, in declaration order (which is also ascending).
    pub(crate) outputs: Vec<NodeId>,
    /// Largest id reserved for inputs and and gates.
    max_var: NodeId,
    pub(crate) fec: FecGroups,
}

impl Default for Aig {
    fn default() -> Self {
        Aig::new()
    }
}

impl Aig {
    /// Create a brand new AIG (constant node [`NodeKind::False`] included).
    pub fn new() -> Self {
        Aig {
            nodes: BTreeMap::from([(0, AigNode::constant())]),
            inputs: Vec::new(),
            outputs: Vec::new(),
            max_var: 0,
            fec: FecGroups::default(),
        }
    }

    /// Retrieves a node from its id.
    pub fn get_node(&self, id: NodeId) -> Option<&AigNode> {
        self.nodes.get(&id)
    }

    pub(crate) fn node(&self, id: NodeId) -> Result<&AigNode> {
        self.nodes.get(&id).ok_or(AigError::NodeDoesNotExist(id))
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Result<&mut AigNode> {
        self.nodes.get_mut(&id).ok_or(AigError::NodeDoesNotExist(id))
    }

    pub(crate) fn iter_nodes(&self) -> impl Iterator<Item = &AigNode> {
        self.nodes.values()
    }

    /// Retrieves inputs id, ascending.
    pub fn get_inputs(&self) -> &[NodeId] {
        &self.inputs
    }

    /// Retrieves outputs id, ascending.
    pub fn get_outputs(&self) -> &[NodeId] {
        &self.outputs
    }

    /// Retrieves and gates id, ascending.
    pub fn get_ands(&self) -> Vec<NodeId> {
        self.iter_nodes()
            .filter(|n| n.is_and())
            .map(|n| n.get_id())
            .collect()
    }

    /// Retrieves undefined placeholders id, ascending.
    pub fn get_undefined(&self) -> Vec<NodeId> {
        self.iter_nodes()
            .filter(|n| n.is_undefined())
            .map(|n| n.get_id())
            .collect()
    }

    /// Largest id reserved for inputs and and gates (`M` in the header).
    pub fn get_max_var(&self) -> NodeId {
        self.max_var
    }

    /// Retrieves the fanin of an output.
    pub fn get_output_fanin(&self, id: NodeId) -> Result<AigEdge> {
        match self.node(id)?.get_kind() {
            NodeKind::Output { fanin } => Ok(*fanin),
            _ => Err(AigError::NoFanin),
        }
    }

    fn check_fresh_id(&self, id: NodeId) -> Result<()> {
        if id == 0 {
            return Err(AigError::IdZeroButNotFalse);
        }
        if self.nodes.contains_key(&id) {
            return Err(AigError::DuplicateId(id));
        }
        Ok(())
    }

    fn next_output_id(&self) -> Result<NodeId> {
        let last = self.nodes.keys().next_back().copied().unwrap_or(0).max(self.max_var);
        last.checked_add(1).ok_or(AigError::IdOverflow(last))
    }

    /// A new fanin must point at an existing node which is not an output.
    fn check_fanin(&self, fanin: &AigEdge) -> Result<()> {
        if self.node(fanin.node)?.is_output() {
            return Err(AigError::OutputAsFanin(fanin.node));
        }
        Ok(())
    }

    /// Declares a node whose fanins all exist, and registers it as their fanout.
    fn attach(&mut self, node: AigNode) -> Result<NodeId> {
        let id = node.get_id();
        let fanins = node.get_fanins();
        self.declare(node)?;
        for fanin in fanins {
            self.node_mut(fanin.node)?.add_fanout(id);
        }
        Ok(id)
    }

    pub(crate) fn set_max_var(&mut self, max_var: NodeId) {
        self.max_var = self.max_var.max(max_var);
    }

    /// Create a new input.
    /// This will fail if a node with the same id already exists in the AIG,
    /// or if the id is 0 (reserved for constant node [`NodeKind::False`]).
    ///
    /// ```rust
    /// use fraigkit::{Aig, AigEdge};
    /// let mut aig = Aig::new();
    /// aig.add_input(1).unwrap();
    /// aig.add_input(2).unwrap();
    /// aig.add_and(3, AigEdge::new(1, false), AigEdge::new(2, true)).unwrap();
    /// let out = aig.add_output(AigEdge::new(3, false)).unwrap();
    /// assert_eq!(out, 4);
    ///
    /// // Some stuff we cannot do
    /// assert!(aig.add_input(0).is_err());
    /// assert!(aig.add_input(3).is_err());
    /// assert!(aig.add_and(5, AigEdge::new(1, false), AigEdge::new(9, false)).is_err());
    /// assert!(aig.add_and(5, AigEdge::new(out, false), AigEdge::new(1, false)).is_err());
    /// ```
    pub fn add_input(&mut self, id: NodeId) -> Result<NodeId> {
        self.attach(AigNode::input(id, false, 0))
    }

    /// Create a new and gate. Both fanins need to already exist in the AIG,
    /// and cannot be outputs.
    pub fn add_and(&mut self, id: NodeId, fanin0: AigEdge, fanin1: AigEdge) -> Result<NodeId> {
        self.check_fanin(&fanin0)?;
        self.check_fanin(&fanin1)?;
        self.check_fresh_id(id)?;
        self.attach(AigNode::and(id, fanin0, fanin1, 0))
    }

    /// Create a new output driven by `fanin`, which needs to already exist in the AIG
    /// and cannot be an output itself.
    /// Returns the id given to the output.
    pub fn add_output(&mut self, fanin: AigEdge) -> Result<NodeId> {
        self.check_fanin(&fanin)?;
        let id = self.next_output_id()?;
        self.attach(AigNode::output(id, fanin, 0))
    }

    /// Inserts a node without registering it as a fanout of its fanins.
    /// [`Aig::connect`] must be called before the AIG is used.
    pub(crate) fn declare(&mut self, node: AigNode) -> Result<()> {
        let id = node.get_id();
        self.check_fresh_id(id)?;
        match node.get_kind() {
            NodeKind::Input { .. } => {
                let pos = self.inputs.partition_point(|&i| i < id);
                self.inputs.insert(pos, id);
                self.set_max_var(id);
            }
            NodeKind::Output { .. } => self.outputs.push(id),
            NodeKind::And { .. } => self.set_max_var(id),
            NodeKind::False | NodeKind::Undefined => (),
        }
        self.nodes.insert(id, node);
        Ok(())
    }

    /// Resolves every fanin: references to undeclared ids get an [`NodeKind::Undefined`]
    /// placeholder, then every node is registered as a fanout of its fanins.
    pub(crate) fn connect(&mut self) -> Result<()> {
        let mut edges = Vec::new();
        for node in self.nodes.values() {
            for fanin in node.get_fanins() {
                edges.push((node.get_id(), node.get_line(), fanin.node));
            }
        }

        for (consumer, line, target) in edges {
            if !self.nodes.contains_key(&target) {
                log::debug!(
                    "connect: node {} refers to undeclared id {}, creating placeholder",
                    consumer,
                    target
                );
                self.nodes.insert(target, AigNode::undefined(target, line));
            }
            self.node_mut(target)?.add_fanout(consumer);
        }
        Ok(())
    }

    /// Redirects every consumer of `victim` to `replacement`.
    ///
    /// This is the only place where an existing edge is rewired: the consumer's fanin,
    /// the victim's fanouts and the replacement's fanouts are updated together.
    /// The inversion carried by `replacement` is composed with the inversion of each fanin.
    /// The victim is left without fanouts, ready to be swept.
    pub(crate) fn relink(&mut self, victim: NodeId, replacement: AigEdge) -> Result<()> {
        if victim == replacement.node {
            return Err(AigError::InvalidState(format!(
                "cannot relink node {} to itself",
                victim
            )));
        }
        self.check_fanin(&replacement)?;
        let consumers = self.node(victim)?.get_fanouts().clone();
        if consumers.contains(&replacement.node) {
            return Err(AigError::InvalidState(format!(
                "relinking {} to {} would create a cycle",
                victim, replacement.node
            )));
        }

        for consumer in consumers {
            self.node_mut(consumer)?
                .retarget_fanin(victim, replacement)?;
            self.node_mut(victim)?.remove_fanout(consumer)?;
            self.node_mut(replacement.node)?.add_fanout(consumer);
        }
        Ok(())
    }

    /// Replaces `victim` by `survivor` (complemented iff `complement`) in every consumer of `victim`.
    ///
    /// Use `complement` when the two nodes were proven to be the negation of each other.
    /// The victim is not deleted, it stays in the AIG without fanouts until the next [`Aig::sweep`].
    ///
    /// For more information on merging nodes, check the following paper:
    /// FRAIGs: A Unifying Representation for Logic Synthesis and Verification
    /// by Alan Mishchenko, Satrajit Chatterjee, Roland Jiang, Robert Brayton.
    pub fn merge(&mut self, victim: NodeId, survivor: NodeId, complement: bool) -> Result<()> {
        self.relink(victim, AigEdge::new(survivor, complement))
    }

    /// Removes a set of nodes from the AIG.
    ///
    /// Every consumer of a removed node must be removed as well, else the AIG would
    /// be left with a dangling fanin.
    pub(crate) fn remove_nodes(&mut self, ids: &BTreeSet<NodeId>) -> Result<()> {
        for &id in ids {
            let node = self.node(id)?;
            if node.is_false() || node.is_input() || node.is_output() {
                return Err(AigError::InvalidState(format!(
                    "refusing to remove {} node {}",
                    node.get_type_str(),
                    id
                )));
            }
            if let Some(consumer) = node.get_fanouts().iter().find(|c| !ids.contains(c)) {
                return Err(AigError::InvalidState(format!(
                    "cannot remove node {} still used by node {}",
                    id, consumer
                )));
            }
        }

        for &id in ids {
            if let Some(node) = self.nodes.remove(&id) {
                for fanin in node.get_fanins() {
                    if let Some(target) = self.nodes.get_mut(&fanin.node) {
                        // The fanin might have been removed already, or share the entry
                        // with the other fanin.
                        target.fanouts_remove_if_present(id);
                    }
                }
            }
        }
        Ok(())
    }

    /// Clears the mark of every node.
    ///
    /// Every traversal starts by calling this: marks left behind by a previous pass
    /// are never meaningful.
    pub fn reset_marks(&mut self) {
        for node in self.nodes.values_mut() {
            node.mark = false;
        }
    }
}

impl PartialEq for Aig {
    /// Compares the two AIGs. They are equal iff:
    /// - their inputs are equal
    /// - their outputs are equal
    /// - their nodes are equal (same ids, same kinds, same fanins).
    fn eq(&self, other: &Self) -> bool {
        self.inputs == other.inputs && self.outputs == other.outputs && self.nodes == other.nodes
    }
}

#[cfg(test)]
mod test {
    use super::*;

    /// in1 & in2 -> out, plus !in1 & in2 which is unused.
    fn small_aig() -> Aig {
        let mut aig = Aig::new();
        aig.add_input(1).unwrap();
        aig.add_input(2).unwrap();
        aig.add_and(3, AigEdge::new(1, false), AigEdge::new(2, false))
            .unwrap();
        aig.add_and(4, AigEdge::new(1, true), AigEdge::new(2, false))
            .unwrap();
        aig.add_output(AigEdge::new(3, false)).unwrap();
        aig
    }

    #[test]
    fn add_node_test() {
        let aig = small_aig();
        assert_eq!(aig.get_inputs(), &[1, 2]);
        assert_eq!(aig.get_outputs(), &[5]);
        assert_eq!(aig.get_ands(), vec![3, 4]);
        assert_eq!(aig.get_max_var(), 4);
        assert_eq!(aig.get_output_fanin(5).unwrap(), AigEdge::new(3, false));

        let i1 = aig.get_node(1).unwrap();
        assert_eq!(i1.get_fanouts(), &BTreeSet::from([3, 4]));
        let a3 = aig.get_node(3).unwrap();
        assert_eq!(a3.get_fanouts(), &BTreeSet::from([5]));
        assert!(aig.check_integrity().is_ok());
    }

    #[test]
    fn add_node_test_invalid() {
        let mut aig = small_aig();
        assert!(matches!(aig.add_input(0), Err(AigError::IdZeroButNotFalse)));
        assert!(matches!(aig.add_input(2), Err(AigError::DuplicateId(2))));
        assert!(matches!(
            aig.add_and(6, AigEdge::new(1, false), AigEdge::new(42, false)),
            Err(AigError::NodeDoesNotExist(42))
        ));
        assert!(aig.add_output(AigEdge::new(17, false)).is_err());
        // Output ids are not reusable for gates
        assert!(aig.add_and(5, AigEdge::new(1, false), AigEdge::new(2, false)).is_err());
    }

    #[test]
    fn outputs_cannot_be_fanins() {
        let mut aig = Aig::new();
        aig.add_input(1).unwrap();
        let out = aig.add_output(AigEdge::new(1, false)).unwrap();
        assert!(matches!(
            aig.add_and(3, AigEdge::new(out, false), AigEdge::new(1, false)),
            Err(AigError::OutputAsFanin(2))
        ));
        assert!(matches!(
            aig.add_output(AigEdge::new(out, true)),
            Err(AigError::OutputAsFanin(2))
        ));
        aig.add_and(3, AigEdge::new(1, false), AigEdge::new(0, true))
            .unwrap();
        aig.add_output(AigEdge::new(3, false)).unwrap();
        assert!(matches!(
            aig.merge(3, out, false),
            Err(AigError::OutputAsFanin(2))
        ));

        assert_eq!(aig.get_outputs(), &[2, 4]);
        assert!(aig.get_node(out).unwrap().get_fanouts().is_empty());
        assert!(aig.check_integrity().is_ok());
    }

    #[test]
    fn no_output_id_left() {
        let mut aig = Aig::new();
        aig.add_input(u64::MAX).unwrap();
        assert!(matches!(
            aig.add_output(AigEdge::new(u64::MAX, false)),
            Err(AigError::IdOverflow(u64::MAX))
        ));
        assert!(aig.get_outputs().is_empty());
        assert!(aig.get_node(u64::MAX).unwrap().get_fanouts().is_empty());
    }

    #[test]
    fn long_chain() {
        // 2 = 1 & !0, 3 = 2 & 1, 4 = 3 & 1, ...
        let mut aig = Aig::new();
        aig.add_input(1).unwrap();
        let mut last = 1;
        for id in 2..5000 {
            last = aig
                .add_and(id, AigEdge::new(last, false), AigEdge::new(1, id % 2 == 0))
                .unwrap();
        }
        let out = aig.add_output(AigEdge::new(last, false)).unwrap();
        assert_eq!(out, 5000);
        assert_eq!(aig.get_node(1).unwrap().get_fanouts().len(), 4998);
        assert_eq!(
            aig.get_node(last).unwrap().get_fanouts(),
            &BTreeSet::from([out])
        );
        assert!(aig.get_undefined().is_empty());
        assert!(aig.check_integrity().is_ok());
    }

    #[test]
    fn self_and_shares_fanout_entry() {
        let mut aig = Aig::new();
        aig.add_input(1).unwrap();
        aig.add_and(2, AigEdge::new(1, false), AigEdge::new(1, true))
            .unwrap();
        assert_eq!(aig.get_node(1).unwrap().get_fanouts().len(), 1);
        assert!(aig.check_integrity().is_ok());
    }

    #[test]
    fn merge_test() {
        let mut aig = small_aig();
        // Pretend 3 is the negation of 4 and merge
        aig.merge(3, 4, true).unwrap();
        assert_eq!(aig.get_output_fanin(5).unwrap(), AigEdge::new(4, true));
        assert!(aig.get_node(3).unwrap().get_fanouts().is_empty());
        assert_eq!(
            aig.get_node(4).unwrap().get_fanouts(),
            &BTreeSet::from([5])
        );
        // Nothing is deleted
        assert!(aig.get_node(3).is_some());
        assert!(aig.check_integrity().is_ok());
    }

    #[test]
    fn merge_refuses_cycles() {
        let mut aig = small_aig();
        aig.add_and(6, AigEdge::new(3, false), AigEdge::new(2, false))
            .unwrap();
        // 6 consumes 3, merging 3 into 6 would loop
        assert!(aig.merge(3, 6, false).is_err());
        assert!(aig.merge(3, 3, false).is_err());
        assert!(aig.merge(3, 42, false).is_err());
        assert!(aig.check_integrity().is_ok());
    }

    #[test]
    fn merge_both_fanins() {
        let mut aig = Aig::new();
        aig.add_input(1).unwrap();
        aig.add_input(2).unwrap();
        aig.add_and(3, AigEdge::new(1, false), AigEdge::new(2, false))
            .unwrap();
        aig.add_and(4, AigEdge::new(3, false), AigEdge::new(3, true))
            .unwrap();
        aig.add_output(AigEdge::new(4, false)).unwrap();
        aig.merge(3, 1, true).unwrap();
        assert_eq!(
            aig.get_node(4).unwrap().get_fanins(),
            vec![AigEdge::new(1, true), AigEdge::new(1, false)]
        );
        assert!(aig.check_integrity().is_ok());
    }

    #[test]
    fn remove_nodes_test() {
        let mut aig = small_aig();
        assert!(aig.remove_nodes(&BTreeSet::from([3])).is_err()); // still used by output
        assert!(aig.remove_nodes(&BTreeSet::from([1])).is_err()); // inputs stay
        aig.remove_nodes(&BTreeSet::from([4])).unwrap();
        assert!(aig.get_node(4).is_none());
        assert_eq!(aig.get_node(1).unwrap().get_fanouts(), &BTreeSet::from([3]));
        assert!(aig.check_integrity().is_ok());
    }

    #[test]
    fn aig_eq_test() {
        let a = small_aig();
        let mut b = small_aig();
        assert_eq!(a, b);
        b.add_input(7).unwrap();
        assert_ne!(a, b);
    }
}
