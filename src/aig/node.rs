use std::collections::BTreeSet;

use bitvec::vec::BitVec;

use super::{AigEdge, AigError, FaninId, Result};

/// A node id.
///
/// The constant node [`NodeKind::False`] has id 0 by convention. Ids are unique within an [`Aig`].
///
/// [`Aig`]: crate::Aig
pub type NodeId = u64;

/// The kind of a node, together with its kind-specific fanins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// The constant low/false signal.
    False,
    /// A primary input. When `complement` is set, the value read from the
    /// input is the negation of the applied pattern bit.
    Input { complement: bool },
    /// A primary output, driven by exactly one fanin.
    Output { fanin: AigEdge },
    /// An AND gate with two fanins.
    And { fanin0: AigEdge, fanin1: AigEdge },
    /// Placeholder for an id that is referenced but never declared.
    Undefined,
}

/// An AIG node.
///
/// Each node has an id. By convention, id for constant node `False` is 0. The id must be unique.
///
/// Internal note: nodes carry their fanouts with them. Only the owning [`Aig`] may update
/// them, and it does so for both ends of an edge at once.
///
/// [`Aig`]: crate::Aig
#[derive(Debug, Clone)]
pub struct AigNode {
    id: NodeId,
    kind: NodeKind,
    line: usize,
    name: Option<String>,
    fanouts: BTreeSet<NodeId>,
    pub(crate) mark: bool,
    pub(crate) value: bool,
    pub(crate) signature: BitVec,
}

impl PartialEq for AigNode {
    /// Two nodes are equal iff they have the same id and the same kind (fanins included).
    /// Scratch state (marks, simulation values), names and fanouts are ignored.
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.kind == other.kind
    }
}

impl Eq for AigNode {}

impl AigNode {
    fn with_kind(id: NodeId, kind: NodeKind, line: usize) -> Self {
        AigNode {
            id,
            kind,
            line,
            name: None,
            fanouts: BTreeSet::new(),
            mark: false,
            value: false,
            signature: BitVec::new(),
        }
    }

    /// Returns the constant node.
    pub fn constant() -> Self {
        AigNode::with_kind(0, NodeKind::False, 0)
    }

    /// Returns a new input.
    pub fn input(id: NodeId, complement: bool, line: usize) -> Self {
        AigNode::with_kind(id, NodeKind::Input { complement }, line)
    }

    /// Returns a new and gate (initialize empty fanouts).
    pub fn and(id: NodeId, fanin0: AigEdge, fanin1: AigEdge, line: usize) -> Self {
        if id == 0 {
            panic!(
                "Hey, you are trying to create an AND gate with id=0. \
                Id=0 is reserved for the constant node NodeKind::False."
            )
        }
        AigNode::with_kind(id, NodeKind::And { fanin0, fanin1 }, line)
    }

    /// Returns a new output.
    pub fn output(id: NodeId, fanin: AigEdge, line: usize) -> Self {
        if id == 0 {
            panic!(
                "Hey, you are trying to create an output with id=0. \
                Id=0 is reserved for the constant node NodeKind::False."
            )
        }
        AigNode::with_kind(id, NodeKind::Output { fanin }, line)
    }

    /// Returns a placeholder for an undeclared id.
    pub fn undefined(id: NodeId, line: usize) -> Self {
        AigNode::with_kind(id, NodeKind::Undefined, line)
    }

    pub fn is_false(&self) -> bool {
        matches!(self.kind, NodeKind::False)
    }

    pub fn is_input(&self) -> bool {
        matches!(self.kind, NodeKind::Input { .. })
    }

    pub fn is_output(&self) -> bool {
        matches!(self.kind, NodeKind::Output { .. })
    }

    pub fn is_and(&self) -> bool {
        matches!(self.kind, NodeKind::And { .. })
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self.kind, NodeKind::Undefined)
    }

    pub fn get_id(&self) -> NodeId {
        self.id
    }

    pub fn get_kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Source line of the declaration (or of the first reference for undefined nodes).
    pub fn get_line(&self) -> usize {
        self.line
    }

    pub fn get_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = Some(name);
    }

    /// Short type tag used in reports.
    pub fn get_type_str(&self) -> &'static str {
        match self.kind {
            NodeKind::False => "CONST",
            NodeKind::Input { .. } => "PI",
            NodeKind::Output { .. } => "PO",
            NodeKind::And { .. } => "AIG",
            NodeKind::Undefined => "UNDEF",
        }
    }

    /// Ids of the nodes using this node as a fanin (one entry per consumer).
    pub fn get_fanouts(&self) -> &BTreeSet<NodeId> {
        &self.fanouts
    }

    /// Last simulated value.
    pub fn get_value(&self) -> bool {
        self.value
    }

    /// One bit per pattern simulated since the last reset.
    pub fn get_signature(&self) -> &BitVec {
        &self.signature
    }

    /// The signature rendered as a `0`/`1` string, first pattern first.
    pub fn get_signature_str(&self) -> String {
        self.signature
            .iter()
            .map(|bit| if *bit { '1' } else { '0' })
            .collect()
    }

    pub fn get_fanins(&self) -> Vec<AigEdge> {
        match &self.kind {
            NodeKind::Output { fanin } => vec![*fanin],
            NodeKind::And { fanin0, fanin1 } => vec![*fanin0, *fanin1],
            _ => vec![],
        }
    }

    pub fn get_fanin(&self, fanin_id: FaninId) -> Result<AigEdge> {
        match (&self.kind, fanin_id) {
            (NodeKind::Output { fanin }, FaninId::Fanin0) => Ok(*fanin),
            (NodeKind::And { fanin0, .. }, FaninId::Fanin0) => Ok(*fanin0),
            (NodeKind::And { fanin1, .. }, FaninId::Fanin1) => Ok(*fanin1),
            _ => Err(AigError::NoFanin),
        }
    }

    /// Returns true if one of the fanins points at `id`.
    pub fn has_fanin(&self, id: NodeId) -> bool {
        self.get_fanins().iter().any(|fanin| fanin.node == id)
    }

    pub(super) fn add_fanout(&mut self, fanout_id: NodeId) {
        self.fanouts.insert(fanout_id);
    }

    pub(super) fn remove_fanout(&mut self, fanout_id: NodeId) -> Result<()> {
        if self.fanouts.remove(&fanout_id) {
            Ok(())
        } else {
            Err(AigError::InvalidState(format!(
                "failed to remove fanout {} (not found) from node {}",
                fanout_id, self.id
            )))
        }
    }

    pub(super) fn fanouts_remove_if_present(&mut self, fanout_id: NodeId) {
        self.fanouts.remove(&fanout_id);
    }

    /// Points every fanin currently referring to `victim` at `target` instead.
    /// The inversion of `target` is composed with the inversion already carried by the fanin.
    ///
    /// Fanouts are left untouched, this is the job of `Aig::relink`.
    pub(super) fn retarget_fanin(&mut self, victim: NodeId, target: AigEdge) -> Result<()> {
        let retarget = |fanin: &mut AigEdge| {
            if fanin.node == victim {
                *fanin = target.xor(fanin.complement);
                true
            } else {
                false
            }
        };
        let found = match &mut self.kind {
            NodeKind::Output { fanin } => retarget(fanin),
            NodeKind::And { fanin0, fanin1 } => {
                // Both fanins may point at the victim.
                let found0 = retarget(fanin0);
                let found1 = retarget(fanin1);
                found0 || found1
            }
            _ => false,
        };
        if found {
            Ok(())
        } else {
            Err(AigError::InvalidState(format!(
                "node {} does not have fanin {}",
                self.id, victim
            )))
        }
    }
}
