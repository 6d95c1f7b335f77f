//! An [`AigEdge`] points at an [`AigNode`] and can be complemented (indicates the presence of a NOT gate).
//!
//! [`AigNode`]: crate::AigNode

use std::ops::Not;

use crate::NodeId;

/// Unambiguous fanin selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaninId {
    Fanin0,
    Fanin1,
}

/// A directed edge representing a fanin for AIG nodes.
///
/// The edge only stores the id of the node it points at, the node itself lives in the
/// owning [`Aig`]. The edge can carry an inverter according to the value of `complement`.
///
/// For example:
///
/// ```rust
/// use fraigkit::AigEdge;
/// let fanin_false = AigEdge::new(0, false);
/// let fanin_true = AigEdge::new(0, true);
/// assert_eq!(fanin_false, !fanin_true);
/// assert!(fanin_true.is_cst_true());
/// assert_eq!(AigEdge::from_literal(7), AigEdge::new(3, true));
/// ```
///
/// [`Aig`]: crate::Aig
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AigEdge {
    /// The node the edge is refering to.
    pub(crate) node: NodeId,
    /// Set to true if signal should be inverted.
    pub(crate) complement: bool,
}

impl Not for AigEdge {
    type Output = Self;

    fn not(mut self) -> Self::Output {
        self.complement = !self.complement;
        self
    }
}

impl AigEdge {
    pub fn new(node: NodeId, complement: bool) -> Self {
        AigEdge { node, complement }
    }

    /// Decodes an AIGER literal: the node id is `literal / 2`, the low bit is the inversion.
    pub fn from_literal(literal: u64) -> Self {
        AigEdge {
            node: literal >> 1,
            complement: literal & 1 != 0,
        }
    }

    /// Encodes the edge back into an AIGER literal.
    pub fn to_literal(&self) -> u64 {
        (self.node << 1) | self.complement as u64
    }

    pub fn get_node_id(&self) -> NodeId {
        self.node
    }

    pub fn get_complement(&self) -> bool {
        self.complement
    }

    /// Returns the same edge with its inversion flipped iff `complement` is set.
    pub fn xor(self, complement: bool) -> Self {
        AigEdge {
            node: self.node,
            complement: self.complement ^ complement,
        }
    }

    pub fn is_cst_false(&self) -> bool {
        self.node == 0 && !self.complement
    }

    pub fn is_cst_true(&self) -> bool {
        self.node == 0 && self.complement
    }

    pub fn is_complement_of(&self, other: &AigEdge) -> bool {
        self.node == other.node && self.complement ^ other.complement
    }
}
