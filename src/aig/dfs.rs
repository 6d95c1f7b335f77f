//! Provides a mark-based DFS shared by every pass, parameterized by a [`Visitor`].
//!
//! The traversal is deterministic: it starts from each given root in order
//! (for [`Aig::dfs_list`], the outputs by ascending id), explores fanins left first,
//! and uses the node marks as its only visited set. Marks are cleared on entry,
//! so a traversal never depends on what a previous pass left behind.
//!
//! Example:
//!
//! ```rust
//! use fraigkit::{Aig, AigEdge};
//! let mut aig = Aig::new();
//! aig.add_input(1).unwrap();
//! aig.add_input(2).unwrap();
//! aig.add_and(3, AigEdge::new(1, false), AigEdge::new(2, true)).unwrap();
//! aig.add_output(AigEdge::new(3, false)).unwrap();
//! assert_eq!(aig.dfs_list().unwrap(), vec![1, 2, 3, 4]);
//! ```

use super::{Aig, AigError, AigNode, NodeId, Result};

/// When a node is handed to the visitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    /// Before its fanins (or fanouts), used for printing cones.
    Preorder,
    /// After its fanins (or fanouts), producers before consumers.
    Postorder,
}

/// Which edges the traversal follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Fanin,
    Fanout,
}

/// One visited node.
#[derive(Debug)]
pub struct Step<'a> {
    pub node: &'a AigNode,
    /// Distance from the root of the current traversal.
    pub depth: usize,
    /// Inversion of the edge the node was reached through.
    /// For fanout traversals, this is the inversion of the consumer's fanin.
    pub complement: bool,
    /// The node was already visited (only reported in preorder).
    pub revisit: bool,
}

/// Behaviour plugged into [`Aig::traverse`].
pub trait Visitor {
    fn order(&self) -> Order;

    /// Gates the exploration below `node`. The node itself is still visited.
    fn should_descend(&mut self, _node: &AigNode, _depth: usize) -> bool {
        true
    }

    fn visit(&mut self, step: Step<'_>);
}

enum Frame {
    Enter {
        id: NodeId,
        depth: usize,
        complement: bool,
    },
    Exit {
        id: NodeId,
        depth: usize,
        complement: bool,
    },
}

/// Collects node ids in postorder.
#[derive(Default)]
struct PostorderList(Vec<NodeId>);

impl Visitor for PostorderList {
    fn order(&self) -> Order {
        Order::Postorder
    }

    fn visit(&mut self, step: Step<'_>) {
        self.0.push(step.node.get_id());
    }
}

impl Aig {
    /// Depth-first walk from `starts` (node id, inversion of the edge reaching it).
    ///
    /// Marks are reset on entry and left set on exit: after the call, a node is
    /// marked iff it was reached.
    pub fn traverse<V: Visitor>(
        &mut self,
        starts: &[(NodeId, bool)],
        direction: Direction,
        visitor: &mut V,
    ) -> Result<()> {
        self.reset_marks();
        let order = visitor.order();

        for &(start, complement) in starts {
            let mut stack = vec![Frame::Enter {
                id: start,
                depth: 0,
                complement,
            }];

            while let Some(frame) = stack.pop() {
                match frame {
                    Frame::Enter {
                        id,
                        depth,
                        complement,
                    } => {
                        let node = self.node(id)?;
                        if node.mark {
                            if order == Order::Preorder {
                                visitor.visit(Step {
                                    node,
                                    depth,
                                    complement,
                                    revisit: true,
                                });
                            }
                            continue;
                        }

                        let descend = visitor.should_descend(node, depth);
                        let children: Vec<(NodeId, bool)> = if !descend {
                            vec![]
                        } else {
                            match direction {
                                Direction::Fanin => node
                                    .get_fanins()
                                    .iter()
                                    .map(|fanin| (fanin.node, fanin.complement))
                                    .collect(),
                                Direction::Fanout => {
                                    let mut children = Vec::new();
                                    for &consumer in node.get_fanouts() {
                                        let edge = self
                                            .node(consumer)?
                                            .get_fanins()
                                            .into_iter()
                                            .find(|fanin| fanin.node == id)
                                            .ok_or_else(|| {
                                                AigError::InvalidState(format!(
                                                    "node {} lists {} as fanout but is not its fanin",
                                                    id, consumer
                                                ))
                                            })?;
                                        children.push((consumer, edge.complement));
                                    }
                                    children
                                }
                            }
                        };

                        if order == Order::Preorder {
                            visitor.visit(Step {
                                node,
                                depth,
                                complement,
                                revisit: false,
                            });
                        }
                        self.node_mut(id)?.mark = true;

                        stack.push(Frame::Exit {
                            id,
                            depth,
                            complement,
                        });
                        // Reversed so that the first child is explored first.
                        for (child, child_complement) in children.into_iter().rev() {
                            stack.push(Frame::Enter {
                                id: child,
                                depth: depth + 1,
                                complement: child_complement,
                            });
                        }
                    }
                    Frame::Exit {
                        id,
                        depth,
                        complement,
                    } => {
                        if order == Order::Postorder {
                            let node = self.node(id)?;
                            visitor.visit(Step {
                                node,
                                depth,
                                complement,
                                revisit: false,
                            });
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Every node reachable from the outputs, producers first.
    ///
    /// Outputs are processed by ascending id, fanins left first.
    pub fn dfs_list(&mut self) -> Result<Vec<NodeId>> {
        let starts: Vec<(NodeId, bool)> = self.outputs.iter().map(|&id| (id, false)).collect();
        let mut list = PostorderList::default();
        self.traverse(&starts, Direction::Fanin, &mut list)?;
        Ok(list.0)
    }
}
