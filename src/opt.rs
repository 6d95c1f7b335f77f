//! Local rewriting and removal of dead logic.
//!
//! [`Aig::optimize`] simplifies and gates whose fanins make them trivial:
//! - `0 & x = 0`, `1 & x = x`
//! - `x & x = x`, `x & !x = 0`.
//!
//! [`Aig::sweep`] then removes what is no longer reachable from the outputs.

use std::{collections::BTreeSet, time::Instant};

use crate::{Aig, AigEdge, NodeId, NodeKind, Result};

/// The edge an and gate can be replaced with, if its fanins make it trivial.
fn simplify(fanin0: AigEdge, fanin1: AigEdge) -> Option<AigEdge> {
    let cst_false = AigEdge::new(0, false);
    if fanin0.is_cst_false() || fanin1.is_cst_false() {
        Some(cst_false)
    } else if fanin0.is_cst_true() {
        Some(fanin1)
    } else if fanin1.is_cst_true() {
        Some(fanin0)
    } else if fanin0 == fanin1 {
        Some(fanin0)
    } else if fanin0.is_complement_of(&fanin1) {
        Some(cst_false)
    } else {
        None
    }
}

impl Aig {
    /// Replaces every trivial and gate reachable from the outputs by the edge it reduces to.
    ///
    /// Gates are processed producers first, so a simplification can cascade to its
    /// consumers within the same pass: running it twice in a row changes nothing the
    /// second time. Returns the `(gate, replacement)` rewrites. Replaced gates are left
    /// without fanouts, see [`Aig::sweep`].
    pub fn optimize(&mut self) -> Result<Vec<(NodeId, AigEdge)>> {
        let start = Instant::now();
        let mut rewrites = Vec::new();

        for id in self.dfs_list()? {
            let replacement = match self.node(id)?.get_kind() {
                NodeKind::And { fanin0, fanin1 } => simplify(*fanin0, *fanin1),
                _ => None,
            };
            if let Some(replacement) = replacement {
                log::info!(
                    "optimize: replacing {} with {}{}",
                    id,
                    if replacement.complement { "!" } else { "" },
                    replacement.node
                );
                self.relink(id, replacement)?;
                rewrites.push((id, replacement));
            }
        }

        log::info!(
            "optimize: {} gates replaced, took {:?}",
            rewrites.len(),
            start.elapsed()
        );
        Ok(rewrites)
    }

    /// Removes the and gates not reachable from any output, together with the undefined
    /// placeholders left without consumers. Inputs, outputs and the constant are kept.
    ///
    /// Returns the removed ids, ascending.
    pub fn sweep(&mut self) -> Result<Vec<NodeId>> {
        let start = Instant::now();
        let reachable: BTreeSet<NodeId> = self.dfs_list()?.into_iter().collect();

        let removed: BTreeSet<NodeId> = self
            .iter_nodes()
            .filter(|n| (n.is_and() || n.is_undefined()) && !reachable.contains(&n.get_id()))
            .map(|n| n.get_id())
            .collect();
        for &id in &removed {
            log::debug!("sweep: clearing {}", id);
        }
        self.remove_nodes(&removed)?;

        log::info!(
            "sweep: {} nodes removed, took {:?}",
            removed.len(),
            start.elapsed()
        );
        Ok(removed.into_iter().collect())
    }
}
