//! Structural hashing: merges and gates with the same fanins.
//!
//! Two gates are structurally equal when their fanins are the same pair of edges, in
//! either order. For more information, check:
//! FRAIGs: A Unifying Representation for Logic Synthesis and Verification
//! by Alan Mishchenko, Satrajit Chatterjee, Roland Jiang, Robert Brayton.

use std::{collections::HashMap, time::Instant};

use crate::{Aig, AigEdge, NodeId, NodeKind, Result};

/// Commutative key of an and gate.
fn strash_key(fanin0: AigEdge, fanin1: AigEdge) -> (AigEdge, AigEdge) {
    if fanin0 <= fanin1 {
        (fanin0, fanin1)
    } else {
        (fanin1, fanin0)
    }
}

impl Aig {
    /// Merges every structurally duplicated and gate reachable from the outputs
    /// into the first one met in DFS postorder.
    ///
    /// Gates are processed producers first, so a merge exposes duplicates among the
    /// consumers within the same pass. Returns the `(victim, survivor)` merges, and
    /// regroups the FEC candidates afterwards.
    pub fn strash(&mut self) -> Result<Vec<(NodeId, NodeId)>> {
        let start = Instant::now();
        let mut table: HashMap<(AigEdge, AigEdge), NodeId> = HashMap::new();
        let mut merges = Vec::new();

        for id in self.dfs_list()? {
            let key = match self.node(id)?.get_kind() {
                NodeKind::And { fanin0, fanin1 } => strash_key(*fanin0, *fanin1),
                _ => continue,
            };
            match table.get(&key) {
                Some(&survivor) => {
                    log::info!("strash: merging {} into {}", id, survivor);
                    self.merge(id, survivor, false)?;
                    merges.push((id, survivor));
                }
                None => {
                    table.insert(key, id);
                }
            }
        }

        self.collect_fec()?;
        log::info!(
            "strash: {} merges, took {:?}",
            merges.len(),
            start.elapsed()
        );
        Ok(merges)
    }
}
