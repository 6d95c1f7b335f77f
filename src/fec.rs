//! Functionally equivalent candidates (FEC), grouped by simulation signature.
//!
//! Two and gates with the same signature computed the same value for every simulated
//! pattern: they are candidates for a merge, to be confirmed by [`crate::fraig`].
//! A gate whose signature is the bitwise negation of another one is a candidate
//! for a complemented merge. Those are only reported ([`Aig::get_fec_peers`]).

use std::collections::BTreeMap;

use bitvec::vec::BitVec;

use crate::{Aig, NodeId, Result};

/// And gates grouped by signature, members in DFS postorder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FecGroups {
    groups: BTreeMap<BitVec, Vec<NodeId>>,
}

impl FecGroups {
    /// Groups with at least two members, the only ones that are equivalence candidates.
    pub fn candidates(&self) -> impl Iterator<Item = &[NodeId]> {
        self.groups
            .values()
            .filter(|group| group.len() > 1)
            .map(Vec::as_slice)
    }

    /// Number of candidate groups.
    pub fn len(&self) -> usize {
        self.candidates().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every gate with exactly this signature.
    pub fn get_group(&self, signature: &BitVec) -> &[NodeId] {
        self.groups
            .get(signature)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Every gate whose signature is the negation of `signature`.
    pub fn get_complement_group(&self, signature: &BitVec) -> &[NodeId] {
        self.get_group(&!signature.clone())
    }
}

impl Aig {
    /// Rebuilds the FEC groups from the current signatures.
    ///
    /// Only the and gates reachable from the outputs are grouped, in DFS postorder:
    /// the first member of a group never depends on a later one.
    pub fn collect_fec(&mut self) -> Result<()> {
        let mut groups: BTreeMap<BitVec, Vec<NodeId>> = BTreeMap::new();
        for id in self.dfs_list()? {
            let node = self.node(id)?;
            if node.is_and() {
                groups.entry(node.signature.clone()).or_default().push(id);
            }
        }
        self.fec = FecGroups { groups };
        log::debug!("collect_fec: {} candidate groups", self.fec.len());
        Ok(())
    }

    pub fn get_fec_groups(&self) -> &FecGroups {
        &self.fec
    }

    /// Candidates equivalent to the and gate `id`, then candidates equivalent to its negation.
    /// Returns `None` if `id` is not part of the current groups.
    pub fn get_fec_peers(&self, id: NodeId) -> Option<(Vec<NodeId>, Vec<NodeId>)> {
        let signature = self.get_node(id)?.get_signature();
        let same = self.fec.get_group(signature);
        if !same.contains(&id) {
            return None;
        }
        Some((
            same.iter().copied().filter(|&peer| peer != id).collect(),
            self.fec.get_complement_group(signature).to_vec(),
        ))
    }
}
