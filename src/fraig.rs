//! SAT sweeping: proves (or refutes) the FEC candidates and merges the proven ones.
//!
//! The CNF of the whole AIG is built once and loaded into an incremental oracle. For each
//! pair `(a, b)` of a candidate group, a fresh variable `f = XOR(a, b)` is added and the
//! oracle is asked for an assignment under the assumption `f`:
//! - UNSAT: `a` and `b` can never differ, `b` is merged into `a`
//! - SAT: the signatures matched by chance, both stay.
//!
//! For more information, check:
//! FRAIGs: A Unifying Representation for Logic Synthesis and Verification
//! by Alan Mishchenko, Satrajit Chatterjee, Roland Jiang, Robert Brayton.

use std::time::Instant;

use crate::{
    Aig, AigError, NodeId, Result,
    cnf::CnfEncoding,
    sat::{SatOracle, VarisatOracle},
};

/// Outcome of a [`Aig::fraig`] run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FraigReport {
    /// `(victim, survivor)` merges, in the order they were proven.
    pub merges: Vec<(NodeId, NodeId)>,
    /// Number of candidate pairs that were shown to differ.
    pub disproved: usize,
    /// Number of oracle queries.
    pub queries: usize,
}

/// Asks the oracle whether `a` and `b` can take different values.
fn prove_equivalent(
    encoding: &mut CnfEncoding,
    oracle: &mut impl SatOracle,
    a: NodeId,
    b: NodeId,
) -> Result<bool> {
    let lit = |id| {
        encoding
            .get_lit(id)
            .ok_or(AigError::InvalidState(format!("node {} has no CNF variable", id)))
    };
    let (la, lb) = (lit(a)?, lit(b)?);

    let cnf = encoding.get_cnf_mut();
    let first = cnf.get_clauses().len();
    let f = cnf.fresh_lit();
    cnf.add_xor(la, lb, f);
    for clause in &cnf.get_clauses()[first..] {
        oracle.add_clause(clause)?;
    }

    Ok(!oracle.solve_assuming(&[f])?)
}

impl Aig {
    /// Runs [`Aig::fraig_with`] with the default [`VarisatOracle`].
    pub fn fraig(&mut self) -> Result<FraigReport> {
        let mut oracle = VarisatOracle::new();
        self.fraig_with(&mut oracle)
    }

    /// Proves the current FEC candidates with `oracle` and merges the equivalent gates.
    ///
    /// Candidates come from the last simulation (or strash), only gates with the very same
    /// signature are checked. In a group, the first member is checked against every other
    /// one, proven members are merged into it and leave the group, then the first member
    /// leaves too and the next one is checked against the remaining ones.
    /// Merges always keep the member met first in DFS postorder.
    ///
    /// The FEC groups are regrouped afterwards.
    pub fn fraig_with(&mut self, oracle: &mut impl SatOracle) -> Result<FraigReport> {
        let start = Instant::now();
        let mut report = FraigReport::default();

        let mut encoding = self.encode_cnf()?;
        oracle.load(encoding.get_cnf())?;

        let groups: Vec<Vec<NodeId>> = self
            .fec
            .candidates()
            .map(|group| {
                group
                    .iter()
                    .copied()
                    .filter(|&id| encoding.get_lit(id).is_some())
                    .collect()
            })
            .collect();

        for mut group in groups {
            while group.len() > 1 {
                let a = group[0];
                let mut j = 1;
                while j < group.len() {
                    let b = group[j];
                    report.queries += 1;
                    if prove_equivalent(&mut encoding, oracle, a, b)? {
                        log::info!(
                            "fraig: {} and {} are equivalent, merging {} into {}",
                            a,
                            b,
                            b,
                            a
                        );
                        self.merge(b, a, false)?;
                        report.merges.push((b, a));
                        group.remove(j);
                    } else {
                        log::debug!("fraig: {} and {} differ", a, b);
                        report.disproved += 1;
                        j += 1;
                    }
                }
                group.remove(0);
            }
        }

        self.collect_fec()?;
        log::info!(
            "fraig: {} merges, {} disproved, {} queries, took {:?}",
            report.merges.len(),
            report.disproved,
            report.queries,
            start.elapsed()
        );
        Ok(report)
    }
}
