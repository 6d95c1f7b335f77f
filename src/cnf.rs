//! Tseitin encoding of an AIG into a CNF that can be handed to a [`SatOracle`].
//!
//! The encoding is built once by [`Aig::encode_cnf`] and reused for every equivalence query:
//! - every node reachable from an output (outputs excluded) gets its own variable
//! - every and gate `z = a & b` adds the three usual Tseitin clauses
//! - the constant node, as well as undefined placeholders, are pinned to false by a unit clause.
//!
//! A query then only needs a fresh variable `f = XOR(a, b)` and the assumption `f`,
//! see [`crate::fraig`].
//!
//! [`SatOracle`]: crate::sat::SatOracle

use std::{collections::HashMap, ops::Not};

use crate::{Aig, AigEdge, AigError, NodeId, NodeKind, Result};

/// A SAT literal, in DIMACS convention (a non-zero variable index, negative when negated).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Lit(i64);

impl Not for Lit {
    type Output = Self;

    fn not(self) -> Self::Output {
        Lit(-self.0)
    }
}

impl From<i64> for Lit {
    fn from(value: i64) -> Self {
        if value == 0 {
            panic!("Tried to create a Lit from 0. 0 is not a valid literal in DIMACS format.");
        }
        Lit(value)
    }
}

impl Lit {
    pub fn to_dimacs(self) -> i64 {
        self.0
    }

    /// Negates the literal iff `complement` is set.
    pub fn xor(self, complement: bool) -> Self {
        if complement { !self } else { self }
    }
}

/// A SAT clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause(Vec<Lit>);

impl Clause {
    pub fn get_lits(&self) -> &[Lit] {
        &self.0
    }
}

impl From<Vec<Lit>> for Clause {
    fn from(value: Vec<Lit>) -> Self {
        Clause(value)
    }
}

/// A SAT CNF that can be passed to a SAT solver, together with its variable counter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cnf {
    clauses: Vec<Clause>,
    n_vars: i64,
}

impl Cnf {
    /// A new empty CNF.
    pub fn new() -> Self {
        Cnf::default()
    }

    /// Allocates a new variable and returns its positive literal.
    pub fn fresh_lit(&mut self) -> Lit {
        self.n_vars += 1;
        Lit(self.n_vars)
    }

    pub fn get_n_vars(&self) -> usize {
        self.n_vars as usize
    }

    pub fn get_clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Add the given clause to the CNF.
    pub fn add_clause(&mut self, clause: Clause) {
        self.clauses.push(clause);
    }

    /// Add clauses that encode `z = AND(a, b)`.
    pub fn add_and(&mut self, a: Lit, b: Lit, z: Lit) {
        self.add_clause(Clause::from(vec![!a, !b, z]));
        self.add_clause(Clause::from(vec![a, !z]));
        self.add_clause(Clause::from(vec![b, !z]));
    }

    /// Add clauses that encode `z = XOR(a, b)`.
    pub fn add_xor(&mut self, a: Lit, b: Lit, z: Lit) {
        self.add_clause(Clause::from(vec![a, b, !z]));
        self.add_clause(Clause::from(vec![a, !b, z]));
        self.add_clause(Clause::from(vec![!a, b, z]));
        self.add_clause(Clause::from(vec![!a, !b, !z]));
    }
}

/// The CNF of an AIG, and the variable given to each encoded node.
#[derive(Debug, Clone)]
pub struct CnfEncoding {
    litmap: HashMap<NodeId, Lit>,
    cnf: Cnf,
}

impl CnfEncoding {
    /// Positive literal of the node's variable, if the node was encoded.
    pub fn get_lit(&self, id: NodeId) -> Option<Lit> {
        self.litmap.get(&id).copied()
    }

    /// Literal seen through the edge.
    pub fn get_edge_lit(&self, edge: &AigEdge) -> Result<Lit> {
        let lit = self.get_lit(edge.node).ok_or(AigError::InvalidState(format!(
            "node {} has no CNF variable",
            edge.node
        )))?;
        Ok(lit.xor(edge.complement))
    }

    pub fn get_cnf(&self) -> &Cnf {
        &self.cnf
    }

    /// Used to extend the encoding with query variables.
    pub fn get_cnf_mut(&mut self) -> &mut Cnf {
        &mut self.cnf
    }
}

impl Aig {
    /// Encodes the combinational support of every output.
    ///
    /// Nodes are visited in DFS postorder from the outputs, so fanins always get their
    /// variable before the gates using them. Unreachable nodes are not encoded.
    pub fn encode_cnf(&mut self) -> Result<CnfEncoding> {
        let mut encoding = CnfEncoding {
            litmap: HashMap::new(),
            cnf: Cnf::new(),
        };

        for id in self.dfs_list()? {
            let node = self.node(id)?;
            match node.get_kind() {
                NodeKind::Output { .. } => continue,
                NodeKind::False | NodeKind::Undefined => {
                    let z = encoding.cnf.fresh_lit();
                    encoding.cnf.add_clause(Clause::from(vec![!z]));
                    encoding.litmap.insert(id, z);
                }
                NodeKind::Input { .. } => {
                    let z = encoding.cnf.fresh_lit();
                    encoding.litmap.insert(id, z);
                }
                NodeKind::And { fanin0, fanin1 } => {
                    let a = encoding.get_edge_lit(fanin0)?;
                    let b = encoding.get_edge_lit(fanin1)?;
                    let z = encoding.cnf.fresh_lit();
                    encoding.cnf.add_and(a, b, z);
                    encoding.litmap.insert(id, z);
                }
            }
        }

        log::debug!(
            "encode_cnf: {} variables, {} clauses",
            encoding.cnf.get_n_vars(),
            encoding.cnf.get_clauses().len()
        );
        Ok(encoding)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn not_lit_test() {
        let l1 = Lit(1);
        assert_eq!(!l1, Lit(-1));
        assert_eq!(l1.xor(true), Lit(-1));
        assert_eq!(l1.xor(false), l1);
    }

    #[test]
    #[should_panic]
    fn invalid_lit_from_test() {
        _ = Lit::from(0);
    }

    #[test]
    fn add_clause_test() {
        let mut cnf = Cnf::new();
        let a = cnf.fresh_lit();
        let b = cnf.fresh_lit();
        let z = cnf.fresh_lit();
        assert_eq!((a, b, z), (Lit(1), Lit(2), Lit(3)));
        cnf.add_and(a, b, z);
        assert_eq!(
            cnf.get_clauses(),
            &[
                Clause::from(vec![Lit(-1), Lit(-2), Lit(3)]),
                Clause::from(vec![Lit(1), Lit(-3)]),
                Clause::from(vec![Lit(2), Lit(-3)]),
            ]
        );
        cnf.add_xor(a, b, z);
        assert_eq!(cnf.get_clauses().len(), 7);
        assert_eq!(cnf.get_n_vars(), 3);
    }

    #[test]
    fn encode_test() {
        // 3 = 1 & !2, 4 = !3 & 0, 5 = 1 & 6 (6 undefined), outputs 4 and !1
        let src = "aag 6 2 0 2 3\n2\n4\n8\n3\n6 2 5\n8 7 0\n10 2 12\n";
        let mut aig = Aig::from_ascii(src.as_bytes()).unwrap();
        let encoding = aig.encode_cnf().unwrap();

        // Order of the DFS: 1, 2, 3, 0, 4 (5 and 6 are not reachable)
        assert_eq!(encoding.get_lit(1), Some(Lit(1)));
        assert_eq!(encoding.get_lit(2), Some(Lit(2)));
        assert_eq!(encoding.get_lit(3), Some(Lit(3)));
        assert_eq!(encoding.get_lit(0), Some(Lit(4)));
        assert_eq!(encoding.get_lit(4), Some(Lit(5)));
        assert_eq!(encoding.get_lit(5), None);
        assert_eq!(encoding.get_lit(6), None);
        assert_eq!(
            encoding.get_edge_lit(&AigEdge::new(3, true)).unwrap(),
            Lit(-3)
        );
        assert!(encoding.get_edge_lit(&AigEdge::new(6, false)).is_err());

        let cnf = encoding.get_cnf();
        assert_eq!(cnf.get_n_vars(), 5);
        // 2 and gates and the constant
        assert_eq!(cnf.get_clauses().len(), 7);
        assert!(cnf.get_clauses().contains(&Clause::from(vec![Lit(-4)])));
        assert!(
            cnf.get_clauses()
                .contains(&Clause::from(vec![Lit(3), Lit(-4), Lit(5)]))
        );
    }
}
