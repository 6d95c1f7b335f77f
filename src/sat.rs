//! The boolean satisfiability oracle used to prove equivalences.
//!
//! The oracle is incremental: the CNF of the AIG is loaded once, then every query only
//! adds a few clauses and solves under assumptions. [`VarisatOracle`] is the default
//! implementation, any other solver can be plugged in through [`SatOracle`].

use varisat::ExtendFormula;

use crate::{
    AigError, Result,
    cnf::{Clause, Cnf, Lit},
};

/// An incremental SAT solver.
pub trait SatOracle {
    /// Adds a clause, kept for all subsequent queries.
    fn add_clause(&mut self, clause: &Clause) -> Result<()>;

    /// Returns true if the clauses added so far are satisfiable when all the
    /// `assumptions` hold. Assumptions only last for this query.
    fn solve_assuming(&mut self, assumptions: &[Lit]) -> Result<bool>;

    /// Adds every clause of the CNF.
    fn load(&mut self, cnf: &Cnf) -> Result<()> {
        for clause in cnf.get_clauses() {
            self.add_clause(clause)?;
        }
        Ok(())
    }
}

/// [`SatOracle`] backed by the `varisat` CDCL solver.
///
/// Variables are numbered by the [`Cnf`], the solver grows its variable set as clauses come in.
pub struct VarisatOracle<'a> {
    solver: varisat::Solver<'a>,
}

impl Default for VarisatOracle<'_> {
    fn default() -> Self {
        VarisatOracle::new()
    }
}

impl VarisatOracle<'_> {
    pub fn new() -> Self {
        VarisatOracle {
            solver: varisat::Solver::new(),
        }
    }

    /// Starts over with an empty solver.
    pub fn reset(&mut self) {
        self.solver = varisat::Solver::new();
    }
}

fn to_varisat(lit: Lit) -> varisat::Lit {
    varisat::Lit::from_dimacs(lit.to_dimacs() as isize)
}

impl SatOracle for VarisatOracle<'_> {
    fn add_clause(&mut self, clause: &Clause) -> Result<()> {
        let lits: Vec<varisat::Lit> = clause.get_lits().iter().map(|&l| to_varisat(l)).collect();
        self.solver.add_clause(&lits);
        Ok(())
    }

    fn solve_assuming(&mut self, assumptions: &[Lit]) -> Result<bool> {
        let lits: Vec<varisat::Lit> = assumptions.iter().map(|&l| to_varisat(l)).collect();
        self.solver.assume(&lits);
        self.solver
            .solve()
            .map_err(|e| AigError::Oracle(format!("{:?}", e)))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn incremental_queries() {
        let mut cnf = Cnf::new();
        let a = cnf.fresh_lit();
        let b = cnf.fresh_lit();
        let z = cnf.fresh_lit();
        cnf.add_and(a, b, z);

        let mut oracle = VarisatOracle::new();
        oracle.load(&cnf).unwrap();
        assert!(oracle.solve_assuming(&[z]).unwrap());
        assert!(!oracle.solve_assuming(&[z, !a]).unwrap());
        // Assumptions do not stick
        assert!(oracle.solve_assuming(&[!a]).unwrap());

        oracle.add_clause(&Clause::from(vec![!b])).unwrap();
        assert!(!oracle.solve_assuming(&[z]).unwrap());

        oracle.reset();
        assert!(oracle.solve_assuming(&[z, !a]).unwrap());
    }
}
