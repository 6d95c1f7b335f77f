//! Logic simulation: every node accumulates a signature, one bit per simulated pattern.
//!
//! A pattern gives one value per input, inputs by ascending id. Values are propagated
//! through the edges with the usual semantics: the value seen through an edge is
//! `value(target) XOR complement`, the constant and undefined placeholders are 0.
//!
//! Patterns are either drawn from a seeded generator ([`Aig::random_sim`]) or read from
//! a text source, one `0`/`1` line per pattern ([`Aig::file_sim`]). Every run ends by
//! regrouping the FEC candidates.

use std::{
    io::{BufRead, Write},
    time::Instant,
};

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use thiserror::Error;

use crate::{Aig, NodeId, NodeKind, Result};

/// Seed used when none is given.
pub const DEFAULT_SEED: u64 = 3345678;

/// Parameters of a random simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimOptions {
    pub seed: u64,
    /// Number of patterns, defaults to twice the number of inputs.
    pub pattern_count: Option<usize>,
}

impl Default for SimOptions {
    fn default() -> Self {
        SimOptions {
            seed: DEFAULT_SEED,
            pattern_count: None,
        }
    }
}

/// Why a pattern line was rejected. The line is skipped, the run goes on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("pattern ({pattern}) length ({len}) does not match the number of inputs ({expected})")]
    Length {
        pattern: String,
        len: usize,
        expected: usize,
    },

    #[error("pattern ({pattern}) contains a non-0/1 character ({character})")]
    NonBinary { pattern: String, character: char },
}

/// Outcome of a simulation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimReport {
    /// Number of patterns simulated.
    pub patterns: usize,
    /// Rejected lines (1-based line number) with the reason.
    pub skipped: Vec<(usize, PatternError)>,
}

fn parse_pattern(line: &str, n_inputs: usize) -> std::result::Result<Vec<bool>, PatternError> {
    let len = line.chars().count();
    if len != n_inputs {
        return Err(PatternError::Length {
            pattern: line.to_string(),
            len,
            expected: n_inputs,
        });
    }
    line.chars()
        .map(|c| match c {
            '0' => Ok(false),
            '1' => Ok(true),
            _ => Err(PatternError::NonBinary {
                pattern: line.to_string(),
                character: c,
            }),
        })
        .collect()
}

fn pattern_str(pattern: &[bool]) -> String {
    pattern.iter().map(|&b| if b { '1' } else { '0' }).collect()
}

impl Aig {
    /// Clears the signature of every node.
    pub fn reset_signatures(&mut self) {
        for node in self.nodes.values_mut() {
            node.signature.clear();
        }
    }

    /// Applies one pattern and evaluates `order` (producers first).
    fn simulate_pattern(&mut self, order: &[NodeId], pattern: &[bool]) -> Result<()> {
        for (k, &bit) in pattern.iter().enumerate() {
            let id = self.inputs[k];
            let node = self.node_mut(id)?;
            let value = match node.get_kind() {
                NodeKind::Input { complement } => bit ^ complement,
                _ => bit,
            };
            node.value = value;
            node.signature.push(value);
        }

        for &id in order {
            let node = self.node(id)?;
            let value = match node.get_kind() {
                // Already assigned
                NodeKind::Input { .. } => continue,
                NodeKind::False | NodeKind::Undefined => false,
                NodeKind::And { fanin0, fanin1 } => {
                    (self.node(fanin0.node)?.value ^ fanin0.complement)
                        && (self.node(fanin1.node)?.value ^ fanin1.complement)
                }
                NodeKind::Output { fanin } => self.node(fanin.node)?.value ^ fanin.complement,
            };
            let node = self.node_mut(id)?;
            node.value = value;
            node.signature.push(value);
        }
        Ok(())
    }

    fn log_pattern(&self, log: &mut Option<&mut dyn Write>, pattern: &[bool]) -> Result<()> {
        if let Some(w) = log {
            let outputs = self
                .outputs
                .iter()
                .map(|&id| Ok(if self.node(id)?.value { '1' } else { '0' }))
                .collect::<Result<String>>()?;
            writeln!(w, "{} {}", pattern_str(pattern), outputs)?;
        }
        Ok(())
    }

    /// Simulates pseudo-random patterns, reproducible for a given seed.
    ///
    /// If `log` is given, it receives one line per pattern: the input pattern,
    /// a space, then the output values.
    pub fn random_sim(
        &mut self,
        options: &SimOptions,
        mut log: Option<&mut dyn Write>,
    ) -> Result<SimReport> {
        let start = Instant::now();
        let count = options
            .pattern_count
            .unwrap_or(2 * self.inputs.len());
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(options.seed);

        self.reset_signatures();
        let order = self.dfs_list()?;
        for _ in 0..count {
            let pattern: Vec<bool> = (0..self.inputs.len())
                .map(|_| rng.gen_bool(0.5))
                .collect();
            self.simulate_pattern(&order, &pattern)?;
            self.log_pattern(&mut log, &pattern)?;
        }
        self.collect_fec()?;

        log::info!(
            "random_sim: {} patterns took {:?} to simulate (seed {})",
            count,
            start.elapsed(),
            options.seed
        );
        Ok(SimReport {
            patterns: count,
            skipped: Vec::new(),
        })
    }

    /// Simulates the patterns read from `patterns`, one per line.
    ///
    /// Blank lines are ignored. A line with the wrong length, or with anything else than
    /// `0` and `1`, is reported and skipped.
    pub fn file_sim(
        &mut self,
        patterns: impl BufRead,
        mut log: Option<&mut dyn Write>,
    ) -> Result<SimReport> {
        let start = Instant::now();
        let mut report = SimReport::default();

        self.reset_signatures();
        let order = self.dfs_list()?;
        for (k, line) in patterns.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match parse_pattern(line, self.inputs.len()) {
                Ok(pattern) => {
                    self.simulate_pattern(&order, &pattern)?;
                    self.log_pattern(&mut log, &pattern)?;
                    report.patterns += 1;
                }
                Err(e) => {
                    log::error!("line {}: {}", k + 1, e);
                    report.skipped.push((k + 1, e));
                }
            }
        }
        self.collect_fec()?;

        log::info!(
            "file_sim: {} patterns took {:?} to simulate ({} rejected)",
            report.patterns,
            start.elapsed(),
            report.skipped.len()
        );
        Ok(report)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::AigEdge;
    use bitvec::prelude::*;
    use pretty_assertions::assert_eq;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    /// 3 = 1 & !2, outputs: 3, !0, !1
    fn sim_aig() -> Aig {
        let mut aig = Aig::new();
        aig.add_input(1).unwrap();
        aig.add_input(2).unwrap();
        aig.add_and(3, AigEdge::new(1, false), AigEdge::new(2, true))
            .unwrap();
        aig.add_output(AigEdge::new(3, false)).unwrap();
        aig.add_output(AigEdge::new(0, true)).unwrap();
        aig.add_output(AigEdge::new(1, true)).unwrap();
        aig
    }

    #[test]
    fn parse_pattern_test() {
        assert_eq!(parse_pattern("01", 2).unwrap(), vec![false, true]);
        assert_eq!(
            parse_pattern("011", 2),
            Err(PatternError::Length {
                pattern: "011".to_string(),
                len: 3,
                expected: 2
            })
        );
        assert_eq!(
            parse_pattern("0x", 2),
            Err(PatternError::NonBinary {
                pattern: "0x".to_string(),
                character: 'x'
            })
        );
    }

    #[test]
    fn file_sim_test() {
        init_logger();
        let mut aig = sim_aig();
        let mut log = Vec::new();
        let report = aig
            .file_sim(
                "00\n10\n\n1a\n111\n11\n01\n".as_bytes(),
                Some(&mut log),
            )
            .unwrap();

        assert_eq!(report.patterns, 4);
        assert_eq!(
            report.skipped.iter().map(|(line, _)| *line).collect::<Vec<_>>(),
            vec![4, 5]
        );
        assert_eq!(
            String::from_utf8(log).unwrap(),
            "00 011\n10 110\n11 010\n01 011\n"
        );
        assert_eq!(aig.get_node(3).unwrap().get_signature(), &bitvec![0, 1, 0, 0]);
        assert_eq!(aig.get_node(5).unwrap().get_signature_str(), "1111");
        // The constant drives output 5
        assert_eq!(aig.get_node(0).unwrap().get_signature_str(), "0000");
    }

    #[test]
    fn inverted_input() {
        let src = "aag 2 1 0 1 0\n3\n2\n";
        let mut aig = Aig::from_ascii(src.as_bytes()).unwrap();
        aig.file_sim("0\n1\n".as_bytes(), None).unwrap();
        assert_eq!(aig.get_node(3).unwrap().get_signature_str(), "10");
    }

    #[test]
    fn undefined_is_false() {
        let src = "aag 3 1 0 1 1\n2\n7\n6 2 4\n";
        let mut aig = Aig::from_ascii(src.as_bytes()).unwrap();
        aig.file_sim("0\n1\n".as_bytes(), None).unwrap();
        assert_eq!(aig.get_node(2).unwrap().get_signature_str(), "00");
        assert_eq!(aig.get_node(4).unwrap().get_signature_str(), "11");
    }

    #[test]
    fn random_sim_test() {
        init_logger();
        let mut aig = sim_aig();
        let report = aig.random_sim(&SimOptions::default(), None).unwrap();
        assert_eq!(report.patterns, 4);
        let first = aig.get_node(3).unwrap().get_signature().clone();
        assert_eq!(first.len(), 4);

        // Same seed, same signatures
        aig.random_sim(&SimOptions::default(), None).unwrap();
        assert_eq!(aig.get_node(3).unwrap().get_signature(), &first);

        let options = SimOptions {
            seed: 42,
            pattern_count: Some(64),
        };
        aig.random_sim(&options, None).unwrap();
        let in1 = aig.get_node(1).unwrap().get_signature().clone();
        let in2 = aig.get_node(2).unwrap().get_signature().clone();
        let expected: BitVec = in1.iter().zip(in2.iter()).map(|(a, b)| *a && !*b).collect();
        assert_eq!(aig.get_node(3).unwrap().get_signature(), &expected);
    }
}
