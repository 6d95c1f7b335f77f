use std::io::Write;

use crate::{Aig, AigEdge, NodeKind, Result};

impl Aig {
    /// Serializes the AIG into ASCII AIGER format.
    ///
    /// Inputs are written by ascending id, then the output fanins, then the and gates
    /// reachable from the outputs in DFS postorder (so that the file reads producers first),
    /// then the symbol table. Unreachable gates are not written.
    ///
    /// ```rust
    /// use fraigkit::Aig;
    /// let src = "aag 3 2 0 1 1\n2\n4\n7\n6 2 5\ni0 a\n";
    /// let mut aig = Aig::from_ascii(src.as_bytes()).unwrap();
    /// let mut out = Vec::new();
    /// aig.write_aag(&mut out).unwrap();
    /// assert_eq!(String::from_utf8(out).unwrap(), src);
    /// ```
    pub fn write_aag(&mut self, w: &mut impl Write) -> Result<()> {
        let ands: Vec<(u64, AigEdge, AigEdge)> = self
            .dfs_list()?
            .into_iter()
            .filter_map(|id| match self.get_node(id)?.get_kind() {
                NodeKind::And { fanin0, fanin1 } => Some((id, *fanin0, *fanin1)),
                _ => None,
            })
            .collect();

        writeln!(
            w,
            "aag {} {} 0 {} {}",
            self.max_var,
            self.inputs.len(),
            self.outputs.len(),
            ands.len()
        )?;

        for &id in &self.inputs {
            let complement = matches!(
                self.node(id)?.get_kind(),
                NodeKind::Input { complement: true }
            );
            writeln!(w, "{}", AigEdge::new(id, complement).to_literal())?;
        }
        for &id in &self.outputs {
            writeln!(w, "{}", self.get_output_fanin(id)?.to_literal())?;
        }
        for (id, fanin0, fanin1) in ands {
            writeln!(
                w,
                "{} {} {}",
                AigEdge::new(id, false).to_literal(),
                fanin0.to_literal(),
                fanin1.to_literal()
            )?;
        }

        for (k, &id) in self.inputs.iter().enumerate() {
            if let Some(name) = self.node(id)?.get_name() {
                writeln!(w, "i{} {}", k, name)?;
            }
        }
        for (k, &id) in self.outputs.iter().enumerate() {
            if let Some(name) = self.node(id)?.get_name() {
                writeln!(w, "o{} {}", k, name)?;
            }
        }
        Ok(())
    }
}
