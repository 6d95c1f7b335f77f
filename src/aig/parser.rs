use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use crate::{Aig, Result, aig::error::ParserError};

fn read_u64(s: &str, line: usize) -> std::result::Result<u64, ParserError> {
    s.parse::<u64>().map_err(|_| ParserError::InvalidToken {
        line,
        msg: s.to_string() + " expected u64",
    })
}

/// Reads the next line (without its line terminator), or `None` at end of file.
fn next_line(reader: &mut impl BufRead, line_no: &mut usize) -> Result<Option<String>> {
    let mut line = String::new();
    let read = reader
        .read_line(&mut line)
        .map_err(|e| ParserError::IoError(e.to_string()))?;
    if read == 0 {
        return Ok(None);
    }
    *line_no += 1;
    Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
}

/// Same as [`next_line`], but the section being read needs one more line.
fn expect_line(reader: &mut impl BufRead, line_no: &mut usize, what: &str) -> Result<String> {
    next_line(reader, line_no)?.ok_or_else(|| {
        ParserError::InvalidToken {
            line: *line_no + 1,
            msg: format!("unexpected end of file, expected {} line", what),
        }
        .into()
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Header {
    m: u64,
    i: u64,
    o: u64,
    a: u64,
}

impl TryFrom<&str> for Header {
    type Error = ParserError;

    fn try_from(line: &str) -> std::result::Result<Self, Self::Error> {
        let tokens = line.split_whitespace().collect::<Vec<&str>>();

        if tokens.len() < 6 {
            return Err(ParserError::InvalidToken {
                line: 1,
                msg: "missing header tokens, expected aag M I L O A".to_string(),
            });
        }

        if tokens[0] != "aag" {
            return Err(ParserError::InvalidToken {
                line: 1,
                msg: "expected aag, got ".to_string() + tokens[0],
            });
        }

        if tokens.len() > 6 {
            return Err(ParserError::UnsupportedFeature(
                "header only supports M I L O A".to_string(),
            ));
        }

        let m = read_u64(tokens[1], 1)?;
        let i = read_u64(tokens[2], 1)?;
        let l = read_u64(tokens[3], 1)?;
        let o = read_u64(tokens[4], 1)?;
        let a = read_u64(tokens[5], 1)?;

        if l != 0 {
            return Err(ParserError::UnsupportedFeature(format!(
                "sequential circuits are not supported (L = {})",
                l
            )));
        }

        Ok(Header { m, i, o, a })
    }
}

/// Parser for the ASCII AIGER format (combinational subset).
mod ascii {
    use std::io::BufRead;

    use crate::{
        Aig, AigEdge, AigNode, NodeId, Result,
        aig::error::ParserError,
        aig::parser::{Header, expect_line, next_line, read_u64},
    };

    /// Parses a literal and checks it against the `2M + 1` bound.
    fn read_literal(token: &str, line: usize, m: u64) -> std::result::Result<u64, ParserError> {
        let literal = read_u64(token, line)?;
        if literal >> 1 > m {
            return Err(ParserError::LiteralTooBig {
                line,
                literal,
                max_id: m,
            });
        }
        Ok(literal)
    }

    fn tokens_exactly<'a>(
        line: &'a str,
        line_no: usize,
        n: usize,
        what: &str,
    ) -> std::result::Result<Vec<&'a str>, ParserError> {
        let tokens = line.split_whitespace().collect::<Vec<&str>>();

        if tokens.len() < n {
            return Err(ParserError::InvalidToken {
                line: line_no,
                msg: format!("not enough {} tokens", what),
            });
        }

        if tokens.len() > n {
            return Err(ParserError::InvalidToken {
                line: line_no,
                msg: format!("expected nothing after {}, got {}", what, tokens[n]),
            });
        }

        Ok(tokens)
    }

    /// Returns the input id and whether the input is read inverted.
    pub(super) fn read_input(
        line: &str,
        line_no: usize,
        m: u64,
    ) -> std::result::Result<(NodeId, bool), ParserError> {
        let tokens = tokens_exactly(line, line_no, 1, "input")?;
        let literal = read_literal(tokens[0], line_no, m)?;
        if literal >> 1 == 0 {
            return Err(ParserError::RedefinedConst {
                line: line_no,
                literal,
            });
        }
        Ok((literal >> 1, literal & 1 != 0))
    }

    pub(super) fn read_output(
        line: &str,
        line_no: usize,
        m: u64,
    ) -> std::result::Result<AigEdge, ParserError> {
        let tokens = tokens_exactly(line, line_no, 1, "output")?;
        let literal = read_literal(tokens[0], line_no, m)?;
        Ok(AigEdge::from_literal(literal))
    }

    pub(super) fn read_and(
        line: &str,
        line_no: usize,
        m: u64,
    ) -> std::result::Result<(NodeId, AigEdge, AigEdge), ParserError> {
        let tokens = tokens_exactly(line, line_no, 3, "and")?;
        let lhs = read_literal(tokens[0], line_no, m)?;
        let fanin0 = read_literal(tokens[1], line_no, m)?;
        let fanin1 = read_literal(tokens[2], line_no, m)?;

        if lhs >> 1 == 0 {
            return Err(ParserError::RedefinedConst {
                line: line_no,
                literal: lhs,
            });
        }
        if lhs & 1 != 0 {
            return Err(ParserError::CannotInvert {
                line: line_no,
                what: "AND gate",
                literal: lhs,
            });
        }
        // Each operand keeps its own inversion bit.
        Ok((
            lhs >> 1,
            AigEdge::from_literal(fanin0),
            AigEdge::from_literal(fanin1),
        ))
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub(super) enum SymbolKind {
        Input,
        Output,
    }

    /// Reads a `i<k> <name>` / `o<k> <name>` line.
    /// Returns `None` on the line ending the symbol table (comment section or blank line).
    pub(super) fn read_symbol(
        line: &str,
        line_no: usize,
    ) -> std::result::Result<Option<(SymbolKind, usize, String)>, ParserError> {
        if line.is_empty() || line.starts_with('c') {
            return Ok(None);
        }

        let (tag, name) = line.split_once(' ').ok_or(ParserError::InvalidToken {
            line: line_no,
            msg: "expected symbol name after ".to_string() + line,
        })?;
        if name.is_empty() {
            return Err(ParserError::InvalidToken {
                line: line_no,
                msg: "empty symbol name".to_string(),
            });
        }

        let mut chars = tag.chars();
        let kind = match chars.next() {
            Some('i') => SymbolKind::Input,
            Some('o') => SymbolKind::Output,
            _ => {
                return Err(ParserError::InvalidToken {
                    line: line_no,
                    msg: "expected symbol type i or o, got ".to_string() + tag,
                });
            }
        };
        let index = read_u64(chars.as_str(), line_no)? as usize;
        Ok(Some((kind, index, name.to_string())))
    }

    /// Builder for the ASCII AIGER format.
    fn build_aig(reader: &mut impl BufRead, header: Header) -> Result<Aig> {
        let mut aig = Aig::new();
        aig.set_max_var(header.m);
        let mut line_no = 1;

        // Inputs, in file order (for symbol indices)
        let mut input_ids = Vec::new();
        for _ in 0..header.i {
            let line = expect_line(reader, &mut line_no, "input")?;
            let (id, complement) = read_input(&line, line_no, header.m)?;
            input_ids.push(id);
            if let Some(previous) = aig.get_node(id) {
                log::warn!(
                    "line {}: literal {} redefined (previous definition at line {}), ignoring",
                    line_no,
                    id << 1,
                    previous.get_line()
                );
                continue;
            }
            aig.declare(AigNode::input(id, complement, line_no))?;
        }

        // Outputs get fresh ids above M
        let mut output_ids = Vec::new();
        for k in 0..header.o {
            let line = expect_line(reader, &mut line_no, "output")?;
            let fanin = read_output(&line, line_no, header.m)?;
            let id = header
                .m
                .checked_add(1)
                .and_then(|first| first.checked_add(k))
                .ok_or(ParserError::InvalidToken {
                    line: 1,
                    msg: format!("no id left above M={} for output {}", header.m, k),
                })?;
            output_ids.push(id);
            aig.declare(AigNode::output(id, fanin, line_no))?;
        }

        for _ in 0..header.a {
            let line = expect_line(reader, &mut line_no, "and")?;
            let (id, fanin0, fanin1) = read_and(&line, line_no, header.m)?;
            if let Some(previous) = aig.get_node(id) {
                log::warn!(
                    "line {}: literal {} redefined (previous definition at line {}), ignoring",
                    line_no,
                    id << 1,
                    previous.get_line()
                );
                continue;
            }
            aig.declare(AigNode::and(id, fanin0, fanin1, line_no))?;
        }

        // Symbols
        while let Some(line) = next_line(reader, &mut line_no)? {
            let Some((kind, index, name)) = read_symbol(&line, line_no)? else {
                break;
            };
            let ids = match kind {
                SymbolKind::Input => &input_ids,
                SymbolKind::Output => &output_ids,
            };
            let &id = ids.get(index).ok_or(ParserError::InvalidToken {
                line: line_no,
                msg: format!("symbol index {} out of range", index),
            })?;
            let node = aig.node_mut(id)?;
            match node.get_name() {
                Some(previous) => log::warn!(
                    "line {}: symbol {} of node {} redefined (keeping {})",
                    line_no,
                    name,
                    id,
                    previous
                ),
                None => node.set_name(name),
            }
        }

        aig.connect()?;

        // Is the AIG okay?
        aig.check_integrity()?;

        log::info!(
            "load: {} inputs, {} outputs, {} and gates, {} undefined",
            aig.get_inputs().len(),
            aig.get_outputs().len(),
            aig.get_ands().len(),
            aig.get_undefined().len()
        );
        Ok(aig)
    }

    impl Aig {
        /// Creates an AIG from an ASCII AIGER (`.aag`) source.
        ///
        /// Sequential circuits (non-zero latch count) are rejected. Ids referenced but never
        /// declared become [`NodeKind::Undefined`] placeholders.
        ///
        /// ```rust
        /// use fraigkit::Aig;
        /// let aig = Aig::from_ascii("aag 3 2 0 1 1\n2\n4\n6\n6 2 4\n".as_bytes()).unwrap();
        /// assert_eq!(aig.get_inputs(), &[1, 2]);
        /// assert_eq!(aig.get_outputs(), &[4]);
        /// ```
        ///
        /// [`NodeKind::Undefined`]: crate::NodeKind::Undefined
        pub fn from_ascii(mut reader: impl BufRead) -> Result<Self> {
            let mut line_no = 0;
            let line = expect_line(&mut reader, &mut line_no, "header")?;
            let header = Header::try_from(line.as_str())?;
            build_aig(&mut reader, header)
        }
    }

}

impl Aig {
    /// Creates an AIG from an `.aag` file using ASCII AIGER format.
    ///
    /// Only the combinational subset is supported: no latches, no extended header.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let f = File::open(path.as_ref()).map_err(|z| ParserError::IoError(z.to_string()))?;
        Aig::from_ascii(BufReader::new(f))
    }
}
