pub mod aig;
pub mod cnf;
pub mod fec;
pub mod fraig;
pub mod opt;
pub mod report;
pub mod sat;
pub mod sim;
pub mod strash;

// Re-exporting symbols and modules.
pub use aig::dfs;
pub use aig::{
    Aig, AigEdge, AigError, AigNode, FaninId, NodeId, NodeKind, ParserError, Result,
};
pub use fraig::FraigReport;
pub use sat::{SatOracle, VarisatOracle};
pub use sim::{PatternError, SimOptions, SimReport};
