use thiserror::Error;

use super::NodeId;

/// The result of an AIG operation.
pub type Result<T> = std::result::Result<T, AigError>;

/// Error returned when an AIG operation failed.
#[derive(Debug, Error)]
pub enum AigError {
    /// A different node with the given id already exists.
    #[error("a different node with id={0} already exists")]
    DuplicateId(NodeId),

    /// The id 0 is reserved for the `False` constant node only.
    #[error("id=0 is for node False only")]
    IdZeroButNotFalse,

    /// The node with given id does not exist.
    #[error("node with id={0} does not exist")]
    NodeDoesNotExist(NodeId),

    /// Outputs have no consumers: they cannot drive a gate or another output.
    #[error("node {0} is an output and cannot be used as a fanin")]
    OutputAsFanin(NodeId),

    /// Every id above the given one is taken, no output can be added.
    #[error("no id left above {0} for a new output")]
    IdOverflow(NodeId),

    /// Invalid operation on a node which does not have such specified fanin.
    /// Outputs only have [`FaninId::Fanin0`].
    ///
    /// [`FaninId::Fanin0`]: crate::FaninId::Fanin0
    #[error("the node has no such fanin")]
    NoFanin,

    /// The AIG has reached an invalid state. This should never happen.
    /// For example, fanin and fanout bookkeeping must always mirror each other.
    #[error("the AIG has reached an invalid state - this should not happen - error: {0}")]
    InvalidState(String),

    /// The SAT backend failed to answer a query.
    #[error("sat oracle failure: {0}")]
    Oracle(String),

    /// Writing a report, a simulation log or a circuit failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Formatting a report failed.
    #[error("formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),

    /// Just forwarding a [`ParserError`].
    #[error("{0}")]
    ParserError(#[from] ParserError),
}

/// Error returned when loading a circuit failed. The circuit is not constructed.
#[derive(Debug, Error)]
pub enum ParserError {
    /// Sequential elements and extended headers are not supported.
    #[error("unsupported feature: {0}")]
    UnsupportedFeature(String),

    /// Invalid token, something else was expected.
    #[error("line {line}: invalid token: {msg}")]
    InvalidToken { line: usize, msg: String },

    /// A literal is larger than what the header's variable bound allows.
    #[error("line {line}: literal {literal} exceeds maximum valid id {max_id}")]
    LiteralTooBig {
        line: usize,
        literal: u64,
        max_id: u64,
    },

    /// A declared literal carries an inversion bit where none is allowed.
    #[error("line {line}: {what} literal {literal} cannot be inverted")]
    CannotInvert {
        line: usize,
        what: &'static str,
        literal: u64,
    },

    /// Literals 0 and 1 belong to the constant node and cannot be declared.
    #[error("line {line}: cannot redefine const ({literal})")]
    RedefinedConst { line: usize, literal: u64 },

    /// An IO error occured (file doesn't exist, or doesn't have the right extension, ...).
    #[error("io error: {0}")]
    IoError(String),
}
