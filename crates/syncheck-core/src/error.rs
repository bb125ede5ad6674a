//! Error taxonomy for input framing and relation evaluation.
//!
//! Every variant aborts the run. Line numbers are 1-based positions in the
//! input stream.

/// Errors raised while framing input or evaluating queries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyncheckError {
    #[error("line {line}: count line is empty or missing")]
    EmptyOrMissingCount { line: usize },
    #[error("line {line}: count must be a non-negative integer, got {value:?}")]
    MalformedCount { line: usize, value: String },
    #[error("line {line}: block declares {expected} lines but only {available} remain")]
    TruncatedBlock {
        line: usize,
        expected: usize,
        available: usize,
    },
    #[error("line {line}: expected two words, got {content:?}")]
    MalformedPair { line: usize, content: String },
    /// A neighbor set names a word with no entry of its own. Only reachable
    /// when a mapping was assembled outside [`crate::engine::NeighborMapping::fold`].
    #[error("neighbor {word:?} has no entry in the mapping")]
    MissingNeighborEntry { word: String },
}

pub type Result<T> = std::result::Result<T, SyncheckError>;

impl SyncheckError {
    /// The input line the error points at, if it refers to one.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::EmptyOrMissingCount { line }
            | Self::MalformedCount { line, .. }
            | Self::TruncatedBlock { line, .. }
            | Self::MalformedPair { line, .. } => Some(*line),
            Self::MissingNeighborEntry { .. } => None,
        }
    }
}
