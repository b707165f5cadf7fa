//! Error types for index-expression compilation
//!
//! Every parser in this crate reports failures through [`PlanError`]. The
//! `const fn` entry points convert these into compile-time panics so that a
//! malformed expression literal fails the build; the `try_*` siblings return
//! them to runtime callers.

use thiserror::Error;

/// Error type for index-expression parsing
///
/// All variants are `Copy` so plans and their errors can be produced in
/// `const` context.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanError {
    /// The expression does not contain the `->` separator
    #[error("expression must contain '->'")]
    MissingArrow,

    /// The expression contains more than one `->` separator
    #[error("expression must contain a single '->'")]
    MultipleArrows,

    /// A two-operand expression does not contain the `,` separator
    #[error("expression must separate operands with ','")]
    MissingComma,

    /// A two-operand expression contains more than one `,` separator
    #[error("expression must contain a single ','")]
    MultipleCommas,

    /// An index list's length disagrees with the operand rank
    #[error("index list length mismatch: expected {expected}, got {actual}")]
    RankMismatch { expected: usize, actual: usize },

    /// An index character outside `A-Z` / `a-z`
    #[error("indices must be ASCII alphabetic (found byte 0x{byte:02x})")]
    NonAlphabetic { byte: u8 },

    /// A result axis has no matching source axis (or a source axis matches
    /// a result axis more than once)
    #[error("result axes must match source axes exactly once")]
    UnmatchedResultAxis,

    /// The two sides of a permutation expression are not permutations of
    /// each other
    #[error("expression sides are not permutations of each other")]
    InvalidPermutation,

    /// An output index that appears in neither input operand
    #[error("output axis '{axis}' does not appear in any input")]
    UnknownOutputAxis { axis: char },

    /// An index repeated within a single operand
    #[error("axis '{axis}' is repeated within one operand")]
    DuplicateAxis { axis: char },

    /// An outer-product expression contracts an axis
    #[error("outer product must carry every input axis to the output")]
    UnexpectedContraction,

    /// More distinct indices than the engine supports
    #[error("expression uses more distinct indices than supported")]
    TooManyLevels,
}

/// Result type for expression parsing
pub type PlanResult<T> = Result<T, PlanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_mismatch_display() {
        let err = PlanError::RankMismatch {
            expected: 3,
            actual: 2,
        };
        let msg = format!("{}", err);
        assert!(msg.contains("expected 3"));
        assert!(msg.contains("got 2"));
    }

    #[test]
    fn test_non_alphabetic_display() {
        let err = PlanError::NonAlphabetic { byte: b'_' };
        let msg = format!("{}", err);
        assert!(msg.contains("0x5f"));
    }

    #[test]
    fn test_unknown_output_axis_display() {
        let err = PlanError::UnknownOutputAxis { axis: 'q' };
        assert!(format!("{}", err).contains("'q'"));
    }
}
