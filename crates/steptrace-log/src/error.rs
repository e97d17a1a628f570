use thiserror::Error;

/// Failures that abort a parse pass.
///
/// Line numbers are 1-based, as an editor would show them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("line {line}: array value `{text}` is not a number")]
    InvalidArrayValue { line: usize, text: String },

    #[error("line {line}: end-fast-steps without a matching begin-fast-steps")]
    UnbalancedFastSteps { line: usize },

    #[error("line {line}: begin-fast-steps with no enclosing step attempt")]
    FastStepsWithoutParent { line: usize },

    #[error("line {line}: end-step-attempt with no step attempt to close")]
    EndWithoutBegin { line: usize },
}

/// Failures raised while extracting a series from a parsed tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryError {
    /// `index` is the record's position within its own sequence.
    #[error("step attempt #{index} has no `{field}` field (incomplete begin/end pair?)")]
    MissingField { field: String, index: usize },

    #[error("field `{field}` has unusable value `{value}`")]
    InvalidField { field: String, value: String },

    #[error("field `{field}` is an array and cannot be projected as a scalar")]
    NotScalar { field: String },
}
