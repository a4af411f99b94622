//! Error taxonomy for the search, grouping and statistics core.

use thiserror::Error;

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, GtexError>;

/// The four failure kinds callers branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Wrong container shape (e.g. a set or mapping where a sequence was required).
    InvalidArgument,
    /// Structurally empty collection where data was required.
    EmptyInput,
    /// A well-formed search had no match.
    NotFound,
    /// Non-numeric or heterogeneous data where numbers were required.
    TypeWrong,
}

/// Error type for core operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GtexError {
    /// Container is not an ordered sequence
    #[error("Invalid argument: {reason}")]
    InvalidArgument {
        /// Explanation of what was passed
        reason: String,
    },

    /// Nothing to search or index
    #[error("Empty input: {what}")]
    EmptyInput {
        /// Which collection was empty
        what: String,
    },

    /// Target absent after a complete search
    #[error("'{target}' not found")]
    NotFound {
        /// The value that was searched for
        target: String,
    },

    /// Value of the wrong type
    #[error("Wrong type: {reason}")]
    TypeWrong {
        /// Explanation of the offending value
        reason: String,
    },

    /// A structural column required by a query is missing from a header
    #[error("Unable to find {role} column '{column}' in {table} header")]
    MissingColumn {
        /// What the column is used for (e.g. "tissue group")
        role: String,
        /// The column name that was searched for
        column: String,
        /// Which table header was searched
        table: String,
    },
}

impl GtexError {
    /// Classify this error into one of the four core kinds.
    pub fn kind(&self) -> ErrorKind {
        match self {
            GtexError::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            GtexError::EmptyInput { .. } => ErrorKind::EmptyInput,
            GtexError::NotFound { .. } | GtexError::MissingColumn { .. } => ErrorKind::NotFound,
            GtexError::TypeWrong { .. } => ErrorKind::TypeWrong,
        }
    }

    pub(crate) fn invalid_argument(reason: impl Into<String>) -> Self {
        GtexError::InvalidArgument { reason: reason.into() }
    }

    pub(crate) fn empty_input(what: impl Into<String>) -> Self {
        GtexError::EmptyInput { what: what.into() }
    }

    pub(crate) fn not_found(target: impl ToString) -> Self {
        GtexError::NotFound { target: target.to_string() }
    }

    pub(crate) fn type_wrong(reason: impl Into<String>) -> Self {
        GtexError::TypeWrong { reason: reason.into() }
    }
}
