//! Errors raised by the URL resolver.

use thiserror::Error;

/// Failure to resolve or move a query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// An option value is malformed.
    #[error("invalid {option} {value:?}: {reason}")]
    InvalidOption {
        /// Option name.
        option: &'static str,
        /// Rejected value.
        value: String,
        /// What was expected.
        reason: &'static str,
    },

    /// Retreat requested at offset zero.
    #[error("page out of range: already at the first page")]
    PageOutOfRange,

    /// Advance requested past the largest representable offset.
    #[error("page out of range: offset {start} cannot advance by {num}")]
    OffsetOverflow {
        /// Current offset.
        start: usize,
        /// Page size.
        num: usize,
    },
}

impl QueryError {
    pub(crate) fn invalid(option: &'static str, value: &str, reason: &'static str) -> Self {
        Self::InvalidOption {
            option,
            value: value.to_string(),
            reason,
        }
    }
}
