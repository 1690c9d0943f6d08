// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use thiserror::Error;

/// Errors raised while building, feeding, or merging score histograms.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SdpError {
    /// Configuration errors, data-contract violations, and mismatched merges.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Accumulated counters left the finite range.
    #[error("numerical issue: {0}")]
    NumericalIssue(String),
}

impl SdpError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn numerical_issue(message: impl Into<String>) -> Self {
        Self::NumericalIssue(message.into())
    }

    /// Stable category name for diagnostics and error mapping.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "InvalidInput",
            Self::NumericalIssue(_) => "NumericalIssue",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SdpError;

    #[test]
    fn display_prefixes_category() {
        let err = SdpError::invalid_input("num_thresholds must be >= 2; got 1");
        assert_eq!(
            err.to_string(),
            "invalid input: num_thresholds must be >= 2; got 1"
        );

        let err = SdpError::numerical_issue("bucket[3] overflowed");
        assert_eq!(err.to_string(), "numerical issue: bucket[3] overflowed");
    }

    #[test]
    fn kind_is_stable() {
        assert_eq!(SdpError::invalid_input("x").kind(), "InvalidInput");
        assert_eq!(SdpError::numerical_issue("x").kind(), "NumericalIssue");
    }
}
