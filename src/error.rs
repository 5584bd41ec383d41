//! Error types for zh-toggle.
//!
//! Only construction-time APIs (selectors, configuration, engine tables)
//! return errors. Runtime paths degrade instead of failing.

use thiserror::Error;

/// Errors that can occur while building or mounting a toggle.
#[derive(Debug, Error)]
pub enum ToggleError {
    /// Selector text could not be parsed
    #[error("invalid selector `{selector}`: {reason}")]
    InvalidSelector {
        /// The offending selector text
        selector: String,
        /// What went wrong
        reason: &'static str,
    },

    /// Selector text was empty or whitespace
    #[error("empty selector")]
    EmptySelector,

    /// Variant tag is neither `s` nor `t`
    #[error("unknown script variant `{0}`")]
    UnknownVariant(String),

    /// A required element is missing from the document
    #[error("missing element `{0}`")]
    MissingElement(String),

    /// Character table for the built-in engine is malformed
    #[error("engine table error: {0}")]
    EngineTable(String),
}

/// Result type alias for toggle operations.
pub type ToggleResult<T> = Result<T, ToggleError>;

impl ToggleError {
    /// Create a selector error with a reason.
    pub fn invalid_selector(selector: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidSelector {
            selector: selector.into(),
            reason,
        }
    }

    /// Create an engine table error with a message.
    pub fn engine_table(msg: impl Into<String>) -> Self {
        Self::EngineTable(msg.into())
    }
}
