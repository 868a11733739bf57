//! # Configuration Errors
//!
//! Error types for rule registration, chain compilation, and traversal.
//!
//! Configuration errors are fatal: they abort validation before any
//! rule runs, so a caller never receives a partial report alongside
//! one. Rule failures are not errors and are reported through
//! [`Report`](crate::Report) instead.

use thiserror::Error;

/// Result type for engine configuration and validation calls
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised by malformed rule chains, descriptors, or inputs
#[derive(Debug, Error)]
pub enum ConfigError {
    // ==================
    // Registration Errors
    // ==================

    /// Name is empty, a directive, or contains chain syntax
    #[error("'{name}' is reserved and cannot be registered")]
    ReservedName { name: String },

    // ==================
    // Chain Grammar Errors
    // ==================

    /// A chain token has no rule name (e.g. a leading or doubled comma)
    #[error("rule chain '{chain}' contains an empty rule name")]
    EmptyRule { chain: String },

    /// Rule name does not resolve to a registered rule or alias
    #[error("unknown rule '{name}'")]
    UnknownRule { name: String },

    /// Rule requires a parameter and none was given
    #[error("rule '{rule}' requires a parameter")]
    MissingParam { rule: String },

    /// Rule takes no parameter but one was given
    #[error("rule '{rule}' does not take a parameter")]
    UnexpectedParam { rule: String },

    /// Parameter failed the rule's compile-time check
    #[error("rule '{rule}' rejects parameter '{param}'")]
    InvalidParam { rule: String, param: String },

    /// `keys` appeared anywhere other than immediately after `dive`
    #[error("'keys' must immediately follow 'dive'")]
    MisplacedKeys,

    /// A `keys` without `endkeys`, or a stray `endkeys`
    #[error("'keys' and 'endkeys' directives are unbalanced")]
    UnbalancedKeys,

    /// Alias expansion recursed past the depth limit
    #[error("alias '{name}' expands too deeply")]
    AliasDepth { name: String },

    // ==================
    // Descriptor Errors
    // ==================

    /// Cross-field rule names a field the descriptor does not declare
    #[error("rule '{rule}' references undeclared field '{field}'")]
    UnknownField { rule: String, field: String },

    /// Cross-field rule used where no sibling fields exist
    #[error("cross-field rule '{rule}' has no field context here")]
    UnresolvedReference { rule: String },

    /// Two fields in one descriptor share a name
    #[error("duplicate field '{field}' in rules for '{type_name}'")]
    DuplicateField { type_name: String, field: String },

    // ==================
    // Traversal Errors
    // ==================

    /// `dive` reached a value that is neither a sequence nor a mapping
    #[error("cannot traverse into {found} at '{path}'")]
    CannotTraverse { path: String, found: &'static str },

    /// `keys` applied where traversal found a sequence
    #[error("'keys' cannot apply to sequence elements at '{path}'")]
    KeysOnSequence { path: String },

    /// Nested rules reached a value that is not a composite
    #[error("expected a composite value at '{path}', found {found}")]
    ExpectedStruct { path: String, found: &'static str },

    // ==================
    // Ingestion Errors
    // ==================

    /// Input could not be converted to the internal value model
    #[error("value could not be serialized: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ConfigError {
    /// Returns the traversal path for errors raised while walking a
    /// value, or `None` for errors raised before traversal began.
    pub fn path(&self) -> Option<&str> {
        match self {
            ConfigError::CannotTraverse { path, .. }
            | ConfigError::KeysOnSequence { path }
            | ConfigError::ExpectedStruct { path, .. } => Some(path),
            _ => None,
        }
    }
}
