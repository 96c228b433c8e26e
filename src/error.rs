//! Error types for direct misuse of the enumeration model API.
//!
//! Validation findings never travel through these errors; they accumulate
//! in a [`MessageList`](crate::validation::MessageList) instead. `ModelError`
//! is reserved for programmer-error-class violations: empty required
//! arguments, out-of-range indices, unknown names used as direct lookups.

use thiserror::Error;

/// Precondition violations raised immediately by model operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// A required argument was empty or otherwise unusable.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An index-keyed access fell outside the current list bounds.
    #[error("{what} index {index} out of bounds (len {len})")]
    IndexOutOfBounds {
        what: &'static str,
        index: usize,
        len: usize,
    },

    /// A name lookup failed against the resolved attribute schema.
    #[error("no attribute named '{name}' on enum type '{enum_type}'")]
    UnknownAttribute { name: String, enum_type: String },

    /// A qualified type name did not resolve in the registry.
    #[error("enum type '{0}' is not registered")]
    UnknownEnumType(String),

    /// A qualified content name did not resolve in the registry.
    #[error("enum content '{0}' is not registered")]
    UnknownEnumContent(String),

    /// Registration would shadow an already registered object.
    #[error("qualified name '{0}' is already registered")]
    DuplicateQualifiedName(String),
}
