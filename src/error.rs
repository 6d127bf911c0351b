//! Error types for confstack.

use crate::schema::FieldKind;

/// Result type alias for confstack operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur while resolving configuration.
///
/// Extractor failures (`InvalidValue`, `AmbiguousFlag`, `MalformedConfigFile`,
/// `UnsupportedType`) abort that extractor's contribution entirely; merge
/// failures (`MissingRequiredField`, `TypeMismatch`) abort the whole
/// resolution. No partial result is ever returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A field kind name has no registered parser.
    ///
    /// Detected at schema registration time, before any source is read.
    #[error("type '{kind}' is not supported")]
    UnsupportedType {
        /// The unrecognized kind name.
        kind: String,
    },

    /// A textual token could not be coerced to its field's kind.
    #[error("'{value}' is not a valid {kind} value")]
    InvalidValue {
        /// The offending token.
        value: String,
        /// The kind the token was being coerced to.
        kind: FieldKind,
    },

    /// The same flag was supplied with a value more than once.
    #[error("flag --{flag} specified multiple times")]
    AmbiguousFlag {
        /// The field name behind the repeated flag.
        flag: String,
    },

    /// The config file's structural syntax could not be parsed.
    #[error("malformed config file at line {line}: {reason}")]
    MalformedConfigFile {
        /// 1-based line number of the offending line.
        line: usize,
        /// What was wrong with it.
        reason: String,
    },

    /// No source supplied a value for a field without a default.
    #[error("field '{field}' is required but missing")]
    MissingRequiredField {
        /// The unsatisfied field name.
        field: String,
    },

    /// A merged value's kind does not match the field's declared kind.
    #[error("field '{field}' is of wrong kind ({actual}, expected {expected})")]
    TypeMismatch {
        /// The field name.
        field: String,
        /// The kind the value actually carries.
        actual: FieldKind,
        /// The kind the schema declares.
        expected: FieldKind,
    },

    /// Failed to materialize the resolved map into the caller's type.
    #[error("failed to deserialize configuration: {0}")]
    Deserialization(String),
}
