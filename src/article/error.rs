//! Error types for block validation, publication preconditions and codecs.
//!
//! Uses `thiserror` for ergonomic error handling with typed variants
//! that can be inspected by callers.

use super::domain::{BlockKind, MarkupError, ParseBlockKindError};
use thiserror::Error;

/// Errors that can occur while validating a single block.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required text field is empty or whitespace-only.
    #[error("{field} cannot be empty")]
    EmptyText {
        /// The offending field.
        field: &'static str,
    },

    /// Paragraph markup falls outside the permitted marks.
    #[error("disallowed markup: {0}")]
    DisallowedMarkup(#[from] MarkupError),

    /// An image has no url and completeness was required.
    #[error("image url is required")]
    MissingUrl,

    /// An image url uses a scheme outside the allow-list.
    #[error("image url '{0}' uses a disallowed scheme")]
    InvalidImageUrl(String),

    /// A field exceeds its configured length.
    #[error("{field} is {actual} characters long, exceeds limit of {max}")]
    TextTooLong {
        /// The offending field.
        field: &'static str,
        /// The maximum allowed length in characters.
        max: usize,
        /// The actual length in characters.
        actual: usize,
    },

    /// The document holds more blocks than permitted.
    #[error("document has {actual} blocks, exceeds limit of {max}")]
    TooManyBlocks {
        /// The maximum allowed number of blocks.
        max: usize,
        /// The actual number of blocks.
        actual: usize,
    },

    /// Multiple validation errors occurred.
    #[error("multiple validation errors: {}", format_errors(.0))]
    Multiple(Vec<Self>),
}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationError {
    /// Creates an empty-text error for `field`.
    #[must_use]
    pub const fn empty_text(field: &'static str) -> Self {
        Self::EmptyText { field }
    }

    /// Combines multiple validation errors into a single error.
    ///
    /// A single error is returned unwrapped. Returns `None` when `errors`
    /// is empty.
    #[must_use]
    pub fn multiple(mut errors: Vec<Self>) -> Option<Self> {
        match errors.len() {
            0 => None,
            1 => errors.pop(),
            _ => Some(Self::Multiple(errors)),
        }
    }

    /// Returns the individual errors if this is a `Multiple` variant.
    #[must_use]
    pub fn errors(&self) -> Option<&[Self]> {
        match self {
            Self::Multiple(errors) => Some(errors),
            _ => None,
        }
    }
}

/// A block that failed publish-mode validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockViolation {
    /// Position of the block in the document.
    pub position: usize,
    /// Variant of the block.
    pub kind: BlockKind,
    /// Why the block is not publishable.
    pub error: ValidationError,
}

/// Reasons a document cannot be published.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PublishPreconditionError {
    /// The document has no blocks.
    #[error("document must contain at least one block")]
    EmptyDocument,

    /// The document exceeds the configured block limit.
    #[error(transparent)]
    Limits(ValidationError),

    /// One or more blocks fail publish-mode validation.
    #[error("{} block(s) are not publishable: {}", .0.len(), format_violations(.0))]
    OffendingBlocks(Vec<BlockViolation>),

    /// A migrated document has not been reviewed by an editor.
    #[error("migrated document must be confirmed by an editor before publication")]
    UnconfirmedMigration,
}

fn format_violations(violations: &[BlockViolation]) -> String {
    violations
        .iter()
        .map(|violation| {
            format!(
                "{} at position {}: {}",
                violation.kind, violation.position, violation.error
            )
        })
        .collect::<Vec<_>>()
        .join("; ")
}

impl PublishPreconditionError {
    /// Returns the positions of offending blocks, empty for document-level
    /// failures.
    #[must_use]
    pub fn offending_positions(&self) -> Vec<usize> {
        match self {
            Self::OffendingBlocks(violations) => {
                violations.iter().map(|violation| violation.position).collect()
            }
            _ => Vec::new(),
        }
    }
}

/// Errors raised by the storage codec and the display renderer.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CodecError {
    /// A storage record carries a variant tag this codec does not know.
    #[error("unsupported block variant '{kind}' at position {position}")]
    UnsupportedBlockVariant {
        /// Position of the record.
        position: usize,
        /// The unrecognised tag.
        kind: String,
    },

    /// A storage record does not match the shape of its variant.
    #[error("malformed {kind} record at position {position}: {reason}")]
    MalformedRecord {
        /// Position of the record.
        position: usize,
        /// The record's variant.
        kind: BlockKind,
        /// Description of the mismatch.
        reason: String,
    },

    /// A decoded record fails block validation.
    #[error("invalid {kind} record at position {position}: {source}")]
    InvalidRecord {
        /// Position of the record.
        position: usize,
        /// The record's variant.
        kind: BlockKind,
        /// The validation failure.
        #[source]
        source: ValidationError,
    },

    /// The representation was written by an unknown schema version.
    #[error("unsupported storage schema version: {0}")]
    UnsupportedSchemaVersion(u32),

    /// Paragraph content could not be sanitised for display.
    #[error("paragraph at position {position} cannot be rendered: {source}")]
    Unrenderable {
        /// Position of the block.
        position: usize,
        /// The markup failure.
        #[source]
        source: MarkupError,
    },

    /// JSON (de)serialisation failed.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl CodecError {
    /// Creates a serialization error.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization(message.into())
    }

    /// Creates an unsupported-variant error from a failed tag parse.
    #[must_use]
    pub fn unsupported(position: usize, error: ParseBlockKindError) -> Self {
        Self::UnsupportedBlockVariant {
            position,
            kind: error.0,
        }
    }
}
