//! Error types for article domain construction, editing and parsing.

use super::{ArticleId, ArticleStatus, BlockKind};
use crate::article::error::ValidationError;
use thiserror::Error;

/// Errors returned by structural and in-place operations on a block document.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DocumentError {
    /// A position argument lies outside the document.
    #[error("position {position} is out of range for a document of {len} blocks")]
    PositionOutOfRange {
        /// The rejected position.
        position: usize,
        /// The document length at the time of the call.
        len: usize,
    },

    /// An edit targeted a block of a different variant.
    #[error("cannot apply a {edit} edit to the {found} block at position {position}")]
    VariantMismatch {
        /// Position of the targeted block.
        position: usize,
        /// Variant the edit applies to.
        edit: BlockKind,
        /// Variant of the block found at the position.
        found: BlockKind,
    },

    /// The edited block failed validation.
    #[error("block at position {position} is invalid: {source}")]
    Validation {
        /// Position of the edited block.
        position: usize,
        /// The validation failure.
        #[source]
        source: ValidationError,
    },
}

impl DocumentError {
    /// Creates an out-of-range error.
    #[must_use]
    pub const fn out_of_range(position: usize, len: usize) -> Self {
        Self::PositionOutOfRange { position, len }
    }
}

/// Reasons a rich-text fragment falls outside the permitted mark vocabulary.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MarkupError {
    /// An element other than emphasis, strong or hyperlink was found.
    #[error("element <{0}> is not permitted")]
    DisallowedElement(String),

    /// A permitted element carries an attribute outside the allow-list.
    #[error("attribute '{attribute}' is not permitted on <{element}>")]
    DisallowedAttribute {
        /// The element carrying the attribute.
        element: String,
        /// The rejected attribute name.
        attribute: String,
    },

    /// A hyperlink is missing its target.
    #[error("hyperlink is missing an href")]
    MissingHref,

    /// A hyperlink target uses a scheme outside the allow-list.
    #[error("hyperlink target '{0}' uses a disallowed scheme")]
    UnsafeLink(String),

    /// Tags are unbalanced or interleaved.
    #[error("malformed markup: {0}")]
    Malformed(String),
}

impl MarkupError {
    /// Creates a malformed markup error.
    #[must_use]
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::Malformed(reason.into())
    }
}

/// Errors returned by article lifecycle operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ArticleDomainError {
    /// The requested status change is not permitted from the current status.
    #[error("article {article_id} cannot move from {from} to {to}")]
    InvalidStatusTransition {
        /// The article being transitioned.
        article_id: ArticleId,
        /// Current status.
        from: ArticleStatus,
        /// Requested status.
        to: ArticleStatus,
    },

    /// Breaking news can only be flagged on published articles.
    #[error("article {0} must be published before it can be flagged as breaking")]
    BreakingRequiresPublished(ArticleId),
}

/// Error returned while parsing an article status from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown article status: {0}")]
pub struct ParseArticleStatusError(pub String);

/// Error returned while parsing a block variant tag.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown block variant: {0}")]
pub struct ParseBlockKindError(pub String);

/// Error returned when a heading level outside {2, 3, 4} is supplied.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("heading level {0} is not supported, expected 2, 3 or 4")]
pub struct InvalidHeadingLevel(pub u8);
