//! Validator port for block validation.
//!
//! Defines the abstract interface for validating blocks while authoring and
//! whole documents at the publish transition.

use crate::article::{
    domain::{Block, BlockDocument, NormalizedBlock},
    error::{PublishPreconditionError, ValidationError},
};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// How strictly a block is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationMode {
    /// Checks applied on every edit. Incomplete images are admitted.
    Authoring,
    /// Checks applied at the draft to published transition.
    Publish,
}

/// Port for block and document validation.
///
/// Validation occurs in two layers:
/// 1. Per block, on every edit, in [`ValidationMode::Authoring`]
/// 2. Per document, once, at the publish transition
///
/// # Implementation Notes
///
/// Implementations should:
/// - Return the normalised block rather than mutating in place
/// - Report every offending block at publish time, not only the first
/// - Be stateless and thread-safe
pub trait BlockValidator: Send + Sync {
    /// Validates and normalises a single block.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] when the block is malformed for `mode`.
    fn validate(&self, block: Block, mode: ValidationMode) -> ValidationResult<NormalizedBlock>;

    /// Checks document-wide limits that apply while authoring.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::TooManyBlocks`] when the document exceeds
    /// the configured block count.
    fn validate_document(&self, document: &BlockDocument) -> ValidationResult<()>;

    /// Checks that a document may be published.
    ///
    /// # Errors
    ///
    /// Returns [`PublishPreconditionError`] when the document is empty,
    /// exceeds limits, contains blocks that fail publish-mode validation, or
    /// is an unconfirmed migration.
    fn validate_for_publish(&self, document: &BlockDocument)
    -> Result<(), PublishPreconditionError>;
}

/// Configuration for validation rules.
///
/// Allows customisation of validation behaviour for different contexts.
///
/// # Examples
///
/// ```
/// use gazette::article::ports::validator::ValidationConfig;
///
/// let config = ValidationConfig::default();
/// assert_eq!(config.max_blocks, 500);
///
/// let strict = ValidationConfig::strict();
/// assert!(strict.max_heading_length < config.max_heading_length);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationConfig {
    /// Maximum number of blocks in one document.
    pub max_blocks: usize,
    /// Maximum heading length in characters.
    pub max_heading_length: usize,
    /// Maximum paragraph markup length in characters.
    pub max_paragraph_length: usize,
    /// Maximum quote text and attribution length in characters.
    pub max_quote_length: usize,
    /// Maximum length of image urls and text fields in characters.
    pub max_image_field_length: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_blocks: 500,
            max_heading_length: 300,
            max_paragraph_length: 20_000,
            max_quote_length: 2_000,
            max_image_field_length: 2_048,
        }
    }
}

impl ValidationConfig {
    /// Creates a lenient configuration with generous limits.
    ///
    /// Useful for importing archives whose content predates editorial limits.
    #[must_use]
    pub const fn lenient() -> Self {
        Self {
            max_blocks: 5_000,
            max_heading_length: 2_000,
            max_paragraph_length: 200_000,
            max_quote_length: 20_000,
            max_image_field_length: 8_192,
        }
    }

    /// Creates a strict configuration with reduced limits.
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            max_blocks: 100,
            max_heading_length: 120,
            max_paragraph_length: 5_000,
            max_quote_length: 500,
            max_image_field_length: 1_024,
        }
    }
}
