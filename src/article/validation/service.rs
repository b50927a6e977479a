//! Validation service implementation.
//!
//! Provides the default implementation of the `BlockValidator` port,
//! combining individual validation rules into a document-level validator.

use crate::article::{
    domain::{Block, BlockDocument, NormalizedBlock},
    error::{BlockViolation, PublishPreconditionError},
    ports::validator::{BlockValidator, ValidationConfig, ValidationMode, ValidationResult},
    validation::rules,
};

/// Default implementation of the block validator.
///
/// Per-block validation runs on every edit. Publish validation re-checks
/// every block in [`ValidationMode::Publish`] and reports all offending
/// positions rather than failing on the first.
///
/// # Examples
///
/// ```
/// use gazette::article::domain::{Block, BlockDocument};
/// use gazette::article::error::PublishPreconditionError;
/// use gazette::article::ports::validator::{BlockValidator, ValidationMode};
/// use gazette::article::validation::DefaultBlockValidator;
///
/// let validator = DefaultBlockValidator::new();
/// let pending = validator
///     .validate(Block::image(""), ValidationMode::Authoring)
///     .expect("incomplete images are fine while authoring");
///
/// let mut document = BlockDocument::new();
/// document.insert(0, pending).expect("position in range");
///
/// let error = validator
///     .validate_for_publish(&document)
///     .expect_err("incomplete image blocks publication");
/// assert_eq!(error.offending_positions(), vec![0]);
/// ```
#[derive(Debug, Clone)]
pub struct DefaultBlockValidator {
    config: ValidationConfig,
}

impl DefaultBlockValidator {
    /// Creates a new validator with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: ValidationConfig::default(),
        }
    }

    /// Creates a new validator with custom configuration.
    #[must_use]
    pub const fn with_config(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Returns the current validation configuration.
    #[must_use]
    pub const fn config(&self) -> &ValidationConfig {
        &self.config
    }
}

impl Default for DefaultBlockValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockValidator for DefaultBlockValidator {
    fn validate(&self, block: Block, mode: ValidationMode) -> ValidationResult<NormalizedBlock> {
        rules::validate_block(block, mode, &self.config)
    }

    fn validate_document(&self, document: &BlockDocument) -> ValidationResult<()> {
        rules::validate_block_count(document, &self.config)
    }

    fn validate_for_publish(
        &self,
        document: &BlockDocument,
    ) -> Result<(), PublishPreconditionError> {
        if document.is_empty() {
            return Err(PublishPreconditionError::EmptyDocument);
        }
        rules::validate_block_count(document, &self.config)
            .map_err(PublishPreconditionError::Limits)?;

        let violations: Vec<BlockViolation> = document
            .snapshot()
            .iter()
            .enumerate()
            .filter_map(|(position, normalized)| {
                self.validate(normalized.block().clone(), ValidationMode::Publish)
                    .err()
                    .map(|error| BlockViolation {
                        position,
                        kind: normalized.kind(),
                        error,
                    })
            })
            .collect();
        if !violations.is_empty() {
            log::debug!(
                "publish validation rejected {} of {} blocks",
                violations.len(),
                document.len()
            );
            return Err(PublishPreconditionError::OffendingBlocks(violations));
        }

        if document.requires_confirmation() {
            return Err(PublishPreconditionError::UnconfirmedMigration);
        }

        Ok(())
    }
}

// Note: Unit tests for DefaultBlockValidator are located in
// src/article/tests/validation_tests.rs using rstest fixtures.
