//! The block document: an ordered, revisioned article body.

use super::{BlockEdit, DocumentError, NormalizedBlock, Revision};
use crate::article::ports::validator::{BlockValidator, ValidationMode};
use serde::{Deserialize, Serialize};

/// How a document came into existence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentOrigin {
    /// Created in the block editor.
    #[default]
    Authored,
    /// Produced by legacy migration and not yet reviewed.
    Migrated,
    /// Produced by legacy migration and confirmed by an editor.
    MigrationConfirmed,
}

/// An ordered sequence of validated blocks forming one article body.
///
/// Positions are always the dense range `0..len`. The revision counter moves
/// forward on every insert, remove and move, including a move of a block to
/// its own position, and stays put on field edits.
///
/// The document is owned by one editing session. Operations take `&mut self`
/// and a failed operation leaves the document unchanged.
///
/// # Examples
///
/// ```
/// use gazette::article::domain::{Block, BlockDocument, HeadingLevel};
/// use gazette::article::ports::validator::{BlockValidator, ValidationMode};
/// use gazette::article::validation::DefaultBlockValidator;
///
/// let validator = DefaultBlockValidator::new();
/// let mut document = BlockDocument::new();
///
/// let heading = validator
///     .validate(Block::heading("  Intro ", HeadingLevel::H2), ValidationMode::Authoring)
///     .expect("valid heading");
/// document.insert(0, heading).expect("position in range");
///
/// assert_eq!(document.len(), 1);
/// assert_eq!(document.revision().value(), 1);
/// assert!(document.remove(3).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockDocument {
    blocks: Vec<NormalizedBlock>,
    revision: Revision,
    origin: DocumentOrigin,
}

impl BlockDocument {
    /// Creates an empty authored document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assembles a document from already validated parts.
    #[must_use]
    pub const fn from_parts(
        blocks: Vec<NormalizedBlock>,
        revision: Revision,
        origin: DocumentOrigin,
    ) -> Self {
        Self {
            blocks,
            revision,
            origin,
        }
    }

    /// Returns the number of blocks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Returns `true` if the document holds no blocks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Returns the block at `position`, if any.
    #[must_use]
    pub fn get(&self, position: usize) -> Option<&NormalizedBlock> {
        self.blocks.get(position)
    }

    /// Returns the structural revision.
    #[must_use]
    pub const fn revision(&self) -> Revision {
        self.revision
    }

    /// Returns how the document was created.
    #[must_use]
    pub const fn origin(&self) -> DocumentOrigin {
        self.origin
    }

    /// Returns `true` while a migrated document awaits editor confirmation.
    #[must_use]
    pub const fn requires_confirmation(&self) -> bool {
        matches!(self.origin, DocumentOrigin::Migrated)
    }

    /// Records that an editor reviewed a migrated document.
    ///
    /// Has no effect on authored documents.
    pub fn confirm_migration(&mut self) {
        if matches!(self.origin, DocumentOrigin::Migrated) {
            self.origin = DocumentOrigin::MigrationConfirmed;
        }
    }

    /// Returns a read-only view of the blocks in rendering order.
    #[must_use]
    pub fn snapshot(&self) -> &[NormalizedBlock] {
        &self.blocks
    }

    /// Inserts `block` at `position`, shifting later blocks back by one.
    ///
    /// `position` may equal the length to append.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::PositionOutOfRange`] when `position` exceeds
    /// the length.
    pub fn insert(&mut self, position: usize, block: NormalizedBlock) -> Result<(), DocumentError> {
        if position > self.blocks.len() {
            return Err(DocumentError::out_of_range(position, self.blocks.len()));
        }
        self.blocks.insert(position, block);
        self.bump();
        Ok(())
    }

    /// Removes and returns the block at `position`.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::PositionOutOfRange`] when `position` is not
    /// an existing block.
    pub fn remove(&mut self, position: usize) -> Result<NormalizedBlock, DocumentError> {
        self.check_existing(position)?;
        let removed = self.blocks.remove(position);
        self.bump();
        Ok(removed)
    }

    /// Moves the block at `from` so that it ends up at `to`.
    ///
    /// Moving a block onto its own position leaves the order unchanged but
    /// still advances the revision.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::PositionOutOfRange`] when either position is
    /// not an existing block.
    pub fn move_block(&mut self, from: usize, to: usize) -> Result<(), DocumentError> {
        self.check_existing(from)?;
        self.check_existing(to)?;
        if from != to {
            let block = self.blocks.remove(from);
            self.blocks.insert(to, block);
        }
        self.bump();
        Ok(())
    }

    /// Applies a field edit to the block at `position`.
    ///
    /// The edited block is validated in authoring mode before it replaces the
    /// current payload. The revision is not changed.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::PositionOutOfRange`] for a missing block,
    /// [`DocumentError::VariantMismatch`] when the edit targets another
    /// variant, and [`DocumentError::Validation`] when the edited block is
    /// invalid.
    pub fn edit_block_content<V>(
        &mut self,
        position: usize,
        edit: BlockEdit,
        validator: &V,
    ) -> Result<&NormalizedBlock, DocumentError>
    where
        V: BlockValidator + ?Sized,
    {
        let len = self.blocks.len();
        let slot = self
            .blocks
            .get_mut(position)
            .ok_or(DocumentError::out_of_range(position, len))?;

        let edit_kind = edit.target_kind();
        let found = slot.kind();
        let edited = edit
            .apply_to(slot.block())
            .ok_or(DocumentError::VariantMismatch {
                position,
                edit: edit_kind,
                found,
            })?;
        let normalized = validator
            .validate(edited, ValidationMode::Authoring)
            .map_err(|source| DocumentError::Validation { position, source })?;

        *slot = normalized;
        Ok(slot)
    }

    fn check_existing(&self, position: usize) -> Result<(), DocumentError> {
        if position >= self.blocks.len() {
            return Err(DocumentError::out_of_range(position, self.blocks.len()));
        }
        Ok(())
    }

    fn bump(&mut self) {
        self.revision = self.revision.next();
    }
}
