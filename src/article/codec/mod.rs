//! Conversion of block documents to storage records and display markup.
//!
//! The storage encoding is lossless: decoding an encoded document yields an
//! equal document, revision and origin included. Display rendering is one
//! way and always sanitised.

pub mod display;
pub mod storage;

pub use display::{SanitizedMarkup, render_for_display, render_plain_text};
pub use storage::{
    BlockRecord, CURRENT_SCHEMA_VERSION, StorageRepresentation, decode_from_storage,
    encode_for_storage,
};

use crate::article::{domain::BlockDocument, error::CodecError, ports::validator::BlockValidator};
use std::sync::Arc;

/// Codec bound to the validator used to re-check decoded records.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use gazette::article::codec::ContentCodec;
/// use gazette::article::domain::{Block, BlockDocument, HeadingLevel};
/// use gazette::article::ports::validator::{BlockValidator, ValidationMode};
/// use gazette::article::validation::DefaultBlockValidator;
///
/// let validator = Arc::new(DefaultBlockValidator::new());
/// let codec = ContentCodec::new(Arc::clone(&validator));
///
/// let mut document = BlockDocument::new();
/// let heading = validator
///     .validate(Block::heading("Intro", HeadingLevel::H2), ValidationMode::Authoring)
///     .expect("valid heading");
/// document.insert(0, heading).expect("position in range");
///
/// let stored = codec.encode_for_storage(&document).expect("encodes");
/// assert_eq!(codec.decode_from_storage(&stored).expect("decodes"), document);
/// assert_eq!(
///     codec.render_for_display(&document).expect("renders").as_str(),
///     "<h2>Intro</h2>"
/// );
/// ```
#[derive(Debug)]
pub struct ContentCodec<V> {
    validator: Arc<V>,
}

impl<V> Clone for ContentCodec<V> {
    fn clone(&self) -> Self {
        Self {
            validator: Arc::clone(&self.validator),
        }
    }
}

impl<V> ContentCodec<V>
where
    V: BlockValidator,
{
    /// Creates a codec that validates decoded records with `validator`.
    #[must_use]
    pub const fn new(validator: Arc<V>) -> Self {
        Self { validator }
    }

    /// Encodes `document` for persistence.
    ///
    /// # Errors
    ///
    /// See [`encode_for_storage`].
    pub fn encode_for_storage(
        &self,
        document: &BlockDocument,
    ) -> Result<StorageRepresentation, CodecError> {
        encode_for_storage(document)
    }

    /// Decodes and re-validates a persisted document.
    ///
    /// # Errors
    ///
    /// See [`decode_from_storage`].
    pub fn decode_from_storage(
        &self,
        representation: &StorageRepresentation,
    ) -> Result<BlockDocument, CodecError> {
        decode_from_storage(representation, self.validator.as_ref())
    }

    /// Renders `document` to sanitised display markup.
    ///
    /// # Errors
    ///
    /// See [`render_for_display`].
    pub fn render_for_display(&self, document: &BlockDocument) -> Result<SanitizedMarkup, CodecError> {
        render_for_display(document)
    }

    /// Renders `document` to plain text.
    ///
    /// # Errors
    ///
    /// See [`render_plain_text`].
    pub fn render_plain_text(&self, document: &BlockDocument) -> Result<String, CodecError> {
        render_plain_text(document)
    }
}
