//! Lossless storage encoding of block documents.
//!
//! A document is stored as an ordered list of tagged records:
//!
//! ```json
//! {
//!   "schemaVersion": 1,
//!   "revision": 4,
//!   "origin": "authored",
//!   "blocks": [
//!     { "type": "heading", "text": "Intro", "level": 2 },
//!     { "type": "paragraph", "richText": "Hello <strong>world</strong>" }
//!   ]
//! }
//! ```
//!
//! Decoding re-validates every record and rejects tags it does not know.

use crate::article::{
    domain::{Block, BlockDocument, BlockKind, DocumentOrigin, Revision},
    error::CodecError,
    ports::validator::{BlockValidator, ValidationMode},
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Schema version written by [`encode_for_storage`].
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Persisted form of a block document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageRepresentation {
    /// Schema version of the record layout.
    pub schema_version: u32,
    /// Structural revision of the document when it was saved.
    pub revision: Revision,
    /// How the document came into existence.
    #[serde(default)]
    pub origin: DocumentOrigin,
    /// Block records in rendering order.
    pub blocks: Vec<BlockRecord>,
}

/// One tagged block record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockRecord {
    /// Variant tag.
    #[serde(rename = "type")]
    pub kind: String,
    /// Variant fields.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl StorageRepresentation {
    /// Serialises the representation to JSON.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Serialization`] if serialisation fails.
    pub fn to_json(&self) -> Result<String, CodecError> {
        serde_json::to_string(self).map_err(|err| CodecError::serialization(err.to_string()))
    }

    /// Parses a representation from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Serialization`] if the JSON does not describe a
    /// storage representation.
    pub fn from_json(json: &str) -> Result<Self, CodecError> {
        serde_json::from_str(json).map_err(|err| CodecError::serialization(err.to_string()))
    }
}

/// Encodes a document for persistence.
///
/// # Errors
///
/// Returns [`CodecError::Serialization`] if a block payload cannot be
/// represented as a JSON object.
pub fn encode_for_storage(document: &BlockDocument) -> Result<StorageRepresentation, CodecError> {
    let blocks = document
        .snapshot()
        .iter()
        .map(|normalized| encode_block(normalized.block()))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(StorageRepresentation {
        schema_version: CURRENT_SCHEMA_VERSION,
        revision: document.revision(),
        origin: document.origin(),
        blocks,
    })
}

/// Decodes a persisted representation into a document.
///
/// Every record is validated in authoring mode, so a decoded document holds
/// the same normalised blocks that were encoded.
///
/// # Errors
///
/// Returns [`CodecError::UnsupportedSchemaVersion`] for unknown layouts,
/// [`CodecError::UnsupportedBlockVariant`] for unknown tags,
/// [`CodecError::MalformedRecord`] for records that do not match their
/// variant, and [`CodecError::InvalidRecord`] for records that fail
/// validation.
pub fn decode_from_storage<V>(
    representation: &StorageRepresentation,
    validator: &V,
) -> Result<BlockDocument, CodecError>
where
    V: BlockValidator + ?Sized,
{
    if representation.schema_version != CURRENT_SCHEMA_VERSION {
        return Err(CodecError::UnsupportedSchemaVersion(
            representation.schema_version,
        ));
    }

    let mut blocks = Vec::with_capacity(representation.blocks.len());
    for (position, record) in representation.blocks.iter().enumerate() {
        let block = decode_block(position, record)?;
        let kind = block.kind();
        let normalized = validator
            .validate(block, ValidationMode::Authoring)
            .map_err(|source| CodecError::InvalidRecord {
                position,
                kind,
                source,
            })?;
        blocks.push(normalized);
    }

    Ok(BlockDocument::from_parts(
        blocks,
        representation.revision,
        representation.origin,
    ))
}

fn encode_block(block: &Block) -> Result<BlockRecord, CodecError> {
    let value = match block {
        Block::Heading(heading) => serde_json::to_value(heading),
        Block::Paragraph(paragraph) => serde_json::to_value(paragraph),
        Block::Quote(quote) => serde_json::to_value(quote),
        Block::Image(image) => serde_json::to_value(image),
    }
    .map_err(|err| CodecError::serialization(err.to_string()))?;

    let Value::Object(fields) = value else {
        return Err(CodecError::serialization(format!(
            "{} payload did not serialise to an object",
            block.kind()
        )));
    };

    Ok(BlockRecord {
        kind: block.kind().as_str().to_owned(),
        fields,
    })
}

fn decode_block(position: usize, record: &BlockRecord) -> Result<Block, CodecError> {
    let kind = BlockKind::try_from(record.kind.as_str()).map_err(|err| {
        log::warn!("refusing to decode unsupported block variant '{}' at position {position}", err.0);
        CodecError::unsupported(position, err)
    })?;

    let fields = Value::Object(record.fields.clone());
    let malformed = |err: serde_json::Error| CodecError::MalformedRecord {
        position,
        kind,
        reason: err.to_string(),
    };

    let block = match kind {
        BlockKind::Heading => Block::Heading(serde_json::from_value(fields).map_err(malformed)?),
        BlockKind::Paragraph => {
            Block::Paragraph(serde_json::from_value(fields).map_err(malformed)?)
        }
        BlockKind::Quote => Block::Quote(serde_json::from_value(fields).map_err(malformed)?),
        BlockKind::Image => Block::Image(serde_json::from_value(fields).map_err(malformed)?),
    };
    Ok(block)
}
