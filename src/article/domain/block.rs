//! Block types representing the polymorphic units of an article body.
//!
//! A block is a closed sum type: each variant carries only the fields that
//! are meaningful for it. The payload structs are serialised in camelCase,
//! which is the shape exchanged with the API and the document store.

use super::{InvalidHeadingLevel, ParseBlockKindError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Variant tag of a [`Block`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    /// Section heading.
    Heading,
    /// Rich-text paragraph.
    Paragraph,
    /// Pull quote with attribution.
    Quote,
    /// Image with alt text, caption and credit.
    Image,
}

impl BlockKind {
    /// Returns the canonical tag used in storage records.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Heading => "heading",
            Self::Paragraph => "paragraph",
            Self::Quote => "quote",
            Self::Image => "image",
        }
    }
}

impl TryFrom<&str> for BlockKind {
    type Error = ParseBlockKindError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "heading" => Ok(Self::Heading),
            "paragraph" => Ok(Self::Paragraph),
            "quote" => Ok(Self::Quote),
            "image" => Ok(Self::Image),
            _ => Err(ParseBlockKindError(value.to_owned())),
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Heading level. Only levels 2 to 4 exist; level 1 is the article title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum HeadingLevel {
    /// Second-level heading.
    H2,
    /// Third-level heading.
    H3,
    /// Fourth-level heading.
    H4,
}

impl HeadingLevel {
    /// Returns the numeric level.
    #[must_use]
    pub const fn value(self) -> u8 {
        match self {
            Self::H2 => 2,
            Self::H3 => 3,
            Self::H4 => 4,
        }
    }

    /// Maps any markup heading level into the supported range.
    ///
    /// Levels at or below 2 become [`HeadingLevel::H2`], levels at or above 4
    /// become [`HeadingLevel::H4`].
    #[must_use]
    pub const fn clamped(level: u8) -> Self {
        match level {
            0..=2 => Self::H2,
            3 => Self::H3,
            _ => Self::H4,
        }
    }
}

impl TryFrom<u8> for HeadingLevel {
    type Error = InvalidHeadingLevel;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            2 => Ok(Self::H2),
            3 => Ok(Self::H3),
            4 => Ok(Self::H4),
            other => Err(InvalidHeadingLevel(other)),
        }
    }
}

impl From<HeadingLevel> for u8 {
    fn from(level: HeadingLevel) -> Self {
        level.value()
    }
}

/// A section heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct HeadingBlock {
    /// Plain heading text.
    pub text: String,
    /// Heading level.
    pub level: HeadingLevel,
}

impl HeadingBlock {
    /// Creates a heading.
    #[must_use]
    pub fn new(text: impl Into<String>, level: HeadingLevel) -> Self {
        Self {
            text: text.into(),
            level,
        }
    }
}

/// A paragraph of constrained rich text.
///
/// `rich_text` may only contain emphasis, strong and hyperlink marks. The
/// restriction is enforced by validation, not by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ParagraphBlock {
    /// Rich-text markup.
    pub rich_text: String,
}

impl ParagraphBlock {
    /// Creates a paragraph.
    #[must_use]
    pub fn new(rich_text: impl Into<String>) -> Self {
        Self {
            rich_text: rich_text.into(),
        }
    }
}

/// A pull quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct QuoteBlock {
    /// Quoted text.
    pub text: String,
    /// Who said it. May be empty.
    #[serde(default)]
    pub attribution: String,
}

impl QuoteBlock {
    /// Creates a quote without attribution.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            attribution: String::new(),
        }
    }

    /// Sets the attribution.
    #[must_use]
    pub fn with_attribution(mut self, attribution: impl Into<String>) -> Self {
        self.attribution = attribution.into();
        self
    }
}

/// An image.
///
/// Once validated, alt text, caption and credit hold tag-free text with
/// `&`, `<` and `>` escaped as entities.
///
/// # Examples
///
/// ```
/// use gazette::article::domain::ImageBlock;
///
/// let pending = ImageBlock::new("");
/// assert!(!pending.is_complete());
///
/// let image = ImageBlock::new("https://cdn.example.com/harbour.jpg")
///     .with_alt_text("Boats in the harbour")
///     .with_credit("Staff photographer");
/// assert!(image.is_complete());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ImageBlock {
    /// Image location. Empty while the upload is still pending.
    #[serde(default)]
    pub url: String,
    /// Alternative text.
    #[serde(default)]
    pub alt_text: String,
    /// Caption shown below the image.
    #[serde(default)]
    pub caption: String,
    /// Photographer or agency credit.
    #[serde(default)]
    pub credit: String,
}

impl ImageBlock {
    /// Creates an image with the given url and empty text fields.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            alt_text: String::new(),
            caption: String::new(),
            credit: String::new(),
        }
    }

    /// Sets the alternative text.
    #[must_use]
    pub fn with_alt_text(mut self, alt_text: impl Into<String>) -> Self {
        self.alt_text = alt_text.into();
        self
    }

    /// Sets the caption.
    #[must_use]
    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = caption.into();
        self
    }

    /// Sets the credit.
    #[must_use]
    pub fn with_credit(mut self, credit: impl Into<String>) -> Self {
        self.credit = credit.into();
        self
    }

    /// Returns `true` once the image has a url.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.url.trim().is_empty()
    }
}

/// A single typed unit of article content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Section heading.
    Heading(HeadingBlock),
    /// Rich-text paragraph.
    Paragraph(ParagraphBlock),
    /// Pull quote.
    Quote(QuoteBlock),
    /// Image.
    Image(ImageBlock),
}

impl Block {
    /// Creates a heading block.
    #[must_use]
    pub fn heading(text: impl Into<String>, level: HeadingLevel) -> Self {
        Self::Heading(HeadingBlock::new(text, level))
    }

    /// Creates a paragraph block.
    #[must_use]
    pub fn paragraph(rich_text: impl Into<String>) -> Self {
        Self::Paragraph(ParagraphBlock::new(rich_text))
    }

    /// Creates a quote block.
    #[must_use]
    pub fn quote(text: impl Into<String>, attribution: impl Into<String>) -> Self {
        Self::Quote(QuoteBlock::new(text).with_attribution(attribution))
    }

    /// Creates an image block with only a url.
    #[must_use]
    pub fn image(url: impl Into<String>) -> Self {
        Self::Image(ImageBlock::new(url))
    }

    /// Returns the variant tag.
    #[must_use]
    pub const fn kind(&self) -> BlockKind {
        match self {
            Self::Heading(_) => BlockKind::Heading,
            Self::Paragraph(_) => BlockKind::Paragraph,
            Self::Quote(_) => BlockKind::Quote,
            Self::Image(_) => BlockKind::Image,
        }
    }
}

/// Non-fatal observations produced while validating a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationAdvisory {
    /// The paragraph has no text; it is kept as spacing.
    Empty,
    /// The image has no url yet and cannot be published.
    IncompleteImage,
}

/// A block that has passed validation and carries its normalised payload.
///
/// Only the validator constructs values of this type, so a document made of
/// normalised blocks never holds disallowed markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedBlock {
    block: Block,
    advisories: Vec<ValidationAdvisory>,
}

impl NormalizedBlock {
    pub(crate) const fn new(block: Block, advisories: Vec<ValidationAdvisory>) -> Self {
        Self { block, advisories }
    }

    /// Returns the normalised block.
    #[must_use]
    pub const fn block(&self) -> &Block {
        &self.block
    }

    /// Consumes the wrapper and returns the normalised block.
    #[must_use]
    pub fn into_block(self) -> Block {
        self.block
    }

    /// Returns the variant tag.
    #[must_use]
    pub const fn kind(&self) -> BlockKind {
        self.block.kind()
    }

    /// Returns advisories raised during validation.
    #[must_use]
    pub fn advisories(&self) -> &[ValidationAdvisory] {
        &self.advisories
    }

    /// Returns `true` if the given advisory was raised.
    #[must_use]
    pub fn has_advisory(&self, advisory: ValidationAdvisory) -> bool {
        self.advisories.contains(&advisory)
    }
}

/// A field-level edit applied to an existing block.
///
/// Each edit targets exactly one variant; applying it to another variant is
/// rejected, so editing never changes a block's variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockEdit {
    /// Replaces the heading text.
    HeadingText(String),
    /// Changes the heading level.
    HeadingLevel(HeadingLevel),
    /// Replaces the paragraph markup.
    ParagraphRichText(String),
    /// Replaces the quoted text.
    QuoteText(String),
    /// Replaces the quote attribution.
    QuoteAttribution(String),
    /// Sets the image url.
    ImageUrl(String),
    /// Sets the image alternative text.
    ImageAltText(String),
    /// Sets the image caption.
    ImageCaption(String),
    /// Sets the image credit.
    ImageCredit(String),
    /// Replaces the whole payload with one of the same variant.
    Replace(Block),
}

impl BlockEdit {
    /// Returns the variant this edit applies to.
    #[must_use]
    pub const fn target_kind(&self) -> BlockKind {
        match self {
            Self::HeadingText(_) | Self::HeadingLevel(_) => BlockKind::Heading,
            Self::ParagraphRichText(_) => BlockKind::Paragraph,
            Self::QuoteText(_) | Self::QuoteAttribution(_) => BlockKind::Quote,
            Self::ImageUrl(_)
            | Self::ImageAltText(_)
            | Self::ImageCaption(_)
            | Self::ImageCredit(_) => BlockKind::Image,
            Self::Replace(block) => block.kind(),
        }
    }

    /// Applies the edit to a copy of `block`.
    ///
    /// Returns `None` when the edit targets a different variant.
    #[must_use]
    pub fn apply_to(self, block: &Block) -> Option<Block> {
        let mut edited = block.clone();
        match (&mut edited, self) {
            (Block::Heading(heading), Self::HeadingText(text)) => heading.text = text,
            (Block::Heading(heading), Self::HeadingLevel(level)) => heading.level = level,
            (Block::Paragraph(paragraph), Self::ParagraphRichText(rich_text)) => {
                paragraph.rich_text = rich_text;
            }
            (Block::Quote(quote), Self::QuoteText(text)) => quote.text = text,
            (Block::Quote(quote), Self::QuoteAttribution(attribution)) => {
                quote.attribution = attribution;
            }
            (Block::Image(image), Self::ImageUrl(url)) => image.url = url,
            (Block::Image(image), Self::ImageAltText(alt_text)) => image.alt_text = alt_text,
            (Block::Image(image), Self::ImageCaption(caption)) => image.caption = caption,
            (Block::Image(image), Self::ImageCredit(credit)) => image.credit = credit,
            (_, Self::Replace(replacement)) if replacement.kind() == block.kind() => {
                return Some(replacement);
            }
            _ => return None,
        }
        Some(edited)
    }
}
