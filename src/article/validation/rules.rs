//! Individual validation rule implementations.
//!
//! Each rule is a pure function that validates and normalises one block
//! variant. Rules return the normalised block on success or a specific
//! `ValidationError` on failure.

use crate::article::{
    domain::{
        Block, BlockDocument, HeadingBlock, ImageBlock, NormalizedBlock, ParagraphBlock,
        QuoteBlock, RichText, ValidationAdvisory, is_safe_image_source, markup::strip_tags,
    },
    error::ValidationError,
    ports::validator::{ValidationConfig, ValidationMode, ValidationResult},
};
use html_escape::{decode_html_entities, encode_text};

/// Validates a block of any variant.
///
/// # Errors
///
/// Returns the error of the variant-specific rule.
pub fn validate_block(
    block: Block,
    mode: ValidationMode,
    config: &ValidationConfig,
) -> ValidationResult<NormalizedBlock> {
    match block {
        Block::Heading(heading) => validate_heading(&heading, config),
        Block::Paragraph(paragraph) => validate_paragraph(&paragraph, config),
        Block::Quote(quote) => validate_quote(&quote, config),
        Block::Image(image) => validate_image(&image, mode, config),
    }
}

/// Validates a heading and trims its text.
///
/// # Errors
///
/// Returns `ValidationError::EmptyText` if the text trims to empty, or
/// `ValidationError::TextTooLong` if it exceeds the configured limit.
pub fn validate_heading(
    heading: &HeadingBlock,
    config: &ValidationConfig,
) -> ValidationResult<NormalizedBlock> {
    let text = heading.text.trim();
    if text.is_empty() {
        return Err(ValidationError::empty_text("heading text"));
    }
    check_length("heading text", text, config.max_heading_length)?;

    Ok(NormalizedBlock::new(
        Block::Heading(HeadingBlock::new(text, heading.level)),
        Vec::new(),
    ))
}

/// Validates paragraph markup against the permitted marks and normalises it.
///
/// A paragraph without text is admitted with a
/// [`ValidationAdvisory::Empty`] advisory and its markup cleared.
///
/// # Errors
///
/// Returns `ValidationError::DisallowedMarkup` for markup outside the
/// allow-list, or `ValidationError::TextTooLong` for oversized markup.
///
/// # Examples
///
/// ```rust
/// use gazette::article::domain::{Block, ParagraphBlock};
/// use gazette::article::ports::validator::ValidationConfig;
/// use gazette::article::validation::rules::validate_paragraph;
///
/// let config = ValidationConfig::default();
/// let paragraph = ParagraphBlock::new("Hello <b>world</b>");
/// let normalized = validate_paragraph(&paragraph, &config).expect("valid paragraph");
///
/// assert_eq!(
///     normalized.block(),
///     &Block::paragraph("Hello <strong>world</strong>")
/// );
/// ```
pub fn validate_paragraph(
    paragraph: &ParagraphBlock,
    config: &ValidationConfig,
) -> ValidationResult<NormalizedBlock> {
    check_length("paragraph", &paragraph.rich_text, config.max_paragraph_length)?;
    let rich_text = RichText::parse(&paragraph.rich_text)?.normalized();

    if rich_text.is_blank() {
        return Ok(NormalizedBlock::new(
            Block::paragraph(String::new()),
            vec![ValidationAdvisory::Empty],
        ));
    }

    Ok(NormalizedBlock::new(
        Block::paragraph(rich_text.to_markup()),
        Vec::new(),
    ))
}

/// Validates a quote and trims its fields.
///
/// # Errors
///
/// Returns `ValidationError::EmptyText` if the quoted text trims to empty,
/// or `ValidationError::TextTooLong` for oversized fields.
pub fn validate_quote(
    quote: &QuoteBlock,
    config: &ValidationConfig,
) -> ValidationResult<NormalizedBlock> {
    let text = quote.text.trim();
    if text.is_empty() {
        return Err(ValidationError::empty_text("quote text"));
    }
    check_length("quote text", text, config.max_quote_length)?;
    let attribution = quote.attribution.trim();
    check_length("quote attribution", attribution, config.max_quote_length)?;

    Ok(NormalizedBlock::new(
        Block::Quote(QuoteBlock::new(text).with_attribution(attribution)),
        Vec::new(),
    ))
}

/// Validates an image and reduces its text fields to escaped plain text.
///
/// Alt text, caption and credit lose their markup and hold text escaped
/// with `&amp;`, `&lt;` and `&gt;`, ready to embed in display markup.
///
/// A missing url is an error only in [`ValidationMode::Publish`]; while
/// authoring it raises a [`ValidationAdvisory::IncompleteImage`] advisory.
///
/// # Errors
///
/// Returns `ValidationError::MissingUrl`, `ValidationError::InvalidImageUrl`
/// or `ValidationError::TextTooLong`. Several failures are combined with
/// `ValidationError::Multiple`.
pub fn validate_image(
    image: &ImageBlock,
    mode: ValidationMode,
    config: &ValidationConfig,
) -> ValidationResult<NormalizedBlock> {
    let mut errors = Vec::new();
    let mut advisories = Vec::new();

    let url = image.url.trim();
    if url.is_empty() {
        match mode {
            ValidationMode::Publish => errors.push(ValidationError::MissingUrl),
            ValidationMode::Authoring => advisories.push(ValidationAdvisory::IncompleteImage),
        }
    } else if !is_safe_image_source(url) {
        errors.push(ValidationError::InvalidImageUrl(url.to_owned()));
    }
    collect_error(
        &mut errors,
        check_length("image url", url, config.max_image_field_length),
    );

    let alt_text = escaped_text(&image.alt_text);
    let caption = escaped_text(&image.caption);
    let credit = escaped_text(&image.credit);
    for (field, value) in [
        ("image alt text", &alt_text),
        ("image caption", &caption),
        ("image credit", &credit),
    ] {
        collect_error(
            &mut errors,
            check_length(field, value, config.max_image_field_length),
        );
    }

    if let Some(error) = ValidationError::multiple(errors) {
        return Err(error);
    }

    Ok(NormalizedBlock::new(
        Block::Image(
            ImageBlock::new(url)
                .with_alt_text(alt_text)
                .with_caption(caption)
                .with_credit(credit),
        ),
        advisories,
    ))
}

/// Validates that the document does not exceed the block limit.
///
/// # Errors
///
/// Returns `ValidationError::TooManyBlocks` if the number of blocks exceeds
/// the configured limit.
pub fn validate_block_count(
    document: &BlockDocument,
    config: &ValidationConfig,
) -> ValidationResult<()> {
    let count = document.len();
    if count > config.max_blocks {
        return Err(ValidationError::TooManyBlocks {
            max: config.max_blocks,
            actual: count,
        });
    }
    Ok(())
}

/// Reduces an image text field to tag-free text with canonical escaping.
///
/// Tags are stripped before entities are decoded, so escaped angle brackets
/// survive as text. The result is re-escaped, which makes the rule
/// idempotent.
fn escaped_text(value: &str) -> String {
    let stripped = strip_tags(value);
    encode_text(decode_html_entities(&stripped).trim()).into_owned()
}

fn check_length(field: &'static str, value: &str, max: usize) -> ValidationResult<()> {
    let actual = value.chars().count();
    if actual > max {
        return Err(ValidationError::TextTooLong { field, max, actual });
    }
    Ok(())
}

fn collect_error(errors: &mut Vec<ValidationError>, result: ValidationResult<()>) {
    if let Err(error) = result {
        errors.push(error);
    }
}
