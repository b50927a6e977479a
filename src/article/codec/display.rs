//! Rendering of block documents for readers.
//!
//! Display markup is produced only from normalised blocks. Text fields are
//! escaped and paragraph markup is re-parsed through the rich-text
//! allow-list, so nothing an author typed reaches the output unsanitised.

use crate::article::{
    domain::{Block, BlockDocument, HeadingBlock, ImageBlock, QuoteBlock, RichText},
    error::CodecError,
};
use html_escape::{decode_html_entities, encode_double_quoted_attribute, encode_text};
use serde::Serialize;
use std::fmt;

/// Markup that is safe to embed in a page.
///
/// Values are only constructed by the display renderer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SanitizedMarkup(String);

impl SanitizedMarkup {
    pub(crate) const fn new(markup: String) -> Self {
        Self(markup)
    }

    /// Returns the markup as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the wrapper and returns the markup.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }

    /// Returns `true` when nothing was rendered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<str> for SanitizedMarkup {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SanitizedMarkup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Renders a document to sanitised display markup.
///
/// Blocks are rendered in order and separated by newlines. Images without a
/// url are left out.
///
/// # Errors
///
/// Returns [`CodecError::Unrenderable`] if a paragraph no longer parses
/// against the rich-text allow-list.
pub fn render_for_display(document: &BlockDocument) -> Result<SanitizedMarkup, CodecError> {
    let mut fragments = Vec::with_capacity(document.len());
    for (position, normalized) in document.snapshot().iter().enumerate() {
        let fragment = match normalized.block() {
            Block::Heading(heading) => Some(render_heading(heading)),
            Block::Paragraph(paragraph) => Some(render_paragraph(position, &paragraph.rich_text)?),
            Block::Quote(quote) => Some(render_quote(quote)),
            Block::Image(image) => render_image(position, image),
        };
        fragments.extend(fragment);
    }
    Ok(SanitizedMarkup::new(fragments.join("\n")))
}

/// Renders a document to plain text.
///
/// Non-empty blocks are separated by a blank line. Images contribute their
/// caption.
///
/// # Errors
///
/// Returns [`CodecError::Unrenderable`] if a paragraph no longer parses
/// against the rich-text allow-list.
pub fn render_plain_text(document: &BlockDocument) -> Result<String, CodecError> {
    let mut fragments = Vec::with_capacity(document.len());
    for (position, normalized) in document.snapshot().iter().enumerate() {
        let fragment = match normalized.block() {
            Block::Heading(heading) => heading.text.clone(),
            Block::Paragraph(paragraph) => parse_paragraph(position, &paragraph.rich_text)?
                .plain_text()
                .trim()
                .to_owned(),
            Block::Quote(quote) if quote.attribution.is_empty() => quote.text.clone(),
            Block::Quote(quote) => format!("{}\n\u{2014} {}", quote.text, quote.attribution),
            Block::Image(image) => decode_html_entities(&image.caption).into_owned(),
        };
        if !fragment.is_empty() {
            fragments.push(fragment);
        }
    }
    Ok(fragments.join("\n\n"))
}

fn parse_paragraph(position: usize, markup: &str) -> Result<RichText, CodecError> {
    RichText::parse(markup)
        .map(RichText::normalized)
        .map_err(|source| CodecError::Unrenderable { position, source })
}

fn render_heading(heading: &HeadingBlock) -> String {
    let level = heading.level.value();
    format!("<h{level}>{}</h{level}>", encode_text(&heading.text))
}

fn render_paragraph(position: usize, markup: &str) -> Result<String, CodecError> {
    let rich_text = parse_paragraph(position, markup)?;
    Ok(format!("<p>{}</p>", rich_text.to_markup()))
}

fn render_quote(quote: &QuoteBlock) -> String {
    let mut out = format!("<blockquote><p>{}</p>", encode_text(&quote.text));
    if !quote.attribution.is_empty() {
        out.push_str("<cite>\u{2014} ");
        out.push_str(&encode_text(&quote.attribution));
        out.push_str("</cite>");
    }
    out.push_str("</blockquote>");
    out
}

fn render_image(position: usize, image: &ImageBlock) -> Option<String> {
    if !image.is_complete() {
        log::debug!("omitting incomplete image at position {position} from display");
        return None;
    }

    let mut out = format!(
        "<figure><img src=\"{}\" alt=\"{}\">",
        encode_double_quoted_attribute(&image.url),
        encode_double_quoted_attribute(&decode_html_entities(&image.alt_text))
    );

    let caption = match (image.caption.is_empty(), image.credit.is_empty()) {
        (true, true) => None,
        (false, true) => Some(reescaped(&image.caption)),
        (true, false) => Some(format!("<small>{}</small>", reescaped(&image.credit))),
        (false, false) => Some(format!(
            "{} <small>{}</small>",
            reescaped(&image.caption),
            reescaped(&image.credit)
        )),
    };
    if let Some(figcaption) = caption {
        out.push_str("<figcaption>");
        out.push_str(&figcaption);
        out.push_str("</figcaption>");
    }

    out.push_str("</figure>");
    Some(out)
}

/// Escapes an image text field for display, leaving existing entities intact.
fn reescaped(text: &str) -> String {
    encode_text(&decode_html_entities(text)).into_owned()
}
