//! Best-effort decomposition of legacy flat bodies into blocks.
//!
//! Legacy bodies are a single run of loosely formed markup. Top-level
//! headings, block quotes and images become their own blocks; everything
//! else is gathered into paragraphs split at block-element boundaries.
//! Permitted inline marks survive, other inline tags are dropped with their
//! text kept, and `script` and `style` bodies are discarded.

use crate::article::{
    domain::{
        Block, BlockDocument, DocumentOrigin, HeadingLevel, ImageBlock, NormalizedBlock,
        Revision, is_safe_link,
        markup::{Token, strip_tags, tokenize},
    },
    ports::validator::{BlockValidator, ValidationMode},
};
use html_escape::{decode_html_entities, encode_double_quoted_attribute, encode_text};
use std::sync::Arc;

/// Elements whose start and end split paragraphs.
const BLOCK_BOUNDARIES: &[&str] = &[
    "address", "article", "aside", "center", "dd", "div", "dl", "dt", "figcaption", "footer",
    "header", "li", "main", "nav", "ol", "p", "pre", "section", "table", "tbody", "td", "tfoot",
    "th", "thead", "tr", "ul",
];

/// Elements that never have content.
const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input", "link", "meta", "wbr"];

/// Elements whose content is discarded.
const DISCARDED_ELEMENTS: &[&str] = &["script", "style", "template"];

/// Inline marks carried into paragraph markup.
const INLINE_MARKS: &[&str] = &["b", "em", "i", "strong"];

/// Separators that introduce a trailing quote attribution.
const ATTRIBUTION_DASHES: &[&str] = &["\u{2014}", "--"];

/// Converts legacy flat markup into a block document.
///
/// Migration never fails. Content that cannot be expressed as a valid block
/// degrades to plain text, and if nothing decomposes the whole body becomes
/// paragraph text. Text too long for one paragraph is split at whitespace
/// across several, so a body with any text yields at least one block. The result is marked [`DocumentOrigin::Migrated`] and must
/// be confirmed by an editor before publication.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use gazette::article::domain::{Block, HeadingLevel};
/// use gazette::article::migration::LegacyMigrator;
/// use gazette::article::validation::DefaultBlockValidator;
///
/// let migrator = LegacyMigrator::new(Arc::new(DefaultBlockValidator::new()));
/// let document = migrator.migrate("<h2>Intro</h2><p>Hello <b>world</b></p>");
///
/// let blocks: Vec<&Block> = document.snapshot().iter().map(|b| b.block()).collect();
/// assert_eq!(
///     blocks,
///     vec![
///         &Block::heading("Intro", HeadingLevel::H2),
///         &Block::paragraph("Hello <strong>world</strong>"),
///     ]
/// );
/// assert!(document.requires_confirmation());
/// ```
#[derive(Debug)]
pub struct LegacyMigrator<V> {
    validator: Arc<V>,
}

impl<V> Clone for LegacyMigrator<V> {
    fn clone(&self) -> Self {
        Self {
            validator: Arc::clone(&self.validator),
        }
    }
}

impl<V> LegacyMigrator<V>
where
    V: BlockValidator,
{
    /// Creates a migrator that validates produced blocks with `validator`.
    #[must_use]
    pub const fn new(validator: Arc<V>) -> Self {
        Self { validator }
    }

    /// Decomposes `markup` into a migrated block document.
    #[must_use]
    pub fn migrate(&self, markup: &str) -> BlockDocument {
        let tokens = tokenize(markup);
        let mut assembly = Assembly::new(self.validator.as_ref());
        assembly.walk(&tokens);
        assembly.flush_paragraph();

        let mut blocks = assembly.blocks;
        if blocks.is_empty() {
            let text = collapse_whitespace(&decode_html_entities(&strip_tags(markup)));
            text_paragraphs(self.validator.as_ref(), &text, &mut blocks);
        }

        log::info!("migrated legacy body into {} block(s)", blocks.len());
        BlockDocument::from_parts(blocks, Revision::INITIAL, DocumentOrigin::Migrated)
    }
}

struct Assembly<'a, V: ?Sized> {
    validator: &'a V,
    blocks: Vec<NormalizedBlock>,
    paragraph: String,
    links: Vec<bool>,
}

impl<'a, V> Assembly<'a, V>
where
    V: BlockValidator + ?Sized,
{
    const fn new(validator: &'a V) -> Self {
        Self {
            validator,
            blocks: Vec::new(),
            paragraph: String::new(),
            links: Vec::new(),
        }
    }

    fn walk(&mut self, tokens: &[Token]) {
        let mut index = 0;
        while let Some(token) = tokens.get(index) {
            index += 1;
            match token {
                Token::Text(raw) => self.push_text(raw),
                Token::Comment => {}
                Token::Close { name } => self.close_element(name),
                Token::Open {
                    name, self_closing, ..
                } => {
                    if *self_closing || VOID_ELEMENTS.contains(&name.as_str()) {
                        self.void_element(token, name);
                        continue;
                    }
                    if !is_structural(name) {
                        self.open_inline(token, name);
                        continue;
                    }
                    let (body, next) = element_body(tokens, index, name);
                    index = next;
                    self.structural_element(name, body);
                }
            }
        }
    }

    fn structural_element(&mut self, name: &str, body: &[Token]) {
        if DISCARDED_ELEMENTS.contains(&name) {
            return;
        }
        self.flush_paragraph();
        if let Some(level) = heading_level(name) {
            self.push_block(Block::heading(
                plain_text(body),
                HeadingLevel::clamped(level),
            ));
        } else if name == "blockquote" {
            let (text, attribution) = quote_parts(body);
            self.push_block(Block::quote(text, attribution));
        } else {
            self.figure(body);
        }
    }

    fn figure(&mut self, body: &[Token]) {
        let Some(image) = body.iter().find(|token| is_open(token, "img")) else {
            self.walk(body);
            self.flush_paragraph();
            return;
        };
        let caption = body
            .iter()
            .position(|token| is_open(token, "figcaption"))
            .map(|at| escaped_text(element_body(body, at + 1, "figcaption").0))
            .unwrap_or_default();
        self.push_block(Block::Image(image_from(image).with_caption(caption)));
    }

    fn void_element(&mut self, token: &Token, name: &str) {
        match name {
            "br" | "hr" => self.flush_paragraph(),
            "img" => {
                self.flush_paragraph();
                self.push_block(Block::Image(image_from(token)));
            }
            _ => {}
        }
    }

    fn open_inline(&mut self, token: &Token, name: &str) {
        if BLOCK_BOUNDARIES.contains(&name) {
            self.flush_paragraph();
        } else if INLINE_MARKS.contains(&name) {
            self.paragraph.push('<');
            self.paragraph.push_str(name);
            self.paragraph.push('>');
        } else if name == "a" {
            let href = token
                .attribute("href")
                .map(str::trim)
                .filter(|href| !href.is_empty() && is_safe_link(href));
            if let Some(target) = href {
                self.paragraph.push_str("<a href=\"");
                self.paragraph
                    .push_str(&encode_double_quoted_attribute(target));
                self.paragraph.push_str("\">");
            }
            self.links.push(href.is_some());
        }
    }

    fn close_element(&mut self, name: &str) {
        if BLOCK_BOUNDARIES.contains(&name) {
            self.flush_paragraph();
        } else if INLINE_MARKS.contains(&name) {
            self.paragraph.push_str("</");
            self.paragraph.push_str(name);
            self.paragraph.push('>');
        } else if name == "a" && self.links.pop() == Some(true) {
            self.paragraph.push_str("</a>");
        }
    }

    fn push_text(&mut self, raw: &str) {
        let mut after_space = self.paragraph.is_empty() || self.paragraph.ends_with(' ');
        for character in raw.chars() {
            if character.is_whitespace() {
                if !after_space {
                    self.paragraph.push(' ');
                    after_space = true;
                }
            } else {
                self.paragraph.push(character);
                after_space = false;
            }
        }
    }

    fn flush_paragraph(&mut self) {
        self.links.clear();
        let collected = std::mem::take(&mut self.paragraph);
        let markup = collected.trim();
        let text = collapse_whitespace(&decode_html_entities(&strip_tags(markup)));
        if text.is_empty() {
            return;
        }

        match self
            .validator
            .validate(Block::paragraph(markup), ValidationMode::Authoring)
        {
            Ok(normalized) => self.blocks.push(normalized),
            Err(err) => {
                log::debug!("legacy paragraph markup rejected, keeping its text: {err}");
                text_paragraphs(self.validator, &text, &mut self.blocks);
            }
        }
    }

    fn push_block(&mut self, block: Block) {
        let kind = block.kind();
        let fallback = fallback_text(&block);
        match self.validator.validate(block, ValidationMode::Authoring) {
            Ok(normalized) => self.blocks.push(normalized),
            Err(err) if fallback.is_empty() => {
                log::warn!("dropping legacy {kind} content that cannot be migrated: {err}");
            }
            Err(err) => {
                log::warn!("keeping legacy {kind} content as paragraph text: {err}");
                text_paragraphs(self.validator, &fallback, &mut self.blocks);
            }
        }
    }
}

/// Appends `text` as escaped paragraphs, halving it at whitespace until
/// every piece passes validation.
fn text_paragraphs<V>(validator: &V, text: &str, blocks: &mut Vec<NormalizedBlock>)
where
    V: BlockValidator + ?Sized,
{
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return;
    }
    let block = Block::paragraph(encode_text(trimmed).into_owned());
    let err = match validator.validate(block, ValidationMode::Authoring) {
        Ok(normalized) => {
            blocks.push(normalized);
            return;
        }
        Err(error) => error,
    };
    let Some((head, tail)) = split_near_middle(trimmed) else {
        log::warn!("dropping legacy text no paragraph can hold: {err}");
        return;
    };
    text_paragraphs(validator, head, blocks);
    text_paragraphs(validator, tail, blocks);
}

/// Splits trimmed `text` into two non-empty halves, preferring the
/// whitespace nearest before the middle. Returns `None` for a single
/// character.
fn split_near_middle(text: &str) -> Option<(&str, &str)> {
    let middle = text
        .char_indices()
        .nth(text.chars().count().div_ceil(2))
        .map(|(at, _)| at)?;
    let before = text
        .get(..middle)
        .and_then(|head| head.rfind(char::is_whitespace))
        .filter(|at| *at > 0);
    let after = || {
        text.get(middle..)
            .and_then(|tail| tail.find(char::is_whitespace))
            .map(|offset| middle + offset)
    };
    text.split_at_checked(before.or_else(after).unwrap_or(middle))
}

/// Returns the plain text a rejected block degrades to.
fn fallback_text(block: &Block) -> String {
    match block {
        Block::Heading(heading) => heading.text.clone(),
        Block::Paragraph(paragraph) => {
            collapse_whitespace(&decode_html_entities(&strip_tags(&paragraph.rich_text)))
        }
        Block::Quote(quote) if quote.attribution.trim().is_empty() => quote.text.clone(),
        Block::Quote(quote) => format!("{} \u{2014} {}", quote.text, quote.attribution),
        Block::Image(image) => decode_html_entities(&image.caption).into_owned(),
    }
}

fn is_structural(name: &str) -> bool {
    heading_level(name).is_some()
        || matches!(name, "blockquote" | "figure")
        || DISCARDED_ELEMENTS.contains(&name)
}

fn is_open(token: &Token, element: &str) -> bool {
    matches!(token, Token::Open { name, .. } if name == element)
}

fn heading_level(name: &str) -> Option<u8> {
    name.strip_prefix('h')
        .and_then(|digits| digits.parse::<u8>().ok())
        .filter(|level| (1..=6).contains(level))
}

/// Returns the tokens inside the element opened just before `start` and the
/// index following its closing tag. An unclosed element runs to the end.
fn element_body<'t>(tokens: &'t [Token], start: usize, element: &str) -> (&'t [Token], usize) {
    let mut depth = 0_usize;
    for (index, token) in tokens.iter().enumerate().skip(start) {
        match token {
            Token::Open {
                name,
                self_closing: false,
                ..
            } if name == element => depth += 1,
            Token::Close { name } if name == element => {
                if depth == 0 {
                    return (tokens.get(start..index).unwrap_or_default(), index + 1);
                }
                depth -= 1;
            }
            _ => {}
        }
    }
    (tokens.get(start..).unwrap_or_default(), tokens.len())
}

/// Builds an image from an `img` tag. The tokenizer decodes attribute
/// values, so alt text is escaped again before validation strips tags.
fn image_from(token: &Token) -> ImageBlock {
    ImageBlock::new(token.attribute("src").unwrap_or_default().trim())
        .with_alt_text(encode_text(token.attribute("alt").unwrap_or_default()))
}

/// Returns the decoded text of `tokens` with whitespace collapsed.
fn plain_text(tokens: &[Token]) -> String {
    collapse_whitespace(&decode_html_entities(&escaped_text(tokens)))
}

/// Returns the text of `tokens` as written, entities kept, with whitespace
/// collapsed.
fn escaped_text(tokens: &[Token]) -> String {
    let mut text = String::new();
    let mut discarded = 0_usize;
    for token in tokens {
        match token {
            Token::Text(raw) if discarded == 0 => text.push_str(raw),
            Token::Open {
                name,
                self_closing: false,
                ..
            } if DISCARDED_ELEMENTS.contains(&name.as_str()) => discarded += 1,
            Token::Close { name } if DISCARDED_ELEMENTS.contains(&name.as_str()) => {
                discarded = discarded.saturating_sub(1);
            }
            Token::Open { name, .. } | Token::Close { name }
                if name == "br" || BLOCK_BOUNDARIES.contains(&name.as_str()) =>
            {
                text.push(' ');
            }
            _ => {}
        }
    }
    collapse_whitespace(&text)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Splits quote content into text and attribution.
///
/// A `cite` element supplies the attribution when present; otherwise the
/// text after the last dash separator is used.
fn quote_parts(body: &[Token]) -> (String, String) {
    if let Some(at) = body.iter().position(|token| is_open(token, "cite")) {
        let (cite, next) = element_body(body, at + 1, "cite");
        let before = body.get(..at).unwrap_or_default();
        let after = body.get(next..).unwrap_or_default();
        let text = collapse_whitespace(&format!("{} {}", plain_text(before), plain_text(after)));
        let attribution = plain_text(cite)
            .trim_start_matches(['\u{2014}', '-', ' '])
            .to_owned();
        return (text, attribution);
    }
    split_attribution(&plain_text(body))
}

fn split_attribution(text: &str) -> (String, String) {
    let separator = ATTRIBUTION_DASHES
        .iter()
        .filter_map(|dash| text.rfind(dash).map(|at| (at, dash.len())))
        .max_by_key(|(at, _)| *at);

    let Some((at, len)) = separator else {
        return (text.to_owned(), String::new());
    };
    let quote = text.get(..at).unwrap_or_default().trim();
    let attribution = text.get(at + len..).unwrap_or_default().trim();
    if quote.is_empty() || attribution.is_empty() {
        return (text.to_owned(), String::new());
    }
    (quote.to_owned(), attribution.to_owned())
}
