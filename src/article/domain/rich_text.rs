//! Allow-list model of paragraph rich text.
//!
//! Only three marks exist: emphasis, strong and hyperlink. Parsing is strict:
//! any other element, any attribute outside the allow-list, and any link
//! with an unsafe scheme is rejected rather than stripped. Normalisation then
//! canonicalises the surviving marks (`b` becomes `strong`, `i` becomes
//! `em`) and collapses empty or redundant wrappers.

use super::MarkupError;
use super::markup::{Token, tokenize};

/// Maximum mark nesting accepted by the parser.
const MAX_NESTING_DEPTH: usize = 32;

/// Schemes accepted for hyperlink targets.
const LINK_SCHEMES: &[&str] = &["http", "https", "mailto"];

/// Schemes accepted for image sources.
const IMAGE_SCHEMES: &[&str] = &["http", "https"];

/// A permitted inline mark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mark {
    /// Emphasis, rendered as `<em>`.
    Emphasis,
    /// Strong importance, rendered as `<strong>`.
    Strong,
    /// Hyperlink, rendered as `<a href>`.
    Link {
        /// Link target.
        href: String,
    },
}

impl Mark {
    /// Returns the canonical element name.
    #[must_use]
    pub const fn element(&self) -> &'static str {
        match self {
            Self::Emphasis => "em",
            Self::Strong => "strong",
            Self::Link { .. } => "a",
        }
    }
}

/// A node of parsed rich text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    /// Decoded text.
    Text(String),
    /// Marked content.
    Marked {
        /// The applied mark.
        mark: Mark,
        /// Content inside the mark.
        children: Vec<Inline>,
    },
}

/// Parsed paragraph rich text.
///
/// # Examples
///
/// ```
/// use gazette::article::domain::RichText;
///
/// let text = RichText::parse("Hello <b>world</b><i></i>")
///     .expect("permitted markup")
///     .normalized();
/// assert_eq!(text.to_markup(), "Hello <strong>world</strong>");
/// assert_eq!(text.plain_text(), "Hello world");
///
/// assert!(RichText::parse("<script>alert(1)</script>").is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RichText {
    nodes: Vec<Inline>,
}

struct Frame {
    mark: Mark,
    children: Vec<Inline>,
}

impl RichText {
    /// Parses markup restricted to the permitted marks.
    ///
    /// # Errors
    ///
    /// Returns [`MarkupError`] when the markup contains an element or
    /// attribute outside the allow-list, a link with an unsafe target, or
    /// unbalanced tags.
    pub fn parse(markup: &str) -> Result<Self, MarkupError> {
        let mut root = Vec::new();
        let mut stack: Vec<Frame> = Vec::new();

        for token in tokenize(markup) {
            match token {
                Token::Text(raw) => {
                    let text = html_escape::decode_html_entities(&raw).into_owned();
                    current(&mut root, &mut stack).push(Inline::Text(text));
                }
                Token::Open {
                    name,
                    attributes,
                    self_closing,
                } => {
                    let mark = mark_for(&name, &attributes)?;
                    if self_closing {
                        continue;
                    }
                    if matches!(mark, Mark::Link { .. })
                        && stack.iter().any(|frame| matches!(frame.mark, Mark::Link { .. }))
                    {
                        return Err(MarkupError::malformed("links cannot be nested"));
                    }
                    if stack.len() >= MAX_NESTING_DEPTH {
                        return Err(MarkupError::malformed("marks are nested too deeply"));
                    }
                    stack.push(Frame {
                        mark,
                        children: Vec::new(),
                    });
                }
                Token::Close { name } => {
                    let element = canonical_element(&name)
                        .ok_or_else(|| MarkupError::DisallowedElement(name.clone()))?;
                    let frame = stack.pop().ok_or_else(|| {
                        MarkupError::malformed(format!("unexpected closing tag </{name}>"))
                    })?;
                    if frame.mark.element() != element {
                        return Err(MarkupError::malformed(format!(
                            "</{name}> does not close <{}>",
                            frame.mark.element()
                        )));
                    }
                    current(&mut root, &mut stack).push(Inline::Marked {
                        mark: frame.mark,
                        children: frame.children,
                    });
                }
                Token::Comment => return Err(MarkupError::DisallowedElement("!--".to_owned())),
            }
        }

        if let Some(frame) = stack.last() {
            return Err(MarkupError::malformed(format!(
                "unclosed <{}>",
                frame.mark.element()
            )));
        }

        Ok(Self { nodes: root })
    }

    /// Returns the canonical form of this text.
    ///
    /// Empty wrappers are removed, wrappers around whitespace only are
    /// unwrapped, a mark nested inside the same mark is flattened, and
    /// adjacent identical marks and adjacent text runs are merged.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            nodes: normalize_nodes(self.nodes),
        }
    }

    /// Parses, normalises and re-serialises `markup` in one step.
    ///
    /// # Errors
    ///
    /// Returns [`MarkupError`] under the same conditions as [`Self::parse`].
    pub fn normalize_markup(markup: &str) -> Result<String, MarkupError> {
        Ok(Self::parse(markup)?.normalized().to_markup())
    }

    /// Returns the parsed nodes.
    #[must_use]
    pub fn nodes(&self) -> &[Inline] {
        &self.nodes
    }

    /// Serialises the text back to markup with canonical element names and
    /// escaped text.
    #[must_use]
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        write_markup(&self.nodes, &mut out);
        out
    }

    /// Returns the text content without marks.
    #[must_use]
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        write_plain(&self.nodes, &mut out);
        out
    }

    /// Returns `true` when the text content is empty or whitespace-only.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.plain_text().trim().is_empty()
    }
}

fn current<'a>(root: &'a mut Vec<Inline>, stack: &'a mut [Frame]) -> &'a mut Vec<Inline> {
    match stack.last_mut() {
        Some(frame) => &mut frame.children,
        None => root,
    }
}

fn canonical_element(name: &str) -> Option<&'static str> {
    match name {
        "em" | "i" => Some("em"),
        "strong" | "b" => Some("strong"),
        "a" => Some("a"),
        _ => None,
    }
}

fn mark_for(name: &str, attributes: &[(String, String)]) -> Result<Mark, MarkupError> {
    match canonical_element(name) {
        Some("em") => {
            reject_attributes(name, attributes, &[])?;
            Ok(Mark::Emphasis)
        }
        Some("strong") => {
            reject_attributes(name, attributes, &[])?;
            Ok(Mark::Strong)
        }
        Some(_) => {
            reject_attributes(name, attributes, &["href"])?;
            let href = attributes
                .iter()
                .find(|(key, _)| key == "href")
                .map(|(_, value)| value.trim())
                .filter(|value| !value.is_empty())
                .ok_or(MarkupError::MissingHref)?;
            if !is_safe_link(href) {
                return Err(MarkupError::UnsafeLink(href.to_owned()));
            }
            Ok(Mark::Link {
                href: href.to_owned(),
            })
        }
        None => Err(MarkupError::DisallowedElement(name.to_owned())),
    }
}

fn reject_attributes(
    element: &str,
    attributes: &[(String, String)],
    allowed: &[&str],
) -> Result<(), MarkupError> {
    match attributes
        .iter()
        .find(|(key, _)| !allowed.contains(&key.as_str()))
    {
        Some((attribute, _)) => Err(MarkupError::DisallowedAttribute {
            element: element.to_owned(),
            attribute: attribute.clone(),
        }),
        None => Ok(()),
    }
}

fn normalize_nodes(nodes: Vec<Inline>) -> Vec<Inline> {
    let mut out = Vec::with_capacity(nodes.len());
    for node in nodes {
        match node {
            Inline::Text(text) => push_text(&mut out, text),
            Inline::Marked { mark, children } => {
                let normalized = normalize_nodes(children);
                if normalized.is_empty() {
                    continue;
                }
                if nodes_are_blank(&normalized) {
                    for child in normalized {
                        push_node(&mut out, child);
                    }
                    continue;
                }
                let mut flattened = Vec::with_capacity(normalized.len());
                for child in normalized {
                    match child {
                        Inline::Marked {
                            mark: inner,
                            children: inner_children,
                        } if inner == mark => {
                            for grandchild in inner_children {
                                push_node(&mut flattened, grandchild);
                            }
                        }
                        other => push_node(&mut flattened, other),
                    }
                }
                push_node(
                    &mut out,
                    Inline::Marked {
                        mark,
                        children: flattened,
                    },
                );
            }
        }
    }
    out
}

fn push_text(out: &mut Vec<Inline>, text: String) {
    if text.is_empty() {
        return;
    }
    if let Some(Inline::Text(previous)) = out.last_mut() {
        previous.push_str(&text);
    } else {
        out.push(Inline::Text(text));
    }
}

fn push_node(out: &mut Vec<Inline>, node: Inline) {
    match node {
        Inline::Text(text) => push_text(out, text),
        Inline::Marked { mark, children } => {
            if let Some(Inline::Marked {
                mark: previous_mark,
                children: previous_children,
            }) = out.last_mut()
                && *previous_mark == mark
            {
                let mut merged = std::mem::take(previous_children);
                merged.extend(children);
                *previous_children = normalize_nodes(merged);
            } else {
                out.push(Inline::Marked { mark, children });
            }
        }
    }
}

fn nodes_are_blank(nodes: &[Inline]) -> bool {
    let mut text = String::new();
    write_plain(nodes, &mut text);
    text.trim().is_empty()
}

fn write_markup(nodes: &[Inline], out: &mut String) {
    for node in nodes {
        match node {
            Inline::Text(text) => out.push_str(&html_escape::encode_text(text)),
            Inline::Marked { mark, children } => {
                match mark {
                    Mark::Link { href } => {
                        out.push_str("<a href=\"");
                        out.push_str(&html_escape::encode_double_quoted_attribute(href));
                        out.push_str("\">");
                    }
                    Mark::Emphasis | Mark::Strong => {
                        out.push('<');
                        out.push_str(mark.element());
                        out.push('>');
                    }
                }
                write_markup(children, out);
                out.push_str("</");
                out.push_str(mark.element());
                out.push('>');
            }
        }
    }
}

fn write_plain(nodes: &[Inline], out: &mut String) {
    for node in nodes {
        match node {
            Inline::Text(text) => out.push_str(text),
            Inline::Marked { children, .. } => write_plain(children, out),
        }
    }
}

fn has_allowed_scheme(target: &str, schemes: &[&str]) -> bool {
    let compact: String = target
        .chars()
        .filter(|character| !character.is_ascii_whitespace() && !character.is_ascii_control())
        .collect::<String>()
        .to_ascii_lowercase();
    if compact.is_empty() {
        return false;
    }
    match compact.split_once(':') {
        None => true,
        Some((scheme, _)) if scheme.contains(['/', '?', '#']) => true,
        Some((scheme, _)) => schemes.contains(&scheme),
    }
}

/// Returns `true` when `href` is relative or uses http, https or mailto.
pub(crate) fn is_safe_link(href: &str) -> bool {
    has_allowed_scheme(href, LINK_SCHEMES)
}

/// Returns `true` when `url` is relative or uses http or https.
pub(crate) fn is_safe_image_source(url: &str) -> bool {
    has_allowed_scheme(url, IMAGE_SCHEMES)
}
