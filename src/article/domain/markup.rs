//! Lenient tokenizer for flat HTML-like markup.
//!
//! The tokenizer never fails. Anything that does not look like a tag is
//! emitted as text, including a `<` that is not followed by a tag name and a
//! tag left unterminated at the end of input. Consumers decide how strict to
//! be: the rich-text parser rejects unknown elements, the legacy migrator
//! tolerates them.

use std::iter::Peekable;
use std::str::Chars;

/// Elements whose content is raw text up to the matching close tag.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// A lexical unit of markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    /// Text exactly as written, entities not decoded.
    Text(String),
    /// An opening or self-closing tag. Names are lowercased and attribute
    /// values have their entities decoded.
    Open {
        name: String,
        attributes: Vec<(String, String)>,
        self_closing: bool,
    },
    /// A closing tag.
    Close { name: String },
    /// A comment, doctype or processing instruction.
    Comment,
}

impl Token {
    /// Returns the attribute value for `key`, if present.
    pub(crate) fn attribute(&self, key: &str) -> Option<&str> {
        match self {
            Self::Open { attributes, .. } => attributes
                .iter()
                .find(|(name, _)| name == key)
                .map(|(_, value)| value.as_str()),
            _ => None,
        }
    }
}

/// Splits `input` into tokens.
pub(crate) fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut text = String::new();
    let mut chars = input.chars().peekable();

    while let Some(character) = chars.next() {
        if character != '<' {
            text.push(character);
            continue;
        }

        match chars.peek().copied() {
            Some(next) if next.is_ascii_alphabetic() => {
                let mut raw = String::from('<');
                match read_open_tag(&mut chars, &mut raw) {
                    Some(token) => {
                        flush_text(&mut tokens, &mut text);
                        let raw_text_name = raw_text_element(&token);
                        tokens.push(token);
                        if let Some(name) = raw_text_name {
                            read_raw_text(&mut chars, &name, &mut tokens);
                        }
                    }
                    None => text.push_str(&raw),
                }
            }
            Some('/') => {
                chars.next();
                let mut raw = String::from("</");
                match read_close_tag(&mut chars, &mut raw) {
                    Some(token) => {
                        flush_text(&mut tokens, &mut text);
                        tokens.push(token);
                    }
                    None => text.push_str(&raw),
                }
            }
            Some('!' | '?') => {
                flush_text(&mut tokens, &mut text);
                skip_comment(&mut chars);
                tokens.push(Token::Comment);
            }
            _ => text.push(character),
        }
    }

    flush_text(&mut tokens, &mut text);
    tokens
}

fn flush_text(tokens: &mut Vec<Token>, text: &mut String) {
    if !text.is_empty() {
        tokens.push(Token::Text(std::mem::take(text)));
    }
}

fn raw_text_element(token: &Token) -> Option<String> {
    match token {
        Token::Open {
            name,
            self_closing: false,
            ..
        } if RAW_TEXT_ELEMENTS.contains(&name.as_str()) => Some(name.clone()),
        _ => None,
    }
}

fn is_name_char(character: char) -> bool {
    character.is_ascii_alphanumeric() || matches!(character, '-' | ':' | '_')
}

fn read_name(chars: &mut Peekable<Chars<'_>>, raw: &mut String) -> String {
    let mut name = String::new();
    while let Some(&character) = chars.peek() {
        if !is_name_char(character) {
            break;
        }
        raw.push(character);
        name.push(character.to_ascii_lowercase());
        chars.next();
    }
    name
}

fn skip_whitespace(chars: &mut Peekable<Chars<'_>>, raw: &mut String) {
    while let Some(&character) = chars.peek() {
        if !character.is_whitespace() {
            break;
        }
        raw.push(character);
        chars.next();
    }
}

fn read_open_tag(chars: &mut Peekable<Chars<'_>>, raw: &mut String) -> Option<Token> {
    let name = read_name(chars, raw);
    let mut attributes = Vec::new();

    loop {
        skip_whitespace(chars, raw);
        let character = chars.next()?;
        raw.push(character);
        match character {
            '>' => {
                return Some(Token::Open {
                    name,
                    attributes,
                    self_closing: false,
                });
            }
            '/' if chars.peek() == Some(&'>') => {
                chars.next();
                raw.push('>');
                return Some(Token::Open {
                    name,
                    attributes,
                    self_closing: true,
                });
            }
            '/' => {}
            first => {
                let mut key = first.to_ascii_lowercase().to_string();
                key.push_str(&read_name(chars, raw));
                skip_whitespace(chars, raw);
                let value = if chars.peek() == Some(&'=') {
                    chars.next();
                    raw.push('=');
                    skip_whitespace(chars, raw);
                    read_attribute_value(chars, raw)?
                } else {
                    String::new()
                };
                attributes.push((key, html_escape::decode_html_entities(&value).into_owned()));
            }
        }
    }
}

fn read_attribute_value(chars: &mut Peekable<Chars<'_>>, raw: &mut String) -> Option<String> {
    let mut value = String::new();
    match chars.peek().copied() {
        Some(quote @ ('"' | '\'')) => {
            chars.next();
            raw.push(quote);
            loop {
                let character = chars.next()?;
                raw.push(character);
                if character == quote {
                    return Some(value);
                }
                value.push(character);
            }
        }
        _ => {
            while let Some(&character) = chars.peek() {
                if character.is_whitespace() || character == '>' {
                    break;
                }
                raw.push(character);
                value.push(character);
                chars.next();
            }
            Some(value)
        }
    }
}

fn read_close_tag(chars: &mut Peekable<Chars<'_>>, raw: &mut String) -> Option<Token> {
    if !chars.peek().is_some_and(char::is_ascii_alphabetic) {
        return None;
    }
    let name = read_name(chars, raw);
    loop {
        let character = chars.next()?;
        raw.push(character);
        if character == '>' {
            return Some(Token::Close { name });
        }
    }
}

fn skip_comment(chars: &mut Peekable<Chars<'_>>) {
    let mut seen = String::new();
    for character in chars.by_ref() {
        seen.push(character);
        let is_comment = seen.starts_with("!--");
        if character == '>' && (!is_comment || (seen.ends_with("-->") && seen.len() >= 5)) {
            return;
        }
    }
}

/// Consumes the body of a raw-text element and its closing tag.
fn read_raw_text(chars: &mut Peekable<Chars<'_>>, name: &str, tokens: &mut Vec<Token>) {
    let terminator = format!("</{name}");
    let mut body = String::new();
    let mut lowered = String::new();

    while let Some(character) = chars.next() {
        body.push(character);
        lowered.push(character.to_ascii_lowercase());
        if lowered.ends_with(&terminator) {
            for rest in chars.by_ref() {
                if rest == '>' {
                    break;
                }
            }
            let content_len = body.chars().count().saturating_sub(terminator.chars().count());
            let content: String = body.chars().take(content_len).collect();
            if !content.is_empty() {
                tokens.push(Token::Text(content));
            }
            tokens.push(Token::Close {
                name: name.to_owned(),
            });
            return;
        }
    }

    if !body.is_empty() {
        tokens.push(Token::Text(body));
    }
}

/// Returns the text content of `input` with every tag removed.
///
/// Entities are left as written and raw-text element bodies are dropped.
pub(crate) fn strip_tags(input: &str) -> String {
    let mut text = String::new();
    let mut raw_depth = 0_usize;
    for token in tokenize(input) {
        match token {
            Token::Text(value) if raw_depth == 0 => text.push_str(&value),
            Token::Open {
                ref name,
                self_closing: false,
                ..
            } if RAW_TEXT_ELEMENTS.contains(&name.as_str()) => raw_depth += 1,
            Token::Close { ref name } if RAW_TEXT_ELEMENTS.contains(&name.as_str()) => {
                raw_depth = raw_depth.saturating_sub(1);
            }
            _ => {}
        }
    }
    text
}
