//! Rich-text tag insertion for the news content field.
//!
//! The editor toolbar wraps the current selection in an HTML tag pair and
//! moves the caret past the closing tag. Positions count characters
//! (Unicode scalar values), not bytes.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// A selection inside the content field, in characters.
///
/// `start == end` is a plain caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// A collapsed selection at `at`.
    #[must_use]
    pub const fn caret(at: usize) -> Self {
        Self { start: at, end: at }
    }

    /// Orders the bounds and clamps them to a text of `len` characters.
    #[must_use]
    pub fn clamped(self, len: usize) -> Self {
        let (start, end) = if self.start <= self.end {
            (self.start, self.end)
        } else {
            (self.end, self.start)
        };
        Self {
            start: start.min(len),
            end: end.min(len),
        }
    }
}

/// Tags offered by the editor toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkupTag {
    Bold,
    Italic,
    Heading,
    List,
}

impl MarkupTag {
    pub const ALL: [Self; 4] = [Self::Bold, Self::Italic, Self::Heading, Self::List];

    /// Opening and closing tag inserted around the selection.
    #[must_use]
    pub const fn delimiters(self) -> (&'static str, &'static str) {
        match self {
            Self::Bold => ("<b>", "</b>"),
            Self::Italic => ("<i>", "</i>"),
            Self::Heading => ("<h3>", "</h3>"),
            Self::List => ("<ul><li>", "</li></ul>"),
        }
    }

    /// Name used in form actions and CLI flags.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bold => "bold",
            Self::Italic => "italic",
            Self::Heading => "heading",
            Self::List => "list",
        }
    }

    /// Toolbar tooltip.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Bold => "Negrita",
            Self::Italic => "Itálica",
            Self::Heading => "Título",
            Self::List => "Lista",
        }
    }
}

impl FromStr for MarkupTag {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| UnknownTag(s.to_string()))
    }
}

/// Returned when a toolbar action names no known tag.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown markup tag: {0}")]
pub struct UnknownTag(pub String);

/// Result of inserting a tag pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupEdit {
    pub text: String,
    /// Caret position after the closing tag, in characters.
    pub cursor: usize,
}

/// Wrap `selection` of `text` in `open`/`close`.
///
/// The caret lands immediately after the inserted closing tag.
///
/// ```
/// use alamo_core::markup::{Selection, insert_markup};
///
/// let edit = insert_markup("hello", Selection::new(0, 5), "<b>", "</b>");
/// assert_eq!(edit.text, "<b>hello</b>");
/// assert_eq!(edit.cursor, 12);
/// ```
#[must_use]
pub fn insert_markup(text: &str, selection: Selection, open: &str, close: &str) -> MarkupEdit {
    let len = text.chars().count();
    let Selection { start, end } = selection.clamped(len);

    let start_byte = byte_offset(text, start);
    let end_byte = byte_offset(text, end);

    let mut out = String::with_capacity(text.len() + open.len() + close.len());
    out.push_str(&text[..start_byte]);
    out.push_str(open);
    out.push_str(&text[start_byte..end_byte]);
    out.push_str(close);
    out.push_str(&text[end_byte..]);

    MarkupEdit {
        text: out,
        cursor: end + open.chars().count() + close.chars().count(),
    }
}

/// Insert a toolbar tag around `selection`.
#[must_use]
pub fn apply_tag(text: &str, selection: Selection, tag: MarkupTag) -> MarkupEdit {
    let (open, close) = tag.delimiters();
    insert_markup(text, selection, open, close)
}

fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map_or(text.len(), |(offset, _)| offset)
}
