//! Classification of single INI lines and their exact reconstruction.
//!
//! Every physical line of a document is kept as a [`ParsedLine`], so that writing the
//! document back reproduces the layout it was read with: indentation, whitespace around
//! `=`, the column of trailing comments and even text the parser could not make sense of.
//!
//! ```text
//!     Logo = old.png   ; comment
//! ```
//!
//! parses as leading whitespace `"    "`, key `Logo`, `" "` on both sides of `=`, value
//! `old.png` and the comment ` comment` at byte column 21.

use std::fmt::{self, Display, Write};

use crate::util::{is_key_char, is_valid_section_name};

pub const COMMENT_DELIMITER: char = ';';

/// Terminator written after every line on save
#[cfg(windows)]
pub const LINE_ENDING: &str = "\r\n";
#[cfg(not(windows))]
pub const LINE_ENDING: &str = "\n";

/// Trailing or whole-line comment, stored without its delimiter
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Comment {
    text: String,
    // Byte offset of the delimiter in the physical line
    column: usize,
}

impl Comment {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn column(&self) -> usize {
        self.column
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LineKind {
    /// Empty or whitespace-only line
    Blank,
    /// Line holding nothing but a comment
    Comment,
    /// `[name]`
    Section { name: String },
    /// `key<ws>=<ws>value`
    KeyValue {
        key: String,
        before_eq: String,
        after_eq: String,
        value: String,
        // Text following the value that is not part of it, e.g. ` b` in `key = a b`
        residue: String,
    },
    /// Content matching none of the above, kept verbatim
    Malformed { text: String },
}

/// One physical line of an INI file, split into its semantic parts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedLine {
    leading: String,
    kind: LineKind,
    // Whitespace between the content and the end of the line, only kept when there is no comment
    trailing: String,
    comment: Option<Comment>,
}

impl ParsedLine {
    /// Classify one line, given without its line terminator.
    pub fn parse(line: &str) -> Self {
        let body = line.trim_start();
        let leading = &line[..line.len() - body.len()];

        if body.is_empty() {
            return Self::blank_with(line);
        }

        if let Some(text) = body.strip_prefix(COMMENT_DELIMITER) {
            return Self {
                leading: leading.to_owned(),
                kind: LineKind::Comment,
                trailing: String::new(),
                comment: Some(Comment {
                    text: text.to_owned(),
                    column: leading.len(),
                }),
            };
        }

        let (content, comment) = match body.find(COMMENT_DELIMITER) {
            Some(idx) => {
                let content = &body[..idx];
                let comment = Comment {
                    text: body[idx + 1..].to_owned(),
                    column: leading.len() + idx,
                };
                (content, Some(comment))
            }
            None => (body, None),
        };

        let (kind, trailing) = parse_section(content)
            .or_else(|| parse_key_value(content))
            .unwrap_or_else(|| {
                let text = content.trim_end();
                (
                    LineKind::Malformed {
                        text: text.to_owned(),
                    },
                    &content[text.len()..],
                )
            });

        Self {
            leading: leading.to_owned(),
            kind,
            trailing: if comment.is_some() {
                String::new()
            } else {
                trailing.to_owned()
            },
            comment,
        }
    }

    pub fn blank() -> Self {
        Self::blank_with("")
    }

    fn blank_with(whitespace: &str) -> Self {
        Self {
            leading: whitespace.to_owned(),
            kind: LineKind::Blank,
            trailing: String::new(),
            comment: None,
        }
    }

    /// Synthesize a `[name]` header line
    pub fn section(name: &str) -> Self {
        Self {
            leading: String::new(),
            kind: LineKind::Section {
                name: name.to_owned(),
            },
            trailing: String::new(),
            comment: None,
        }
    }

    /// Synthesize a `key = value` line
    pub fn key_value(key: &str, value: &str) -> Self {
        Self {
            leading: String::new(),
            kind: LineKind::KeyValue {
                key: key.to_owned(),
                before_eq: " ".to_owned(),
                after_eq: " ".to_owned(),
                value: value.to_owned(),
                residue: String::new(),
            },
            trailing: String::new(),
            comment: None,
        }
    }

    pub fn kind(&self) -> &LineKind {
        &self.kind
    }

    pub fn leading_whitespace(&self) -> &str {
        &self.leading
    }

    pub fn comment(&self) -> Option<&Comment> {
        self.comment.as_ref()
    }

    pub fn section_name(&self) -> Option<&str> {
        match &self.kind {
            LineKind::Section { name } => Some(name),
            _ => None,
        }
    }

    pub fn key(&self) -> Option<&str> {
        match &self.kind {
            LineKind::KeyValue { key, .. } => Some(key),
            _ => None,
        }
    }

    pub fn value(&self) -> Option<&str> {
        match &self.kind {
            LineKind::KeyValue { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Text after the value which was not taken as part of it
    pub fn residue(&self) -> Option<&str> {
        match &self.kind {
            LineKind::KeyValue { residue, .. } if !residue.is_empty() => Some(residue),
            _ => None,
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self.kind, LineKind::Blank)
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self.kind, LineKind::Malformed { .. })
    }

    /// Replace the value of a key-value line, leaving whitespace and comment in place.
    ///
    /// Returns false for any other kind of line.
    pub fn set_value(&mut self, new_value: &str) -> bool {
        match &mut self.kind {
            LineKind::KeyValue { value, .. } => {
                value.clear();
                value.push_str(new_value);
                true
            }
            _ => false,
        }
    }

    /// Serialize the line back to text
    pub fn rebuild(&self) -> String {
        self.to_string()
    }
}

impl Display for ParsedLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut content = String::with_capacity(self.leading.len() + 32);
        content.push_str(&self.leading);
        match &self.kind {
            LineKind::Blank | LineKind::Comment => {}
            LineKind::Section { name } => {
                write!(content, "[{}]", name)?;
            }
            LineKind::KeyValue {
                key,
                before_eq,
                after_eq,
                value,
                residue,
            } => {
                write!(content, "{}{}={}{}{}", key, before_eq, after_eq, value, residue)?;
            }
            LineKind::Malformed { text } => content.push_str(text),
        }
        f.write_str(&content)?;

        match &self.comment {
            Some(comment) => {
                if !matches!(self.kind, LineKind::Comment) {
                    // Content running past the column pushes the comment one space after it
                    let pad = match comment.column.checked_sub(content.len()) {
                        Some(pad) => pad,
                        None => 1,
                    };
                    write!(f, "{:pad$}", "", pad = pad)?;
                }
                write!(f, "{}{}", COMMENT_DELIMITER, comment.text)
            }
            None => f.write_str(&self.trailing),
        }
    }
}

fn parse_section(content: &str) -> Option<(LineKind, &str)> {
    let declaration = content.trim_end();
    let name = declaration.strip_prefix('[')?.strip_suffix(']')?;
    if !is_valid_section_name(name) {
        return None;
    }
    let kind = LineKind::Section {
        name: name.to_owned(),
    };
    Some((kind, &content[declaration.len()..]))
}

fn parse_key_value(content: &str) -> Option<(LineKind, &str)> {
    let (key, rest) = split_while(content, is_key_char);
    if key.is_empty() {
        return None;
    }
    let (before_eq, rest) = split_while(rest, char::is_whitespace);
    let rest = rest.strip_prefix('=')?;
    let (after_eq, rest) = split_while(rest, char::is_whitespace);
    let (value, rest) = split_while(rest, |c| !c.is_whitespace());
    let residue = rest.trim_end();
    let kind = LineKind::KeyValue {
        key: key.to_owned(),
        before_eq: before_eq.to_owned(),
        after_eq: after_eq.to_owned(),
        value: value.to_owned(),
        residue: residue.to_owned(),
    };
    Some((kind, &rest[residue.len()..]))
}

fn split_while(input: &str, pred: impl Fn(char) -> bool) -> (&str, &str) {
    let end = input
        .char_indices()
        .find(|&(_, c)| !pred(c))
        .map_or(input.len(), |(idx, _)| idx);
    input.split_at(end)
}
