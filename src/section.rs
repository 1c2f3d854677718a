use std::fmt::{self, Display};

use indexmap::IndexMap as Map;

use crate::{
    line::{LINE_ENDING, ParsedLine},
    util::fold_case,
};

/// One `[name]` block of a document, or the unnamed block holding the lines before the first header.
///
/// Lines are kept in file order. The key index maps a (case-folded) key to the line
/// currently holding its value, so lookups don't walk the lines and edits land on the
/// line the key was read from.
#[derive(Clone, Debug)]
pub struct IniSection {
    name: String,
    header: ParsedLine,
    lines: Vec<ParsedLine>,
    keys: Map<String, usize>,
    case_sensitive: bool,
}

impl IniSection {
    /// The section holding everything before the first header. It is never written with a header.
    pub fn unnamed(case_sensitive: bool) -> Self {
        Self::with_header(String::new(), ParsedLine::blank(), case_sensitive)
    }

    /// A new section with a synthesized `[name]` header
    pub fn new(name: &str, case_sensitive: bool) -> Self {
        Self::with_header(name.to_owned(), ParsedLine::section(name), case_sensitive)
    }

    /// A section started by a header line read from a file
    pub fn from_header(header: ParsedLine, case_sensitive: bool) -> Self {
        let name = header.section_name().unwrap_or_default().to_owned();
        Self::with_header(name, header, case_sensitive)
    }

    fn with_header(name: String, header: ParsedLine, case_sensitive: bool) -> Self {
        Self {
            name,
            header,
            lines: Vec::new(),
            keys: Map::new(),
            case_sensitive,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_unnamed(&self) -> bool {
        self.name.is_empty()
    }

    pub fn header(&self) -> &ParsedLine {
        &self.header
    }

    pub fn lines(&self) -> &[ParsedLine] {
        &self.lines
    }

    /// Append a line read from a file.
    ///
    /// Returns true when the line redefines a key already present in this section.
    /// The later definition wins; both lines are kept so the file is written back as it was read.
    pub fn push_line(&mut self, line: ParsedLine) -> bool {
        let idx = self.lines.len();
        let redefined = match line.key() {
            Some(key) => {
                let folded = fold_case(key, self.case_sensitive).into_owned();
                self.keys.insert(folded, idx).is_some()
            }
            None => false,
        };
        self.lines.push(line);
        redefined
    }

    fn line_for(&self, key: &str) -> Option<&ParsedLine> {
        let idx = *self.keys.get(&*fold_case(key, self.case_sensitive))?;
        self.lines.get(idx)
    }

    pub fn key_exists(&self, key: &str) -> bool {
        self.keys
            .contains_key(&*fold_case(key, self.case_sensitive))
    }

    pub fn get_key(&self, key: &str) -> Option<&str> {
        self.line_for(key).and_then(ParsedLine::value)
    }

    /// Comment trailing the line that holds `key`
    pub fn comment_for(&self, key: &str) -> Option<&str> {
        self.line_for(key)
            .and_then(ParsedLine::comment)
            .map(|comment| comment.text())
    }

    /// Set the value of `key`.
    ///
    /// An existing line is edited in place, keeping its whitespace and comment.
    /// Otherwise a `key = value` line is appended to the section.
    pub fn set_key(&mut self, key: &str, value: &str) {
        let folded = fold_case(key, self.case_sensitive);
        if let Some(&idx) = self.keys.get(&*folded) {
            if let Some(line) = self.lines.get_mut(idx) {
                line.set_value(value);
            }
            return;
        }
        let folded = folded.into_owned();
        self.keys.insert(folded, self.lines.len());
        self.lines.push(ParsedLine::key_value(key, value));
    }

    /// Remove `key` together with every line defining it. Returns false if the key was absent.
    pub fn delete_key(&mut self, key: &str) -> bool {
        let folded = fold_case(key, self.case_sensitive);
        if !self.keys.contains_key(&*folded) {
            return false;
        }
        let case_sensitive = self.case_sensitive;
        self.lines.retain(|line| match line.key() {
            Some(line_key) => fold_case(line_key, case_sensitive) != folded,
            None => true,
        });
        self.reindex();
        true
    }

    fn reindex(&mut self) {
        self.keys.clear();
        for (idx, line) in self.lines.iter().enumerate() {
            if let Some(key) = line.key() {
                self.keys
                    .insert(fold_case(key, self.case_sensitive).into_owned(), idx);
            }
        }
    }

    /// Key names in the order they first appear, spelled as written
    pub fn key_names(&self) -> impl Iterator<Item = &str> {
        self.keys
            .values()
            .filter_map(|&idx| self.lines.get(idx).and_then(ParsedLine::key))
    }

    /// `(key, value)` pairs in the order the keys first appear
    pub fn key_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.keys.values().filter_map(|&idx| {
            let line = self.lines.get(idx)?;
            Some((line.key()?, line.value()?))
        })
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl Display for IniSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_unnamed() {
            write!(f, "{}{}", self.header, LINE_ENDING)?;
        }
        for line in &self.lines {
            write!(f, "{}{}", line, LINE_ENDING)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section_from(lines: &[&str], case_sensitive: bool) -> IniSection {
        let mut section = IniSection::new("Theme", case_sensitive);
        for line in lines {
            section.push_line(ParsedLine::parse(line));
        }
        section
    }

    #[test]
    fn test_lookup() {
        let section = section_from(&["; colours", "bg = black", "fg=white ; text"], true);
        assert!(section.key_exists("bg"));
        assert!(!section.key_exists("BG"));
        assert_eq!(section.get_key("fg"), Some("white"));
        assert_eq!(section.get_key("missing"), None);
        assert_eq!(section.comment_for("fg"), Some(" text"));
        assert_eq!(section.comment_for("bg"), None);
        assert_eq!(section.len(), 2);
    }

    #[test]
    fn test_set_key_in_place() {
        let mut section = section_from(&["bg   =  black   ; dark", "fg=white"], true);
        section.set_key("bg", "blue");
        assert_eq!(section.get_key("bg"), Some("blue"));
        assert_eq!(section.lines()[0].rebuild(), "bg   =  blue    ; dark");
        assert_eq!(section.lines().len(), 2);
    }

    #[test]
    fn test_set_key_appends() {
        let mut section = section_from(&["bg = black"], true);
        section.set_key("Logo", "Tau.png");
        assert_eq!(section.lines().len(), 2);
        assert_eq!(section.lines()[1].rebuild(), "Logo = Tau.png");
        assert_eq!(section.key_names().collect::<Vec<_>>(), ["bg", "Logo"]);

        // Setting again must not add another line
        section.set_key("Logo", "Tau.png");
        assert_eq!(section.lines().len(), 2);
    }

    #[test]
    fn test_delete_key() {
        let mut section = section_from(&["a = 1", "; keep me", "b = 2", "c = 3"], true);
        assert!(section.delete_key("b"));
        assert!(!section.key_exists("b"));
        assert_eq!(section.lines().len(), 3);
        // Indices after the removed line still resolve
        assert_eq!(section.get_key("c"), Some("3"));
        assert!(!section.delete_key("b"));
        assert_eq!(section.lines().len(), 3);
    }

    #[test]
    fn test_duplicate_keys() {
        let mut section = IniSection::new("Theme", true);
        assert!(!section.push_line(ParsedLine::parse("a = 1")));
        assert!(section.push_line(ParsedLine::parse("a = 2")));
        assert_eq!(section.get_key("a"), Some("2"));
        assert_eq!(section.key_names().collect::<Vec<_>>(), ["a"]);

        section.set_key("a", "3");
        assert_eq!(section.lines()[0].value(), Some("1"));
        assert_eq!(section.lines()[1].value(), Some("3"));

        assert!(section.delete_key("a"));
        assert!(section.lines().is_empty());
    }

    #[test]
    fn test_case_insensitive() {
        let mut section = section_from(&["Logo = a.png"], false);
        assert!(section.key_exists("logo"));
        assert_eq!(section.get_key("LOGO"), Some("a.png"));
        section.set_key("LOGO", "b.png");
        assert_eq!(section.lines().len(), 1);
        assert_eq!(section.lines()[0].rebuild(), "Logo = b.png");
        assert_eq!(section.key_pairs().collect::<Vec<_>>(), [("Logo", "b.png")]);
        assert!(section.delete_key("lOgO"));
        assert!(section.is_empty());
    }

    #[test]
    fn test_display() {
        let section = section_from(&["a = 1", "", "; note"], true);
        let expected = ["[Theme]", "a = 1", "", "; note", ""].join(LINE_ENDING);
        assert_eq!(section.to_string(), expected);

        let mut unnamed = IniSection::unnamed(true);
        unnamed.push_line(ParsedLine::parse("top=1"));
        assert_eq!(unnamed.to_string(), format!("top=1{}", LINE_ENDING));
    }
}
