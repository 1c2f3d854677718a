use std::{
    convert::Infallible,
    fmt::{self, Display},
    fs, io,
    path::{Path, PathBuf},
    str::FromStr,
};

use log::{debug, trace, warn};

use crate::{
    encoding::{BOM, TextEncoding},
    error::IniError,
    line::ParsedLine,
    options::IniOptions,
    read::IniRead,
    section::IniSection,
    util::{is_valid_key, is_valid_section_name, join_list, names_equal},
};

/// A key with its value and the section it belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyPair<'a> {
    pub section: &'a str,
    pub key: &'a str,
    pub value: &'a str,
}

/// An INI document that writes back exactly what it read, plus whatever was changed.
///
/// Sections are kept in file order, the unnamed section first. Keys are looked up through
/// [`IniRead`]; section arguments are `None` for the default section configured in
/// [`IniOptions`].
#[derive(Clone, Debug)]
pub struct IniFile {
    path: Option<PathBuf>,
    encoding: TextEncoding,
    options: IniOptions,
    sections: Vec<IniSection>,
}

impl Default for IniFile {
    fn default() -> Self {
        Self::new(IniOptions::default())
    }
}

impl IniFile {
    /// Create an empty document holding only the unnamed section
    pub fn new(options: IniOptions) -> Self {
        let sections = vec![IniSection::unnamed(options.case_sensitive)];
        Self {
            path: None,
            encoding: TextEncoding::default(),
            options,
            sections,
        }
    }

    /// Parse in-memory text
    pub fn parse_str(text: &str, options: IniOptions) -> Self {
        let mut ini = Self::new(options);
        ini.read_lines(text);
        ini
    }

    /// Replace the contents of the document with the file at `path`.
    ///
    /// On failure the document is left empty. The path is only remembered when the file
    /// does not exist, so that [`IniFile::save`] can create it; a file that exists but could
    /// not be read is never overwritten.
    ///
    /// The text encoding and byte order mark of the file are kept for saving.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<(), IniError> {
        let path = path.as_ref();
        self.clear();

        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(source) => {
                warn!("cannot load {:?}: {}", path, source);
                if source.kind() == io::ErrorKind::NotFound {
                    self.path = Some(path.to_path_buf());
                }
                return Err(IniError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        self.path = Some(path.to_path_buf());

        let (text, encoding) = TextEncoding::decode(&bytes);
        if !encoding.is_utf8() {
            warn!("{:?} is not UTF-8, reading it as {}", path, encoding.name());
        }
        self.encoding = encoding;
        self.read_lines(&text);

        debug!(
            "loaded {:?}: {} sections, {} keys",
            path,
            self.sections.len(),
            self.sections.iter().map(IniSection::len).sum::<usize>()
        );
        Ok(())
    }

    fn read_lines(&mut self, text: &str) {
        let origin = self
            .path
            .as_deref()
            .map_or_else(|| "<memory>".to_owned(), |p| p.display().to_string());
        let mut current = 0;

        let text = match text.strip_prefix(BOM) {
            Some(rest) => {
                self.encoding = self.encoding.with_bom();
                rest
            }
            None => text,
        };

        for (idx, raw) in text.lines().enumerate() {
            let line_num = idx + 1;
            let line = ParsedLine::parse(raw);
            trace!("{}:{}: {:?}", origin, line_num, line.kind());

            if line.is_malformed() {
                warn!("{}:{}: malformed line {:?}", origin, line_num, raw);
            }
            if let Some(residue) = line.residue() {
                warn!(
                    "{}:{}: ignoring {:?} after the value, values cannot contain spaces",
                    origin,
                    line_num,
                    residue.trim()
                );
            }

            if let Some(name) = line.section_name() {
                match self.find_section(name) {
                    Some(existing) => {
                        warn!(
                            "{}:{}: section [{}] declared twice, merging into the first",
                            origin, line_num, name
                        );
                        current = existing;
                        self.sections[current].push_line(line);
                    }
                    None => {
                        self.sections
                            .push(IniSection::from_header(line, self.options.case_sensitive));
                        current = self.sections.len() - 1;
                    }
                }
                continue;
            }

            let key = line.key().map(str::to_owned);
            if self.sections[current].push_line(line) {
                warn!(
                    "{}:{}: key {:?} redefined, the last definition wins",
                    origin,
                    line_num,
                    key.unwrap_or_default()
                );
            }
        }
    }

    /// Write the document back to the file it was loaded from
    pub fn save(&self) -> Result<(), IniError> {
        let path = self.path.as_deref().ok_or(IniError::NoPath)?;
        self.save_as(path)
    }

    /// Write the document to `path` in the encoding it was read with.
    /// The document keeps its own path.
    pub fn save_as(&self, path: impl AsRef<Path>) -> Result<(), IniError> {
        let path = path.as_ref();
        let bytes = self.encoding.encode(&self.to_string());
        fs::write(path, bytes).map_err(|source| IniError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("saved {:?}: {} sections", path, self.sections.len());
        Ok(())
    }

    /// Drop every section and forget the path
    pub fn clear(&mut self) {
        self.path = None;
        self.encoding = TextEncoding::default();
        self.sections.clear();
        self.sections
            .push(IniSection::unnamed(self.options.case_sensitive));
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    pub fn options(&self) -> &IniOptions {
        &self.options
    }

    pub fn sections(&self) -> &[IniSection] {
        &self.sections
    }

    /// Index of the first section called `name`
    pub fn find_section(&self, name: &str) -> Option<usize> {
        self.sections
            .iter()
            .position(|section| names_equal(section.name(), name, self.options.case_sensitive))
    }

    pub fn section(&self, section_name: Option<&str>) -> Option<&IniSection> {
        let name = self.options.section(section_name);
        self.find_section(name).map(|idx| &self.sections[idx])
    }

    fn section_index_or_insert(&mut self, name: &str) -> usize {
        if let Some(idx) = self.find_section(name) {
            return idx;
        }
        if !is_valid_section_name(name) {
            warn!("section name {:?} is not alphanumeric and will not load back", name);
        }
        self.sections
            .push(IniSection::new(name, self.options.case_sensitive));
        self.sections.len() - 1
    }

    /// Set `key` to `value`, creating the section at the end of the document if needed
    pub fn set_key_value<T: ToString>(&mut self, section_name: Option<&str>, key: &str, value: T) {
        let value = value.to_string();
        if !is_valid_key(key) {
            warn!("key {:?} is not a valid key name and will not load back", key);
        }
        if value.contains(char::is_whitespace) {
            warn!("value {:?} of key {:?} contains whitespace and will not load back", value, key);
        }
        let name = self.options.section(section_name).to_owned();
        let idx = self.section_index_or_insert(&name);
        self.sections[idx].set_key(key, &value);
    }

    /// Set `key` to a comma separated list
    pub fn set_key_values<T: Display>(&mut self, section_name: Option<&str>, key: &str, values: &[T]) {
        self.set_key_value(section_name, key, join_list(values));
    }

    /// Remove `key`. Returns false if the section or key does not exist.
    pub fn delete_key(&mut self, section_name: Option<&str>, key: &str) -> bool {
        let name = self.options.section(section_name);
        match self.find_section(name) {
            Some(idx) => self.sections[idx].delete_key(key),
            None => false,
        }
    }

    /// Comment trailing the line that holds `key`
    pub fn comment_for(&self, section_name: Option<&str>, key: &str) -> Option<&str> {
        self.section(section_name)?.comment_for(key)
    }

    /// Names of the named sections in file order
    pub fn section_names(&self) -> Vec<&str> {
        self.sections
            .iter()
            .filter(|section| !section.is_unnamed())
            .map(IniSection::name)
            .collect()
    }

    pub fn key_names_in_section(&self, section_name: Option<&str>) -> Vec<&str> {
        self.section(section_name)
            .map(|section| section.key_names().collect())
            .unwrap_or_default()
    }

    pub fn all_key_pairs(&self) -> Vec<KeyPair<'_>> {
        self.sections
            .iter()
            .flat_map(|section| {
                section.key_pairs().map(|(key, value)| KeyPair {
                    section: section.name(),
                    key,
                    value,
                })
            })
            .collect()
    }
}

impl IniRead for IniFile {
    fn section_exists(&self, section_name: Option<&str>) -> bool {
        self.section(section_name).is_some()
    }

    fn key_exists(&self, section_name: Option<&str>, key: &str) -> bool {
        self.section(section_name)
            .is_some_and(|section| section.key_exists(key))
    }

    fn get_string(&self, section_name: Option<&str>, key: &str) -> Option<&str> {
        self.section(section_name)?.get_key(key)
    }
}

impl Display for IniFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for section in &self.sections {
            write!(f, "{}", section)?;
        }
        Ok(())
    }
}

impl FromStr for IniFile {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse_str(s, IniOptions::default()))
    }
}
