/// Settings shared by every lookup a document performs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IniOptions {
    /// Compare keys and section names byte-for-byte. When false, both sides are lowercased first.
    pub case_sensitive: bool,
    /// Section used when an operation is called without one. Empty means the unnamed leading section.
    pub default_section: String,
}

impl Default for IniOptions {
    fn default() -> Self {
        Self {
            case_sensitive: true,
            default_section: String::new(),
        }
    }
}

impl IniOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    pub fn with_default_section(mut self, section: impl Into<String>) -> Self {
        self.default_section = section.into();
        self
    }

    /// Resolve an optional section argument to the section it refers to
    pub fn section<'a>(&'a self, section_name: Option<&'a str>) -> &'a str {
        section_name.unwrap_or(&self.default_section)
    }
}
