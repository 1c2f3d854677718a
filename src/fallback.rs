use std::{fmt::Display, path::Path};

use crate::{document::IniFile, error::IniError, options::IniOptions, read::IniRead};

/// A document backed by a second, read-only "default" document.
///
/// Reads go to the primary document first and fall through to the default one only when
/// the primary lacks the key or section. Writes only ever touch the primary, so saving
/// persists the user's overrides and nothing else.
#[derive(Clone, Debug, Default)]
pub struct IniFileWithDefault {
    primary: IniFile,
    fallback: IniFile,
}

impl IniFileWithDefault {
    pub fn new(options: IniOptions) -> Self {
        Self {
            primary: IniFile::new(options.clone()),
            fallback: IniFile::new(options),
        }
    }

    /// Wrap two already populated documents
    pub fn from_documents(primary: IniFile, fallback: IniFile) -> Self {
        Self { primary, fallback }
    }

    /// Load the primary document
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<(), IniError> {
        self.primary.load(path)
    }

    /// Load the document consulted when the primary misses
    pub fn load_default(&mut self, path: impl AsRef<Path>) -> Result<(), IniError> {
        self.fallback.load(path)
    }

    pub fn save(&self) -> Result<(), IniError> {
        self.primary.save()
    }

    pub fn save_as(&self, path: impl AsRef<Path>) -> Result<(), IniError> {
        self.primary.save_as(path)
    }

    pub fn primary(&self) -> &IniFile {
        &self.primary
    }

    pub fn primary_mut(&mut self) -> &mut IniFile {
        &mut self.primary
    }

    pub fn fallback(&self) -> &IniFile {
        &self.fallback
    }

    pub fn set_key_value<T: ToString>(&mut self, section_name: Option<&str>, key: &str, value: T) {
        self.primary.set_key_value(section_name, key, value);
    }

    pub fn set_key_values<T: Display>(&mut self, section_name: Option<&str>, key: &str, values: &[T]) {
        self.primary.set_key_values(section_name, key, values);
    }

    /// Remove `key` from the primary. A default value, if any, becomes visible again.
    pub fn delete_key(&mut self, section_name: Option<&str>, key: &str) -> bool {
        self.primary.delete_key(section_name, key)
    }
}

impl IniRead for IniFileWithDefault {
    fn section_exists(&self, section_name: Option<&str>) -> bool {
        self.primary.section_exists(section_name) || self.fallback.section_exists(section_name)
    }

    fn key_exists(&self, section_name: Option<&str>, key: &str) -> bool {
        self.primary.key_exists(section_name, key) || self.fallback.key_exists(section_name, key)
    }

    fn get_string(&self, section_name: Option<&str>, key: &str) -> Option<&str> {
        self.primary
            .get_string(section_name, key)
            .or_else(|| self.fallback.get_string(section_name, key))
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn documents() -> IniFileWithDefault {
        let primary: IniFile = "alpha = master\n[Theme]\nLogo = mine.png\n".parse().unwrap();
        let fallback: IniFile = "alpha = x\nbeta = default\n[Theme]\nLogo = stock.png\nsize = 22\n[Audio]\nvolume = 80\n"
            .parse()
            .unwrap();
        IniFileWithDefault::from_documents(primary, fallback)
    }

    #[test]
    fn test_fallback_lookup() {
        let ini = documents();
        assert_eq!(ini.get_key_value(None, "alpha"), "master");
        assert_eq!(ini.get_key_value(None, "beta"), "default");
        assert_eq!(ini.get_key_value(None, "gamma"), "");
        assert!(ini.key_exists(None, "beta"));
        assert!(!ini.key_exists(None, "gamma"));

        assert_eq!(ini.get_key_value(Some("Theme"), "Logo"), "mine.png");
        assert_eq!(ini.get_int(Some("Theme"), "size"), 22);
        assert!(ini.section_exists(Some("Audio")));
        assert!(!ini.primary().section_exists(Some("Audio")));
        assert_eq!(ini.get_int(Some("Audio"), "volume"), 80);
        assert!(!ini.section_exists(Some("Video")));
    }

    #[test]
    fn test_writes_only_touch_primary() {
        let mut ini = documents();
        let untouched = ini.fallback().to_string();

        ini.set_key_value(Some("Audio"), "volume", 50);
        assert_eq!(ini.get_int(Some("Audio"), "volume"), 50);
        assert!(ini.primary().section_exists(Some("Audio")));

        ini.set_key_values(None, "rect", &[1, 2, 3, 4]);
        assert_eq!(ini.get_ints(None, "rect"), vec![1, 2, 3, 4]);

        // Deleting the override exposes the default again
        assert!(ini.delete_key(None, "alpha"));
        assert_eq!(ini.get_key_value(None, "alpha"), "x");
        // Nothing to delete in the primary
        assert!(!ini.delete_key(None, "beta"));
        assert_eq!(ini.get_key_value(None, "beta"), "default");

        assert_eq!(ini.fallback().to_string(), untouched);
    }

    #[test]
    fn test_load_and_save() {
        let dir = tempfile::tempdir().unwrap();
        let user = dir.path().join("user.ini");
        let defaults = dir.path().join("default.ini");
        fs::write(&user, "[Theme]\nLogo = mine.png ; chosen in menu\n").unwrap();
        fs::write(&defaults, "[Theme]\nLogo = stock.png\nFont = sans.ttf\n").unwrap();

        let mut ini = IniFileWithDefault::new(IniOptions::default());
        ini.load(&user).unwrap();
        ini.load_default(&defaults).unwrap();
        assert_eq!(ini.get_key_value(Some("Theme"), "Font"), "sans.ttf");

        ini.set_key_value(Some("Theme"), "Logo", "Tau.png");
        ini.save().unwrap();
        assert_eq!(
            fs::read_to_string(&user).unwrap(),
            "[Theme]\nLogo = Tau.png  ; chosen in menu\n".replace('\n', crate::line::LINE_ENDING)
        );
        assert_eq!(
            fs::read_to_string(&defaults).unwrap(),
            "[Theme]\nLogo = stock.png\nFont = sans.ttf\n"
        );
    }

    #[test]
    fn test_missing_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut ini = documents();
        assert!(ini.load_default(dir.path().join("missing.ini")).is_err());
        assert_eq!(ini.get_key_value(None, "alpha"), "master");
        assert_eq!(ini.get_key_value(None, "beta"), "");
    }
}
