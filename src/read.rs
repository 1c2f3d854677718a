use std::str::FromStr;

use log::warn;

use crate::util::split_list;

/// Read access shared by plain and fallback documents.
///
/// Implementors answer the three raw lookups; the typed getters are built on top of
/// [`IniRead::get_string`]. A `None` section means the document's default section.
///
/// Absent keys read as an empty string, zero, `false` or an empty list. Values that
/// fail to convert read as the type's default and log a warning.
pub trait IniRead {
    fn section_exists(&self, section_name: Option<&str>) -> bool;

    fn key_exists(&self, section_name: Option<&str>, key: &str) -> bool;

    /// Raw value of `key`, `None` when the key is absent
    fn get_string(&self, section_name: Option<&str>, key: &str) -> Option<&str>;

    /// Raw value of `key`, empty when absent
    fn get_key_value(&self, section_name: Option<&str>, key: &str) -> &str {
        self.get_string(section_name, key).unwrap_or_default()
    }

    fn get_parsed<T: FromStr + Default>(&self, section_name: Option<&str>, key: &str) -> T {
        match self.get_string(section_name, key) {
            Some(value) => parse_or_default(key, value),
            None => T::default(),
        }
    }

    /// Comma separated list value. Each item converts independently.
    fn get_list<T: FromStr + Default>(&self, section_name: Option<&str>, key: &str) -> Vec<T> {
        match self.get_string(section_name, key) {
            Some(value) => split_list(value)
                .map(|item| parse_or_default(key, item))
                .collect(),
            None => Vec::new(),
        }
    }

    fn get_int(&self, section_name: Option<&str>, key: &str) -> i32 {
        self.get_parsed(section_name, key)
    }

    fn get_float(&self, section_name: Option<&str>, key: &str) -> f32 {
        self.get_parsed(section_name, key)
    }

    fn get_double(&self, section_name: Option<&str>, key: &str) -> f64 {
        self.get_parsed(section_name, key)
    }

    /// Accepts `true`/`false`, `yes`/`no`, `on`/`off` and `1`/`0` in any case
    fn get_bool(&self, section_name: Option<&str>, key: &str) -> bool {
        let Some(value) = self.get_string(section_name, key) else {
            return false;
        };
        match value.to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => true,
            "false" | "no" | "off" | "0" | "" => false,
            _ => {
                warn!("value {:?} of key {:?} is not a boolean, reading false", value, key);
                false
            }
        }
    }

    fn get_ints(&self, section_name: Option<&str>, key: &str) -> Vec<i32> {
        self.get_list(section_name, key)
    }

    fn get_floats(&self, section_name: Option<&str>, key: &str) -> Vec<f32> {
        self.get_list(section_name, key)
    }

    fn get_doubles(&self, section_name: Option<&str>, key: &str) -> Vec<f64> {
        self.get_list(section_name, key)
    }
}

fn parse_or_default<T: FromStr + Default>(key: &str, value: &str) -> T {
    if value.is_empty() {
        return T::default();
    }
    value.parse().unwrap_or_else(|_| {
        warn!(
            "value {:?} of key {:?} is not a valid {}, reading the default",
            value,
            key,
            std::any::type_name::<T>()
        );
        T::default()
    })
}
