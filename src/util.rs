use std::{borrow::Cow, fmt::Display};

/// Separator between the items of a list value, e.g. `rect=10,20,100,200`
pub const LIST_SEPARATOR: char = ',';

/// Normalize a key or section name for comparison.
///
/// Case-insensitive documents compare lowercased names; the stored name is never touched.
pub fn fold_case(name: &str, case_sensitive: bool) -> Cow<'_, str> {
    if case_sensitive || !name.chars().any(char::is_uppercase) {
        Cow::Borrowed(name)
    } else {
        Cow::Owned(name.to_lowercase())
    }
}

pub fn names_equal(a: &str, b: &str, case_sensitive: bool) -> bool {
    fold_case(a, case_sensitive) == fold_case(b, case_sensitive)
}

/// Characters allowed in a key name
pub fn is_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// Section names must be a non-empty alphanumeric run to survive a reload
pub fn is_valid_section_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric())
}

pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty() && key.chars().all(is_key_char)
}

/// Split a list value into its trimmed items. An empty value has no items.
pub fn split_list(value: &str) -> impl Iterator<Item = &str> {
    let value = value.trim();
    value
        .split(LIST_SEPARATOR)
        .filter(move |_| !value.is_empty())
        .map(str::trim)
}

pub fn join_list<T: Display>(values: &[T]) -> String {
    let mut joined = String::new();
    for (idx, value) in values.iter().enumerate() {
        if idx > 0 {
            joined.push(LIST_SEPARATOR);
        }
        joined.push_str(&value.to_string());
    }
    joined
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_case() {
        assert_eq!(fold_case("Logo", true), "Logo");
        assert_eq!(fold_case("Logo", false), "logo");
        assert!(matches!(fold_case("logo", false), Cow::Borrowed(_)));
        assert!(names_equal("THEME", "theme", false));
        assert!(!names_equal("THEME", "theme", true));
    }

    #[test]
    fn test_names() {
        assert!(is_valid_key("font_size-2"));
        assert!(!is_valid_key("font size"));
        assert!(!is_valid_key(""));
        assert!(is_valid_section_name("Theme2"));
        assert!(!is_valid_section_name("New Section"));
        assert!(!is_valid_section_name(""));
    }

    #[test]
    fn test_list_helpers() {
        assert_eq!(split_list("10,20, 100 ,200").collect::<Vec<_>>(), ["10", "20", "100", "200"]);
        assert_eq!(split_list("").count(), 0);
        assert_eq!(split_list("  ").count(), 0);
        assert_eq!(split_list("1,,2").collect::<Vec<_>>(), ["1", "", "2"]);
        assert_eq!(join_list(&[10, 20, 100, 200]), "10,20,100,200");
        assert_eq!(join_list::<f32>(&[]), "");
        assert_eq!(join_list(&[0.5, 1.25]), "0.5,1.25");
    }
}
