//! Helpers callable from manifest templates
//!
//! Each helper is registered both as a function and as a filter, so
//! `{{ normalize(RELEASE) }}` and `{{ RELEASE | normalize }}` are equivalent.

use minijinja::{Error, ErrorKind, Value};

/// Names under which [`normalize`] is registered
///
/// `normalise` is kept for manifests written against the older spelling.
pub const NORMALIZE_ALIASES: &[&str] = &["normalize", "normalise"];

/// Replace every `.` with `-`
///
/// Resource names and label values cannot contain dots, while release
/// versions usually do. All other characters pass through unchanged.
#[must_use]
pub fn normalize(value: &str) -> String {
    value.replace('.', "-")
}

/// Template-facing wrapper around [`normalize`]
///
/// Usage: {{ normalize(RELEASE) }} or {{ RELEASE | normalize }}
///
/// An unbound argument is an error in strict mode and an empty string otherwise.
pub fn normalize_value(value: Value, strict: bool) -> Result<String, Error> {
    if value.is_undefined() {
        if strict {
            return Err(Error::new(
                ErrorKind::UndefinedError,
                "normalize was called with an unbound variable",
            ));
        }
        return Ok(String::new());
    }

    Ok(match value.as_str() {
        Some(s) => normalize(s),
        None => normalize(&value.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_replaces_every_dot() {
        assert_eq!(normalize("a.b.c"), "a-b-c");
        assert_eq!(normalize("v2.13.0"), "v2-13-0");
        assert_eq!(normalize("..."), "---");
    }

    #[test]
    fn test_normalize_is_identity_without_dots() {
        for input in ["", "pr-42", "release_main", "ÄÖÜ-ß", "a/b:c"] {
            assert_eq!(normalize(input), input);
        }
    }

    #[test]
    fn test_normalize_value_non_string() {
        assert_eq!(normalize_value(Value::from(1.5), true).unwrap(), "1-5");
    }

    #[test]
    fn test_normalize_value_undefined() {
        assert!(normalize_value(Value::UNDEFINED, true).is_err());
        assert_eq!(normalize_value(Value::UNDEFINED, false).unwrap(), "");
    }
}
