//! Template variable bindings
//!
//! Bindings are a flat name → string mapping supplied by the caller.
//! Every binding becomes a top-level template variable.

use std::path::Path;

use indexmap::IndexMap;
use serde::Serialize;
use serde_yaml::Value as YamlValue;

use crate::error::{CoreError, Result};

/// Ordered set of template variables
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Bindings {
    inner: IndexMap<String, String>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a binding
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.inner.insert(name.into(), value.into());
        self
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner.get(name).map(String::as_str)
    }

    /// Bound names in insertion order
    pub fn names(&self) -> Vec<String> {
        self.inner.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Merge another set of bindings; entries from `other` win
    pub fn merge(&mut self, other: &Bindings) {
        for (k, v) in &other.inner {
            self.inner.insert(k.clone(), v.clone());
        }
    }

    /// Parse `KEY=VALUE` command line arguments
    ///
    /// Splits on the first `=`, so values may themselves contain `=`.
    pub fn parse_set(set_args: &[String]) -> Result<Self> {
        let mut bindings = Self::new();

        for arg in set_args {
            let (key, val) = arg
                .split_once('=')
                .ok_or_else(|| CoreError::InvalidBinding {
                    message: format!("Invalid --set format: '{}'. Expected KEY=VALUE", arg),
                })?;

            let key = key.trim();
            if key.is_empty() {
                return Err(CoreError::InvalidBinding {
                    message: format!("Invalid --set format: '{}'. Key cannot be empty", arg),
                });
            }

            bindings.insert(key, val);
        }

        Ok(bindings)
    }

    /// Parse a flat YAML mapping of variables
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let value: YamlValue = serde_yaml::from_str(yaml)?;

        let mapping = match value {
            YamlValue::Null => return Ok(Self::new()),
            YamlValue::Mapping(m) => m,
            _ => {
                return Err(CoreError::InvalidBinding {
                    message: "variables file must contain a mapping".to_string(),
                });
            }
        };

        let mut bindings = Self::new();
        for (key, val) in mapping {
            let key = scalar_to_string(&key).ok_or_else(|| CoreError::InvalidBinding {
                message: "variable names must be scalars".to_string(),
            })?;
            let val = scalar_to_string(&val).ok_or_else(|| CoreError::InvalidBinding {
                message: format!("variable '{}' must be a scalar value", key),
            })?;
            bindings.insert(key, val);
        }

        Ok(bindings)
    }

    /// Load a flat YAML mapping of variables from disk
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| CoreError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Bindings {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut bindings = Self::new();
        for (k, v) in iter {
            bindings.insert(k, v);
        }
        bindings
    }
}

fn scalar_to_string(value: &YamlValue) -> Option<String> {
    match value {
        YamlValue::String(s) => Some(s.clone()),
        YamlValue::Bool(b) => Some(b.to_string()),
        YamlValue::Number(n) => Some(n.to_string()),
        YamlValue::Null => Some(String::new()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_set() {
        let args = vec![
            "PR_NUMBER=42".to_string(),
            "RELEASE=v2.3.0".to_string(),
            "ARGS=--flag=1".to_string(),
        ];
        let bindings = Bindings::parse_set(&args).unwrap();

        assert_eq!(bindings.get("PR_NUMBER"), Some("42"));
        assert_eq!(bindings.get("RELEASE"), Some("v2.3.0"));
        assert_eq!(bindings.get("ARGS"), Some("--flag=1"));
        assert_eq!(bindings.names(), vec!["PR_NUMBER", "RELEASE", "ARGS"]);
    }

    #[test]
    fn test_parse_set_missing_equals() {
        let err = Bindings::parse_set(&["PR_NUMBER".to_string()]).unwrap_err();
        assert!(err.to_string().contains("Expected KEY=VALUE"));
    }

    #[test]
    fn test_parse_set_empty_key() {
        assert!(Bindings::parse_set(&["=42".to_string()]).is_err());
    }

    #[test]
    fn test_parse_set_later_wins() {
        let args = vec!["A=1".to_string(), "A=2".to_string()];
        let bindings = Bindings::parse_set(&args).unwrap();
        assert_eq!(bindings.get("A"), Some("2"));
        assert_eq!(bindings.len(), 1);
    }

    #[test]
    fn test_from_yaml_stringifies_scalars() {
        let bindings = Bindings::from_yaml("PR_NUMBER: 42\nDEBUG: true\nZONE: europe-west3-a\n")
            .unwrap();
        assert_eq!(bindings.get("PR_NUMBER"), Some("42"));
        assert_eq!(bindings.get("DEBUG"), Some("true"));
        assert_eq!(bindings.get("ZONE"), Some("europe-west3-a"));
    }

    #[test]
    fn test_from_yaml_rejects_nested_values() {
        let err = Bindings::from_yaml("NODES:\n  - a\n  - b\n").unwrap_err();
        assert!(err.to_string().contains("NODES"));
    }

    #[test]
    fn test_from_yaml_empty_document() {
        assert!(Bindings::from_yaml("").unwrap().is_empty());
    }

    #[test]
    fn test_merge_other_wins() {
        let mut base = Bindings::new().with("A", "1").with("B", "2");
        let overrides = Bindings::new().with("B", "3");
        base.merge(&overrides);

        assert_eq!(base.get("A"), Some("1"));
        assert_eq!(base.get("B"), Some("3"));
    }
}
