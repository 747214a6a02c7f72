//! Parsed configuration tree with dotted-path lookup.

use crate::error::{ConfigError, ConfigErrorExt};
use toml::{Table, Value};
use tracing::warn;

/// Separator between the segments of a configuration path.
pub const PATH_SEPARATOR: char = '.';

/// An immutable, parsed configuration document.
///
/// Paths are dot-separated: `"app.name"` navigates table `app` then leaf `name`.
/// Keys that themselves contain a dot cannot be addressed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigDocument {
    root: Table,
}

impl ConfigDocument {
    /// Parses a TOML source into a document.
    ///
    /// # Errors
    /// Returns [`ConfigError::MalformedConfig`] on syntax errors.
    pub fn parse(source: &str) -> Result<Self, ConfigError> {
        let root = toml::from_str::<Table>(source).context("Failed to parse document")?;
        let document = Self { root };
        document.warn_unreachable_keys();
        Ok(document)
    }

    #[must_use]
    pub const fn from_table(root: Table) -> Self {
        Self { root }
    }

    #[must_use]
    pub const fn root(&self) -> &Table {
        &self.root
    }

    /// Returns the sub-tree stored at `path`.
    ///
    /// # Errors
    /// Returns [`ConfigError::MissingKey`] if the path is empty, has an empty segment,
    /// or any segment is absent.
    pub fn get(&self, path: &str) -> Result<&Value, ConfigError> {
        let mut segments = path.split(PATH_SEPARATOR);
        let first = segments.next().filter(|s| !s.is_empty());
        let mut node = first
            .and_then(|segment| self.root.get(segment))
            .ok_or_else(|| ConfigError::missing_key(path))?;

        for segment in segments {
            node = match node {
                Value::Table(table) if !segment.is_empty() => table.get(segment),
                _ => None,
            }
            .ok_or_else(|| ConfigError::missing_key(path))?;
        }

        Ok(node)
    }

    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_ok()
    }

    fn warn_unreachable_keys(&self) {
        let mut pending: Vec<(String, &Table)> = vec![(String::new(), &self.root)];
        while let Some((prefix, table)) = pending.pop() {
            for (key, value) in table {
                let full = if prefix.is_empty() { key.clone() } else { format!("{prefix}.{key}") };
                if key.contains(PATH_SEPARATOR) {
                    warn!(key = %full, "Configuration key contains a dot and cannot be addressed by path");
                }
                if let Value::Table(child) = value {
                    pending.push((full, child));
                }
            }
        }
    }
}

/// Human-readable name of a node's kind, used in mismatch messages.
pub(crate) const fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::String(_) => "string",
        Value::Integer(_) => "integer",
        Value::Float(_) => "float",
        Value::Boolean(_) => "boolean",
        Value::Datetime(_) => "datetime",
        Value::Array(_) => "array",
        Value::Table(_) => "table",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = r#"
        [app]
        name = "TestApp"

        [app.limits]
        players = 64
    "#;

    #[test]
    fn resolves_nested_paths() {
        let doc = ConfigDocument::parse(SOURCE).unwrap();
        assert_eq!(doc.get("app.name").unwrap().as_str(), Some("TestApp"));
        assert_eq!(doc.get("app.limits.players").unwrap().as_integer(), Some(64));
        assert!(doc.get("app").unwrap().is_table());
    }

    #[test]
    fn rejects_empty_and_partial_paths() {
        let doc = ConfigDocument::parse(SOURCE).unwrap();
        for path in ["", ".", "app.", ".app", "app..name", "app.name.deeper", "nope"] {
            assert!(
                matches!(doc.get(path), Err(ConfigError::MissingKey { .. })),
                "path {path:?} should be missing"
            );
        }
    }

    #[test]
    fn dotted_keys_are_not_addressable() {
        let doc = ConfigDocument::parse("\"a.b\" = 1\n").unwrap();
        assert!(!doc.contains("a.b"));
        assert_eq!(doc.root().len(), 1);
    }

    #[test]
    fn reports_syntax_errors() {
        let err = ConfigDocument::parse("app = {").unwrap_err();
        assert!(matches!(err, ConfigError::MalformedConfig { .. }));
    }
}
