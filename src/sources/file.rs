//! Key/value file configuration source.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use tracing::debug;

use super::{RawSourceMap, Source};
use crate::error::{ConfigError, Result};
use crate::parse;
use crate::schema::Schema;

/// INI-style file configuration source.
///
/// Reads `[section]` headers and `key = value` (or `key: value`) assignment
/// lines, consulting exactly one named section — `"default"` unless
/// overridden with [`section`](FileSource::section). Values in other
/// sections are never merged in.
///
/// A file that cannot be opened contributes nothing: layering means a source
/// with nothing to say stays silent. A file that opens but does not parse is
/// a hard [`ConfigError::MalformedConfigFile`].
///
/// # Examples
///
/// ```rust,no_run
/// use confstack::sources::FileSource;
///
/// let source = FileSource::new("config.ini").section("production");
/// ```
pub struct FileSource {
    path: PathBuf,
    section: String,
}

impl FileSource {
    /// Read the file at `path`, consulting the `"default"` section.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            section: "default".to_string(),
        }
    }

    /// Consult a different section.
    pub fn section(mut self, section: impl Into<String>) -> Self {
        self.section = section.into();
        self
    }
}

impl Source for FileSource {
    fn extract(&self, schema: &Schema) -> Result<RawSourceMap> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) => {
                debug!(path = %self.path.display(), %err, "config file not readable, skipping");
                return Ok(RawSourceMap::new());
            }
        };

        let sections = parse_sections(&content)?;
        let mut map = RawSourceMap::new();
        let Some(entries) = sections.get(&self.section) else {
            debug!(path = %self.path.display(), section = %self.section, "section not present");
            return Ok(map);
        };

        for spec in schema.fields() {
            if let Some(raw) = entries.get(spec.name()) {
                map.insert(spec.name().to_string(), parse::coerce(spec.kind(), raw)?);
            }
        }
        Ok(map)
    }

    fn name(&self) -> String {
        format!("file:{}", self.path.display())
    }
}

/// Parse the full section structure of an INI document.
///
/// Keys keep their case; the schema decides which ones matter. Structural
/// problems — junk lines, assignments before any header, duplicate sections
/// or keys — fail with the 1-based line number.
fn parse_sections(content: &str) -> Result<BTreeMap<String, BTreeMap<String, String>>> {
    let malformed = |line: usize, reason: &str| ConfigError::MalformedConfigFile {
        line,
        reason: reason.to_string(),
    };

    let mut sections: BTreeMap<String, BTreeMap<String, String>> = BTreeMap::new();
    let mut current: Option<String> = None;

    for (idx, raw_line) in content.lines().enumerate() {
        let lineno = idx + 1;
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some(rest) = line.strip_prefix('[') {
            let Some(name) = rest.strip_suffix(']') else {
                return Err(malformed(lineno, "unterminated section header"));
            };
            let name = name.trim();
            if name.is_empty() {
                return Err(malformed(lineno, "empty section name"));
            }
            if sections.contains_key(name) {
                return Err(malformed(lineno, "duplicate section"));
            }
            sections.insert(name.to_string(), BTreeMap::new());
            current = Some(name.to_string());
            continue;
        }

        // Assignment: split at the earliest '=' or ':'.
        let delimiter = match (line.find('='), line.find(':')) {
            (Some(eq), Some(colon)) => Some(eq.min(colon)),
            (Some(eq), None) => Some(eq),
            (None, Some(colon)) => Some(colon),
            (None, None) => None,
        };
        let Some(delimiter) = delimiter else {
            return Err(malformed(lineno, "expected section header or key/value pair"));
        };

        let key = line[..delimiter].trim();
        let value = line[delimiter + 1..].trim();
        if key.is_empty() {
            return Err(malformed(lineno, "assignment with empty key"));
        }
        let Some(section) = &current else {
            return Err(malformed(lineno, "key/value pair before any section header"));
        };
        let entries = sections.entry(section.clone()).or_default();
        if entries.contains_key(key) {
            return Err(malformed(lineno, "duplicate key"));
        }
        entries.insert(key.to_string(), value.to_string());
    }

    Ok(sections)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldKind, Value};
    use std::io::Write;

    fn schema() -> Schema {
        Schema::builder()
            .required("foo", FieldKind::String)
            .required("bar", FieldKind::Integer)
            .required("baz", FieldKind::Boolean)
            .build()
    }

    fn write_temp(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn extracts_requested_section() {
        let file = write_temp(
            "[default]\n\
             foo = quux\n\
             bar = 0xa\n\
             baz = 1\n\
             \n\
             [other]\n\
             foo = nope\n",
        );
        let map = FileSource::new(file.path()).extract(&schema()).unwrap();
        assert_eq!(map.get("foo"), Some(&Value::String("quux".to_string())));
        assert_eq!(map.get("bar"), Some(&Value::Integer(10)));
        assert_eq!(map.get("baz"), Some(&Value::Boolean(true)));
    }

    #[test]
    fn other_sections_are_never_layered() {
        let file = write_temp("[default]\nfoo = quux\n[extra]\nbar = 10\n");
        let map = FileSource::new(file.path()).extract(&schema()).unwrap();
        assert_eq!(map.len(), 1);
        assert!(map.contains_key("foo"));
    }

    #[test]
    fn selects_named_section() {
        let file = write_temp("[default]\nfoo = a\n[production]\nfoo = b\n");
        let map = FileSource::new(file.path())
            .section("production")
            .extract(&schema())
            .unwrap();
        assert_eq!(map.get("foo"), Some(&Value::String("b".to_string())));
    }

    #[test]
    fn missing_file_contributes_nothing() {
        let dir = tempfile::TempDir::new().unwrap();
        let source = FileSource::new(dir.path().join("absent.ini"));
        assert!(source.extract(&schema()).unwrap().is_empty());
    }

    #[test]
    fn missing_section_contributes_nothing() {
        let file = write_temp("[other]\nfoo = quux\n");
        let map = FileSource::new(file.path()).extract(&schema()).unwrap();
        assert!(map.is_empty());
    }

    #[test]
    fn unknown_keys_are_dropped() {
        let file = write_temp("[default]\nfoo = quux\nunrelated = 1\n");
        let map = FileSource::new(file.path()).extract(&schema()).unwrap();
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn colon_delimiter_and_comments() {
        let sections = parse_sections(
            "# leading comment\n\
             [default]\n\
             ; another comment\n\
             foo: quux\n",
        )
        .unwrap();
        assert_eq!(sections["default"]["foo"], "quux");
    }

    #[test]
    fn quoted_values_are_unquoted_during_coercion() {
        let file = write_temp("[default]\nfoo = \"bar baz\"\nbar = \"-10\"\n");
        let map = FileSource::new(file.path()).extract(&schema()).unwrap();
        assert_eq!(map.get("foo"), Some(&Value::String("bar baz".to_string())));
        assert_eq!(map.get("bar"), Some(&Value::Integer(-10)));
    }

    #[test]
    fn invalid_value_aborts_extraction() {
        let file = write_temp("[default]\nbar = buff\n");
        assert!(FileSource::new(file.path()).extract(&schema()).is_err());
    }

    #[test]
    fn malformed_structure_is_rejected() {
        let cases = [
            ("foo = 1\n", 1),                      // assignment before any header
            ("[default\nfoo = 1\n", 1),            // unterminated header
            ("[ ]\n", 1),                          // empty section name
            ("[default]\njunk line\n", 2),         // neither header nor assignment
            ("[default]\n= 1\n", 2),               // empty key
            ("[a]\n[a]\n", 2),                     // duplicate section
            ("[a]\nfoo = 1\nfoo = 2\n", 3),        // duplicate key
        ];
        for (content, line) in cases {
            match parse_sections(content) {
                Err(ConfigError::MalformedConfigFile { line: at, .. }) => {
                    assert_eq!(at, line, "{content:?}");
                }
                other => panic!("expected malformed error for {content:?}, got {other:?}"),
            }
        }
    }
}
