//! Command-line flag configuration source.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::trace;

use super::{RawSourceMap, Source};
use crate::error::{ConfigError, Result};
use crate::parse;
use crate::schema::{FieldKind, FieldSpec, Schema, Value};

/// Command-line flag configuration source.
///
/// Recognizes, for a field `name`, the forms `--name=VALUE`, `--name VALUE`,
/// and bare `--name`; boolean fields additionally get a niladic `--no-name`
/// that forces `false`. Tokens that match no declared field are skipped, so
/// this source can share an argument list with other consumers.
///
/// The token list is snapshotted at construction; one resolution sees one
/// consistent argument list.
///
/// # Semantics
///
/// - A bare `--name` is `true` for boolean fields. For other kinds it marks
///   the flag as present without a value and contributes nothing.
/// - A lookahead token is consumed as the value only if it does not start
///   with `-`; negative integers must be quoted (`--retries '"-1"'`), and the
///   quotes are stripped during coercion.
/// - Supplying the same flag with a value more than once fails with
///   [`ConfigError::AmbiguousFlag`]. Bare boolean occurrences count as
///   values; bare occurrences of other kinds do not.
/// - When both `--no-name` and `--name` appear, `--no-name` wins. Ambiguity
///   is still checked first, so repeated `--name=...` values stay an error.
///
/// # Examples
///
/// ```rust
/// use confstack::sources::FlagSource;
///
/// // Snapshot the process arguments (skipping argv[0]).
/// let source = FlagSource::from_args();
///
/// // Or supply an explicit token list.
/// let source = FlagSource::new(["--host", "db.internal", "--verbose"]);
/// ```
pub struct FlagSource {
    tokens: Vec<String>,
}

enum Registered<'a> {
    Takes(&'a FieldSpec),
    Negates(&'a FieldSpec),
}

impl FlagSource {
    /// Snapshot the process argument list, without the program name.
    pub fn from_args() -> Self {
        Self {
            tokens: std::env::args().skip(1).collect(),
        }
    }

    /// Use an explicit token list.
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }
}

impl Source for FlagSource {
    fn extract(&self, schema: &Schema) -> Result<RawSourceMap> {
        let mut options: HashMap<String, Registered<'_>> = HashMap::new();
        for spec in schema.fields() {
            options.insert(format!("--{}", spec.name()), Registered::Takes(spec));
            if spec.kind() == FieldKind::Boolean {
                options.insert(format!("--no-{}", spec.name()), Registered::Negates(spec));
            }
        }

        // Raw valued occurrences per field; ambiguity is judged over these.
        let mut supplied: BTreeMap<&str, (FieldKind, Vec<String>)> = BTreeMap::new();
        let mut negated: BTreeSet<&str> = BTreeSet::new();

        let mut tokens = self.tokens.iter().peekable();
        while let Some(token) = tokens.next() {
            if !token.starts_with("--") {
                continue;
            }
            let (name, inline) = match token.split_once('=') {
                Some((name, value)) => (name, Some(value.to_string())),
                None => (token.as_str(), None),
            };
            let Some(registered) = options.get(name) else {
                // Some other consumer's option.
                continue;
            };
            match registered {
                Registered::Negates(spec) => {
                    if let Some(value) = inline {
                        // --no-name is niladic.
                        return Err(ConfigError::InvalidValue {
                            value,
                            kind: FieldKind::Boolean,
                        });
                    }
                    trace!(field = spec.name(), "captured negation flag");
                    negated.insert(spec.name());
                }
                Registered::Takes(spec) => {
                    let lookahead =
                        matches!(tokens.peek(), Some(next) if !next.starts_with('-'));
                    let value = match inline {
                        Some(value) => Some(value),
                        None if lookahead => tokens.next().cloned(),
                        None if spec.kind() == FieldKind::Boolean => Some(String::new()),
                        None => None,
                    };
                    if let Some(value) = value {
                        trace!(field = spec.name(), "captured flag value");
                        supplied
                            .entry(spec.name())
                            .or_insert_with(|| (spec.kind(), Vec::new()))
                            .1
                            .push(value);
                    }
                }
            }
        }

        for (name, (_, occurrences)) in &supplied {
            if occurrences.len() > 1 {
                return Err(ConfigError::AmbiguousFlag {
                    flag: (*name).to_string(),
                });
            }
        }

        let mut map = RawSourceMap::new();
        for name in &negated {
            map.insert((*name).to_string(), Value::Boolean(false));
        }
        for (name, (kind, occurrences)) in supplied {
            if negated.contains(name) {
                continue;
            }
            let raw = &occurrences[0];
            let value = match kind {
                // Flag booleans do not accept the 1/0 spellings.
                FieldKind::Boolean => Value::Boolean(parse::switch(raw)?),
                kind => parse::coerce(kind, raw)?,
            };
            map.insert(name.to_string(), value);
        }
        Ok(map)
    }

    fn name(&self) -> String {
        "flags".to_string()
    }
}
