//! Merging source contributions into a resolved configuration.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use crate::de;
use crate::error::{ConfigError, Result};
use crate::schema::{Schema, Value};
use crate::sources::{EnvSource, FileSource, FlagSource, RawSourceMap, Source};

/// The merged configuration before materialization.
///
/// Every value present has been checked against its field's declared kind,
/// and every required field is present. Optional fields no source supplied
/// are absent here; their declared defaults are substituted when the result
/// is materialized into the caller's type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolved {
    values: BTreeMap<String, Value>,
}

impl Resolved {
    /// The resolved value for a field, if any source supplied one.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Number of fields a source supplied.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no source supplied anything.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over resolved `(field, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Resolves a schema against an ordered stack of sources.
///
/// Sources are consulted in registration order and the first one that
/// supplies a field wins; later sources are never consulted for that field.
/// Resolution is all-or-nothing: any extraction or merge failure aborts the
/// whole attempt and no partial result is returned.
///
/// # Examples
///
/// ```rust
/// use confstack::prelude::*;
///
/// #[derive(Debug, serde::Deserialize)]
/// struct AppConfig {
///     host: String,
///     port: i64,
///     verbose: bool,
/// }
///
/// # fn main() -> confstack::error::Result<()> {
/// let schema = Schema::builder()
///     .required("host", FieldKind::String)
///     .optional("port", FieldKind::Integer, 8080)
///     .optional("verbose", FieldKind::Boolean, false)
///     .build();
///
/// let resolver = Resolver::builder()
///     .with_flags(FlagSource::new(["--host", "db.internal", "--verbose"]))
///     .with_env(EnvSource::with_vars([("PORT", "9090")]))
///     .build();
///
/// let config: AppConfig = resolver.load(&schema)?;
/// assert_eq!(config.host, "db.internal");
/// assert_eq!(config.port, 9090);
/// assert!(config.verbose);
/// # Ok(())
/// # }
/// ```
pub struct Resolver {
    sources: Vec<Box<dyn Source>>,
}

impl Resolver {
    /// Start building a resolver with an explicit source stack.
    pub fn builder() -> ResolverBuilder {
        ResolverBuilder {
            sources: Vec::new(),
        }
    }

    /// The conventional stack: process flags, then the process environment,
    /// then `config.ini` in the working directory (section `"default"`).
    pub fn standard() -> Self {
        Resolver::builder()
            .with_flags(FlagSource::from_args())
            .with_env(EnvSource::from_env())
            .with_file(FileSource::new("config.ini"))
            .build()
    }

    /// Run every extractor and merge their contributions.
    ///
    /// # Errors
    ///
    /// Any extractor failure surfaces as-is; the merge itself fails with
    /// [`ConfigError::MissingRequiredField`] or [`ConfigError::TypeMismatch`].
    pub fn resolve(&self, schema: &Schema) -> Result<Resolved> {
        let mut extracted = Vec::with_capacity(self.sources.len());
        for source in &self.sources {
            let map = source.extract(schema)?;
            debug!(source = %source.name(), fields = map.len(), "source extracted");
            extracted.push((source.name(), map));
        }
        merge(schema, &extracted)
    }

    /// Resolve and materialize into the caller's type.
    ///
    /// Declared defaults are substituted for optional fields no source
    /// supplied, then the result is deserialized into `T`.
    pub fn load<T: DeserializeOwned>(&self, schema: &Schema) -> Result<T> {
        let resolved = self.resolve(schema)?;
        de::materialize(schema, &resolved)
    }
}

/// Builder for [`Resolver`].
///
/// Sources are consulted in the order they are added: the first added has the
/// highest precedence.
pub struct ResolverBuilder {
    sources: Vec<Box<dyn Source>>,
}

impl ResolverBuilder {
    /// Layer a command-line flag source.
    pub fn with_flags(self, source: FlagSource) -> Self {
        self.with_source(Box::new(source))
    }

    /// Layer an environment variable source.
    pub fn with_env(self, source: EnvSource) -> Self {
        self.with_source(Box::new(source))
    }

    /// Layer a key/value file source.
    pub fn with_file(self, source: FileSource) -> Self {
        self.with_source(Box::new(source))
    }

    /// Layer a custom source.
    pub fn with_source(mut self, source: Box<dyn Source>) -> Self {
        self.sources.push(source);
        self
    }

    /// Finish building.
    pub fn build(self) -> Resolver {
        Resolver {
            sources: self.sources,
        }
    }
}

/// First-source-wins merge over already-extracted maps.
fn merge(schema: &Schema, sources: &[(String, RawSourceMap)]) -> Result<Resolved> {
    let mut values = BTreeMap::new();
    for spec in schema.fields() {
        let hit = sources
            .iter()
            .find_map(|(name, map)| map.get(spec.name()).map(|value| (name, value)));

        match hit {
            Some((source, value)) => {
                if value.kind() != spec.kind() {
                    return Err(ConfigError::TypeMismatch {
                        field: spec.name().to_string(),
                        actual: value.kind(),
                        expected: spec.kind(),
                    });
                }
                trace!(field = spec.name(), source = %source, "field resolved");
                values.insert(spec.name().to_string(), value.clone());
            }
            None if spec.is_required() => {
                return Err(ConfigError::MissingRequiredField {
                    field: spec.name().to_string(),
                });
            }
            // Optional and unsupplied: the declared default is substituted
            // at materialization, never recorded as an override.
            None => {}
        }
    }
    Ok(Resolved { values })
}
