//! Environment variable configuration source.

use std::collections::BTreeMap;

use tracing::trace;

use super::{RawSourceMap, Source};
use crate::error::Result;
use crate::parse;
use crate::schema::Schema;

/// Environment variable configuration source.
///
/// Variable names are matched case-insensitively against each field's lookup
/// name. When several variables match the same field, the one whose name
/// equals the lookup name exactly wins; otherwise the lexicographically
/// smallest name does, so resolution is deterministic either way.
///
/// The environment is snapshotted once at construction, so one resolution
/// sees one consistent environment even if other threads mutate it.
///
/// # Examples
///
/// ```rust
/// use confstack::sources::EnvSource;
///
/// // Field "port" matches APP_PORT, app_port, App_Port, ...
/// let source = EnvSource::from_env().prefix("app");
/// ```
pub struct EnvSource {
    vars: BTreeMap<String, String>,
    prefix: Option<String>,
}

impl EnvSource {
    /// Snapshot the current process environment.
    pub fn from_env() -> Self {
        Self {
            vars: std::env::vars().collect(),
            prefix: None,
        }
    }

    /// Use an explicit variable map instead of the process environment.
    pub fn with_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: vars
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            prefix: None,
        }
    }

    /// Prepend a prefix to every field's lookup name.
    ///
    /// The prefix is normalized to end with exactly one `_`: any run of
    /// trailing underscores collapses, so `"app"`, `"app_"`, and `"app__"`
    /// all look up `app_<field>`.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    fn lookup_name(&self, field: &str) -> String {
        match &self.prefix {
            None => field.to_string(),
            Some(prefix) => format!("{}_{field}", prefix.trim_end_matches('_')),
        }
    }
}

impl Source for EnvSource {
    fn extract(&self, schema: &Schema) -> Result<RawSourceMap> {
        let mut map = RawSourceMap::new();
        for spec in schema.fields() {
            let wanted = self.lookup_name(spec.name());
            let folded = wanted.to_lowercase();

            let candidates: Vec<(&String, &String)> = self
                .vars
                .iter()
                .filter(|(name, _)| name.to_lowercase() == folded)
                .collect();

            // Exact-case match first; the BTreeMap keeps the fallback
            // lexicographic.
            let Some((name, raw)) = candidates
                .iter()
                .find(|(name, _)| *name == &wanted)
                .or_else(|| candidates.first())
            else {
                continue;
            };

            trace!(field = spec.name(), var = %name, "matched environment variable");
            map.insert(spec.name().to_string(), parse::coerce(spec.kind(), raw.as_str())?);
        }
        Ok(map)
    }

    fn name(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("env:{}*", prefix),
            None => "env".to_string(),
        }
    }
}
