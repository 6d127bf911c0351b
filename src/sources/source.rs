//! Configuration source trait.

use std::collections::BTreeMap;

use crate::error::Result;
use crate::schema::{Schema, Value};

/// The values one source contributes, keyed by field name.
///
/// Values are already coerced to their field's kind; fields the source does
/// not supply are simply absent.
pub type RawSourceMap = BTreeMap<String, Value>;

/// Trait for configuration sources.
///
/// Implement this trait to layer custom sources (a remote store, a secrets
/// backend, a test fixture) into a [`Resolver`](crate::resolve::Resolver).
///
/// Sources are independent: each turns its own raw input into a
/// [`RawSourceMap`] with no knowledge of the others. Precedence between
/// sources is decided entirely by the order they are registered on the
/// resolver (earlier wins).
pub trait Source: Send + Sync {
    /// Extract this source's values for the given schema.
    ///
    /// # Errors
    ///
    /// Returns an error if the source's raw input cannot be parsed. An
    /// extraction error aborts the whole resolution; it is never downgraded
    /// to "field absent".
    fn extract(&self, schema: &Schema) -> Result<RawSourceMap>;

    /// A human-readable name for this source (for logging/debugging).
    fn name(&self) -> String;
}
