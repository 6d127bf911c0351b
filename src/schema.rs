//! Field schemas and scalar values.
//!
//! A [`Schema`] is an ordered list of [`FieldSpec`]s: one named, typed field
//! per configuration entry, with an optional default. The schema is the
//! contract every extractor and the merge step work against — field names are
//! the canonical, case-sensitive lookup keys across all sources.

use std::fmt;
use std::str::FromStr;

use crate::error::{ConfigError, Result};

/// The closed set of scalar kinds a field can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// A UTF-8 string, with matching outer quote pairs stripped.
    String,
    /// A signed 64-bit integer, accepting `0b`/`0o`/`0x` base prefixes.
    Integer,
    /// A boolean literal.
    Boolean,
}

impl FieldKind {
    /// The lowercase name of this kind, as used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Integer => "integer",
            FieldKind::Boolean => "boolean",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FieldKind {
    type Err = ConfigError;

    /// Parse a kind from its textual name.
    ///
    /// This is the registration-time seam for callers that build schemas from
    /// external descriptors: an unrecognized kind name fails with
    /// [`ConfigError::UnsupportedType`] before any source is consulted.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "string" | "str" => Ok(FieldKind::String),
            "integer" | "int" => Ok(FieldKind::Integer),
            "boolean" | "bool" => Ok(FieldKind::Boolean),
            other => Err(ConfigError::UnsupportedType {
                kind: other.to_string(),
            }),
        }
    }
}

/// A coerced scalar value, tagged with its kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// A string value.
    String(String),
    /// An integer value.
    Integer(i64),
    /// A boolean value.
    Boolean(bool),
}

impl Value {
    /// The kind tag this value carries.
    pub fn kind(&self) -> FieldKind {
        match self {
            Value::String(_) => FieldKind::String,
            Value::Integer(_) => FieldKind::Integer,
            Value::Boolean(_) => FieldKind::Boolean,
        }
    }

    /// The string payload, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// The integer payload, if this is an integer.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// The boolean payload, if this is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.write_str(s),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Boolean(b) => write!(f, "{}", b),
        }
    }
}

/// The declaration of one configuration field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    name: String,
    kind: FieldKind,
    default: Option<Value>,
}

impl FieldSpec {
    /// Declare a required field: resolution fails with
    /// [`ConfigError::MissingRequiredField`] if no source supplies it.
    pub fn required(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            default: None,
        }
    }

    /// Declare an optional field with a default.
    ///
    /// The default is substituted at materialization time when no source
    /// supplies the field; it never participates in precedence. The default's
    /// kind should match `kind`.
    pub fn optional(name: impl Into<String>, kind: FieldKind, default: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            kind,
            default: Some(default.into()),
        }
    }

    /// The field's name — the canonical, case-sensitive lookup key.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The field's declared kind.
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// The declared default, if any.
    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Whether resolution must find a value for this field.
    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }
}

/// An ordered set of field declarations.
///
/// Iteration order is declaration order, and the merge step resolves fields
/// in that order.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<FieldSpec>,
}

impl Schema {
    /// Start building a schema.
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder { fields: Vec::new() }
    }

    /// The declared fields, in declaration order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Look up a field declaration by name.
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Builder for [`Schema`].
///
/// # Examples
///
/// ```rust
/// use confstack::schema::{FieldKind, Schema};
///
/// let schema = Schema::builder()
///     .required("host", FieldKind::String)
///     .optional("port", FieldKind::Integer, 8080)
///     .optional("verbose", FieldKind::Boolean, false)
///     .build();
/// assert_eq!(schema.fields().len(), 3);
/// ```
#[derive(Debug)]
pub struct SchemaBuilder {
    fields: Vec<FieldSpec>,
}

impl SchemaBuilder {
    /// Add a required field.
    pub fn required(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.push(FieldSpec::required(name, kind));
        self
    }

    /// Add an optional field with a default.
    pub fn optional(
        mut self,
        name: impl Into<String>,
        kind: FieldKind,
        default: impl Into<Value>,
    ) -> Self {
        self.fields.push(FieldSpec::optional(name, kind, default));
        self
    }

    /// Add a pre-built field declaration.
    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    /// Finish building.
    pub fn build(self) -> Schema {
        Schema {
            fields: self.fields,
        }
    }
}
