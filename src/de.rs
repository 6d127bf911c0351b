//! Materializing a resolved map into the caller's type.
//!
//! The merged field/value pairs — with declared defaults substituted for
//! optional fields no source supplied — are fed through serde's value
//! deserializer machinery, so any `Deserialize` struct whose field names
//! match the schema works as the output type.

use serde::de::value::MapDeserializer;
use serde::de::{DeserializeOwned, Deserializer, IntoDeserializer, Visitor};
use std::marker::PhantomData;

use crate::error::{ConfigError, Result};
use crate::resolve::Resolved;
use crate::schema::{Schema, Value};

/// Build the caller's type from a resolved map.
pub(crate) fn materialize<T: DeserializeOwned>(schema: &Schema, resolved: &Resolved) -> Result<T> {
    let entries: Vec<(String, Value)> = schema
        .fields()
        .iter()
        .filter_map(|spec| {
            resolved
                .get(spec.name())
                .or_else(|| spec.default())
                .map(|value| (spec.name().to_string(), value.clone()))
        })
        .collect();

    T::deserialize(MapDeserializer::new(entries.into_iter()))
        .map_err(|err: serde::de::value::Error| ConfigError::Deserialization(err.to_string()))
}

impl<'de, E: serde::de::Error> IntoDeserializer<'de, E> for Value {
    type Deserializer = ValueDeserializer<E>;

    fn into_deserializer(self) -> Self::Deserializer {
        ValueDeserializer {
            value: self,
            marker: PhantomData,
        }
    }
}

/// Deserializer for a single scalar [`Value`].
pub struct ValueDeserializer<E> {
    value: Value,
    marker: PhantomData<E>,
}

impl<'de, E: serde::de::Error> Deserializer<'de> for ValueDeserializer<E> {
    type Error = E;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> std::result::Result<V::Value, E> {
        match self.value {
            Value::String(s) => visitor.visit_string(s),
            Value::Integer(i) => visitor.visit_i64(i),
            Value::Boolean(b) => visitor.visit_bool(b),
        }
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> std::result::Result<V::Value, E> {
        visitor.visit_some(self)
    }

    serde::forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct newtype_struct seq tuple tuple_struct
        map struct enum identifier ignored_any
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldKind;
    use crate::sources::{RawSourceMap, Source};
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct TestConfig {
        host: String,
        port: u16,
        verbose: bool,
        label: Option<String>,
    }

    fn schema() -> Schema {
        Schema::builder()
            .required("host", FieldKind::String)
            .optional("port", FieldKind::Integer, 8080)
            .optional("verbose", FieldKind::Boolean, false)
            .optional("label", FieldKind::String, "default-label")
            .build()
    }

    struct OneShot(RawSourceMap);

    impl Source for OneShot {
        fn extract(&self, _schema: &Schema) -> Result<RawSourceMap> {
            Ok(self.0.clone())
        }

        fn name(&self) -> String {
            "oneshot".to_string()
        }
    }

    fn resolved_from(pairs: &[(&str, Value)]) -> Resolved {
        let map: RawSourceMap = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        crate::resolve::Resolver::builder()
            .with_source(Box::new(OneShot(map)))
            .build()
            .resolve(&schema())
            .unwrap()
    }

    #[test]
    fn materializes_supplied_values() {
        let resolved = resolved_from(&[
            ("host", Value::from("db.internal")),
            ("port", Value::from(9090i64)),
            ("verbose", Value::from(true)),
            ("label", Value::from("primary")),
        ]);
        let config: TestConfig = materialize(&schema(), &resolved).unwrap();
        assert_eq!(
            config,
            TestConfig {
                host: "db.internal".to_string(),
                port: 9090,
                verbose: true,
                label: Some("primary".to_string()),
            }
        );
    }

    #[test]
    fn substitutes_declared_defaults() {
        let resolved = resolved_from(&[("host", Value::from("db.internal"))]);
        let config: TestConfig = materialize(&schema(), &resolved).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.verbose, false);
        assert_eq!(config.label, Some("default-label".to_string()));
    }

    #[test]
    fn narrowing_failure_surfaces_as_deserialization_error() {
        let resolved = resolved_from(&[
            ("host", Value::from("db.internal")),
            ("port", Value::from(70000i64)),
        ]);
        let err = materialize::<TestConfig>(&schema(), &resolved).unwrap_err();
        assert!(matches!(err, ConfigError::Deserialization(_)), "{err:?}");
    }
}
