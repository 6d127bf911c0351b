//! Scalar coercion shared by every source.
//!
//! A token means the same thing no matter which source it came from, so all
//! three extractors funnel their raw text through this module. The one
//! sanctioned divergence is boolean syntax: file and environment tokens also
//! accept `1`/`0` ([`boolean`]), while flag tokens do not ([`switch`]).

use crate::error::{ConfigError, Result};
use crate::schema::{FieldKind, Value};

/// Strip matching leading/trailing double-quote pairs, repeatedly.
///
/// Idempotent on already-unquoted input; inner quotes that do not wrap the
/// whole token are left alone.
pub(crate) fn unquote(mut raw: &str) -> &str {
    while raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"') {
        raw = &raw[1..raw.len() - 1];
    }
    raw
}

/// Parse a boolean token as found in file and environment sources.
///
/// Empty string, `true`, `True`, and `1` are true; `false`, `False`, and `0`
/// are false. Anything else fails with [`ConfigError::InvalidValue`].
pub fn boolean(raw: &str) -> Result<bool> {
    match raw {
        "" | "true" | "True" | "1" => Ok(true),
        "false" | "False" | "0" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            value: raw.to_string(),
            kind: FieldKind::Boolean,
        }),
    }
}

/// Parse a boolean token as found on the command line.
///
/// The empty string (a bare `--flag`) is true; `1`/`0` are not accepted here.
pub fn switch(raw: &str) -> Result<bool> {
    match raw {
        "" | "true" | "True" => Ok(true),
        "false" | "False" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            value: raw.to_string(),
            kind: FieldKind::Boolean,
        }),
    }
}

/// Parse an integer token.
///
/// Outer quote pairs are stripped first so that quoted negative numbers
/// survive argument parsers that would otherwise read `-10` as a flag. After
/// one optional sign, a `0b`/`0o`/`0x` prefix (either case) selects base
/// 2/8/16; base 10 otherwise. The sign applies to the parsed magnitude.
pub fn integer(raw: &str) -> Result<i64> {
    let invalid = || ConfigError::InvalidValue {
        value: raw.to_string(),
        kind: FieldKind::Integer,
    };

    let val = unquote(raw);
    let (negative, magnitude) = match val.as_bytes().first() {
        Some(b'-') => (true, &val[1..]),
        Some(b'+') => (false, &val[1..]),
        _ => (false, val),
    };

    let prefix = magnitude.get(..2).map(str::to_ascii_lowercase);
    let (base, digits) = match prefix.as_deref() {
        Some("0b") => (2, &magnitude[2..]),
        Some("0o") => (8, &magnitude[2..]),
        Some("0x") => (16, &magnitude[2..]),
        _ => (10, magnitude),
    };

    // from_str_radix tolerates a leading sign of its own; a second sign, or
    // one after a base prefix, is not a numeral.
    if digits.starts_with('-') || digits.starts_with('+') {
        return Err(invalid());
    }

    let parsed = i64::from_str_radix(digits, base).map_err(|_| invalid())?;
    Ok(if negative { -parsed } else { parsed })
}

/// Parse a string token: strip outer quote pairs, pass the rest through.
///
/// `--foo="bar baz"` reaches the extractor as `"bar baz"`; returning it
/// without the quotes is the natural reading. Internal whitespace and quotes
/// are preserved.
pub fn string(raw: &str) -> String {
    unquote(raw).to_string()
}

/// Coerce a token to the given kind.
///
/// Kind dispatch is a closed match: every declarable kind has a parser, so
/// unsupported kinds cannot reach this point (they are rejected when the
/// schema is registered, see [`FieldKind::from_str`]).
///
/// Booleans use the lenient [`boolean`] form; the flag extractor handles its
/// stricter syntax itself.
pub fn coerce(kind: FieldKind, raw: &str) -> Result<Value> {
    match kind {
        FieldKind::String => Ok(Value::String(string(raw))),
        FieldKind::Integer => Ok(Value::Integer(integer(raw)?)),
        FieldKind::Boolean => Ok(Value::Boolean(boolean(raw)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn unquote_strips_matching_pairs() {
        assert_eq!(unquote("\"bar baz\""), "bar baz");
        assert_eq!(unquote("\"\"nested\"\""), "nested");
        assert_eq!(unquote("plain"), "plain");
        // Inner quotes do not wrap the whole token, so they stay.
        assert_eq!(unquote("bar=\"baz\""), "bar=\"baz\"");
        assert_eq!(unquote("\""), "\"");
        assert_eq!(unquote("\"\""), "");
    }

    #[test]
    fn boolean_truthy_and_falsy() {
        for raw in ["", "true", "True", "1"] {
            assert_eq!(boolean(raw).unwrap(), true, "{raw:?}");
        }
        for raw in ["false", "False", "0"] {
            assert_eq!(boolean(raw).unwrap(), false, "{raw:?}");
        }
    }

    #[test]
    fn boolean_rejects_garbage() {
        let err = boolean("quux").unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                value: "quux".to_string(),
                kind: FieldKind::Boolean,
            }
        );
    }

    #[test]
    fn switch_rejects_numeric_literals() {
        assert_eq!(switch("").unwrap(), true);
        assert_eq!(switch("True").unwrap(), true);
        assert_eq!(switch("false").unwrap(), false);
        assert!(switch("1").is_err());
        assert!(switch("0").is_err());
    }

    #[test]
    fn integer_parses_all_bases() {
        for raw in ["10", "0b1010", "0o12", "0xa", "0XA"] {
            assert_eq!(integer(raw).unwrap(), 10, "{raw:?}");
        }
    }

    #[test]
    fn integer_parses_negative_numbers() {
        for raw in ["-10", "-0b1010", "-0o12", "-0xa"] {
            assert_eq!(integer(raw).unwrap(), -10, "{raw:?}");
        }
        assert_eq!(integer("+10").unwrap(), 10);
    }

    #[test]
    fn integer_parses_quoted_negative_numbers() {
        assert_eq!(integer("\"-10\"").unwrap(), -10);
        assert_eq!(integer("\"\"-0xa\"\"").unwrap(), -10);
    }

    #[test]
    fn integer_rejects_non_numerals() {
        for raw in ["buff", "", "--10", "+-10", "0x+5", "0b", "0b12", "10.5", "0x10g"] {
            assert!(integer(raw).is_err(), "{raw:?}");
        }
    }

    #[test]
    fn string_passthrough_preserves_inner_quotes() {
        assert_eq!(string("bar=\"baz\""), "bar=\"baz\"");
        assert_eq!(string("\"bar baz\""), "bar baz");
        assert_eq!(string("bar baz quux"), "bar baz quux");
    }

    #[test]
    fn coerce_dispatches_by_kind() {
        assert_eq!(
            coerce(FieldKind::String, "\"x\"").unwrap(),
            Value::String("x".to_string())
        );
        assert_eq!(coerce(FieldKind::Integer, "0o12").unwrap(), Value::Integer(10));
        assert_eq!(coerce(FieldKind::Boolean, "0").unwrap(), Value::Boolean(false));
    }

    proptest! {
        #[test]
        fn unquote_is_idempotent(s in ".*") {
            let once = unquote(&s).to_string();
            prop_assert_eq!(unquote(&once), once.as_str());
        }

        #[test]
        fn integer_round_trips_every_base(n in any::<u32>(), negative in any::<bool>()) {
            let sign = if negative { "-" } else { "" };
            let expected = if negative { -i64::from(n) } else { i64::from(n) };
            for repr in [
                format!("{sign}{n}"),
                format!("{sign}0b{n:b}"),
                format!("{sign}0o{n:o}"),
                format!("{sign}0x{n:x}"),
            ] {
                prop_assert_eq!(integer(&repr).unwrap(), expected);
            }
        }
    }
}
