//! Typed values and their textual form in the parameter file.
//!
//! Every managed field carries one of five value kinds. [`encode`] and
//! [`decode`] are the only places that know how each kind is written:
//!
//! | Kind         | File text                 |
//! |--------------|---------------------------|
//! | `Bool`       | `True` / `False`          |
//! | `Int`        | `11`                      |
//! | `Float`      | `0.5`                     |
//! | `String`     | verbatim                  |
//! | `StringList` | `a,b,c` (no escaping)     |

use serde::Serialize;

/// The declared type of a managed field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeTag {
    Bool,
    Int,
    Float,
    String,
    StringList,
}

impl TypeTag {
    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeTag::Bool => "bool",
            TypeTag::Int => "int",
            TypeTag::Float => "float",
            TypeTag::String => "string",
            TypeTag::StringList => "string list",
        }
    }
}

impl std::fmt::Display for TypeTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A typed parameter value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    StringList(Vec<String>),
}

impl Value {
    /// The type tag of this value.
    pub fn tag(&self) -> TypeTag {
        match self {
            Value::Bool(_) => TypeTag::Bool,
            Value::Int(_) => TypeTag::Int,
            Value::Float(_) => TypeTag::Float,
            Value::String(_) => TypeTag::String,
            Value::StringList(_) => TypeTag::StringList,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Value::StringList(items) => Some(items),
            _ => None,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", encode(self))
    }
}

/// A present value that does not parse as its declared type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected {expected}, got {raw:?}")]
pub struct ParseValueError {
    pub expected: TypeTag,
    pub raw: String,
}

/// Render a value as file text.
pub fn encode(value: &Value) -> String {
    match value {
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Int(i) => i.to_string(),
        Value::Float(f) => f.to_string(),
        Value::String(s) => s.clone(),
        Value::StringList(items) => items.join(","),
    }
}

/// Parse file text as `tag`.
///
/// `raw` is `None` when the key is absent from the file; only then is
/// `fallback` returned. Present text that does not parse is an error.
pub fn decode(
    raw: Option<&str>,
    tag: TypeTag,
    fallback: &Value,
) -> Result<Value, ParseValueError> {
    let Some(raw) = raw else {
        return Ok(fallback.clone());
    };

    let invalid = || ParseValueError {
        expected: tag,
        raw: raw.to_string(),
    };

    match tag {
        TypeTag::Bool => match raw {
            "True" => Ok(Value::Bool(true)),
            "False" => Ok(Value::Bool(false)),
            _ => Err(invalid()),
        },
        TypeTag::Int => raw.parse().map(Value::Int).map_err(|_| invalid()),
        TypeTag::Float => raw.parse().map(Value::Float).map_err(|_| invalid()),
        TypeTag::String => Ok(Value::String(raw.to_string())),
        TypeTag::StringList => Ok(Value::StringList(split_list(raw))),
    }
}

/// Split a comma-joined list. Items are not trimmed; empty text is an empty list.
pub fn split_list(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(',').map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Encode Tests ====================

    #[test]
    fn test_encode_bool() {
        assert_eq!(encode(&Value::Bool(true)), "True");
        assert_eq!(encode(&Value::Bool(false)), "False");
    }

    #[test]
    fn test_encode_numbers() {
        assert_eq!(encode(&Value::Int(11)), "11");
        assert_eq!(encode(&Value::Int(-4)), "-4");
        assert_eq!(encode(&Value::Float(3.4)), "3.4");
    }

    #[test]
    fn test_encode_list_joins_without_spaces() {
        let value = Value::StringList(vec!["m2-1".into(), "m2-2".into(), "m2-3".into()]);
        assert_eq!(encode(&value), "m2-1,m2-2,m2-3");
        assert_eq!(encode(&Value::StringList(vec![])), "");
    }

    // ==================== Decode Tests ====================

    #[test]
    fn test_decode_absent_uses_fallback() {
        let fallback = Value::StringList(vec!["a".into(), "b".into()]);
        let value = decode(None, TypeTag::StringList, &fallback).unwrap();
        assert_eq!(value, fallback);

        let value = decode(None, TypeTag::Int, &Value::Int(3)).unwrap();
        assert_eq!(value, Value::Int(3));
    }

    #[test]
    fn test_decode_bool_is_case_sensitive() {
        let fallback = Value::Bool(false);
        assert_eq!(
            decode(Some("True"), TypeTag::Bool, &fallback).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            decode(Some("False"), TypeTag::Bool, &fallback).unwrap(),
            Value::Bool(false)
        );

        let err = decode(Some("true"), TypeTag::Bool, &fallback).unwrap_err();
        assert_eq!(err.expected, TypeTag::Bool);
        assert_eq!(err.raw, "true");
    }

    #[test]
    fn test_decode_malformed_int_is_error_not_fallback() {
        let err = decode(Some("eleven"), TypeTag::Int, &Value::Int(11)).unwrap_err();
        assert_eq!(err.to_string(), "expected int, got \"eleven\"");
    }

    #[test]
    fn test_decode_float() {
        assert_eq!(
            decode(Some("3.4"), TypeTag::Float, &Value::Float(0.0)).unwrap(),
            Value::Float(3.4)
        );
        assert_eq!(
            decode(Some("2"), TypeTag::Float, &Value::Float(0.0)).unwrap(),
            Value::Float(2.0)
        );
        assert!(decode(Some("3,4"), TypeTag::Float, &Value::Float(0.0)).is_err());
    }

    #[test]
    fn test_decode_string_is_identity() {
        let value = decode(Some("  spaced  "), TypeTag::String, &Value::String(String::new()));
        assert_eq!(value.unwrap(), Value::String("  spaced  ".into()));
    }

    #[test]
    fn test_decode_list_keeps_order_and_inner_spaces() {
        let value = decode(
            Some("Portales,Santa Fe,Taos"),
            TypeTag::StringList,
            &Value::StringList(vec!["default".into()]),
        )
        .unwrap();
        assert_eq!(
            value.as_list().unwrap(),
            ["Portales", "Santa Fe", "Taos"]
        );
    }

    #[test]
    fn test_decode_empty_list_text_is_empty_list() {
        let value = decode(
            Some(""),
            TypeTag::StringList,
            &Value::StringList(vec!["default".into()]),
        )
        .unwrap();
        assert_eq!(value, Value::StringList(vec![]));
    }

    // ==================== Value Tests ====================

    #[test]
    fn test_value_tag() {
        assert_eq!(Value::Bool(true).tag(), TypeTag::Bool);
        assert_eq!(Value::Int(1).tag(), TypeTag::Int);
        assert_eq!(Value::Float(1.0).tag(), TypeTag::Float);
        assert_eq!(Value::String("x".into()).tag(), TypeTag::String);
        assert_eq!(Value::StringList(vec![]).tag(), TypeTag::StringList);
    }

    #[test]
    fn test_value_accessors_reject_other_kinds() {
        assert_eq!(Value::Int(5).as_int(), Some(5));
        assert_eq!(Value::Int(5).as_bool(), None);
        assert_eq!(Value::String("x".into()).as_list(), None);
    }

    #[test]
    fn test_value_serializes_untagged() {
        let json = serde_json::to_string(&Value::StringList(vec!["a".into()])).unwrap();
        assert_eq!(json, r#"["a"]"#);
        assert_eq!(serde_json::to_string(&Value::Int(3)).unwrap(), "3");
    }
}
