//! Generated values and their serialized representation.
//!
//! A [`Value`] is what one generation function produces for one field in
//! one event. It is serialized straight into the record buffer:
//!
//! - strings, dates, IPs and geo points are JSON-quoted
//! - numbers and booleans are written bare
//! - dates use RFC 3339 with millisecond precision (`2024-01-01T00:00:00.000Z`)
//! - [`Value::Members`] (open object fields) are written as inline
//!   `"root.key":value` members joined by `,`
//! - [`Value::Absent`] and empty member lists write nothing

use crate::field::FieldType;
use chrono::{DateTime, SecondsFormat, Utc};

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Boolean value
    Bool(bool),

    /// Signed integer
    Int(i64),

    /// Unsigned integer (`unsigned_long`)
    UInt(u64),

    /// Floating point
    Float(f64),

    /// String value
    String(String),

    /// Timestamp
    Date(DateTime<Utc>),

    /// Array of values (static overrides only)
    Array(Vec<Value>),

    /// JSON object (static overrides only)
    Object(Vec<(String, Value)>),

    /// Inline members of an open object field, keyed by expanded name
    Members(Vec<(String, Value)>),

    /// Nothing to emit
    Absent,
}

impl Value {
    /// Convert a literal from a field definition or enum entry into a value
    /// shaped for the field type.
    ///
    /// Numeric types parse numbers, booleans parse `true`/`false`; anything
    /// that does not parse stays a string.
    pub fn from_literal(literal: &str, field_type: &FieldType) -> Self {
        match field_type {
            FieldType::Integer | FieldType::Long => match literal.parse::<i64>() {
                Ok(i) => Value::Int(i),
                Err(_) => Value::String(literal.to_string()),
            },
            FieldType::UnsignedLong => match literal.parse::<u64>() {
                Ok(u) => Value::UInt(u),
                Err(_) => Value::String(literal.to_string()),
            },
            t if t.is_float() => match literal.parse::<f64>() {
                Ok(f) if f.is_finite() => Value::Float(f),
                _ => Value::String(literal.to_string()),
            },
            FieldType::Boolean => match literal.to_lowercase().as_str() {
                "true" => Value::Bool(true),
                "false" => Value::Bool(false),
                _ => Value::String(literal.to_string()),
            },
            _ => Value::String(literal.to_string()),
        }
    }

    /// Whether serializing this value writes nothing.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Absent => true,
            Value::Members(members) => members.is_empty(),
            _ => false,
        }
    }

    /// Numeric view used by fuzziness drift.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::UInt(u) => Some(*u as f64),
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

    /// Serialize into `out`.
    pub fn write_json(&self, out: &mut Vec<u8>) -> Result<(), serde_json::Error> {
        match self {
            Value::Bool(b) => out.extend_from_slice(if *b { b"true" } else { b"false" }),
            Value::Int(i) => serde_json::to_writer(&mut *out, i)?,
            Value::UInt(u) => serde_json::to_writer(&mut *out, u)?,
            Value::Float(f) => serde_json::to_writer(&mut *out, f)?,
            Value::String(s) => serde_json::to_writer(&mut *out, s)?,
            Value::Date(dt) => {
                out.push(b'"');
                out.extend_from_slice(dt.to_rfc3339_opts(SecondsFormat::Millis, true).as_bytes());
                out.push(b'"');
            }
            Value::Array(items) => {
                out.push(b'[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push(b',');
                    }
                    item.write_json(out)?;
                }
                out.push(b']');
            }
            Value::Object(entries) => {
                out.push(b'{');
                write_members(entries, out)?;
                out.push(b'}');
            }
            Value::Members(members) => write_members(members, out)?,
            Value::Absent => {}
        }
        Ok(())
    }

    /// Serialize into a fresh string.
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        let mut out = Vec::new();
        self.write_json(&mut out)?;
        // Only valid UTF-8 is ever written
        Ok(String::from_utf8_lossy(&out).into_owned())
    }
}

fn write_members(members: &[(String, Value)], out: &mut Vec<u8>) -> Result<(), serde_json::Error> {
    let mut first = true;
    for (key, value) in members {
        if value.is_empty() {
            continue;
        }
        if !first {
            out.push(b',');
        }
        first = false;
        serde_json::to_writer(&mut *out, key)?;
        out.push(b':');
        value.write_json(out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn json(value: &Value) -> String {
        value.to_json_string().unwrap()
    }

    #[test]
    fn test_scalars() {
        assert_eq!(json(&Value::Bool(true)), "true");
        assert_eq!(json(&Value::Int(-42)), "-42");
        assert_eq!(json(&Value::Int(i64::MIN)), "-9223372036854775808");
        assert_eq!(json(&Value::UInt(18446744073709551615)), "18446744073709551615");
        assert_eq!(json(&Value::Float(1.5)), "1.5");
        assert_eq!(json(&Value::String("a \"b\"".to_string())), r#""a \"b\"""#);
    }

    #[test]
    fn test_date_millis() {
        let dt = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(json(&Value::Date(dt)), r#""2024-01-02T03:04:05.000Z""#);
    }

    #[test]
    fn test_members_inline() {
        let value = Value::Members(vec![
            ("labels.env".to_string(), Value::String("prod".to_string())),
            ("labels.skip".to_string(), Value::Absent),
            ("labels.count".to_string(), Value::Int(3)),
        ]);
        assert_eq!(json(&value), r#""labels.env":"prod","labels.count":3"#);
        assert!(!value.is_empty());
        assert!(Value::Members(vec![]).is_empty());
    }

    #[test]
    fn test_object_and_array() {
        let value = Value::Object(vec![(
            "tags".to_string(),
            Value::Array(vec![Value::Int(1), Value::String("x".to_string())]),
        )]);
        assert_eq!(json(&value), r#"{"tags":[1,"x"]}"#);
    }

    #[test]
    fn test_absent_writes_nothing() {
        assert_eq!(json(&Value::Absent), "");
    }

    #[test]
    fn test_from_literal() {
        assert_eq!(Value::from_literal("42", &FieldType::Long), Value::Int(42));
        assert_eq!(Value::from_literal("7", &FieldType::UnsignedLong), Value::UInt(7));
        assert_eq!(Value::from_literal("2.5", &FieldType::ScaledFloat), Value::Float(2.5));
        assert_eq!(Value::from_literal("TRUE", &FieldType::Boolean), Value::Bool(true));
        assert_eq!(
            Value::from_literal("n/a", &FieldType::Integer),
            Value::String("n/a".to_string())
        );
        assert_eq!(
            Value::from_literal("logs", &FieldType::ConstantKeyword),
            Value::String("logs".to_string())
        );
    }
}
