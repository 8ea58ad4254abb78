//! Static value generator and YAML to Value conversion.

use corpus_core::{Field, Value};
use serde_yaml::Value as YamlValue;

/// Convert a YAML value to a Value.
pub fn yaml_to_value(yaml: &YamlValue) -> Value {
    match yaml {
        YamlValue::Null => Value::Absent,
        YamlValue::Bool(b) => Value::Bool(*b),
        YamlValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Int(i)
            } else if let Some(u) = n.as_u64() {
                Value::UInt(u)
            } else if let Some(f) = n.as_f64() {
                Value::Float(f)
            } else {
                Value::String(n.to_string())
            }
        }
        YamlValue::String(s) => Value::String(s.clone()),
        YamlValue::Sequence(arr) => Value::Array(arr.iter().map(yaml_to_value).collect()),
        YamlValue::Mapping(map) => Value::Object(
            map.iter()
                .filter_map(|(k, v)| Some((yaml_key(k)?, yaml_to_value(v))))
                .collect(),
        ),
        YamlValue::Tagged(tagged) => yaml_to_value(&tagged.value),
    }
}

fn yaml_key(key: &YamlValue) -> Option<String> {
    match key {
        YamlValue::String(s) => Some(s.clone()),
        YamlValue::Number(n) => Some(n.to_string()),
        YamlValue::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// The static value of a field, if any.
///
/// A config-level value wins over the descriptor's own `value`. A mapping
/// given for an open object field becomes its inline members.
pub fn static_value(field: &Field, config_value: Option<&YamlValue>) -> Option<Value> {
    let value = match config_value {
        Some(yaml) => yaml_to_value(yaml),
        None => Value::from_literal(field.value.as_deref()?, &field.field_type),
    };

    match value {
        Value::Object(entries) if field.is_open_object() => {
            let root = field.root_name();
            Some(Value::Members(
                entries
                    .into_iter()
                    .map(|(key, value)| (format!("{root}.{key}"), value))
                    .collect(),
            ))
        }
        other => Some(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corpus_core::FieldType;

    #[test]
    fn test_yaml_scalars() {
        assert_eq!(yaml_to_value(&YamlValue::Null), Value::Absent);
        assert_eq!(yaml_to_value(&YamlValue::Bool(true)), Value::Bool(true));
        assert_eq!(
            yaml_to_value(&serde_yaml::from_str("42").unwrap()),
            Value::Int(42)
        );
        assert_eq!(
            yaml_to_value(&serde_yaml::from_str("1.5").unwrap()),
            Value::Float(1.5)
        );
        assert_eq!(
            yaml_to_value(&YamlValue::String("hello".to_string())),
            Value::String("hello".to_string())
        );
    }

    #[test]
    fn test_yaml_collections() {
        let yaml: YamlValue = serde_yaml::from_str("{ version: 1, tags: [a, b] }").unwrap();
        assert_eq!(
            yaml_to_value(&yaml),
            Value::Object(vec![
                ("version".to_string(), Value::Int(1)),
                (
                    "tags".to_string(),
                    Value::Array(vec![
                        Value::String("a".to_string()),
                        Value::String("b".to_string())
                    ])
                ),
            ])
        );
    }

    #[test]
    fn test_config_value_wins() {
        let field = Field::new("data_stream.type", FieldType::ConstantKeyword).with_value("metrics");
        let config = YamlValue::String("logs".to_string());

        assert_eq!(
            static_value(&field, Some(&config)),
            Some(Value::String("logs".to_string()))
        );
        assert_eq!(
            static_value(&field, None),
            Some(Value::String("metrics".to_string()))
        );
        assert_eq!(static_value(&Field::new("x", FieldType::Keyword), None), None);
    }

    #[test]
    fn test_descriptor_value_typed() {
        let field = Field::new("count", FieldType::Long).with_value("12");
        assert_eq!(static_value(&field, None), Some(Value::Int(12)));
    }

    #[test]
    fn test_mapping_for_open_object_becomes_members() {
        let field = Field::new("labels.*", FieldType::Object);
        let config: YamlValue = serde_yaml::from_str("{ env: prod }").unwrap();
        assert_eq!(
            static_value(&field, Some(&config)),
            Some(Value::Members(vec![(
                "labels.env".to_string(),
                Value::String("prod".to_string())
            )]))
        );
    }
}
