//! Schema validation.
//!
//! Checks a JSON configuration against a [`Schema`]: required presence,
//! value types, nested block counts and the attribute [`Validator`]s.
//!
//! ```
//! use pexip_infinity_provider::schema::{Attribute, Schema, Validator};
//! use pexip_infinity_provider::validation::validate;
//! use serde_json::json;
//!
//! let schema = Schema::v0()
//!     .with_attribute("address", Attribute::required_string().with_validator(Validator::IpAddress));
//!
//! assert!(validate(&schema, &json!({"address": "10.0.0.1"})).is_empty());
//!
//! let diagnostics = validate(&schema, &json!({"address": "not-an-ip"}));
//! assert_eq!(diagnostics.len(), 1);
//! assert_eq!(diagnostics[0].attribute.as_deref(), Some("address"));
//! ```

use std::collections::HashMap;
use std::net::IpAddr;

use serde_json::Value;

use crate::schema::{
    Attribute, AttributeType, Block, BlockNestingMode, Diagnostic, NestedBlock, Schema, Validator,
};

/// Validate a JSON value against a schema.
///
/// Returns one diagnostic per problem; an empty list means the value is valid.
/// Computed-only attributes are skipped since the provider sets them.
pub fn validate(schema: &Schema, value: &Value) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    validate_block(&schema.block, value, "", &mut diagnostics);
    diagnostics
}

/// Like [`validate`], but as a `Result`.
pub fn validate_result(schema: &Schema, value: &Value) -> Result<(), Vec<Diagnostic>> {
    let diagnostics = validate(schema, value);
    if diagnostics.is_empty() {
        Ok(())
    } else {
        Err(diagnostics)
    }
}

/// Check if a JSON value is valid against a schema.
pub fn is_valid(schema: &Schema, value: &Value) -> bool {
    validate(schema, value).is_empty()
}

fn validate_block(block: &Block, value: &Value, path: &str, diagnostics: &mut Vec<Diagnostic>) {
    let obj = match value {
        Value::Object(map) => map,
        Value::Null => return,
        _ => {
            diagnostics.push(
                Diagnostic::error("Expected object")
                    .with_detail(format!("Got {}", value_type_name(value)))
                    .with_attribute_if_not_empty(path),
            );
            return;
        },
    };

    for (name, attr) in &block.attributes {
        let attr_path = join_path(path, name);
        validate_attribute(attr, obj.get(name), &attr_path, diagnostics);
    }

    for (name, nested) in &block.blocks {
        let block_path = join_path(path, name);
        validate_nested_block(nested, obj.get(name), &block_path, diagnostics);
    }
}

fn validate_attribute(
    attr: &Attribute,
    value: Option<&Value>,
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    if attr.is_computed_only() {
        return;
    }

    match value {
        None | Some(Value::Null) => {
            if attr.flags.required {
                diagnostics.push(
                    Diagnostic::error(format!("Missing required attribute '{}'", path))
                        .with_detail("This attribute is required and must be provided")
                        .with_attribute(path),
                );
            }
        },
        Some(v) => {
            let before = diagnostics.len();
            validate_attribute_type(&attr.attr_type, v, path, diagnostics);
            // Constraint checks assume the type is right.
            if diagnostics.len() == before {
                for validator in &attr.validators {
                    check_validator(validator, v, path, diagnostics);
                }
            }
        },
    }
}

fn validate_attribute_type(
    attr_type: &AttributeType,
    value: &Value,
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    match attr_type {
        AttributeType::String if !value.is_string() => {
            diagnostics.push(type_error(path, "string", value))
        },
        AttributeType::Int64 if !is_int64(value) => {
            diagnostics.push(type_error(path, "int64", value))
        },
        AttributeType::Float64 if !value.is_number() => {
            diagnostics.push(type_error(path, "float64", value))
        },
        AttributeType::Bool if !value.is_boolean() => {
            diagnostics.push(type_error(path, "bool", value))
        },
        AttributeType::List(element_type) | AttributeType::Set(element_type) => {
            match value.as_array() {
                Some(arr) => {
                    for (i, elem) in arr.iter().enumerate() {
                        let elem_path = format!("{}.{}", path, i);
                        validate_attribute_type(element_type, elem, &elem_path, diagnostics);
                    }
                },
                None => diagnostics.push(type_error(path, "list", value)),
            }
        },
        AttributeType::Map(value_type) => match value.as_object() {
            Some(obj) => {
                for (key, val) in obj {
                    let key_path = format!("{}.{}", path, key);
                    validate_attribute_type(value_type, val, &key_path, diagnostics);
                }
            },
            None => diagnostics.push(type_error(path, "map", value)),
        },
        AttributeType::Object(attrs) => match value.as_object() {
            Some(obj) => validate_object_type(attrs, obj, path, diagnostics),
            None => diagnostics.push(type_error(path, "object", value)),
        },
        _ => {},
    }
}

fn validate_object_type(
    attrs: &HashMap<String, AttributeType>,
    obj: &serde_json::Map<String, Value>,
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    for (name, attr_type) in attrs {
        if let Some(value) = obj.get(name) {
            validate_attribute_type(attr_type, value, &join_path(path, name), diagnostics);
        }
    }
}

fn check_validator(
    validator: &Validator,
    value: &Value,
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let problem = match (validator, value) {
        (Validator::StringLength { min, max }, Value::String(s)) => {
            let len = s.chars().count();
            (len < *min || len > *max).then(|| {
                format!(
                    "Attribute '{}' string length must be between {} and {}, got: {}",
                    path, min, max, len
                )
            })
        },
        (Validator::OneOf { values }, Value::String(s)) => {
            (!values.iter().any(|v| v == s)).then(|| {
                format!(
                    "Attribute '{}' value must be one of: {}, got: \"{}\"",
                    path,
                    values
                        .iter()
                        .map(|v| format!("\"{}\"", v))
                        .collect::<Vec<_>>()
                        .join(", "),
                    s
                )
            })
        },
        (Validator::Int64Range { min, max }, Value::Number(n)) => {
            let n = n.as_f64().unwrap_or_default() as i64;
            (n < *min || n > *max).then(|| {
                format!(
                    "Attribute '{}' value must be between {} and {}, got: {}",
                    path, min, max, n
                )
            })
        },
        (Validator::IpAddress, Value::String(s)) => s.parse::<IpAddr>().is_err().then(|| {
            format!(
                "Attribute '{}' must be a valid IPv4 or IPv6 address, got: \"{}\"",
                path, s
            )
        }),
        (Validator::Url, Value::String(s)) => (!is_absolute_url(s)).then(|| {
            format!(
                "Attribute '{}' must be a valid http or https URL, got: \"{}\"",
                path, s
            )
        }),
        // Lists of strings: apply the validator to every element.
        (_, Value::Array(items)) => {
            for (i, item) in items.iter().enumerate() {
                check_validator(validator, item, &format!("{}.{}", path, i), diagnostics);
            }
            None
        },
        _ => None,
    };

    if let Some(detail) = problem {
        diagnostics.push(
            Diagnostic::error("Invalid Attribute Value")
                .with_detail(detail)
                .with_attribute(path),
        );
    }
}

fn is_absolute_url(s: &str) -> bool {
    match reqwest::Url::parse(s) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.has_host(),
        Err(_) => false,
    }
}

fn validate_nested_block(
    nested: &NestedBlock,
    value: Option<&Value>,
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let items: Vec<(String, &Value)> = match (nested.nesting_mode, value) {
        (_, None | Some(Value::Null)) => Vec::new(),
        (BlockNestingMode::Single, Some(v)) => vec![(path.to_string(), v)],
        (BlockNestingMode::List | BlockNestingMode::Set, Some(Value::Array(arr))) => arr
            .iter()
            .enumerate()
            .map(|(i, item)| (format!("{}.{}", path, i), item))
            .collect(),
        (BlockNestingMode::Map, Some(Value::Object(obj))) => obj
            .iter()
            .map(|(key, item)| (format!("{}.{}", path, key), item))
            .collect(),
        (mode, Some(v)) => {
            let expected = if mode == BlockNestingMode::Map {
                "map"
            } else {
                "list"
            };
            diagnostics.push(
                Diagnostic::error(format!("Expected {} for block '{}'", expected, path))
                    .with_detail(format!("Got {}", value_type_name(v)))
                    .with_attribute(path),
            );
            return;
        },
    };

    let len = items.len() as u32;
    if len < nested.min_items {
        diagnostics.push(
            Diagnostic::error(format!(
                "Block '{}' requires at least {} item(s), got {}",
                path, nested.min_items, len
            ))
            .with_attribute(path),
        );
    }
    if nested.max_items > 0 && len > nested.max_items {
        diagnostics.push(
            Diagnostic::error(format!(
                "Block '{}' allows at most {} item(s), got {}",
                path, nested.max_items, len
            ))
            .with_attribute(path),
        );
    }

    for (item_path, item) in items {
        validate_block(&nested.block, item, &item_path, diagnostics);
    }
}

fn join_path(base: &str, name: &str) -> String {
    if base.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", base, name)
    }
}

fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn is_int64(value: &Value) -> bool {
    match value {
        Value::Number(n) => {
            n.as_i64().is_some()
                || n.as_f64()
                    .map(|f| f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64)
                    .unwrap_or(false)
        },
        _ => false,
    }
}

fn type_error(path: &str, expected: &str, got: &Value) -> Diagnostic {
    Diagnostic::error(format!("Invalid type for attribute '{}'", path))
        .with_detail(format!("Expected {}, got {}", expected, value_type_name(got)))
        .with_attribute(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Attribute, Block, NestedBlock, Schema};
    use serde_json::json;

    #[test]
    fn test_validate_required_string() {
        let schema = Schema::v0().with_attribute("address", Attribute::required_string());

        assert!(validate(&schema, &json!({"address": "1.1.1.1"})).is_empty());

        let diagnostics = validate(&schema, &json!({}));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].attribute, Some("address".to_string()));

        assert_eq!(validate(&schema, &json!({"address": null})).len(), 1);

        let diagnostics = validate(&schema, &json!({"address": 123}));
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].summary.contains("Invalid type"));
    }

    #[test]
    fn test_validate_optional_and_computed() {
        let schema = Schema::v0()
            .with_attribute("port", Attribute::optional_int64())
            .with_attribute("id", Attribute::computed_string());

        assert!(validate(&schema, &json!({})).is_empty());
        assert!(validate(&schema, &json!({"port": null})).is_empty());
        // Computed-only attributes are never checked.
        assert!(validate(&schema, &json!({"id": 123})).is_empty());
        assert_eq!(validate(&schema, &json!({"port": "514"})).len(), 1);
    }

    #[test]
    fn test_validate_int64_accepts_integral_floats() {
        let schema = Schema::v0().with_attribute("mtu", Attribute::required_int64());

        assert!(validate(&schema, &json!({"mtu": 1500})).is_empty());
        assert!(validate(&schema, &json!({"mtu": 1500.0})).is_empty());
        assert_eq!(validate(&schema, &json!({"mtu": 1500.5})).len(), 1);
    }

    #[test]
    fn test_string_length_validator() {
        let schema = Schema::v0().with_attribute(
            "name",
            Attribute::required_string().with_validator(Validator::length(1, 5)),
        );

        assert!(validate(&schema, &json!({"name": "oslo"})).is_empty());

        let diagnostics = validate(&schema, &json!({"name": ""}));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].summary, "Invalid Attribute Value");

        assert_eq!(validate(&schema, &json!({"name": "trondheim"})).len(), 1);
    }

    #[test]
    fn test_one_of_validator() {
        let schema = Schema::v0().with_attribute(
            "transport",
            Attribute::optional_string().with_validator(Validator::one_of(["udp", "tcp", "tls"])),
        );

        assert!(validate(&schema, &json!({"transport": "tls"})).is_empty());

        let diagnostics = validate(&schema, &json!({"transport": "quic"}));
        assert_eq!(diagnostics.len(), 1);
        let detail = diagnostics[0].detail.as_deref().unwrap();
        assert!(detail.contains("\"udp\", \"tcp\", \"tls\""));
        assert!(detail.contains("quic"));
    }

    #[test]
    fn test_range_validator() {
        let schema = Schema::v0().with_attribute(
            "port",
            Attribute::optional_int64().with_validator(Validator::port()),
        );

        assert!(validate(&schema, &json!({"port": 514})).is_empty());
        assert_eq!(validate(&schema, &json!({"port": 0})).len(), 1);
        assert_eq!(validate(&schema, &json!({"port": 70000})).len(), 1);
    }

    #[test]
    fn test_ip_address_validator() {
        let schema = Schema::v0().with_attribute(
            "address",
            Attribute::required_string().with_validator(Validator::IpAddress),
        );

        assert!(validate(&schema, &json!({"address": "192.168.0.10"})).is_empty());
        assert!(validate(&schema, &json!({"address": "2001:db8::1"})).is_empty());
        assert_eq!(validate(&schema, &json!({"address": "999.1.1.1"})).len(), 1);
    }

    #[test]
    fn test_url_validator() {
        let schema = Schema::v0().with_attribute(
            "url",
            Attribute::required_string().with_validator(Validator::Url),
        );

        assert!(validate(&schema, &json!({"url": "https://policy.example.com/api"})).is_empty());
        assert_eq!(validate(&schema, &json!({"url": "ftp://example.com"})).len(), 1);
        assert_eq!(validate(&schema, &json!({"url": "example.com"})).len(), 1);
    }

    #[test]
    fn test_validator_applies_to_list_elements() {
        let schema = Schema::v0().with_attribute(
            "dns",
            Attribute::optional_string_list().with_validator(Validator::IpAddress),
        );

        assert!(validate(&schema, &json!({"dns": ["1.1.1.1", "8.8.8.8"]})).is_empty());

        let diagnostics = validate(&schema, &json!({"dns": ["1.1.1.1", "nope"]}));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].attribute.as_deref(), Some("dns.1"));
    }

    #[test]
    fn test_validators_skipped_after_type_error() {
        let schema = Schema::v0().with_attribute(
            "port",
            Attribute::optional_int64().with_validator(Validator::port()),
        );

        let diagnostics = validate(&schema, &json!({"port": "high"}));
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].summary.contains("Invalid type"));
    }

    #[test]
    fn test_nested_list_block_limits() {
        let schema = Schema::v0().with_block(
            "rule",
            NestedBlock::list(Block::new().with_attribute("name", Attribute::required_string()))
                .with_min_items(1)
                .with_max_items(2),
        );

        assert!(validate(&schema, &json!({"rule": [{"name": "a"}]})).is_empty());
        assert_eq!(validate(&schema, &json!({"rule": []})).len(), 1);
        assert_eq!(
            validate(&schema, &json!({"rule": [{"name": "a"}, {"name": "b"}, {"name": "c"}]}))
                .len(),
            1
        );

        let diagnostics = validate(&schema, &json!({"rule": [{}]}));
        assert_eq!(diagnostics[0].attribute.as_deref(), Some("rule.0.name"));

        let diagnostics = validate(&schema, &json!({"rule": "nope"}));
        assert!(diagnostics[0].summary.contains("Expected list"));
    }

    #[test]
    fn test_root_must_be_object() {
        let schema = Schema::v0();
        let diagnostics = validate(&schema, &json!("string"));
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].attribute.is_none());
        assert!(validate_result(&schema, &json!({})).is_ok());
        assert!(!is_valid(&schema, &json!(1)));
    }
}
