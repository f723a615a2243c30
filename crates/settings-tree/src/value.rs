/*
 * value.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Setting default values and their display form.

use serde::Serialize;
use serde_yaml::Value as YamlValue;

/// Printed for default values that have no other representation.
///
/// The misspelling is deliberate: existing rendered documentation contains it.
pub const UNKNOWN_KIND: &str = "unkown";

/// The default value of a setting, classified once when the definition is read.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
    Null,
    Bool(bool),
    String(String),
    Float(f64),
    Integer(i128),
    /// A list or map, kept as parsed.
    Structured(YamlValue),
    /// Anything else, such as an explicitly tagged YAML value.
    Other,
}

impl DefaultValue {
    /// Classify a parsed YAML value.
    pub fn from_yaml(value: &YamlValue) -> Self {
        match value {
            YamlValue::Null => DefaultValue::Null,
            YamlValue::Bool(b) => DefaultValue::Bool(*b),
            YamlValue::String(s) => DefaultValue::String(s.clone()),
            YamlValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    DefaultValue::Integer(i128::from(i))
                } else if let Some(u) = n.as_u64() {
                    DefaultValue::Integer(i128::from(u))
                } else if let Some(f) = n.as_f64() {
                    DefaultValue::Float(f)
                } else {
                    DefaultValue::Other
                }
            }
            YamlValue::Sequence(_) | YamlValue::Mapping(_) => {
                DefaultValue::Structured(value.clone())
            }
            YamlValue::Tagged(_) => DefaultValue::Other,
        }
    }

    /// True for the empty string, which is documented as "no default".
    pub fn is_empty_string(&self) -> bool {
        matches!(self, DefaultValue::String(s) if s.is_empty())
    }

    /// Display form of the value.
    ///
    /// Strings are wrapped in double quotes without escaping, floats use two
    /// decimal places, lists and maps are pretty-printed as JSON.
    pub fn format(&self) -> String {
        match self {
            DefaultValue::Null => "null".to_string(),
            DefaultValue::Bool(true) => "true".to_string(),
            DefaultValue::Bool(false) => "false".to_string(),
            DefaultValue::String(s) => format!("\"{}\"", s),
            DefaultValue::Float(f) => format_two_decimals(*f),
            DefaultValue::Integer(i) => i.to_string(),
            DefaultValue::Structured(value) => to_pretty_json(value),
            DefaultValue::Other => UNKNOWN_KIND.to_string(),
        }
    }
}

/// Format `value` with two decimals.
///
/// The value is first reduced to 15 significant digits, then rounded half
/// away from zero, so `0.125` gives `0.13` and `1.005` gives `1.01`.
fn format_two_decimals(value: f64) -> String {
    let fallback = || format!("{:.2}", value);
    if !value.is_finite() {
        return fallback();
    }

    // `d.dddddddddddddde<exp>`, i.e. `digits * 10^(exp - 14)`.
    let scientific = format!("{:.14e}", value.abs());
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return fallback();
    };
    let (Ok(digits), Ok(exponent)) = (
        mantissa.replace('.', "").parse::<u128>(),
        exponent.parse::<i32>(),
    ) else {
        return fallback();
    };

    let shift = exponent - 12;
    let hundredths = if shift >= 0 {
        match 10u128
            .checked_pow(shift.unsigned_abs())
            .and_then(|scale| digits.checked_mul(scale))
        {
            Some(hundredths) => hundredths,
            None => return fallback(),
        }
    } else if shift < -30 {
        0
    } else {
        let divisor = 10u128.pow(shift.unsigned_abs());
        (digits + divisor / 2) / divisor
    };

    let sign = if value < 0.0 { "-" } else { "" };
    format!("{}{}.{:02}", sign, hundredths / 100, hundredths % 100)
}

/// Render a scalar YAML value as plain text.
///
/// Returns `None` for lists, maps and tagged values.
pub fn scalar_to_string(value: &YamlValue) -> Option<String> {
    match value {
        YamlValue::Null => Some(String::new()),
        YamlValue::Bool(b) => Some(b.to_string()),
        YamlValue::Number(n) => Some(n.to_string()),
        YamlValue::String(s) => Some(s.clone()),
        _ => None,
    }
}

/// Pretty-print a YAML value as JSON with four-space indentation.
pub fn to_pretty_json(value: &YamlValue) -> String {
    let json = yaml_to_json(value);
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    match json.serialize(&mut serializer) {
        Ok(()) => String::from_utf8(buf).unwrap_or_else(|_| json.to_string()),
        Err(_) => json.to_string(),
    }
}

fn yaml_to_json(value: &YamlValue) -> serde_json::Value {
    match value {
        YamlValue::Null => serde_json::Value::Null,
        YamlValue::Bool(b) => serde_json::Value::Bool(*b),
        YamlValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                serde_json::Value::from(i)
            } else if let Some(u) = n.as_u64() {
                serde_json::Value::from(u)
            } else {
                n.as_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map_or(serde_json::Value::Null, serde_json::Value::Number)
            }
        }
        YamlValue::String(s) => serde_json::Value::String(s.clone()),
        YamlValue::Sequence(items) => {
            serde_json::Value::Array(items.iter().map(yaml_to_json).collect())
        }
        YamlValue::Mapping(map) => serde_json::Value::Object(
            map.iter()
                .map(|(k, v)| {
                    let key = scalar_to_string(k).unwrap_or_else(|| to_pretty_json(k));
                    (key, yaml_to_json(v))
                })
                .collect(),
        ),
        YamlValue::Tagged(tagged) => yaml_to_json(&tagged.value),
    }
}
