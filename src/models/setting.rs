//! Typed settings model
//!
//! Settings are stored as strings with a declared type and coerced on
//! read. Coercion never fails: unparseable values fall back to the
//! type's zero value (0, false, {}, "").

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Declared value type of a setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingType {
    String,
    Integer,
    Boolean,
    Json,
}

impl SettingType {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingType::String => "string",
            SettingType::Integer => "integer",
            SettingType::Boolean => "boolean",
            SettingType::Json => "json",
        }
    }

    /// Parse from database string representation; unknown types read
    /// back as plain strings.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "integer" => SettingType::Integer,
            "boolean" => SettingType::Boolean,
            "json" => SettingType::Json,
            _ => SettingType::String,
        }
    }
}

impl std::fmt::Display for SettingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Typed setting value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Str(String),
    Integer(i64),
    Boolean(bool),
    Json(serde_json::Value),
}

impl SettingValue {
    /// Declared type of this value
    pub fn setting_type(&self) -> SettingType {
        match self {
            SettingValue::Str(_) => SettingType::String,
            SettingValue::Integer(_) => SettingType::Integer,
            SettingValue::Boolean(_) => SettingType::Boolean,
            SettingValue::Json(_) => SettingType::Json,
        }
    }

    /// Serialize to the string storage column
    pub fn to_storage(&self) -> String {
        match self {
            SettingValue::Str(s) => s.clone(),
            SettingValue::Integer(i) => i.to_string(),
            SettingValue::Boolean(b) => b.to_string(),
            SettingValue::Json(v) => v.to_string(),
        }
    }
}

/// Setting entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Setting {
    /// Unique setting key
    pub key: String,
    /// Raw string storage
    pub value: String,
    /// Declared value type
    pub value_type: SettingType,
    /// Human-readable description
    pub description: Option<String>,
    /// Grouping category (display, content, interaction, ...)
    pub category: Option<String>,
    /// Whether the setting is exposed publicly
    pub is_public: bool,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Setting {
    /// Coerce the raw value according to the declared type.
    ///
    /// - integer: parse failure or empty value yields 0
    /// - boolean: case-insensitive "true" is true, everything else false
    /// - json: parse failure yields an empty object
    /// - string: the raw value as-is
    pub fn typed_value(&self) -> SettingValue {
        match self.value_type {
            SettingType::Integer => {
                SettingValue::Integer(self.value.trim().parse::<i64>().unwrap_or(0))
            }
            SettingType::Boolean => {
                SettingValue::Boolean(self.value.trim().eq_ignore_ascii_case("true"))
            }
            SettingType::Json => SettingValue::Json(
                serde_json::from_str(&self.value).unwrap_or_else(|_| serde_json::json!({})),
            ),
            SettingType::String => SettingValue::Str(self.value.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setting(value: &str, value_type: SettingType) -> Setting {
        Setting {
            key: "test_key".to_string(),
            value: value.to_string(),
            value_type,
            description: None,
            category: None,
            is_public: false,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_integer_coercion() {
        assert_eq!(
            setting("42", SettingType::Integer).typed_value(),
            SettingValue::Integer(42)
        );
        assert_eq!(
            setting("-7", SettingType::Integer).typed_value(),
            SettingValue::Integer(-7)
        );
        // Unparseable and empty values fall back to 0
        assert_eq!(
            setting("abc", SettingType::Integer).typed_value(),
            SettingValue::Integer(0)
        );
        assert_eq!(
            setting("", SettingType::Integer).typed_value(),
            SettingValue::Integer(0)
        );
    }

    #[test]
    fn test_boolean_coercion() {
        assert_eq!(
            setting("true", SettingType::Boolean).typed_value(),
            SettingValue::Boolean(true)
        );
        assert_eq!(
            setting("TRUE", SettingType::Boolean).typed_value(),
            SettingValue::Boolean(true)
        );
        assert_eq!(
            setting("True", SettingType::Boolean).typed_value(),
            SettingValue::Boolean(true)
        );
        // Anything that is not "true" is false
        assert_eq!(
            setting("false", SettingType::Boolean).typed_value(),
            SettingValue::Boolean(false)
        );
        assert_eq!(
            setting("yes", SettingType::Boolean).typed_value(),
            SettingValue::Boolean(false)
        );
        assert_eq!(
            setting("1", SettingType::Boolean).typed_value(),
            SettingValue::Boolean(false)
        );
        assert_eq!(
            setting("", SettingType::Boolean).typed_value(),
            SettingValue::Boolean(false)
        );
    }

    #[test]
    fn test_json_coercion() {
        assert_eq!(
            setting(r#"{"a": 1}"#, SettingType::Json).typed_value(),
            SettingValue::Json(serde_json::json!({"a": 1}))
        );
        // Parse failure yields an empty object
        assert_eq!(
            setting("{not json", SettingType::Json).typed_value(),
            SettingValue::Json(serde_json::json!({}))
        );
    }

    #[test]
    fn test_string_coercion() {
        assert_eq!(
            setting("hello", SettingType::String).typed_value(),
            SettingValue::Str("hello".to_string())
        );
        assert_eq!(
            setting("", SettingType::String).typed_value(),
            SettingValue::Str("".to_string())
        );
    }

    #[test]
    fn test_value_storage_roundtrip() {
        let values = [
            SettingValue::Str("نائبك".to_string()),
            SettingValue::Integer(24),
            SettingValue::Boolean(true),
            SettingValue::Json(serde_json::json!({"nested": [1, 2]})),
        ];

        for value in values {
            let s = Setting {
                key: "k".to_string(),
                value: value.to_storage(),
                value_type: value.setting_type(),
                description: None,
                category: None,
                is_public: false,
                updated_at: Utc::now(),
            };
            assert_eq!(s.typed_value(), value);
        }
    }

    #[test]
    fn test_setting_type_from_unknown_defaults_to_string() {
        assert_eq!(SettingType::from_str("blob"), SettingType::String);
        assert_eq!(SettingType::from_str("INTEGER"), SettingType::Integer);
    }
}
