//! Raw row-shaped input as it arrives from a data source.
//!
//! A record is an ordered list of `(key, value)` pairs. Keys are the textual
//! form of whatever the source supplied: JSON object keys, SQL column names,
//! or spreadsheet header cells (numeric headers such as `2024` become text).

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;
use unicode_normalization::UnicodeNormalization;

/// A single cell value
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Null,
    Bool(bool),
    Number(Decimal),
    Text(String),
}

impl RawValue {
    pub fn is_blank(&self) -> bool {
        match self {
            RawValue::Null => true,
            RawValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Text form used for names, units and categories
    pub fn as_text(&self) -> Option<String> {
        match self {
            RawValue::Null => None,
            RawValue::Bool(b) => Some(b.to_string()),
            RawValue::Number(n) => Some(n.normalize().to_string()),
            RawValue::Text(s) => Some(s.trim().to_string()),
        }
    }

    /// Convert a floating point cell (Excel, SQLite REAL) without binary noise
    pub fn from_f64(value: f64) -> Self {
        if !value.is_finite() {
            return RawValue::Null;
        }
        // Shortest round-trip text keeps 45.2 as 45.2 rather than 45.2000000000000028
        Decimal::from_str(&value.to_string())
            .ok()
            .or_else(|| Decimal::from_f64(value))
            .map(RawValue::Number)
            .unwrap_or(RawValue::Null)
    }

    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => RawValue::Null,
            Value::Bool(b) => RawValue::Bool(*b),
            Value::Number(n) => {
                let text = n.to_string();
                Decimal::from_str(&text)
                    .or_else(|_| Decimal::from_scientific(&text))
                    .map(RawValue::Number)
                    .unwrap_or_else(|_| n.as_f64().map(RawValue::from_f64).unwrap_or(RawValue::Null))
            }
            Value::String(s) => RawValue::Text(s.clone()),
            // Nested structures carry no figure; keep their text so nothing is silently lost
            other => RawValue::Text(other.to_string()),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            RawValue::Null => Value::Null,
            RawValue::Bool(b) => Value::Bool(*b),
            RawValue::Number(n) => {
                let text = n.normalize().to_string();
                serde_json::from_str::<serde_json::Number>(&text)
                    .map(Value::Number)
                    .unwrap_or(Value::String(text))
            }
            RawValue::Text(s) => Value::String(s.clone()),
        }
    }

    /// Text for table cells; null is empty
    pub fn display(&self) -> String {
        self.as_text().unwrap_or_default()
    }
}

/// Normalize a key: trimmed, NFC (spreadsheets saved on macOS often carry NFD Hangul)
pub fn normalize_key(key: &str) -> String {
    key.trim().nfc().collect()
}

/// One input row with its keys in source order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    fields: Vec<(String, RawValue)>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field; a repeated key replaces the earlier value in place
    pub fn insert(&mut self, key: &str, value: RawValue) {
        let key = normalize_key(key);
        if let Some(slot) = self.fields.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.fields.push((key, value));
        }
    }

    pub fn with(mut self, key: &str, value: RawValue) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Case-insensitive lookup, used for English fallback keys
    pub fn get_ignore_case(&self, key: &str) -> Option<&RawValue> {
        self.fields
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &RawValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Build from a JSON object; non-objects yield `None`
    pub fn from_json(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let mut record = RawRecord::new();
        for (key, value) in object {
            record.insert(key, RawValue::from_json(value));
        }
        Some(record)
    }

    /// JSON object with keys in record order
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.fields
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        )
    }
}

impl<K: AsRef<str>> FromIterator<(K, RawValue)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (K, RawValue)>>(iter: I) -> Self {
        let mut record = RawRecord::new();
        for (key, value) in iter {
            record.insert(key.as_ref(), value);
        }
        record
    }
}
