//! Positional parameter lists and loosely-typed custom field maps.

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::error::FieldError;

// ==============================================================================
// Positional Params
// ==============================================================================

/// Ordered positional parameters for one node method.
///
/// Required values are appended with [`Params::arg`]. Optional values go
/// through [`Params::opt`]; unsupplied optionals at the tail are dropped when
/// the list is finalized, so the node applies its own defaults. A parameter
/// that may be skipped while a later one is supplied takes an explicit
/// placeholder through [`Params::opt_or`]; the placeholder is only sent when
/// something after it is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    slots: Vec<Slot>,
}

#[derive(Debug, Clone, PartialEq)]
struct Slot {
    value: Option<Value>,
    placeholder: Option<Value>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.slots.push(Slot {
            value: Some(value.into()),
            placeholder: None,
        });
        self
    }

    pub fn opt<V: Into<Value>>(mut self, value: Option<V>) -> Self {
        self.slots.push(Slot {
            value: value.map(Into::into),
            placeholder: None,
        });
        self
    }

    pub fn opt_or<V: Into<Value>>(mut self, value: Option<V>, placeholder: impl Into<Value>) -> Self {
        self.slots.push(Slot {
            value: value.map(Into::into),
            placeholder: Some(placeholder.into()),
        });
        self
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Finalize into the wire array.
    ///
    /// Trailing unsupplied optionals are removed. Interior gaps take their
    /// placeholder, or `null` when the caller registered none.
    pub fn into_values(mut self) -> Vec<Value> {
        while matches!(self.slots.last(), Some(Slot { value: None, .. })) {
            self.slots.pop();
        }
        self.slots
            .into_iter()
            .map(|slot| slot.value.or(slot.placeholder).unwrap_or(Value::Null))
            .collect()
    }
}

impl From<Vec<Value>> for Params {
    fn from(values: Vec<Value>) -> Self {
        values
            .into_iter()
            .fold(Self::new(), |params, value| params.arg(value))
    }
}

// ==============================================================================
// Custom Fields
// ==============================================================================

/// Value kinds accepted in a [`CustomFields`] map.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<FieldValue>),
    Object(CustomFields),
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Int(n) => serializer.serialize_i64(*n),
            Self::Float(n) => serializer.serialize_f64(*n),
            Self::Text(s) => serializer.serialize_str(s),
            Self::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Object(fields) => fields.serialize(serializer),
        }
    }
}

impl FieldValue {
    /// Convert to JSON. Non-finite floats must be rejected by validation first.
    fn to_json(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(b) => Value::Bool(*b),
            Self::Int(n) => Value::from(*n),
            Self::Float(n) => Value::from(*n),
            Self::Text(s) => Value::String(s.clone()),
            Self::List(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            Self::Object(fields) => fields.to_json(),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        Self::Int(v.into())
    }
}

impl From<u32> for FieldValue {
    fn from(v: u32) -> Self {
        Self::Int(v.into())
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<CustomFields> for FieldValue {
    fn from(v: CustomFields) -> Self {
        Self::Object(v)
    }
}

impl<T: Into<FieldValue>> From<Vec<T>> for FieldValue {
    fn from(v: Vec<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}

/// Ordered key/value pairs sent as a JSON object.
///
/// Used for asset details and JSON stream items. Serialization keeps
/// insertion order. Call [`CustomFields::validate`] (verbs do this before
/// building a request) to reject empty or duplicate keys and non-finite
/// numbers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomFields {
    entries: Vec<(String, FieldValue)>,
}

impl CustomFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        self.entries.push((key.into(), value.into()));
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Check keys and values recursively.
    pub fn validate(&self) -> Result<(), FieldError> {
        let mut seen = std::collections::HashSet::with_capacity(self.entries.len());
        for (key, value) in &self.entries {
            if key.is_empty() {
                return Err(FieldError::EmptyKey);
            }
            if !seen.insert(key.as_str()) {
                return Err(FieldError::DuplicateKey(key.clone()));
            }
            validate_value(key, value)?;
        }
        Ok(())
    }

    /// Validate and convert into a JSON value.
    pub fn to_value(&self) -> Result<Value, FieldError> {
        self.validate()?;
        Ok(self.to_json())
    }

    fn to_json(&self) -> Value {
        Value::Object(
            self.entries
                .iter()
                .map(|(key, value)| (key.clone(), value.to_json()))
                .collect(),
        )
    }
}

fn validate_value(key: &str, value: &FieldValue) -> Result<(), FieldError> {
    match value {
        FieldValue::Float(n) if !n.is_finite() => Err(FieldError::NonFinite(key.to_owned())),
        FieldValue::List(items) => items.iter().try_for_each(|item| validate_value(key, item)),
        FieldValue::Object(fields) => fields.validate(),
        _ => Ok(()),
    }
}

impl Serialize for CustomFields {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn trailing_unsupplied_optionals_are_dropped() {
        let values = Params::new()
            .arg("chain1")
            .opt(None::<bool>)
            .opt(None::<u32>)
            .into_values();
        assert_eq!(values, vec![json!("chain1")]);
    }

    #[test]
    fn supplied_optional_after_placeholder_keeps_position() {
        let values = Params::new()
            .arg("stream1")
            .opt_or(None::<bool>, false)
            .opt(Some(10))
            .into_values();
        assert_eq!(values, vec![json!("stream1"), json!(false), json!(10)]);
    }

    #[test]
    fn trailing_placeholder_is_not_sent() {
        let values = Params::new()
            .arg("stream1")
            .opt_or(None::<bool>, false)
            .opt_or(None::<u32>, 10)
            .into_values();
        assert_eq!(values, vec![json!("stream1")]);
    }

    #[test]
    fn unfilled_interior_gap_becomes_null() {
        let values = Params::new().opt(None::<u32>).arg("x").into_values();
        assert_eq!(values, vec![Value::Null, json!("x")]);
    }

    #[test]
    fn custom_fields_serialize_in_insertion_order() {
        let fields = CustomFields::new()
            .with("zeta", 1)
            .with("alpha", "a")
            .with("nested", CustomFields::new().with("ok", true));
        let rendered = serde_json::to_string(&fields).expect("fields must serialize");
        assert_eq!(rendered, r#"{"zeta":1,"alpha":"a","nested":{"ok":true}}"#);
    }

    #[test]
    fn custom_fields_reject_duplicate_keys() {
        let fields = CustomFields::new().with("origin", "uk").with("origin", "fr");
        assert_eq!(
            fields.validate(),
            Err(FieldError::DuplicateKey("origin".into()))
        );
    }

    #[test]
    fn custom_fields_reject_nested_non_finite_numbers() {
        let fields = CustomFields::new().with("prices", vec![1.0, f64::NAN]);
        assert_eq!(
            fields.validate(),
            Err(FieldError::NonFinite("prices".into()))
        );
    }

    #[test]
    fn custom_fields_to_value_keeps_order_and_nesting() {
        let fields = CustomFields::new()
            .with("zeta", 1.5)
            .with("tags", vec!["a", "b"])
            .with("nested", CustomFields::new().with("none", FieldValue::Null));
        let value = fields.to_value().expect("valid fields must convert");
        assert_eq!(value, json!({"zeta": 1.5, "tags": ["a", "b"], "nested": {"none": null}}));
        let keys: Vec<&String> = value.as_object().map(|m| m.keys().collect()).unwrap_or_default();
        assert_eq!(keys, ["zeta", "tags", "nested"]);
    }

    #[test]
    fn custom_fields_to_value_rejects_non_finite_instead_of_nulling() {
        let fields = CustomFields::new().with("rate", f64::INFINITY);
        assert_eq!(fields.to_value(), Err(FieldError::NonFinite("rate".into())));
    }

    #[test]
    fn custom_fields_reject_empty_key() {
        let fields = CustomFields::new().with("", 1);
        assert_eq!(fields.to_value(), Err(FieldError::EmptyKey));
    }
}
