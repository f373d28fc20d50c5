//! Field state and state batches

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

/// Per-field state keyed by field name.
pub type FieldStates = BTreeMap<String, FieldState>;

/// A set of per-field patches produced by one phase of an orchestration call.
///
/// Every entry replaces the stored state of its field wholesale.
pub type StateBatch = BTreeMap<String, FieldState>;

/// The state of a single form field.
///
/// An `error` marker (any value, including `""`) marks the field invalid.
/// `Value::Null` stands in for an unset value.
///
/// # Example
///
/// ```
/// use mountform_lib::model::FieldState;
/// use serde_json::json;
///
/// let state = FieldState::new(json!("a@b.com")).with_validating(false);
/// assert!(!state.is_errored());
/// assert_eq!(
///     serde_json::to_value(&state).unwrap(),
///     json!({ "value": "a@b.com", "validating": false })
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldState {
    /// The last accepted value.
    #[serde(default)]
    pub value: Value,

    /// Error marker: the rejected value, or `""` if the rejected value was falsy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,

    /// Human-readable reason supplied by the validator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_text: Option<String>,

    /// Set while an async validator is in flight.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validating: Option<bool>,

    /// Set when the field was (re)initialized and not yet modified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pristine: Option<bool>,

    /// Stored members this crate does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FieldState {
    /// Creates a state holding only a value.
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            ..Self::default()
        }
    }

    /// Creates the pristine default state for a field.
    pub fn pristine(default_value: Value) -> Self {
        Self {
            value: default_value,
            pristine: Some(true),
            ..Self::default()
        }
    }

    /// Creates a rejected state that keeps the previous value.
    pub fn rejected(previous: Value, error: Value, error_text: Option<String>) -> Self {
        Self {
            value: previous,
            error: Some(error),
            error_text,
            ..Self::default()
        }
    }

    /// Sets the `validating` flag.
    pub fn with_validating(mut self, validating: bool) -> Self {
        self.validating = Some(validating);
        self
    }

    /// Sets the error text.
    pub fn with_error_text(mut self, error_text: impl Into<String>) -> Self {
        self.error_text = Some(error_text.into());
        self
    }

    /// Marks the state pristine unless it already says otherwise.
    pub fn or_pristine(mut self) -> Self {
        self.pristine.get_or_insert(true);
        self
    }

    /// Returns `true` if the field carries an error marker.
    pub fn is_errored(&self) -> bool {
        self.error.is_some()
    }

    /// Returns `true` if an async validation is in flight.
    pub fn is_validating(&self) -> bool {
        self.validating.unwrap_or(false)
    }

    /// Returns `true` if the field is still at its initialized default.
    pub fn is_pristine(&self) -> bool {
        self.pristine.unwrap_or(false)
    }

    /// Returns the value a user should see: the error marker if errored,
    /// the stored value otherwise.
    pub fn display_value(&self) -> &Value {
        self.error.as_ref().unwrap_or(&self.value)
    }
}

/// Truthiness of a dynamic value.
///
/// `null`, `false`, `0` and `""` are falsy; everything else is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// The error marker recorded for a rejected value.
pub fn error_marker(rejected: &Value) -> Value {
    if is_truthy(rejected) {
        rejected.clone()
    } else {
        Value::String(String::new())
    }
}

/// Name of the JSON type of a value, for diagnostics.
pub fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
