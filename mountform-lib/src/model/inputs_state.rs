//! The subtree stored at a mount point

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use super::FieldState;
use super::FieldStates;
use crate::config::FORM_KEY;

/// Form-level metadata stored under the reserved [`FORM_KEY`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormMeta {
    /// Set by the `VALIDATING` action while a form-wide async operation runs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validating: Option<bool>,

    /// Stored members this crate does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Everything stored at one mount point: form metadata plus field states.
///
/// A state read with [`InputsState::from_json`] remembers the stored
/// subtree. [`InputsState::to_json`] starts from that subtree and only
/// rewrites the entries whose typed state differs from what was stored, so
/// entries that are not field states, and fields nobody touched, are
/// written back exactly as they were.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputsState {
    /// Form-level metadata; `None` when nothing readable is stored.
    pub form: Option<FormMeta>,
    /// Field states keyed by field name.
    pub fields: FieldStates,
    stored: Map<String, Value>,
}

impl InputsState {
    /// Creates a fresh state with default metadata and the given fields.
    pub fn new(fields: FieldStates) -> Self {
        Self {
            form: Some(FormMeta::default()),
            fields,
            stored: Map::new(),
        }
    }

    /// Reads a stored subtree.
    ///
    /// Entries that are not field-state objects stay out of [`Self::fields`]
    /// but are kept for writing back. A non-object subtree reads as empty.
    pub fn from_json(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            if !value.is_null() {
                log::warn!("expected an object at mount point, found {value}");
            }
            return Self::default();
        };

        let mut state = Self {
            stored: object.clone(),
            ..Self::default()
        };
        for (key, entry) in object {
            if key == FORM_KEY {
                state.form = parse_form(entry);
                if state.form.is_none() {
                    log::warn!("form metadata is not readable, keeping it as stored");
                }
                continue;
            }
            match parse_field(entry) {
                Some(field) => {
                    state.fields.insert(key.clone(), field);
                }
                None => log::debug!("'{key}' is not a field state, keeping it as stored"),
            }
        }
        state
    }

    /// Returns `true` if `key` is a field or any other stored entry.
    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key) || self.stored.contains_key(key)
    }

    /// Returns the stored entry for `key` as it was read.
    pub fn stored(&self, key: &str) -> Option<&Value> {
        self.stored.get(key)
    }

    /// Writes the subtree back to its stored shape.
    pub fn to_json(&self) -> Value {
        let mut object = self.stored.clone();

        if let Some(form) = &self.form {
            let unchanged = self
                .stored
                .get(FORM_KEY)
                .and_then(parse_form)
                .is_some_and(|stored| &stored == form);
            if !unchanged {
                match serde_json::to_value(form) {
                    Ok(value) => {
                        object.insert(FORM_KEY.to_string(), value);
                    }
                    Err(e) => log::error!("failed to write form metadata: {e}"),
                }
            }
        }

        for (key, field) in &self.fields {
            let unchanged = self
                .stored
                .get(key)
                .and_then(parse_field)
                .is_some_and(|stored| &stored == field);
            if unchanged {
                continue;
            }
            match serde_json::to_value(field) {
                Ok(value) => {
                    object.insert(key.clone(), value);
                }
                Err(e) => log::error!("failed to write '{key}': {e}"),
            }
        }

        Value::Object(object)
    }
}

fn parse_form(entry: &Value) -> Option<FormMeta> {
    entry
        .is_object()
        .then(|| serde_json::from_value(entry.clone()).ok())
        .flatten()
}

fn parse_field(entry: &Value) -> Option<FieldState> {
    entry
        .is_object()
        .then(|| serde_json::from_value(entry.clone()).ok())
        .flatten()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_round_trips_stored_shape() {
        let stored = json!({
            "_form": {},
            "email": { "value": "a@b.com", "validating": true },
            "phone": { "value": 123 }
        });
        let state = InputsState::from_json(&stored);
        assert_eq!(state.fields.len(), 2);
        assert_eq!(state.form, Some(FormMeta::default()));
        assert_eq!(state.to_json(), stored);
    }

    #[test]
    fn test_keeps_non_field_entries() {
        let stored = json!({ "email": "oops", "tags": [1, 2], "name": { "value": 1 } });
        let state = InputsState::from_json(&stored);
        assert_eq!(state.fields.keys().collect::<Vec<_>>(), vec!["name"]);
        assert!(state.contains_key("email"));
        assert_eq!(state.stored("email"), Some(&json!("oops")));
        assert_eq!(state.to_json(), stored);
    }

    #[test]
    fn test_untouched_entries_are_written_as_stored() {
        let stored = json!({
            "email": { "error": "x" },
            "name": { "value": "Bob", "validating": null }
        });
        let state = InputsState::from_json(&stored);
        assert_eq!(state.fields["email"].value, Value::Null);
        assert_eq!(state.to_json(), stored);
    }

    #[test]
    fn test_changed_fields_are_rewritten() {
        let mut state = InputsState::from_json(&json!({
            "legacy": 7,
            "email": { "value": "a", "touched": true }
        }));
        state.fields.insert("email".to_string(), FieldState::new("b"));
        assert_eq!(
            state.to_json(),
            json!({ "legacy": 7, "email": { "value": "b" } })
        );
    }

    #[test]
    fn test_reads_form_metadata() {
        let state = InputsState::from_json(&json!({ "_form": { "validating": true } }));
        assert_eq!(state.form.and_then(|form| form.validating), Some(true));
        assert!(state.fields.is_empty());
    }

    #[test]
    fn test_unreadable_form_metadata_is_kept() {
        let stored = json!({ "_form": "locked" });
        let state = InputsState::from_json(&stored);
        assert_eq!(state.form, None);
        assert_eq!(state.to_json(), stored);
    }

    #[test]
    fn test_fresh_state_writes_form_metadata() {
        let state = InputsState::new(FieldStates::new());
        assert_eq!(state.to_json(), json!({ "_form": {} }));
    }

    #[test]
    fn test_missing_subtree_reads_empty() {
        assert_eq!(InputsState::from_json(&Value::Null), InputsState::default());
    }
}
