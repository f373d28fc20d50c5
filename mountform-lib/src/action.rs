//! Store actions and action creators

use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use crate::config::FormConfig;
use crate::config::MountPoint;
use crate::model::StateBatch;

/// Type tag of a field-state update.
pub const SET_INPUT: &str = "SET_INPUT";

/// Type tag of a form-level validating flag update.
pub const VALIDATING: &str = "VALIDATING";

/// Per-call options, carried in the meta of every action the call dispatches.
///
/// # Example
///
/// ```
/// use mountform_lib::action::Meta;
/// use serde_json::json;
///
/// let meta = Meta::new().suppress_change().with_extra("source", json!("import"));
/// assert!(meta.suppress_change);
/// assert_eq!(meta.extra["source"], json!("import"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    /// Skip change hooks for this call.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub suppress_change: bool,
    /// The batch restores configured defaults.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub reset: bool,
    /// Every patch of the call is marked pristine.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub initialize: bool,
    /// The call re-validates stored values.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub validate: bool,
    /// Caller-defined entries.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Meta {
    /// Creates empty meta.
    pub fn new() -> Self {
        Self::default()
    }

    /// Suppresses change hooks.
    pub fn suppress_change(mut self) -> Self {
        self.suppress_change = true;
        self
    }

    /// Marks the call as a reset.
    pub fn reset(mut self) -> Self {
        self.reset = true;
        self
    }

    /// Marks the call as an initialization.
    pub fn initialize(mut self) -> Self {
        self.initialize = true;
        self
    }

    /// Marks the call as a re-validation.
    pub fn validate(mut self) -> Self {
        self.validate = true;
        self
    }

    /// Adds a caller-defined entry.
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// Meta attached to a dispatched action.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionMeta {
    /// The mount point the action targets.
    pub mount_point: MountPoint,
    /// Options of the call that produced the action.
    #[serde(flatten)]
    pub meta: Meta,
}

/// An action dispatched to the external store.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Action {
    /// Replace the state of every field in the payload.
    #[serde(rename = "SET_INPUT")]
    SetInput {
        payload: StateBatch,
        error: bool,
        meta: ActionMeta,
    },
    /// Set the form-level validating flag.
    #[serde(rename = "VALIDATING")]
    Validating { payload: bool, meta: ActionMeta },
    /// Any action this crate does not produce.
    #[serde(untagged)]
    Other { kind: String },
}

impl Action {
    /// Creates an action foreign to this crate.
    pub fn other(kind: impl Into<String>) -> Self {
        Self::Other { kind: kind.into() }
    }

    /// Returns the action's type tag.
    pub fn kind(&self) -> &str {
        match self {
            Self::SetInput { .. } => SET_INPUT,
            Self::Validating { .. } => VALIDATING,
            Self::Other { kind } => kind,
        }
    }

    /// Returns the mount point the action is tagged with, if any.
    pub fn mount_point(&self) -> Option<&MountPoint> {
        match self {
            Self::SetInput { meta, .. } | Self::Validating { meta, .. } => Some(&meta.mount_point),
            Self::Other { .. } => None,
        }
    }

    /// Returns the field-state payload of a `SET_INPUT` action.
    pub fn payload(&self) -> Option<&StateBatch> {
        match self {
            Self::SetInput { payload, .. } => Some(payload),
            _ => None,
        }
    }

    /// Returns `true` if the action carries errored fields.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::SetInput { error: true, .. })
    }
}

/// Builds the `SET_INPUT` action for a batch.
pub fn set_input_action(config: &FormConfig, update: StateBatch, meta: Meta) -> Action {
    Action::SetInput {
        error: inputs_have_errors(&update).is_some(),
        payload: update,
        meta: ActionMeta {
            mount_point: config.mount_point().clone(),
            meta,
        },
    }
}

/// Builds the `VALIDATING` action.
pub fn validating(config: &FormConfig, validating: bool, meta: Meta) -> Action {
    Action::Validating {
        payload: validating,
        meta: ActionMeta {
            mount_point: config.mount_point().clone(),
            meta,
        },
    }
}

/// Returns the errored fields of a batch, or `None` if there are none.
pub fn inputs_have_errors(batch: &StateBatch) -> Option<StateBatch> {
    let errored: StateBatch = batch
        .iter()
        .filter(|(_, field)| field.is_errored())
        .map(|(key, field)| (key.clone(), field.clone()))
        .collect();
    (!errored.is_empty()).then_some(errored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FieldConfig;
    use crate::model::FieldState;
    use serde_json::json;

    fn batch(entries: &[(&str, FieldState)]) -> StateBatch {
        entries
            .iter()
            .map(|(key, field)| (key.to_string(), field.clone()))
            .collect()
    }

    #[test]
    fn test_set_input_action() {
        let config = FormConfig::builder().build().unwrap();
        let action = set_input_action(
            &config,
            batch(&[("email", FieldState::new("test@test.com"))]),
            Meta::new(),
        );
        assert_eq!(
            serde_json::to_value(&action).unwrap(),
            json!({
                "type": "SET_INPUT",
                "payload": { "email": { "value": "test@test.com" } },
                "error": false,
                "meta": { "mountPoint": "inputs" }
            })
        );
    }

    #[test]
    fn test_set_input_action_flags_errors() {
        let config = FormConfig::builder().build().unwrap();
        let mut errored = FieldState::default();
        errored.error = Some(json!("test@test.com"));
        let action = set_input_action(&config, batch(&[("email", errored)]), Meta::new());
        assert!(action.is_error());
    }

    #[test]
    fn test_set_input_action_uses_configured_mount_point() {
        let config = FormConfig::builder()
            .mount_point("alternate")
            .field("email", FieldConfig::new())
            .build()
            .unwrap();
        let action = set_input_action(&config, StateBatch::new(), Meta::new().reset());
        assert_eq!(action.mount_point().map(MountPoint::as_str), Some("alternate"));
        assert_eq!(
            serde_json::to_value(&action).unwrap()["meta"],
            json!({ "mountPoint": "alternate", "reset": true })
        );
    }

    #[test]
    fn test_validating_action() {
        let config = FormConfig::builder().build().unwrap();
        assert_eq!(
            serde_json::to_value(validating(&config, true, Meta::new())).unwrap(),
            json!({ "type": "VALIDATING", "payload": true, "meta": { "mountPoint": "inputs" } })
        );
    }

    #[test]
    fn test_inputs_have_errors() {
        let ok = batch(&[("a", FieldState::new(1))]);
        assert_eq!(inputs_have_errors(&ok), None);

        let mixed = batch(&[
            ("a", FieldState::new(1)),
            ("b", FieldState::rejected(json!(null), json!(""), None)),
        ]);
        let errored = inputs_have_errors(&mixed).unwrap();
        assert_eq!(errored.keys().collect::<Vec<_>>(), vec!["b"]);
    }
}
