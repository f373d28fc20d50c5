//! Batch merging and store-side reconciliation
//!
//! [`merge`] applies a state batch to existing field states. An
//! [`InputsReducer`] is the store-side reducer for one mount point: it merges
//! the `SET_INPUT` actions tagged with its mount point and keeps the stored
//! state in sync with the configuration as fields are added over time.

use std::sync::Arc;

use crate::action::Action;
use crate::config::FormConfig;
use crate::config::MountPoint;
use crate::model::FieldStates;
use crate::model::FormMeta;
use crate::model::InputsState;
use crate::model::StateBatch;

/// Merges a batch into existing field states.
///
/// Each patched field is replaced wholesale; untouched fields pass through.
pub fn merge(existing: &FieldStates, patch: &StateBatch) -> FieldStates {
    let mut merged = existing.clone();
    merge_into(&mut merged, patch);
    merged
}

fn merge_into(fields: &mut FieldStates, patch: &StateBatch) {
    fields.extend(patch.iter().map(|(key, field)| (key.clone(), field.clone())));
}

/// Adds the default state of every configured field missing from `state`.
///
/// Any existing entry, whether or not it reads as a field state, is never
/// overridden.
pub fn reconcile(config: &FormConfig, mut state: InputsState) -> InputsState {
    for (name, field) in config.fields() {
        if !state.contains_key(name) {
            log::trace!("adding default state for '{name}' at '{}'", config.mount_point());
            state.fields.insert(name.to_string(), field.default_state());
        }
    }
    state
}

/// Store-side reducer for one form's mount point.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use mountform_lib::action::{Action, Meta, set_input_action};
/// use mountform_lib::config::{FieldConfig, FormConfig};
/// use mountform_lib::model::FieldState;
/// use mountform_lib::reducer::InputsReducer;
///
/// let config = Arc::new(
///     FormConfig::builder()
///         .field("email", FieldConfig::new())
///         .build()
///         .unwrap(),
/// );
/// let reducer = InputsReducer::new(config.clone());
///
/// let state = reducer.reduce(None, &Action::other("@@INIT"));
/// let update = [("email".to_string(), FieldState::new("a@b.com"))].into();
/// let state = reducer.reduce(Some(state), &set_input_action(&config, update, Meta::new()));
/// assert_eq!(state.fields["email"], FieldState::new("a@b.com"));
/// ```
#[derive(Debug, Clone)]
pub struct InputsReducer {
    config: Arc<FormConfig>,
}

impl InputsReducer {
    /// Creates the reducer for a configuration.
    pub fn new(config: Arc<FormConfig>) -> Self {
        Self { config }
    }

    /// Returns the configuration this reducer was built for.
    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    /// Returns the mount point this reducer reacts to.
    pub fn mount_point(&self) -> &MountPoint {
        self.config.mount_point()
    }

    /// The state used when the store holds nothing at the mount point.
    pub fn initial_state(&self) -> InputsState {
        InputsState::new(self.config.default_inputs())
    }

    /// Reduces an action into the state at this reducer's mount point.
    ///
    /// Actions tagged with another mount point, or foreign actions, only
    /// reconcile the state against the configuration.
    pub fn reduce(&self, state: Option<InputsState>, action: &Action) -> InputsState {
        let mut state = state.unwrap_or_else(|| self.initial_state());

        if action.mount_point() == Some(self.mount_point()) {
            match action {
                Action::SetInput { payload, .. } => {
                    log::debug!(
                        "merging {} input(s) at '{}'",
                        payload.len(),
                        self.mount_point()
                    );
                    merge_into(&mut state.fields, payload);
                }
                Action::Validating { payload, .. } => {
                    state
                        .form
                        .get_or_insert_with(FormMeta::default)
                        .validating = Some(*payload);
                }
                Action::Other { .. } => {}
            }
        }

        reconcile(&self.config, state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Meta;
    use crate::action::set_input_action;
    use crate::action::validating;
    use crate::config::FieldConfig;
    use crate::model::FieldState;
    use serde_json::json;

    fn reducer(config: FormConfig) -> (Arc<FormConfig>, InputsReducer) {
        let config = Arc::new(config);
        (config.clone(), InputsReducer::new(config))
    }

    fn batch(entries: &[(&str, FieldState)]) -> StateBatch {
        entries
            .iter()
            .map(|(key, field)| (key.to_string(), field.clone()))
            .collect()
    }

    #[test]
    fn test_merge_replaces_fields_wholesale() {
        let existing = batch(&[
            ("email", FieldState::new("a").with_validating(true)),
            ("name", FieldState::new("Bob")),
        ]);
        let merged = merge(&existing, &batch(&[("email", FieldState::new("b"))]));
        assert_eq!(merged["email"], FieldState::new("b"));
        assert_eq!(merged["name"], FieldState::new("Bob"));
    }

    #[test]
    fn test_initial_state_has_defaults() {
        let (_, reducer) = reducer(
            FormConfig::builder()
                .field("email", FieldConfig::new())
                .build()
                .unwrap(),
        );
        let state = reducer.reduce(None, &Action::other("@@INIT"));
        assert_eq!(
            state.to_json(),
            json!({ "_form": {}, "email": { "value": null, "pristine": true } })
        );
    }

    #[test]
    fn test_accepts_inputs_unknown_to_config() {
        let (config, reducer) = reducer(
            FormConfig::builder()
                .field("email", FieldConfig::new())
                .build()
                .unwrap(),
        );
        let action = set_input_action(
            &config,
            batch(&[
                ("email", FieldState::new("test@test.com")),
                ("name", FieldState::new("test")),
            ]),
            Meta::new(),
        );
        let state = reducer.reduce(None, &action);
        assert_eq!(state.fields["email"], FieldState::new("test@test.com"));
        assert_eq!(state.fields["name"], FieldState::new("test"));
    }

    #[test]
    fn test_adds_missing_configured_inputs() {
        let (_, reducer) = reducer(
            FormConfig::builder()
                .field("email", FieldConfig::new())
                .field("name", FieldConfig::new().default_value("test"))
                .build()
                .unwrap(),
        );
        let previous = InputsState::new(batch(&[("phone", FieldState::new(123))]));
        let state = reducer.reduce(Some(previous), &Action::other("UNRELATED"));
        assert_eq!(
            state.to_json(),
            json!({
                "_form": {},
                "email": { "value": null, "pristine": true },
                "name": { "value": "test", "pristine": true },
                "phone": { "value": 123 }
            })
        );
    }

    #[test]
    fn test_reconcile_never_overrides() {
        let config = FormConfig::builder()
            .field("name", FieldConfig::new().default_value("default"))
            .build()
            .unwrap();
        let state = InputsState::new(batch(&[("name", FieldState::new("typed"))]));
        assert_eq!(reconcile(&config, state).fields["name"], FieldState::new("typed"));
    }

    #[test]
    fn test_ignores_other_mount_points() {
        let (_, reducer) = reducer(FormConfig::builder().mount_point("alternate").build().unwrap());
        let default_config = FormConfig::builder().build().unwrap();
        let state = reducer.reduce(None, &Action::other("@@INIT"));

        let foreign = set_input_action(
            &default_config,
            batch(&[("email", FieldState::new("test@test.com"))]),
            Meta::new(),
        );
        let state = reducer.reduce(Some(state), &foreign);
        assert!(state.fields.is_empty());

        let alternate = FormConfig::builder().mount_point("alternate").build().unwrap();
        let own = set_input_action(
            &alternate,
            batch(&[("email", FieldState::new("test@test.com"))]),
            Meta::new(),
        );
        let state = reducer.reduce(Some(state), &own);
        assert_eq!(state.fields["email"], FieldState::new("test@test.com"));
    }

    #[test]
    fn test_set_input_is_idempotent() {
        let (config, reducer) = reducer(
            FormConfig::builder()
                .field("email", FieldConfig::new())
                .build()
                .unwrap(),
        );
        let action = set_input_action(
            &config,
            batch(&[("email", FieldState::new("a@b.com").with_validating(true))]),
            Meta::new(),
        );
        let once = reducer.reduce(None, &action);
        let twice = reducer.reduce(Some(once.clone()), &action);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_validating_sets_form_metadata() {
        let (config, reducer) = reducer(FormConfig::builder().build().unwrap());
        let state = reducer.reduce(None, &validating(&config, true, Meta::new()));
        assert_eq!(state.form.as_ref().and_then(|form| form.validating), Some(true));
        let state = reducer.reduce(Some(state), &validating(&config, false, Meta::new()));
        assert_eq!(state.to_json(), json!({ "_form": { "validating": false } }));
    }
}
