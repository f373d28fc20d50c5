//! Validation orchestration for one form bound to a store.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;

use futures::FutureExt;
use futures::future::BoxFuture;
use futures::future::join_all;
use serde_json::Value;

use crate::action::Meta;
use crate::action::inputs_have_errors;
use crate::action::set_input_action;
use crate::config::ChangeEvent;
use crate::config::FormConfig;
use crate::config::FORM_KEY;
use crate::error::Diagnostic;
use crate::error::InvalidInputs;
use crate::model::FieldState;
use crate::model::FieldStates;
use crate::model::StateBatch;
use crate::props::map_input_values;
use crate::store::Store;
use crate::store::read_inputs;
use crate::validation::Classified;
use crate::validation::Settlement;
use crate::validation::ValidationOutcome;
use crate::validation::classify;
use crate::validation::settle;

/// Aggregate outcome of an orchestration call.
///
/// Resolves with the final patch of every touched field, or rejects with
/// the final patches of the fields that are still errored.
pub type Validation = BoxFuture<'static, Result<StateBatch, InvalidInputs>>;

/// A form configuration bound to a store.
///
/// Cloning is cheap; clones share the configuration, the store and the
/// recorded diagnostics.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use mountform_lib::Form;
/// use mountform_lib::action::Meta;
/// use mountform_lib::config::{FieldConfig, FormConfig};
/// use mountform_lib::reducer::InputsReducer;
/// use mountform_lib::store::MemoryStore;
/// use serde_json::json;
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let age = FieldConfig::new().validator(|v, _, _| v.as_i64().is_some_and(|n| n >= 18));
///     let config = Arc::new(FormConfig::builder().field("age", age).build().unwrap());
///     let store = Arc::new(MemoryStore::new([InputsReducer::new(config.clone())]));
///     let form = Form::new(config, store);
///
///     let result = form
///         .update_and_validate([("age".to_string(), json!(21))].into(), Meta::new())
///         .await;
///     assert!(result.is_ok());
///     assert_eq!(form.values()["age"], json!(21));
/// }
/// ```
#[derive(Clone)]
pub struct Form {
    config: Arc<FormConfig>,
    store: Arc<dyn Store>,
    diagnostics: Arc<Mutex<Vec<Diagnostic>>>,
}

impl Form {
    /// Binds a configuration to a store.
    pub fn new(config: Arc<FormConfig>, store: Arc<dyn Store>) -> Self {
        Self {
            config,
            store,
            diagnostics: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    /// Returns the store handle.
    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    /// Reads the current field states at the mount point.
    pub fn inputs(&self) -> FieldStates {
        read_inputs(&self.config, &self.store.get_state())
    }

    /// Reads the current value of every field at the mount point.
    pub fn values(&self) -> BTreeMap<String, Value> {
        map_input_values(&self.inputs())
    }

    /// Returns the diagnostics recorded so far.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Returns and forgets the diagnostics recorded so far.
    pub fn take_diagnostics(&self) -> Vec<Diagnostic> {
        std::mem::take(
            &mut *self
                .diagnostics
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner()),
        )
    }

    fn record(&self, diagnostic: Diagnostic) {
        log::error!("{diagnostic}");
        self.diagnostics
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(diagnostic);
    }

    /// Sets field states without validation.
    ///
    /// Dispatches one `SET_INPUT` action for the whole batch, then, unless
    /// `meta.suppress_change` is set, calls the change hook of every touched
    /// field in declaration order.
    pub fn set_input(&self, update: StateBatch, meta: Meta) -> StateBatch {
        let suppress_change = meta.suppress_change;
        self.store
            .dispatch(set_input_action(&self.config, update.clone(), meta));

        if !suppress_change {
            self.fire_changes(&update);
        }
        update
    }

    fn fire_changes(&self, update: &StateBatch) {
        let hooks: Vec<_> = self
            .config
            .fields()
            .filter_map(|(name, field)| Some((name, update.get(name)?, field.get_on_change()?)))
            .collect();
        if hooks.is_empty() {
            return;
        }

        let state = self.store.get_state();
        let inputs = read_inputs(&self.config, &state);
        for (field, input, hook) in hooks {
            hook(ChangeEvent {
                field,
                input,
                inputs: &inputs,
                state: &state,
                store: self.store.as_ref(),
            });
        }
    }

    /// Sets the form-level validating flag.
    pub fn validating(&self, validating: bool, meta: Meta) {
        self.store
            .dispatch(crate::action::validating(&self.config, validating, meta));
    }

    /// Validates a batch of proposed values and applies the results.
    ///
    /// Synchronous outcomes and `validating` markers for async outcomes are
    /// dispatched as one batch before this method returns, followed by the
    /// change hooks. Each async outcome then settles on its own task and
    /// dispatches its own one-field batch. The returned future completes
    /// once every settlement has been applied.
    ///
    /// Fields unknown to the configuration, and fields whose validator
    /// returns an unsupported shape, are dropped and recorded as
    /// diagnostics.
    ///
    /// Must be called from within a tokio runtime when any validator is
    /// asynchronous.
    pub fn update_and_validate(&self, update: BTreeMap<String, Value>, meta: Meta) -> Validation {
        let proposed = self.filter_unknown(update);
        if proposed.is_empty() {
            return futures::future::ready(Ok(StateBatch::new())).boxed();
        }

        let state = self.store.get_state();
        let inputs = read_inputs(&self.config, &state);

        let mut changes = StateBatch::new();
        let mut settled = StateBatch::new();
        let mut pending = Vec::new();

        for (key, value) in proposed {
            let Some(field) = self.config.field(&key) else {
                continue;
            };
            let outcome = match field.get_validator() {
                Some(validator) => validator(&value, &inputs, &state),
                None => ValidationOutcome::Accepted,
            };
            let previous = inputs
                .get(&key)
                .map(|input| input.value.clone())
                .unwrap_or_default();

            match classify(&key, value, previous, outcome) {
                Ok(classified) => {
                    let patch = stamp(classified.immediate_patch(), &meta);
                    changes.insert(key.clone(), patch.clone());
                    match classified {
                        Classified::Pending {
                            value,
                            previous,
                            settlement,
                        } => pending.push((key, value, previous, settlement)),
                        _ => {
                            settled.insert(key, patch);
                        }
                    }
                }
                Err(diagnostic) => self.record(diagnostic),
            }
        }

        self.set_input(changes, meta.clone());

        let tasks: Vec<_> = pending
            .into_iter()
            .map(|(key, value, previous, settlement)| {
                let task = self
                    .clone()
                    .settle_field(key, value, previous, settlement, meta.clone());
                tokio::spawn(task)
            })
            .collect();

        async move {
            for joined in join_all(tasks).await {
                match joined {
                    Ok((key, patch)) => {
                        settled.insert(key, patch);
                    }
                    Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
                    Err(e) => log::warn!("settlement task did not complete: {e}"),
                }
            }

            match inputs_have_errors(&settled) {
                Some(errored) => Err(InvalidInputs::new(errored)),
                None => Ok(settled),
            }
        }
        .boxed()
    }

    async fn settle_field(
        self,
        key: String,
        value: Value,
        previous: Value,
        settlement: Settlement,
        meta: Meta,
    ) -> (String, FieldState) {
        let patch = stamp(settle(value, previous, settlement).await, &meta);
        log::debug!("'{key}' settled (errored: {})", patch.is_errored());
        self.set_input(StateBatch::from([(key.clone(), patch.clone())]), meta);
        (key, patch)
    }

    fn filter_unknown(&self, update: BTreeMap<String, Value>) -> BTreeMap<String, Value> {
        update
            .into_iter()
            .filter(|(key, _)| {
                let known = self.config.contains(key);
                if !known {
                    self.record(Diagnostic::UnknownField { field: key.clone() });
                }
                known
            })
            .collect()
    }

    /// Re-validates the stored values of the given fields, or of every
    /// stored field when `keys` is `None`.
    ///
    /// An errored field is re-validated with its error marker, i.e. the
    /// value that was last rejected.
    pub fn validate_inputs(&self, keys: Option<&[&str]>, meta: Meta) -> Validation {
        let inputs = self.inputs();
        let keys: Vec<&str> = match keys {
            Some(keys) => keys.to_vec(),
            None => inputs.keys().map(String::as_str).collect(),
        };

        let update: BTreeMap<String, Value> = keys
            .into_iter()
            .filter(|&key| key != FORM_KEY && self.config.contains(key))
            .filter_map(|key| {
                let input = inputs.get(key)?;
                Some((key.to_string(), input.display_value().clone()))
            })
            .collect();

        self.update_and_validate(update, meta.validate())
    }

    /// Restores configured defaults for the given fields, or for every
    /// configured field when `keys` is `None`. No validation runs.
    pub fn reset_inputs(&self, keys: Option<&[&str]>, meta: Meta) -> StateBatch {
        let mut defaults = self.config.default_inputs();
        if let Some(keys) = keys {
            defaults.retain(|key, _| keys.contains(&key.as_str()));
        }
        self.set_input(defaults, meta.reset())
    }

    /// Validates a first population of the form; every patch is pristine.
    pub fn initialize_inputs(&self, update: BTreeMap<String, Value>, meta: Meta) -> Validation {
        self.update_and_validate(update, meta.initialize())
    }
}

fn stamp(patch: FieldState, meta: &Meta) -> FieldState {
    if meta.initialize { patch.or_pristine() } else { patch }
}
