//! Static description of one form field

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use serde_json::Map;
use serde_json::Value;

use crate::model::FieldState;
use crate::model::FieldStates;
use crate::store::Store;
use crate::validation::ValidationOutcome;

/// Validator closure: `(proposed value, current field states, full store tree)`.
pub type Validator = Arc<dyn Fn(&Value, &FieldStates, &Value) -> ValidationOutcome + Send + Sync>;

/// Change hook closure, invoked after a batch touching the field was applied.
pub type ChangeHook = Arc<dyn Fn(ChangeEvent<'_>) + Send + Sync>;

/// Maps a raw value coming from a rendering collaborator to the value to validate.
pub type Parser = Arc<dyn Fn(Value) -> Value + Send + Sync>;

/// Snapshot handed to a field's change hook.
pub struct ChangeEvent<'a> {
    /// Name of the changed field.
    pub field: &'a str,
    /// The patch that was applied to the field.
    pub input: &'a FieldState,
    /// Field states at the mount point after the batch was applied.
    pub inputs: &'a FieldStates,
    /// The full store tree after the batch was applied.
    pub state: &'a Value,
    /// Handle for dispatching follow-up actions.
    pub store: &'a dyn Store,
}

/// Configuration of a single field.
///
/// # Example
///
/// ```
/// use mountform_lib::config::FieldConfig;
/// use serde_json::json;
///
/// let field = FieldConfig::new()
///     .default_value(json!(""))
///     .validator(|value, _, _| value.as_str().is_some_and(|s| s.len() > 2))
///     .prop("label", json!("Name"));
/// assert!(field.has_validator());
/// ```
#[derive(Clone, Default)]
pub struct FieldConfig {
    pub(crate) default_value: Value,
    pub(crate) validator: Option<Validator>,
    pub(crate) on_change: Option<ChangeHook>,
    pub(crate) parser: Option<Parser>,
    pub(crate) props: Map<String, Value>,
}

impl FieldConfig {
    /// Creates a field with a `null` default and no validator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the default value.
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default_value = value.into();
        self
    }

    /// Sets a validator.
    ///
    /// The closure may return anything convertible into a
    /// [`ValidationOutcome`]: `bool`, `String`, `&str`, a JSON value, or a
    /// deferred outcome.
    pub fn validator<F, O>(mut self, f: F) -> Self
    where
        F: Fn(&Value, &FieldStates, &Value) -> O + Send + Sync + 'static,
        O: Into<ValidationOutcome>,
    {
        let validator: Validator =
            Arc::new(move |value: &Value, inputs: &FieldStates, state: &Value| {
                Into::<ValidationOutcome>::into(f(value, inputs, state))
            });
        self.validator = Some(validator);
        self
    }

    /// Sets an asynchronous validator.
    ///
    /// The future resolves to `Ok(())` when the value is valid, or to
    /// `Err(reason)` when it is not.
    pub fn async_validator<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(&Value, &FieldStates, &Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), Option<String>>> + Send + 'static,
    {
        let validator: Validator =
            Arc::new(move |value: &Value, inputs: &FieldStates, state: &Value| {
                ValidationOutcome::deferred(f(value, inputs, state))
            });
        self.validator = Some(validator);
        self
    }

    /// Sets the change hook.
    pub fn on_change<F>(mut self, f: F) -> Self
    where
        F: Fn(ChangeEvent<'_>) + Send + Sync + 'static,
    {
        let hook: ChangeHook = Arc::new(f);
        self.on_change = Some(hook);
        self
    }

    /// Sets the parser applied by
    /// [`InputProps::dispatch_change`](crate::props::InputProps::dispatch_change)
    /// before validation.
    pub fn parser<F>(mut self, f: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        let parser: Parser = Arc::new(f);
        self.parser = Some(parser);
        self
    }

    /// Adds an extra prop passed through to rendering collaborators.
    pub fn prop(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.props.insert(key.into(), value.into());
        self
    }

    /// Returns the configured default value.
    pub fn get_default_value(&self) -> &Value {
        &self.default_value
    }

    /// Returns the configured validator, if any.
    pub fn get_validator(&self) -> Option<&Validator> {
        self.validator.as_ref()
    }

    /// Returns the configured change hook, if any.
    pub fn get_on_change(&self) -> Option<&ChangeHook> {
        self.on_change.as_ref()
    }

    /// Returns the configured parser, if any.
    pub fn get_parser(&self) -> Option<&Parser> {
        self.parser.as_ref()
    }

    /// Returns the extra props.
    pub fn props(&self) -> &Map<String, Value> {
        &self.props
    }

    /// Returns `true` if a validator is configured.
    pub fn has_validator(&self) -> bool {
        self.validator.is_some()
    }

    /// The state a field takes when (re)initialized.
    pub fn default_state(&self) -> FieldState {
        FieldState::pristine(self.default_value.clone())
    }
}

impl fmt::Debug for FieldConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldConfig")
            .field("default_value", &self.default_value)
            .field("validator", &self.validator.is_some())
            .field("on_change", &self.on_change.is_some())
            .field("parser", &self.parser.is_some())
            .field("props", &self.props)
            .finish()
    }
}
