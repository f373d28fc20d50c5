//! Render props for field collaborators

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Map;
use serde_json::Value;

use crate::action::Meta;
use crate::error::PropsError;
use crate::form::Form;
use crate::form::Validation;
use crate::model::FieldStates;

/// Everything a rendering collaborator needs to display one field.
#[derive(Clone)]
pub struct InputProps {
    /// `"<mount point>:<field>"`.
    pub id: String,
    /// The value to display: the error marker when errored.
    pub value: Value,
    /// Whether the field is errored.
    pub error: bool,
    /// Validator-supplied reason, if any.
    pub error_text: Option<String>,
    /// Whether an async validation is in flight.
    pub validating: bool,
    /// Extra props from the field configuration.
    pub extra: Map<String, Value>,
    field: String,
    form: Form,
}

impl InputProps {
    /// Returns the field name.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Validates and applies a new value for this field.
    ///
    /// The field's parser, if configured, maps the value first.
    pub fn dispatch_change(&self, value: Value) -> Validation {
        let parser = self
            .form
            .config()
            .field(&self.field)
            .and_then(|field| field.get_parser());
        let value = match parser {
            Some(parse) => parse(value),
            None => value,
        };
        self.form
            .update_and_validate(BTreeMap::from([(self.field.clone(), value)]), Meta::new())
    }
}

impl fmt::Debug for InputProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputProps")
            .field("id", &self.id)
            .field("value", &self.value)
            .field("error", &self.error)
            .field("error_text", &self.error_text)
            .field("validating", &self.validating)
            .field("extra", &self.extra)
            .finish_non_exhaustive()
    }
}

/// Projects field states into per-field render props.
///
/// Every configured field must be present in `inputs`.
pub fn input_props(
    form: &Form,
    inputs: &FieldStates,
) -> Result<BTreeMap<String, InputProps>, PropsError> {
    let mount_point = form.config().mount_point();
    form.config()
        .fields()
        .map(|(name, field)| {
            let input = inputs.get(name).ok_or_else(|| PropsError::MissingState {
                field: name.to_string(),
                mount_point: mount_point.to_string(),
            })?;
            let props = InputProps {
                id: format!("{mount_point}:{name}"),
                value: input.display_value().clone(),
                error: input.is_errored(),
                error_text: input.error_text.clone(),
                validating: input.is_validating(),
                extra: field.props().clone(),
                field: name.to_string(),
                form: form.clone(),
            };
            Ok((name.to_string(), props))
        })
        .collect()
}

/// Maps each field to its current value.
pub fn map_input_values(inputs: &FieldStates) -> BTreeMap<String, Value> {
    inputs
        .iter()
        .map(|(key, input)| (key.clone(), input.value.clone()))
        .collect()
}
