//! Form configuration
//!
//! A [`FormConfig`] is the static description of a form: its mount point
//! and, per field, a default value, an optional validator, an optional
//! change hook and extra render props. It is immutable once built.

mod field;
mod mount_point;

pub use field::*;
pub use mount_point::*;

use std::collections::HashMap;

use crate::error::ConfigError;
use crate::model::StateBatch;

/// Reserved key holding form-level metadata at a mount point.
pub const FORM_KEY: &str = "_form";

/// Immutable configuration of one form.
///
/// Field declaration order is preserved and drives the order in which
/// change hooks fire.
///
/// # Example
///
/// ```
/// use mountform_lib::config::{FieldConfig, FormConfig};
/// use serde_json::json;
///
/// let config = FormConfig::builder()
///     .mount_point("page.inputs")
///     .field("email", FieldConfig::new())
///     .field("age", FieldConfig::new().default_value(json!(18)))
///     .build()
///     .unwrap();
///
/// assert_eq!(config.mount_point().as_str(), "page.inputs");
/// assert_eq!(config.field_names().collect::<Vec<_>>(), vec!["email", "age"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FormConfig {
    mount_point: MountPoint,
    fields: Vec<(String, FieldConfig)>,
    index: HashMap<String, usize>,
}

impl FormConfig {
    /// Starts building a configuration.
    pub fn builder() -> FormConfigBuilder {
        FormConfigBuilder::default()
    }

    /// Returns the mount point field states are stored at.
    pub fn mount_point(&self) -> &MountPoint {
        &self.mount_point
    }

    /// Returns the configuration of a field.
    pub fn field(&self, name: &str) -> Option<&FieldConfig> {
        self.index.get(name).map(|&i| &self.fields[i].1)
    }

    /// Returns `true` if the field is configured.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Iterates over the fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldConfig)> {
        self.fields.iter().map(|(name, field)| (name.as_str(), field))
    }

    /// Iterates over the field names in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// Returns the number of configured fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if no fields are configured.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The pristine default state of every field.
    pub fn default_inputs(&self) -> StateBatch {
        self.fields()
            .map(|(name, field)| (name.to_string(), field.default_state()))
            .collect()
    }
}

/// Builder for [`FormConfig`].
#[derive(Debug, Default)]
pub struct FormConfigBuilder {
    mount_point: Option<String>,
    fields: Vec<(String, FieldConfig)>,
}

impl FormConfigBuilder {
    /// Overrides the default `"inputs"` mount point.
    pub fn mount_point(mut self, path: impl Into<String>) -> Self {
        self.mount_point = Some(path.into());
        self
    }

    /// Declares a field.
    pub fn field(mut self, name: impl Into<String>, config: FieldConfig) -> Self {
        self.fields.push((name.into(), config));
        self
    }

    /// Validates and builds the configuration.
    pub fn build(self) -> Result<FormConfig, ConfigError> {
        let mount_point = match self.mount_point {
            Some(path) => MountPoint::new(path)?,
            None => MountPoint::default(),
        };

        let mut index = HashMap::with_capacity(self.fields.len());
        for (i, (name, _)) in self.fields.iter().enumerate() {
            if name == FORM_KEY {
                return Err(ConfigError::ReservedFieldName { field: name.clone() });
            }
            if index.insert(name.clone(), i).is_some() {
                return Err(ConfigError::DuplicateField { field: name.clone() });
            }
        }

        Ok(FormConfig {
            mount_point,
            fields: self.fields,
            index,
        })
    }
}
