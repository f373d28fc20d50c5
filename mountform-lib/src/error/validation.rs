//! Aggregate validation and props projection errors

use crate::model::StateBatch;

/// Rejection value of an orchestration call.
///
/// Holds exactly the final patches of the fields that still carry an error
/// marker once every settlement of the call has completed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid inputs: {}", field_list(.inputs))]
pub struct InvalidInputs {
    /// The errored fields, keyed by name.
    pub inputs: StateBatch,
}

impl InvalidInputs {
    /// Creates a new rejection from the errored fields.
    pub fn new(inputs: StateBatch) -> Self {
        Self { inputs }
    }

    /// Returns the names of the errored fields.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.inputs.keys().map(String::as_str)
    }

    /// Returns `true` if the given field is among the errored fields.
    pub fn contains(&self, field: &str) -> bool {
        self.inputs.contains_key(field)
    }
}

fn field_list(inputs: &StateBatch) -> String {
    inputs.keys().map(String::as_str).collect::<Vec<_>>().join(", ")
}

/// Error returned by [`input_props`](crate::props::input_props).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PropsError {
    /// A configured field has no entry in the given field states.
    #[error("input '{field}' is configured but missing from state at '{mount_point}'")]
    MissingState { field: String, mount_point: String },
}
