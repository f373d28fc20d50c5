//! Declarative multi-field form validation against an external key-value store.
//!
//! A [`FormConfig`](config::FormConfig) describes the fields of a form. A
//! [`Form`] binds that configuration to a [`Store`](store::Store) and runs
//! batches of proposed values through each field's validator, writing the
//! merged per-field state to the configuration's mount point.

pub mod action;
pub mod config;
pub mod error;
pub mod model;
pub mod props;
pub mod reducer;
pub mod store;
pub mod validation;

mod form;

pub use form::*;

pub mod prelude {
    pub use crate::action::{Action, Meta, inputs_have_errors, set_input_action, validating};
    pub use crate::config::{FORM_KEY, FieldConfig, FormConfig, MountPoint};
    pub use crate::error::{ConfigError, Diagnostic, InvalidInputs, PropsError};
    pub use crate::form::{Form, Validation};
    pub use crate::model::{FieldState, FieldStates, InputsState, StateBatch};
    pub use crate::props::{InputProps, input_props, map_input_values};
    pub use crate::reducer::InputsReducer;
    pub use crate::store::{MemoryStore, Store, read_inputs};
    pub use crate::validation::ValidationOutcome;
}
