//! Per-field state stored at a form's mount point

mod field_state;
mod inputs_state;

pub use field_state::*;
pub use inputs_state::*;
