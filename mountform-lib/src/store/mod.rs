//! External store contract and mount-point access
//!
//! The store itself is an external collaborator: this crate only needs to
//! dispatch actions to it and read its current tree. [`MemoryStore`] is an
//! in-process implementation for tests and tools.

mod memory;

pub use memory::*;

use serde_json::Map;
use serde_json::Value;

use crate::action::Action;
use crate::config::FormConfig;
use crate::config::MountPoint;
use crate::model::FieldStates;
use crate::model::InputsState;

/// The external key-value store a form writes to.
///
/// Every dispatch must be applied before the next `get_state` returns.
pub trait Store: Send + Sync {
    /// Applies an action.
    fn dispatch(&self, action: Action);

    /// Returns the current tree.
    fn get_state(&self) -> Value;
}

/// Reads the field states stored at a configuration's mount point.
///
/// Returns an empty mapping when nothing is stored there.
pub fn read_inputs(config: &FormConfig, state: &Value) -> FieldStates {
    resolve(state, config.mount_point())
        .map(|subtree| InputsState::from_json(subtree).fields)
        .unwrap_or_default()
}

/// Returns the subtree at a mount point, if present.
pub fn resolve<'a>(root: &'a Value, mount_point: &MountPoint) -> Option<&'a Value> {
    mount_point
        .segments()
        .try_fold(root, |node, segment| node.as_object()?.get(segment))
}

/// Replaces the subtree at a mount point, creating missing intermediate
/// objects.
///
/// Returns `false` and leaves `root` untouched when a node on the path
/// holds something other than an object or `null`.
pub fn write_at(root: &mut Value, mount_point: &MountPoint, subtree: Value) -> bool {
    let mut node = root;
    let mut segments = mount_point.segments().peekable();
    while let Some(segment) = segments.next() {
        if node.is_null() {
            *node = Value::Object(Map::new());
        }
        let Value::Object(object) = node else {
            return false;
        };
        if segments.peek().is_none() {
            object.insert(segment.to_string(), subtree);
            return true;
        }
        node = object
            .entry(segment)
            .or_insert_with(|| Value::Object(Map::new()));
    }
    false
}
