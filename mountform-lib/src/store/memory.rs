//! In-memory store implementation

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::RwLock;

use serde_json::Map;
use serde_json::Value;

use super::Store;
use super::resolve;
use super::write_at;
use crate::action::Action;
use crate::model::InputsState;
use crate::model::StateBatch;
use crate::reducer::InputsReducer;

/// Type tag of the action applied when a store is created.
pub const INIT: &str = "@@mountform/INIT";

type Listener = Arc<dyn Fn(&Value) + Send + Sync>;

/// A store holding its tree in memory.
///
/// Each registered [`InputsReducer`] owns the subtree at its mount point and
/// sees every dispatched action. Every dispatched action is recorded.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use mountform_lib::config::{FieldConfig, FormConfig};
/// use mountform_lib::reducer::InputsReducer;
/// use mountform_lib::store::{MemoryStore, Store};
/// use serde_json::json;
///
/// let config = Arc::new(
///     FormConfig::builder()
///         .mount_point("page.inputs")
///         .field("email", FieldConfig::new().default_value(""))
///         .build()
///         .unwrap(),
/// );
/// let store = MemoryStore::new([InputsReducer::new(config)]);
///
/// assert_eq!(
///     store.get_state(),
///     json!({ "page": { "inputs": { "_form": {}, "email": { "value": "", "pristine": true } } } })
/// );
/// ```
pub struct MemoryStore {
    state: RwLock<Value>,
    reducers: Vec<InputsReducer>,
    history: Mutex<Vec<Action>>,
    listeners: RwLock<Vec<Listener>>,
}

impl MemoryStore {
    /// Creates an empty store with the given reducers.
    pub fn new(reducers: impl IntoIterator<Item = InputsReducer>) -> Self {
        Self::with_state(reducers, Value::Object(Map::new()))
    }

    /// Creates a store from a preloaded tree.
    ///
    /// Every reducer reconciles its subtree right away, so configured fields
    /// missing from the preloaded tree get their defaults.
    pub fn with_state(reducers: impl IntoIterator<Item = InputsReducer>, preloaded: Value) -> Self {
        let reducers: Vec<InputsReducer> = reducers.into_iter().collect();
        let mut root = preloaded;
        let init = Action::other(INIT);
        for reducer in &reducers {
            apply(&mut root, reducer, &init);
        }

        Self {
            state: RwLock::new(root),
            reducers,
            history: Mutex::new(Vec::new()),
            listeners: RwLock::new(Vec::new()),
        }
    }

    /// Registers a listener called with the new tree after every dispatch.
    pub fn subscribe<F>(&self, listener: F)
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        self.listeners
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(Arc::new(listener));
    }

    /// Returns every action dispatched so far, oldest first.
    pub fn actions(&self) -> Vec<Action> {
        self.history
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Returns the payloads of the `SET_INPUT` actions dispatched so far.
    pub fn payloads(&self) -> Vec<StateBatch> {
        self.actions()
            .iter()
            .filter_map(|action| action.payload().cloned())
            .collect()
    }

    /// Forgets the recorded actions.
    pub fn clear_actions(&self) {
        self.history
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }
}

impl Store for MemoryStore {
    fn dispatch(&self, action: Action) {
        log::debug!("dispatching {}", action.kind());

        let snapshot = {
            let mut root = self
                .state
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            for reducer in &self.reducers {
                apply(&mut root, reducer, &action);
            }
            root.clone()
        };

        self.history
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(action);

        let listeners = self
            .listeners
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();
        for listener in listeners {
            listener(&snapshot);
        }
    }

    fn get_state(&self) -> Value {
        self.state
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

fn apply(root: &mut Value, reducer: &InputsReducer, action: &Action) {
    let mount_point = reducer.mount_point();
    let current = match resolve(root, mount_point) {
        None => None,
        Some(subtree) if subtree.is_null() => None,
        Some(subtree) if subtree.is_object() => Some(InputsState::from_json(subtree)),
        Some(other) => {
            log::warn!("leaving '{mount_point}' alone: expected an object, found {other}");
            return;
        }
    };
    let next = reducer.reduce(current, action);
    if !write_at(root, mount_point, next.to_json()) {
        log::warn!("leaving '{mount_point}' alone: a parent node is not an object");
    }
}
