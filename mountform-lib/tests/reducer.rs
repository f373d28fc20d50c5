//! Tests for store-side reconciliation through the in-memory store.

use std::sync::Arc;

use mountform_lib::action::{Action, Meta, set_input_action};
use mountform_lib::config::{FieldConfig, FormConfig};
use mountform_lib::model::{FieldState, InputsState, StateBatch};
use mountform_lib::reducer::InputsReducer;
use mountform_lib::store::{MemoryStore, Store};
use serde_json::json;

fn config(mount_point: &str, fields: &[(&str, i64)]) -> Arc<FormConfig> {
    let builder = fields.iter().fold(
        FormConfig::builder().mount_point(mount_point),
        |builder, (name, default)| builder.field(*name, FieldConfig::new().default_value(*default)),
    );
    Arc::new(builder.build().unwrap())
}

fn update(field: &str, value: i64) -> StateBatch {
    [(field.to_string(), FieldState::new(value))].into()
}

#[test]
fn test_reconciliation_fills_every_configured_field() {
    let config = config("inputs", &[("a", 1), ("b", 2), ("c", 3)]);
    let reducer = InputsReducer::new(config.clone());

    let partials = vec![
        None,
        Some(InputsState::default()),
        Some(InputsState::new(update("b", 20))),
        Some(InputsState::new(update("zzz", 0))),
    ];
    let actions = vec![
        Action::other("ANYTHING"),
        set_input_action(&config, update("a", 10), Meta::new()),
    ];

    for partial in partials {
        for action in &actions {
            let state = reducer.reduce(partial.clone(), action);
            for (name, field) in config.fields() {
                let stored = &state.fields[name];
                let touched = partial.as_ref().is_some_and(|p| p.fields.contains_key(name))
                    || action.payload().is_some_and(|p| p.contains_key(name));
                if !touched {
                    assert_eq!(stored, &field.default_state());
                }
            }
        }
    }
}

#[test]
fn test_fields_added_to_config_join_existing_state() {
    let before = config("inputs", &[("a", 1)]);
    let store = MemoryStore::new([InputsReducer::new(before.clone())]);
    store.dispatch(set_input_action(&before, update("a", 10), Meta::new()));

    let after = config("inputs", &[("a", 1), ("b", 2)]);
    let extended = MemoryStore::with_state([InputsReducer::new(after)], store.get_state());

    assert_eq!(
        extended.get_state()["inputs"],
        json!({
            "_form": {},
            "a": { "value": 10 },
            "b": { "value": 2, "pristine": true }
        })
    );
}

#[test]
fn test_fields_removed_from_config_are_kept() {
    let before = config("inputs", &[("a", 1), ("b", 2)]);
    let store = MemoryStore::new([InputsReducer::new(before.clone())]);
    store.dispatch(set_input_action(&before, update("b", 20), Meta::new()));

    let after = config("inputs", &[("a", 1)]);
    let narrowed = MemoryStore::with_state([InputsReducer::new(after)], store.get_state());

    assert_eq!(narrowed.get_state()["inputs"]["b"], json!({ "value": 20 }));
}

#[test]
fn test_mount_point_isolation() {
    let a = config("forms.a", &[("x", 1)]);
    let b = config("forms.b", &[("x", 1)]);
    let store = MemoryStore::new([InputsReducer::new(a), InputsReducer::new(b.clone())]);
    let before = store.get_state();

    store.dispatch(set_input_action(&b, update("x", 99), Meta::new()));

    let after = store.get_state();
    assert_eq!(after["forms"]["a"], before["forms"]["a"]);
    assert_eq!(after["forms"]["b"]["x"], json!({ "value": 99 }));
}

#[test]
fn test_same_action_twice_is_idempotent() {
    let config = config("inputs", &[("a", 1), ("b", 2)]);
    let store = MemoryStore::new([InputsReducer::new(config.clone())]);
    let action = set_input_action(&config, update("a", 5), Meta::new());

    store.dispatch(action.clone());
    let once = store.get_state();
    store.dispatch(action);

    assert_eq!(store.get_state(), once);
}

#[test]
fn test_unrelated_store_branches_are_untouched() {
    let config = config("inputs", &[("a", 1)]);
    let store = MemoryStore::with_state(
        [InputsReducer::new(config.clone())],
        json!({ "session": { "user": "bob" } }),
    );

    store.dispatch(set_input_action(&config, update("a", 5), Meta::new()));

    assert_eq!(store.get_state()["session"], json!({ "user": "bob" }));
}

#[test]
fn test_non_field_entries_persist() {
    let config = config("inputs", &[("email", 0)]);
    let store = MemoryStore::with_state(
        [InputsReducer::new(config.clone())],
        json!({ "inputs": { "legacy": "kept", "tags": ["a", "b"] } }),
    );
    assert_eq!(store.get_state()["inputs"]["legacy"], json!("kept"));

    store.dispatch(set_input_action(&config, update("email", 5), Meta::new()));

    let inputs = &store.get_state()["inputs"];
    assert_eq!(inputs["legacy"], json!("kept"));
    assert_eq!(inputs["tags"], json!(["a", "b"]));
    assert_eq!(inputs["email"], json!({ "value": 5 }));
}

#[test]
fn test_unknown_field_members_persist() {
    let config = config("inputs", &[("email", 0), ("age", 0)]);
    let store = MemoryStore::with_state(
        [InputsReducer::new(config.clone())],
        json!({ "inputs": { "email": { "value": 1, "touched": true } } }),
    );
    assert_eq!(
        store.get_state()["inputs"]["email"],
        json!({ "value": 1, "touched": true })
    );

    store.dispatch(set_input_action(&config, update("age", 30), Meta::new()));

    assert_eq!(
        store.get_state()["inputs"]["email"],
        json!({ "value": 1, "touched": true })
    );
}

#[test]
fn test_unrelated_actions_leave_stored_subtree_as_is() {
    let config = config("inputs", &[("email", 0)]);
    let preloaded = json!({
        "inputs": {
            "email": { "error": "bad" },
            "notes": { "value": 1, "validating": null }
        }
    });
    let store = MemoryStore::with_state([InputsReducer::new(config)], preloaded.clone());

    store.dispatch(Action::other("UNRELATED"));

    assert_eq!(store.get_state(), preloaded);
}

#[test]
fn test_unreadable_configured_entry_is_not_replaced_by_default() {
    let config = config("inputs", &[("email", 0)]);
    let store = MemoryStore::with_state(
        [InputsReducer::new(config)],
        json!({ "inputs": { "email": "raw" } }),
    );

    assert_eq!(store.get_state(), json!({ "inputs": { "email": "raw" } }));
}
