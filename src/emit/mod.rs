//! Per-project output emitters: `asconfig.json` and the `.vscode` editor
//! files.
//!
//! Both emitters share the same "read existing JSON, deep-merge or replace,
//! write pretty-printed" shape built on [`crate::utils::write_json_file`].

pub mod asconfig;
pub mod editor;

use serde_json::{Map, Value};

/// Recursively merges `from` into `into`; on any key collision `from` wins.
/// Non-object values are replaced wholesale. Emitters call this with
/// `into = caller-supplied base`, `from = computed configuration`, so the
/// computed side always takes precedence.
pub fn merge(into: &mut Value, from: Value) {
    match (into, from) {
        (Value::Object(into_map), Value::Object(from_map)) => {
            for (key, value) in from_map {
                match into_map.get_mut(&key) {
                    Some(existing) => merge(existing, value),
                    None => {
                        into_map.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => {
            *slot = value;
        }
    }
}

pub fn object_or_empty(value: Option<Value>) -> Map<String, Value> {
    match value {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    }
}
