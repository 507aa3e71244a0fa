//! Overlay merge: stored partial documents over full default records.

use glass_core::PersistenceError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

/// Shallow-merge the keys of `patch` into `base`. Non-object patches are ignored.
pub fn merge_shallow(base: &mut Map<String, Value>, patch: &Value) {
    if let Value::Object(fields) = patch {
        for (key, value) in fields {
            base.insert(key.clone(), value.clone());
        }
    }
}

/// Decode `defaults` overlaid with every patch in turn, later patches winning.
pub fn overlay<T>(defaults: &T, patches: &[&Value]) -> Result<T, PersistenceError>
where
    T: Serialize + DeserializeOwned,
{
    let mut merged = match serde_json::to_value(defaults)? {
        Value::Object(map) => map,
        other => return Ok(serde_json::from_value(other)?),
    };
    for patch in patches {
        merge_shallow(&mut merged, patch);
    }
    Ok(serde_json::from_value(Value::Object(merged))?)
}
