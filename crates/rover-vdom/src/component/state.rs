use crate::error::{Result, VdomError};
use serde_json::Value;

/// Merge `patch` into `state`.
///
/// An object patch merges key by key into an object target, recursing where
/// both sides hold objects. Any other combination overwrites the target.
/// Patches nesting deeper than `limit` objects are rejected before anything
/// is written.
pub(crate) fn merge_state(state: &mut Value, patch: Value, limit: usize) -> Result<()> {
    if object_depth(&patch) > limit {
        return Err(VdomError::StateTooDeep { limit });
    }
    merge_into(state, patch);
    Ok(())
}

fn merge_into(target: &mut Value, patch: Value) {
    match (target, patch) {
        (Value::Object(target), Value::Object(patch)) => {
            for (key, value) in patch {
                let nested = value.is_object() && target.get(&key).is_some_and(Value::is_object);
                match target.get_mut(&key) {
                    Some(existing) if nested => merge_into(existing, value),
                    _ => {
                        target.insert(key, value);
                    }
                }
            }
        }
        (target, patch) => *target = patch,
    }
}

/// Deepest chain of nested objects in `value`; scalars count as zero
fn object_depth(value: &Value) -> usize {
    let mut deepest = 0;
    let mut stack = vec![(value, 0usize)];
    while let Some((value, depth)) = stack.pop() {
        if let Value::Object(map) = value {
            let depth = depth + 1;
            deepest = deepest.max(depth);
            stack.extend(map.values().map(|v| (v, depth)));
        }
    }
    deepest
}
