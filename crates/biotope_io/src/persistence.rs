//! Saving and loading [`WorldStep`] snapshots.
//!
//! Saved steps are plain JSON; per-tick caches are never written. On load,
//! brain nodes whose sense or action tag no longer exists are pruned along
//! with every connection touching them, so snapshots survive enum changes.

use crate::error::{IoError, Result};
use crate::serialization::{from_json, write_json_file};
use biotope_core::step::WorldStep;
use biotope_data::{CreatureAction, CreatureInput, NodeId};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;

/// Writes `step` to `path` as pretty JSON.
pub fn save_step<P: AsRef<Path>>(step: &WorldStep, path: P) -> Result<()> {
    write_json_file(step, path.as_ref())?;
    tracing::debug!(
        path = %path.as_ref().display(),
        creatures = step.creatures.len(),
        food = step.food.len(),
        "Step saved"
    );
    Ok(())
}

/// Reads a step from `path`. A missing file is [`IoError::NotFound`].
pub fn load_step<P: AsRef<Path>>(path: P) -> Result<WorldStep> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(IoError::not_found(path.display().to_string()));
    }
    let json = std::fs::read_to_string(path)?;
    load_step_from_str(&json)
}

/// Parses a step, pruning nodes with unknown tags first.
pub fn load_step_from_str(json: &str) -> Result<WorldStep> {
    let mut value: Value = from_json(json)?;
    let pruned = prune_unknown_tags(&mut value);
    if pruned > 0 {
        tracing::warn!(pruned, "Dropped brain nodes with unknown tags while loading");
    }

    let step: WorldStep = serde_json::from_value(value)
        .map_err(|e| IoError::serialization(format!("Step deserialization failed: {}", e)))?;

    let current = step.config.fingerprint();
    if step.config_fingerprint != current {
        tracing::warn!(
            saved = %step.config_fingerprint,
            current = %current,
            "Saved step was produced under a different configuration"
        );
    }
    Ok(step)
}

fn is_known<T: DeserializeOwned>(tag: Option<&Value>) -> bool {
    match tag {
        None | Some(Value::Null) => true,
        Some(v) => serde_json::from_value::<T>(v.clone()).is_ok(),
    }
}

fn endpoint(connection: &Value, key: &str) -> Option<NodeId> {
    connection
        .get(key)
        .and_then(Value::as_u64)
        .and_then(|id| NodeId::try_from(id).ok())
}

/// Removes unknown-tag nodes from every creature brain; returns how many went.
pub fn prune_unknown_tags(step: &mut Value) -> usize {
    let Some(creatures) = step.get_mut("creatures").and_then(Value::as_array_mut) else {
        return 0;
    };

    let mut total = 0;
    for creature in creatures {
        let creature_id = creature.get("id").and_then(Value::as_u64);
        let Some(brain) = creature.get_mut("brain") else {
            continue;
        };

        let mut removed: HashSet<NodeId> = HashSet::new();
        if let Some(nodes) = brain.get_mut("nodes").and_then(Value::as_object_mut) {
            nodes.retain(|key, node| {
                let keep = is_known::<CreatureInput>(node.get("input"))
                    && is_known::<CreatureAction>(node.get("action"));
                if !keep {
                    tracing::warn!(
                        creature = ?creature_id,
                        node = %key,
                        input = ?node.get("input"),
                        action = ?node.get("action"),
                        "Pruning node with unknown tag"
                    );
                    if let Ok(id) = key.parse::<NodeId>() {
                        removed.insert(id);
                    }
                }
                keep
            });
        }
        if removed.is_empty() {
            continue;
        }
        total += removed.len();

        if let Some(connections) = brain.get_mut("connections").and_then(Value::as_array_mut) {
            connections.retain(|c| {
                let touches = |key: &str| endpoint(c, key).is_some_and(|id| removed.contains(&id));
                !touches("source") && !touches("target")
            });
        }
    }
    total
}
