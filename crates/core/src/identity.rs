//! Stable identity of "this exact kind of item".
//!
//! Two stacks are the same kind of item when their registry type, rendered
//! name and component data all match. Component data is folded into a JSON
//! digest with keys sorted at every level, so the engine's component
//! iteration order never leaks into equality.

use crate::components::{normalize, ComponentSlot, Normalized};
use crate::item::ItemSnapshot;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;
use tracing::{debug, error, warn};

/// Reasons an item cannot be identified.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// Nothing is held.
    #[error("cannot identify an empty stack")]
    EmptyStack,
    /// The engine has no registered type for the item.
    #[error("item {display_name:?} has no registry entry")]
    UnregisteredItem {
        /// Rendered name of the stack, for logs and chat.
        display_name: String,
    },
    /// One component slot could not be encoded. Never fails a whole identity.
    #[error("failed to encode component {component} of {item}: {source}")]
    ComponentEncode {
        /// Item registry id.
        item: String,
        /// Component registry id.
        component: String,
        /// Underlying encoder error.
        #[source]
        source: serde_json::Error,
    },
}

/// Value identity of an item kind. Persisted as a flat record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemIdentity {
    registry_id: String,
    name: String,
    components_json: String,
}

impl ItemIdentity {
    /// Build an identity from already-computed fields.
    pub fn new(
        registry_id: impl Into<String>,
        name: impl Into<String>,
        components_json: impl Into<String>,
    ) -> Self {
        Self {
            registry_id: registry_id.into(),
            name: name.into(),
            components_json: components_json.into(),
        }
    }

    /// Derive the identity of a held stack.
    pub fn from_snapshot(stack: &ItemSnapshot) -> Result<Self, IdentityError> {
        if stack.is_empty() {
            warn!("Attempted to identify an empty stack");
            return Err(IdentityError::EmptyStack);
        }
        let Some(item) = stack.item.as_ref() else {
            warn!("Item '{}' has no registry id", stack.display_name);
            return Err(IdentityError::UnregisteredItem {
                display_name: stack.display_name.clone(),
            });
        };

        let registry_id = item.to_string();
        let components_json = components_digest(&registry_id, &stack.components);
        let identity = Self::new(registry_id, stack.display_name.clone(), components_json);
        debug!("Identified item {identity}");
        Ok(identity)
    }

    /// Namespaced item type, e.g. `minecraft:dirt`.
    pub fn registry_id(&self) -> &str {
        &self.registry_id
    }

    /// Display name at the time the identity was taken.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Canonical JSON of the item's components.
    pub fn components_json(&self) -> &str {
        &self.components_json
    }
}

impl fmt::Display for ItemIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} \"{}\" {}",
            self.registry_id, self.name, self.components_json
        )
    }
}

/// Encode every nameable, encodable slot into one canonical JSON object.
///
/// Slots without a registered component type, or whose value fails to
/// encode, are logged and left out.
pub fn components_digest(item: &str, slots: &[ComponentSlot]) -> String {
    let mut encoded: BTreeMap<String, Value> = BTreeMap::new();

    for slot in slots {
        let Some(component) = slot.component.as_ref() else {
            warn!("Component on {item} has no registry id, skipping");
            continue;
        };

        let normalized = normalize(&slot.value);
        if let Normalized::Unresolved(raw) = &normalized {
            warn!("Component {component} on {item} references an entry without a key, using {raw:?}");
        }

        match normalized.encode() {
            Ok(value) => {
                encoded.insert(component.to_string(), sort_keys(value));
            }
            Err(source) => {
                let err = IdentityError::ComponentEncode {
                    item: item.to_string(),
                    component: component.to_string(),
                    source,
                };
                error!("{err}");
            }
        }
    }

    match serde_json::to_string(&encoded) {
        Ok(json) => json,
        Err(err) => {
            error!("Failed to encode component map of {item}: {err}");
            String::from("{}")
        }
    }
}

/// Rebuild every object with its keys in sorted order.
fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(object) => {
            let sorted: BTreeMap<String, Value> = object
                .into_iter()
                .map(|(key, value)| (key, sort_keys(value)))
                .collect();
            Value::Object(sorted.into_iter().collect::<Map<String, Value>>())
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}
