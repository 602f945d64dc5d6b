//! Structured item metadata ("data components").
//!
//! The host hands us component values in whatever shape the engine stores
//! them: plain data, optional wrappers, or references to other registry
//! entries (an enchantment, a potion, a trim pattern). [`normalize`] flattens
//! those shapes into something that can be encoded as JSON. It never fails;
//! the only fallible step is [`Normalized::encode`], and callers drop a slot
//! whose encoding fails instead of giving up on the whole item.

use crate::RegistryKey;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Component data that can be encoded to JSON.
///
/// Implemented for every `Serialize` type. Encoding can still fail at
/// runtime, for example for maps whose keys are not strings.
pub trait ComponentData: fmt::Debug + Send + Sync {
    /// Encode the value as a JSON tree.
    fn encode(&self) -> Result<Value, serde_json::Error>;
}

impl<T> ComponentData for T
where
    T: Serialize + fmt::Debug + Send + Sync,
{
    fn encode(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// A reference to another registry entry, as carried by a component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryRef {
    key: Option<RegistryKey>,
    raw: String,
}

impl RegistryRef {
    /// A reference that resolves to `key`.
    pub fn resolved(key: RegistryKey) -> Self {
        let raw = key.to_string();
        Self {
            key: Some(key),
            raw,
        }
    }

    /// A direct (unregistered) entry the engine can only describe textually.
    pub fn unresolved(raw: impl Into<String>) -> Self {
        Self {
            key: None,
            raw: raw.into(),
        }
    }

    /// Registry key this reference points at, if it has one.
    pub fn key(&self) -> Option<&RegistryKey> {
        self.key.as_ref()
    }

    /// Textual form reported by the engine.
    pub fn raw(&self) -> &str {
        &self.raw
    }
}

/// Raw component value as reported by the host.
#[derive(Debug, Clone)]
pub enum ComponentValue {
    /// Data stored inline on the item.
    Direct(Arc<dyn ComponentData>),
    /// Optional wrapper. `None` means the component is present but empty.
    Optional(Option<Box<ComponentValue>>),
    /// Indirect reference to a registry entry.
    Reference(RegistryRef),
}

impl ComponentValue {
    /// Wrap any encodable value.
    pub fn direct<T>(value: T) -> Self
    where
        T: ComponentData + 'static,
    {
        Self::Direct(Arc::new(value))
    }

    /// Wrap an optional value.
    pub fn optional(value: Option<ComponentValue>) -> Self {
        Self::Optional(value.map(Box::new))
    }

    /// Reference to a registered entry.
    pub fn reference(key: RegistryKey) -> Self {
        Self::Reference(RegistryRef::resolved(key))
    }

    /// Reference with no registry key.
    pub fn unresolved_reference(raw: impl Into<String>) -> Self {
        Self::Reference(RegistryRef::unresolved(raw))
    }
}

impl From<Value> for ComponentValue {
    fn from(value: Value) -> Self {
        Self::direct(value)
    }
}

/// Result of [`normalize`].
#[derive(Debug)]
pub enum Normalized<'a> {
    /// Empty optional wrapper; encodes as JSON `null`.
    Null,
    /// Registry key string of a resolved reference.
    Key(String),
    /// Reference without a key; carries the engine's textual form.
    Unresolved(String),
    /// Inline data still to be encoded.
    Data(&'a dyn ComponentData),
}

impl Normalized<'_> {
    /// Encode into a JSON value. Only [`Normalized::Data`] can fail.
    pub fn encode(&self) -> Result<Value, serde_json::Error> {
        match self {
            Normalized::Null => Ok(Value::Null),
            Normalized::Key(key) | Normalized::Unresolved(key) => Ok(Value::String(key.clone())),
            Normalized::Data(data) => data.encode(),
        }
    }
}

/// Strip optional wrappers and replace registry references by their key.
pub fn normalize(value: &ComponentValue) -> Normalized<'_> {
    match value {
        ComponentValue::Direct(data) => Normalized::Data(data.as_ref()),
        ComponentValue::Optional(None) => Normalized::Null,
        ComponentValue::Optional(Some(inner)) => normalize(inner),
        ComponentValue::Reference(reference) => match reference.key() {
            Some(key) => Normalized::Key(key.to_string()),
            None => Normalized::Unresolved(reference.raw().to_string()),
        },
    }
}

/// One component slot present on an item.
#[derive(Debug, Clone)]
pub struct ComponentSlot {
    /// Registered component type, `None` if the engine has no id for it.
    pub component: Option<RegistryKey>,
    /// Value held in the slot.
    pub value: ComponentValue,
}

impl ComponentSlot {
    /// Slot for a registered component type.
    pub fn new(component: RegistryKey, value: ComponentValue) -> Self {
        Self {
            component: Some(component),
            value,
        }
    }
}
