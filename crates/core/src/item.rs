//! Item stacks as seen by the client at interaction time.

use crate::components::{ComponentSlot, ComponentValue};
use crate::RegistryKey;

/// Snapshot of the stack a player is holding.
///
/// The event layer fills this in from the live engine object right before
/// asking for a decision. It is never persisted.
#[derive(Debug, Clone, Default)]
pub struct ItemSnapshot {
    /// Registered item type, `None` if the engine has no entry for the item.
    pub item: Option<RegistryKey>,
    /// Display name as currently rendered (includes renames).
    pub display_name: String,
    /// Stack size. Zero means an empty slot.
    pub count: u32,
    /// Every component present on the stack, in engine iteration order.
    pub components: Vec<ComponentSlot>,
}

impl ItemSnapshot {
    /// A single item of a registered type with no components.
    pub fn new(item: RegistryKey, display_name: impl Into<String>) -> Self {
        Self {
            item: Some(item),
            display_name: display_name.into(),
            count: 1,
            components: Vec::new(),
        }
    }

    /// An empty hand.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builder-style stack size.
    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    /// Builder-style component insertion.
    pub fn with_component(mut self, component: RegistryKey, value: ComponentValue) -> Self {
        self.components.push(ComponentSlot::new(component, value));
        self
    }

    /// Builder-style insertion of a slot the engine could not name.
    pub fn with_unnamed_component(mut self, value: ComponentValue) -> Self {
        self.components.push(ComponentSlot {
            component: None,
            value,
        });
        self
    }

    /// True for an empty slot (nothing held, or air).
    pub fn is_empty(&self) -> bool {
        self.count == 0
            || self
                .item
                .as_ref()
                .is_some_and(|key| key.namespace() == "minecraft" && key.path() == "air")
    }
}
