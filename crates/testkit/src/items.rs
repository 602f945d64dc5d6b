//! Sample item stacks modelled on what the client sees in vanilla.

use forbiddenblocks_core::{ComponentValue, ItemIdentity, ItemSnapshot, RegistryKey};
use serde_json::json;

/// Key in the `minecraft` namespace. Panics on an invalid path.
pub fn key(path: &str) -> RegistryKey {
    RegistryKey::minecraft(path).expect("fixture keys are valid")
}

/// A plain stack of dirt.
pub fn dirt() -> ItemSnapshot {
    ItemSnapshot::new(key("dirt"), "Dirt").with_count(64)
}

/// A stack of TNT.
pub fn tnt() -> ItemSnapshot {
    ItemSnapshot::new(key("tnt"), "TNT").with_count(16)
}

/// A damaged sword with Sharpness I, components listed in engine order.
pub fn enchanted_sword() -> ItemSnapshot {
    ItemSnapshot::new(key("diamond_sword"), "Diamond Sword")
        .with_component(key("damage"), ComponentValue::from(json!(3)))
        .with_component(
            key("enchantments"),
            ComponentValue::from(json!({ "levels": { "minecraft:sharpness": 1 } })),
        )
}

/// The same sword with its components enumerated in the opposite order.
pub fn enchanted_sword_reordered() -> ItemSnapshot {
    ItemSnapshot::new(key("diamond_sword"), "Diamond Sword")
        .with_component(
            key("enchantments"),
            ComponentValue::from(json!({ "levels": { "minecraft:sharpness": 1 } })),
        )
        .with_component(key("damage"), ComponentValue::from(json!(3)))
}

/// A potion whose contents component is a registry reference.
pub fn potion(effect: &str) -> ItemSnapshot {
    ItemSnapshot::new(key("potion"), "Potion").with_component(
        key("potion_contents"),
        ComponentValue::optional(Some(ComponentValue::reference(key(effect)))),
    )
}

/// Identity of a fixture stack. Panics if the stack is unidentifiable.
pub fn identity_of(stack: &ItemSnapshot) -> ItemIdentity {
    ItemIdentity::from_snapshot(stack).expect("fixture stacks are identifiable")
}
