//! Property tests for item identity construction
//!
//! Identities must depend only on what is on the stack, never on the order
//! the engine happened to enumerate its components in.

use forbiddenblocks_core::{ComponentValue, ItemIdentity, ItemSnapshot, RegistryKey};
use proptest::prelude::*;
use serde_json::json;

fn component_entries() -> impl Strategy<Value = Vec<(String, i64)>> {
    prop::collection::btree_map("[a-z_]{1,12}", any::<i64>(), 0..8)
        .prop_map(|entries| entries.into_iter().collect())
}

fn build(entries: &[(String, i64)]) -> ItemSnapshot {
    let mut stack = ItemSnapshot::new(
        RegistryKey::minecraft("netherite_pickaxe").unwrap(),
        "Netherite Pickaxe",
    );
    for (name, value) in entries {
        stack = stack.with_component(
            RegistryKey::minecraft(name).unwrap(),
            ComponentValue::from(json!({ "level": value, "tag": name })),
        );
    }
    stack
}

proptest! {
    /// Property: reversing component order keeps the identity
    #[test]
    fn reversed_components_give_equal_identity(entries in component_entries()) {
        let forward = ItemIdentity::from_snapshot(&build(&entries)).unwrap();
        let mut reversed_entries = entries.clone();
        reversed_entries.reverse();
        let reversed = ItemIdentity::from_snapshot(&build(&reversed_entries)).unwrap();

        prop_assert_eq!(forward, reversed);
    }

    /// Property: rotating component order keeps the digest
    #[test]
    fn rotated_components_give_equal_digest(
        entries in component_entries(),
        shift in 0usize..8,
    ) {
        let forward = ItemIdentity::from_snapshot(&build(&entries)).unwrap();
        let mut rotated = entries.clone();
        if !rotated.is_empty() {
            let len = rotated.len();
            rotated.rotate_left(shift % len);
        }
        let rotated = ItemIdentity::from_snapshot(&build(&rotated)).unwrap();

        prop_assert_eq!(forward.components_json(), rotated.components_json());
    }

    /// Property: digest is always valid JSON
    #[test]
    fn digest_parses_back(entries in component_entries()) {
        let identity = ItemIdentity::from_snapshot(&build(&entries)).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(identity.components_json()).unwrap();
        prop_assert_eq!(parsed.as_object().map(|o| o.len()), Some(entries.len()));
    }
}
