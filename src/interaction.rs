//! Which targets still accept a forbidden item.
//!
//! Forbidding an item is meant to stop it being placed, not to lock the
//! player out of doors, crafting stations and containers while holding it.
//! The exceptions are data, loaded from the settings file, so they can follow
//! the game's block list without code changes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Hand used for the interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hand {
    /// Main hand.
    Main,
    /// Off hand.
    Off,
}

/// What the player is using the item on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionTarget {
    /// A block in the world.
    Block {
        /// Block registry id, e.g. `minecraft:oak_door`.
        block: String,
        /// True when using the block would harvest it (ripe berries).
        harvestable: bool,
    },
    /// An entity.
    Entity {
        /// Entity registry id, e.g. `minecraft:item_frame`.
        entity: String,
        /// Rendered entity name, for chat.
        name: String,
        /// True for living entities (mobs, villagers, players).
        living: bool,
    },
}

impl InteractionTarget {
    /// A block that is not harvestable.
    pub fn block(block: impl Into<String>) -> Self {
        Self::Block {
            block: block.into(),
            harvestable: false,
        }
    }
}

/// Allowlist of targets that bypass the forbidden check.
///
/// Entries are registry ids and may contain one `*` wildcard, so
/// `minecraft:*_door` covers every door.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct InteractionPolicy {
    pub bypass_blocks: BTreeSet<String>,
    pub bypass_entities: BTreeSet<String>,
    /// Let forbidden items harvest ripe crops such as berries.
    pub allow_harvest: bool,
    /// Let forbidden items be used on living entities.
    pub allow_living_entities: bool,
}

const DEFAULT_BYPASS_BLOCKS: &[&str] = &[
    // Doors and redstone inputs
    "minecraft:*_door",
    "minecraft:*_trapdoor",
    "minecraft:*_fence_gate",
    "minecraft:*_button",
    "minecraft:lever",
    "minecraft:note_block",
    // Job sites and crafting stations
    "minecraft:crafting_table",
    "minecraft:*anvil",
    "minecraft:grindstone",
    "minecraft:stonecutter",
    "minecraft:cartography_table",
    "minecraft:fletching_table",
    "minecraft:smithing_table",
    "minecraft:loom",
    // Block entities
    "minecraft:chest",
    "minecraft:trapped_chest",
    "minecraft:ender_chest",
    "minecraft:barrel",
    "minecraft:*shulker_box",
    "minecraft:furnace",
    "minecraft:blast_furnace",
    "minecraft:smoker",
    "minecraft:hopper",
    "minecraft:dispenser",
    "minecraft:dropper",
    "minecraft:crafter",
    "minecraft:brewing_stand",
    "minecraft:enchanting_table",
    "minecraft:beacon",
    "minecraft:lectern",
    "minecraft:bell",
    "minecraft:*_bed",
    "minecraft:*_sign",
];

const DEFAULT_BYPASS_ENTITIES: &[&str] = &["minecraft:item_frame", "minecraft:glow_item_frame"];

impl Default for InteractionPolicy {
    fn default() -> Self {
        Self {
            bypass_blocks: DEFAULT_BYPASS_BLOCKS.iter().map(|s| s.to_string()).collect(),
            bypass_entities: DEFAULT_BYPASS_ENTITIES.iter().map(|s| s.to_string()).collect(),
            allow_harvest: true,
            allow_living_entities: true,
        }
    }
}

impl InteractionPolicy {
    /// Policy with no exceptions: a forbidden item is always blocked.
    pub fn strict() -> Self {
        Self {
            bypass_blocks: BTreeSet::new(),
            bypass_entities: BTreeSet::new(),
            allow_harvest: false,
            allow_living_entities: false,
        }
    }

    /// Whether a forbidden item may still be used on `target`.
    ///
    /// Only the main hand gets exceptions.
    pub fn permits(&self, hand: Hand, target: &InteractionTarget) -> bool {
        if hand != Hand::Main {
            return false;
        }
        match target {
            InteractionTarget::Block { block, harvestable } => {
                (self.allow_harvest && *harvestable) || any_match(&self.bypass_blocks, block)
            }
            InteractionTarget::Entity { entity, living, .. } => {
                (self.allow_living_entities && *living) || any_match(&self.bypass_entities, entity)
            }
        }
    }
}

fn any_match(patterns: &BTreeSet<String>, id: &str) -> bool {
    patterns.iter().any(|pattern| pattern_matches(pattern, id))
}

/// Match `id` against a pattern with at most one `*`.
fn pattern_matches(pattern: &str, id: &str) -> bool {
    match pattern.split_once('*') {
        None => pattern == id,
        Some((prefix, suffix)) => {
            id.len() >= prefix.len() + suffix.len()
                && id.starts_with(prefix)
                && id.ends_with(suffix)
        }
    }
}
