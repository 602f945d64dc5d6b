//! forbiddenblocks - per-world forbidden item lists for client-side placement guards
//!
//! The game's event hooks call [`InteractionDecider`] on [`ForbiddenBlocks`];
//! identities, scopes and storage come from the workspace crates.

mod client;
mod config;
mod interaction;

pub use client::{
    ChatMessage, ConnectionChange, ForbiddenBlocks, InteractionDecider, InteractionOutcome,
    ToggleOutcome, Tone,
};
pub use config::{ClientSettings, KeyAction, KeyBindings, Settings, SETTINGS_PATH};
pub use interaction::{Hand, InteractionPolicy, InteractionTarget};

pub use forbiddenblocks_core::{
    ComponentValue, ConnectionContext, ItemIdentity, ItemSnapshot, RegistryKey, ScopeId,
};
pub use forbiddenblocks_world::{ScopeStore, WorldStores};

/// Install a `tracing` subscriber filtered by `RUST_LOG`, or `default_filter` when unset.
///
/// Does nothing if a global subscriber is already installed.
pub fn init_tracing(default_filter: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));
    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_err()
    {
        tracing::debug!("Tracing subscriber already installed");
    }
    tracing::info!("forbiddenblocks v{}", env!("CARGO_PKG_VERSION"));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_tracing_twice_is_harmless() {
        init_tracing("forbiddenblocks=debug");
        init_tracing("warn");
        tracing::info!("still logging after a second init");
    }
}
