//! Decision surface called by the game's event hooks.
//!
//! The hooks themselves (block use, entity use, key ticks, join/leave) live
//! on the game side. They translate engine objects into an [`ItemSnapshot`]
//! and a [`ConnectionContext`] and call into [`InteractionDecider`]; nothing
//! here ever fails the hook; every error degrades to "allow" and a log line.

use forbiddenblocks_core::{ConnectionContext, ItemIdentity, ItemSnapshot, ScopeId, ScopeResolver};
use forbiddenblocks_world::{ScopeStore, WorldStores};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::Settings;
use crate::interaction::{Hand, InteractionTarget};

/// Colour class of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Something was refused.
    Error,
    /// Something was restricted or switched off.
    Warning,
    /// Something was allowed or switched on.
    Success,
}

/// Chat feedback for the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    /// Colour class of the message.
    pub tone: Tone,
    /// Text shown in chat.
    pub text: String,
}

impl ChatMessage {
    fn new(tone: Tone, text: impl Into<String>) -> Self {
        Self {
            tone,
            text: text.into(),
        }
    }
}

/// Result of an attempt to use an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionOutcome {
    /// The held item is on the current scope's forbidden list.
    pub forbidden: bool,
    /// The target is exempt, so the action goes ahead anyway.
    pub bypassed: bool,
    /// Identity of the held item, `None` if it could not be identified.
    pub identity: Option<ItemIdentity>,
    /// Feedback to show, if any.
    pub message: Option<ChatMessage>,
}

impl InteractionOutcome {
    fn allowed(identity: Option<ItemIdentity>) -> Self {
        Self {
            forbidden: false,
            bypassed: false,
            identity,
            message: None,
        }
    }

    /// Whether the hook must cancel the action.
    pub fn is_denied(&self) -> bool {
        self.forbidden && !self.bypassed
    }
}

/// Result of a forbid/allow key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleOutcome {
    /// Whether the item is forbidden after the toggle.
    pub now_forbidden: bool,
    /// Identity that was toggled, `None` if nothing was changed.
    pub identity: Option<ItemIdentity>,
    /// Feedback to show, if any.
    pub message: Option<ChatMessage>,
}

/// Connection lifecycle notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionChange {
    /// Joined a world or server.
    Joined(ConnectionContext),
    /// Left it.
    Left,
}

/// Port the game's event hooks call into.
pub trait InteractionDecider {
    /// The player uses `item` on `target`.
    fn on_interact_attempt(
        &self,
        item: &ItemSnapshot,
        context: &ConnectionContext,
        hand: Hand,
        target: &InteractionTarget,
    ) -> InteractionOutcome;

    /// The player presses the forbid key while holding `item`.
    fn on_toggle_request(&self, item: &ItemSnapshot, context: &ConnectionContext) -> ToggleOutcome;

    /// The client joined or left a world or server.
    fn on_connection_change(&self, change: &ConnectionChange);

    /// The client is shutting down.
    fn on_shutdown(&self);
}

/// The forbidden-items client: settings, scope resolution and scope stores.
#[derive(Debug)]
pub struct ForbiddenBlocks {
    settings: Settings,
    resolver: ScopeResolver,
    stores: WorldStores,
}

impl ForbiddenBlocks {
    /// Client rooted at the game directory.
    pub fn open(game_dir: &Path) -> Self {
        info!("Opening forbidden lists under {}", game_dir.display());
        Self::from_parts(Settings::load(game_dir), WorldStores::new(game_dir))
    }

    /// Client built from explicit parts.
    pub fn from_parts(settings: Settings, stores: WorldStores) -> Self {
        Self {
            settings,
            resolver: ScopeResolver::new(),
            stores,
        }
    }

    /// Global settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Open scope stores.
    pub fn stores(&self) -> &WorldStores {
        &self.stores
    }

    /// Scope for `context`, using the last joined scope when disconnected.
    pub fn resolve_scope(&self, context: &ConnectionContext) -> ScopeId {
        self.resolver.resolve(context)
    }

    /// Store for the scope of `context`, opened on first use.
    pub fn current_store(&self, context: &ConnectionContext) -> Arc<ScopeStore> {
        let scope = self.resolve_scope(context);
        self.stores.open(&scope)
    }

    /// Whether `identity` is forbidden in `scope`.
    pub fn is_forbidden(&self, identity: &ItemIdentity, scope: &ScopeId) -> bool {
        self.stores.open(scope).is_forbidden(identity)
    }

    /// Flip `identity` in `scope`. Returns the new state.
    pub fn toggle(&self, identity: &ItemIdentity, scope: &ScopeId) -> bool {
        self.stores.open(scope).toggle(identity)
    }

    /// Whether the held stack is forbidden in `scope`.
    ///
    /// Unidentifiable stacks are never forbidden.
    pub fn is_item_forbidden(&self, item: &ItemSnapshot, scope: &ScopeId) -> bool {
        match ItemIdentity::from_snapshot(item) {
            Ok(identity) => self.is_forbidden(&identity, scope),
            Err(err) => {
                warn!("Treating unidentifiable item as allowed: {err}");
                false
            }
        }
    }

    /// Whether chat feedback is enabled.
    pub fn show_messages(&self) -> bool {
        self.settings.show_messages()
    }

    /// Flip chat feedback. Returns the new value and a confirmation message.
    pub fn toggle_show_messages(&self) -> (bool, ChatMessage) {
        let show = self.settings.toggle_messages();
        let message = if show {
            ChatMessage::new(Tone::Success, "ForbiddenBlocks messages enabled")
        } else {
            ChatMessage::new(Tone::Warning, "ForbiddenBlocks messages disabled")
        };
        (show, message)
    }

    fn feedback(&self, tone: Tone, text: String) -> Option<ChatMessage> {
        self.settings
            .show_messages()
            .then(|| ChatMessage::new(tone, text))
    }
}

impl InteractionDecider for ForbiddenBlocks {
    fn on_interact_attempt(
        &self,
        item: &ItemSnapshot,
        context: &ConnectionContext,
        hand: Hand,
        target: &InteractionTarget,
    ) -> InteractionOutcome {
        if item.is_empty() {
            return InteractionOutcome::allowed(None);
        }
        let identity = match ItemIdentity::from_snapshot(item) {
            Ok(identity) => identity,
            Err(err) => {
                warn!("Could not identify held item, allowing interaction: {err}");
                return InteractionOutcome::allowed(None);
            }
        };

        let scope = self.resolve_scope(context);
        if !self.is_forbidden(&identity, &scope) {
            return InteractionOutcome::allowed(Some(identity));
        }

        let name = identity.name().to_string();
        if self.settings.interaction_policy().permits(hand, target) {
            info!("Allowing forbidden item '{name}' on {target:?} with {hand:?} hand");
            return InteractionOutcome {
                forbidden: true,
                bypassed: true,
                identity: Some(identity),
                message: None,
            };
        }

        info!(
            "Blocked forbidden item '{name}' ({}) on {target:?} with {hand:?} hand in {scope}",
            identity.registry_id()
        );
        let text = match target {
            InteractionTarget::Block { .. } => format!("You cannot place {name}!"),
            InteractionTarget::Entity { name: entity, .. } => {
                format!("Action with {name} on {entity} is blocked!")
            }
        };
        InteractionOutcome {
            forbidden: true,
            bypassed: false,
            identity: Some(identity),
            message: self.feedback(Tone::Error, text),
        }
    }

    fn on_toggle_request(&self, item: &ItemSnapshot, context: &ConnectionContext) -> ToggleOutcome {
        if item.is_empty() {
            return ToggleOutcome {
                now_forbidden: false,
                identity: None,
                message: Some(ChatMessage::new(
                    Tone::Error,
                    "You must hold an item to forbid/allow it.",
                )),
            };
        }
        let identity = match ItemIdentity::from_snapshot(item) {
            Ok(identity) => identity,
            Err(err) => {
                warn!("Could not identify item to toggle: {err}");
                return ToggleOutcome {
                    now_forbidden: false,
                    identity: None,
                    message: Some(ChatMessage::new(
                        Tone::Error,
                        format!("Could not identify the item: {}", item.display_name),
                    )),
                };
            }
        };

        let store = self.current_store(context);
        store.toggle(&identity);
        let now_forbidden = store.is_forbidden(&identity);

        let message = if now_forbidden {
            self.feedback(
                Tone::Warning,
                format!("{} is now forbidden to place.", identity.name()),
            )
        } else {
            self.feedback(
                Tone::Success,
                format!("{} is now allowed again.", identity.name()),
            )
        };
        ToggleOutcome {
            now_forbidden,
            identity: Some(identity),
            message,
        }
    }

    fn on_connection_change(&self, change: &ConnectionChange) {
        match change {
            ConnectionChange::Joined(context) => {
                let scope = self.resolver.connected(context);
                match self.stores.get(&scope) {
                    Some(store) => store.reload(),
                    None => {
                        self.stores.open(&scope);
                    }
                }
            }
            ConnectionChange::Left => {
                self.resolver.disconnected();
                let failures = self.stores.flush_all();
                if failures > 0 {
                    warn!("{failures} scope stores could not be saved on disconnect");
                }
            }
        }
    }

    fn on_shutdown(&self) {
        info!("Client shutting down, saving forbidden lists");
        let failures = self.stores.shutdown();
        if failures > 0 {
            warn!("{failures} scope stores could not be saved on shutdown");
        }
    }
}
