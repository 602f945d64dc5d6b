//! Mapping from the live connection to a storage scope.
//!
//! Each singleplayer world and each multiplayer server gets its own
//! forbidden list. The scope id doubles as the stem of the file that holds
//! the list, so it has to be stable across reconnects and safe to use as a
//! filename.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

const SINGLEPLAYER_PREFIX: &str = "singleplayer_";
const MULTIPLAYER_PREFIX: &str = "multiplayer_";
const UNKNOWN: &str = "unknown";

/// Directory, relative to the game directory, holding one file per scope.
pub const WORLDS_DIR: &str = "config/forbiddenblocks/worlds";

/// Identifier of one world or server scope, already safe as a file stem.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ScopeId(String);

impl ScopeId {
    /// Scope of a local world.
    pub fn singleplayer(world_name: &str) -> Self {
        Self::from_raw(format!("{SINGLEPLAYER_PREFIX}{world_name}"))
    }

    /// Scope of a remote server. `host:port` becomes `host_port`.
    pub fn multiplayer(address: &str) -> Self {
        Self::from_raw(format!("{MULTIPLAYER_PREFIX}{address}"))
    }

    /// Shared bucket used whenever nothing better can be resolved.
    pub fn unknown() -> Self {
        Self(UNKNOWN.to_string())
    }

    /// Wrap an already-built id, sanitizing it.
    pub fn from_raw(id: impl Into<String>) -> Self {
        Self(sanitize_file_name(&id.into()))
    }

    /// True for the shared fallback bucket.
    pub fn is_unknown(&self) -> bool {
        self.0 == UNKNOWN
    }

    /// The id as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Stem of the file holding this scope's list.
    pub fn file_stem(&self) -> &str {
        &self.0
    }
}

impl From<String> for ScopeId {
    fn from(id: String) -> Self {
        Self::from_raw(id)
    }
}

impl From<ScopeId> for String {
    fn from(scope: ScopeId) -> Self {
        scope.0
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Replace `\ / : * ? " < > |` and control characters with `_`.
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

/// What the client is currently connected to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionContext {
    /// Not in a world.
    Disconnected,
    /// Playing a local world.
    Singleplayer {
        /// Level name of the integrated server, if it could be read.
        world_name: Option<String>,
    },
    /// Connected to a remote server.
    Multiplayer {
        /// Address from the server list entry used to join.
        server_entry: Option<String>,
        /// Remote address of the network connection, e.g. `/10.0.0.2:25565`.
        remote_address: Option<String>,
    },
}

impl ConnectionContext {
    /// Local world by name.
    pub fn singleplayer(world_name: impl Into<String>) -> Self {
        Self::Singleplayer {
            world_name: Some(world_name.into()),
        }
    }

    /// Remote server joined from a server list entry.
    pub fn server(address: impl Into<String>) -> Self {
        Self::Multiplayer {
            server_entry: Some(address.into()),
            remote_address: None,
        }
    }

    /// True unless [`ConnectionContext::Disconnected`].
    pub fn is_connected(&self) -> bool {
        !matches!(self, Self::Disconnected)
    }

    /// Scope for a live connection, `None` when disconnected.
    pub fn scope(&self) -> Option<ScopeId> {
        match self {
            Self::Disconnected => None,
            Self::Singleplayer { world_name } => Some(ScopeId::singleplayer(
                world_name.as_deref().unwrap_or(UNKNOWN),
            )),
            Self::Multiplayer {
                server_entry,
                remote_address,
            } => {
                let address = server_entry
                    .as_deref()
                    .filter(|entry| !entry.is_empty())
                    .or_else(|| {
                        remote_address
                            .as_deref()
                            .map(|raw| raw.trim_start_matches('/'))
                            .filter(|raw| !raw.is_empty())
                    })
                    .unwrap_or(UNKNOWN);
                Some(ScopeId::multiplayer(address))
            }
        }
    }
}

/// Resolves the current scope, remembering the last one seen on connect.
///
/// Some callbacks run before the engine exposes its world or server, so a
/// scope cached from the last join is used whenever the live context is
/// empty.
#[derive(Debug, Default)]
pub struct ScopeResolver {
    cached: Mutex<Option<ScopeId>>,
}

impl ScopeResolver {
    /// Resolver with no cached scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scope for `context`, falling back to the cached scope, then `unknown`.
    pub fn resolve(&self, context: &ConnectionContext) -> ScopeId {
        if let Some(scope) = context.scope() {
            return scope;
        }
        let scope = self.cached.lock().clone().unwrap_or_else(ScopeId::unknown);
        debug!("No live connection, resolved scope {scope}");
        scope
    }

    /// Record a join. Returns the scope now in effect.
    pub fn connected(&self, context: &ConnectionContext) -> ScopeId {
        let scope = self.resolve(context);
        let previous = self.cached.lock().replace(scope.clone());
        info!(
            "Connection updated: {} -> {scope}",
            previous.as_ref().map_or(UNKNOWN, ScopeId::as_str)
        );
        scope
    }

    /// Record a disconnect, forgetting the cached scope.
    pub fn disconnected(&self) {
        if let Some(previous) = self.cached.lock().take() {
            info!("Connection closed, leaving scope {previous}");
        }
    }

    /// Scope cached from the last join, if still connected.
    pub fn cached(&self) -> Option<ScopeId> {
        self.cached.lock().clone()
    }
}
