#![warn(missing_docs)]
//! Item identity and scope primitives shared across the workspace.

pub mod components;
pub mod identity;
pub mod item;
pub mod registry;
pub mod scope;

pub use components::{normalize, ComponentData, ComponentSlot, ComponentValue, Normalized, RegistryRef};
pub use identity::{components_digest, IdentityError, ItemIdentity};
pub use item::ItemSnapshot;
pub use registry::{RegistryKey, RegistryKeyError, DEFAULT_NAMESPACE};
pub use scope::{sanitize_file_name, ConnectionContext, ScopeId, ScopeResolver, WORLDS_DIR};
