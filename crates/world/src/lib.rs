#![warn(missing_docs)]
//! Per-scope persistence of forbidden item lists.

pub mod persist;
mod store;
mod stores;

pub use persist::PersistError;
pub use store::ScopeStore;
pub use forbiddenblocks_core::WORLDS_DIR;
pub use stores::WorldStores;
