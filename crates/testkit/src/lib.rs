#![warn(missing_docs)]
//! Shared fixtures for forbidden-list tests: sample stacks and throwaway game directories.

mod game_dir;
mod items;

pub use game_dir::*;
pub use items::*;
