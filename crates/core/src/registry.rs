//! Namespaced registry keys.
//!
//! Every item type and every data component type the game knows about is
//! registered under a `namespace:path` key such as `minecraft:dirt` or
//! `minecraft:enchantments`. Keys order lexically so component maps built
//! from them serialize in a stable order.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Namespace assumed when a key is written without one.
pub const DEFAULT_NAMESPACE: &str = "minecraft";

/// Error returned when parsing an invalid [`RegistryKey`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid registry key {input:?}: {reason}")]
pub struct RegistryKeyError {
    input: String,
    reason: &'static str,
}

impl RegistryKeyError {
    fn new(input: &str, reason: &'static str) -> Self {
        Self {
            input: input.to_string(),
            reason,
        }
    }

    /// Why the key was rejected.
    pub fn reason(&self) -> &'static str {
        self.reason
    }
}

/// A namespaced key of the form `namespace:path`.
///
/// Ordering is lexical by `(namespace, path)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RegistryKey {
    namespace: String,
    path: String,
}

impl RegistryKey {
    /// Parse a registry key.
    ///
    /// Accepts `namespace:path`, or a bare `path` in [`DEFAULT_NAMESPACE`].
    pub fn parse(input: &str) -> Result<Self, RegistryKeyError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(RegistryKeyError::new(input, "key is empty"));
        }

        let (namespace, path) = trimmed
            .split_once(':')
            .unwrap_or((DEFAULT_NAMESPACE, trimmed));
        Self::new(namespace, path).map_err(|err| RegistryKeyError::new(input, err.reason))
    }

    /// Build a key from its two halves, validating both.
    pub fn new(namespace: &str, path: &str) -> Result<Self, RegistryKeyError> {
        if namespace.is_empty() {
            return Err(RegistryKeyError::new(namespace, "namespace is empty"));
        }
        if !namespace
            .chars()
            .all(|c| matches!(c, 'a'..='z' | '0'..='9' | '_' | '-' | '.'))
        {
            return Err(RegistryKeyError::new(
                namespace,
                "namespace allows only a-z0-9_.-",
            ));
        }
        if path.is_empty() {
            return Err(RegistryKeyError::new(path, "path is empty"));
        }
        if !path
            .chars()
            .all(|c| matches!(c, 'a'..='z' | '0'..='9' | '_' | '-' | '.' | '/'))
        {
            return Err(RegistryKeyError::new(path, "path allows only a-z0-9_./-"));
        }

        Ok(Self {
            namespace: namespace.to_string(),
            path: path.to_string(),
        })
    }

    /// Shorthand for a key in [`DEFAULT_NAMESPACE`].
    pub fn minecraft(path: &str) -> Result<Self, RegistryKeyError> {
        Self::new(DEFAULT_NAMESPACE, path)
    }

    /// Registry key namespace.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Registry key path.
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for RegistryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

impl FromStr for RegistryKey {
    type Err = RegistryKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for RegistryKey {
    type Error = RegistryKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RegistryKey> for String {
    fn from(key: RegistryKey) -> Self {
        key.to_string()
    }
}
