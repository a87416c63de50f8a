//! Environment lookup shared by the sub-configs.

use anyhow::{Context, Result};
use std::str::FromStr;

/// Source of configuration values by key. `std::env::var` in production, a
/// map in tests.
pub trait EnvSource {
    fn get(&self, key: &str) -> Option<String>;

    /// Parses `key`, falling back to `default` when unset or blank.
    fn parse<T>(&self, key: &str, default: T) -> Result<T>
    where
        T: FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        match self.get(key) {
            Some(raw) if !raw.trim().is_empty() => raw
                .trim()
                .parse::<T>()
                .with_context(|| format!("Failed to parse {}", key)),
            _ => Ok(default),
        }
    }

    fn parse_optional<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        match self.get(key) {
            Some(raw) if !raw.trim().is_empty() => raw
                .trim()
                .parse::<T>()
                .map(Some)
                .with_context(|| format!("Failed to parse {}", key)),
            _ => Ok(None),
        }
    }

    fn string(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    /// Lenient boolean: unparsable values fall back to `default`.
    fn flag(&self, key: &str, default: bool) -> bool {
        self.get(key)
            .and_then(|raw| raw.trim().to_lowercase().parse::<bool>().ok())
            .unwrap_or(default)
    }
}

/// Process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvSource for std::collections::HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        std::collections::HashMap::get(self, key).cloned()
    }
}

#[cfg(test)]
pub(crate) fn vars(pairs: &[(&str, &str)]) -> std::collections::HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
