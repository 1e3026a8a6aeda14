//! Persistent user preferences for the scroll settings.
//!
//! The engine only holds an in-memory copy of the user-adjustable settings
//! and reports changes through `EngineEvent::ConfigChanged`. A
//! [`PreferenceStore`] keeps them between sessions, keyed by name.

use crate::{
    config::{ScrollConfig, SettingsAdjustConfig},
    Error, Result,
};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

/// Key for the scroll on/off switch
pub const KEY_SCROLL_ENABLED: &str = "is_scroll_enabled";
/// Key for the scroll direction
pub const KEY_SCROLL_INVERTED: &str = "is_scroll_inverted";
/// Key for the dead zone (degrees)
pub const KEY_DEAD_ZONE: &str = "dead_zone_deg";
/// Key for the maximum scroll speed
pub const KEY_MAX_SPEED: &str = "max_speed";

/// A stored preference value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PreferenceValue {
    Bool(bool),
    Number(f64),
}

impl PreferenceValue {
    /// Value as a bool, if it is one
    #[must_use]
    pub const fn as_bool(self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(b),
            Self::Number(_) => None,
        }
    }

    /// Value as a finite number, if it is one
    #[must_use]
    pub fn as_number(self) -> Option<f64> {
        match self {
            Self::Number(n) if n.is_finite() => Some(n),
            _ => None,
        }
    }
}

/// Key-value store for preferences
pub trait PreferenceStore {
    /// Read a value
    fn get(&self, key: &str) -> Option<PreferenceValue>;

    /// Write a value
    fn set(&mut self, key: &str, value: PreferenceValue) -> Result<()>;
}

/// Preferences kept in memory only
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, PreferenceValue>,
}

impl MemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<PreferenceValue> {
        self.values.get(key).copied()
    }

    fn set(&mut self, key: &str, value: PreferenceValue) -> Result<()> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

/// Preferences persisted to a YAML file, rewritten on every change
#[derive(Debug, Clone)]
pub struct YamlFileStore {
    path: PathBuf,
    values: BTreeMap<String, PreferenceValue>,
}

impl YamlFileStore {
    /// Open a store, starting empty if the file does not exist yet
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let values = if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| Error::IoError(e.to_string()))?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_yaml::from_str(&content)
                    .map_err(|e| Error::PreferenceError(format!("Failed to parse {}: {e}", path.display())))?
            }
        } else {
            debug!("Preference file {} not found, starting empty", path.display());
            BTreeMap::new()
        };
        Ok(Self { path, values })
    }

    /// Backing file path
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<()> {
        std::fs::write(&self.path, serde_yaml::to_string(&self.values)?)?;
        Ok(())
    }
}

impl PreferenceStore for YamlFileStore {
    fn get(&self, key: &str) -> Option<PreferenceValue> {
        self.values.get(key).copied()
    }

    fn set(&mut self, key: &str, value: PreferenceValue) -> Result<()> {
        if self.values.get(key) == Some(&value) {
            return Ok(());
        }
        self.values.insert(key.to_string(), value);
        self.flush()
    }
}

/// Read scroll settings, falling back to `defaults` for missing or malformed keys
///
/// Stored numbers outside the valid ranges are clamped.
pub fn load_scroll_preferences(
    store: &dyn PreferenceStore,
    defaults: ScrollConfig,
    bounds: &SettingsAdjustConfig,
) -> ScrollConfig {
    let bool_or = |key: &str, default: bool| match store.get(key) {
        Some(value) => value.as_bool().unwrap_or_else(|| {
            warn!("Ignoring non-boolean preference {key}");
            default
        }),
        None => default,
    };
    let number_or = |key: &str, default: f64| match store.get(key) {
        Some(value) => value.as_number().unwrap_or_else(|| {
            warn!("Ignoring non-numeric preference {key}");
            default
        }),
        None => default,
    };

    ScrollConfig {
        enabled: bool_or(KEY_SCROLL_ENABLED, defaults.enabled),
        inverted: bool_or(KEY_SCROLL_INVERTED, defaults.inverted),
        dead_zone_deg: bounds.clamp_dead_zone(number_or(KEY_DEAD_ZONE, defaults.dead_zone_deg)),
        max_speed: bounds.clamp_max_speed(number_or(KEY_MAX_SPEED, defaults.max_speed)),
        max_angle_deg: defaults.max_angle_deg,
    }
}

/// Write the user-adjustable scroll settings
pub fn save_scroll_preferences(store: &mut dyn PreferenceStore, scroll: &ScrollConfig) -> Result<()> {
    store.set(KEY_SCROLL_ENABLED, PreferenceValue::Bool(scroll.enabled))?;
    store.set(KEY_SCROLL_INVERTED, PreferenceValue::Bool(scroll.inverted))?;
    store.set(KEY_DEAD_ZONE, PreferenceValue::Number(scroll.dead_zone_deg))?;
    store.set(KEY_MAX_SPEED, PreferenceValue::Number(scroll.max_speed))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_store_yields_defaults() {
        let store = MemoryStore::new();
        let loaded = load_scroll_preferences(&store, ScrollConfig::default(), &SettingsAdjustConfig::default());
        assert_eq!(loaded, ScrollConfig::default());
    }

    #[test]
    fn test_save_then_load() {
        let mut store = MemoryStore::new();
        let scroll = ScrollConfig {
            dead_zone_deg: 5.0,
            max_speed: 2000.0,
            inverted: true,
            enabled: false,
            ..ScrollConfig::default()
        };
        save_scroll_preferences(&mut store, &scroll).unwrap();
        let loaded = load_scroll_preferences(&store, ScrollConfig::default(), &SettingsAdjustConfig::default());
        assert_eq!(loaded, scroll);
    }

    #[test]
    fn test_out_of_range_and_wrong_types() {
        let mut store = MemoryStore::new();
        store.set(KEY_DEAD_ZONE, PreferenceValue::Number(40.0)).unwrap();
        store.set(KEY_MAX_SPEED, PreferenceValue::Bool(true)).unwrap();
        store.set(KEY_SCROLL_ENABLED, PreferenceValue::Number(1.0)).unwrap();

        let loaded = load_scroll_preferences(&store, ScrollConfig::default(), &SettingsAdjustConfig::default());
        assert_eq!(loaded.dead_zone_deg, 10.0);
        assert_eq!(loaded.max_speed, ScrollConfig::default().max_speed);
        assert!(loaded.enabled);
    }

    #[test]
    fn test_untagged_yaml_values() {
        let parsed: BTreeMap<String, PreferenceValue> =
            serde_yaml::from_str("is_scroll_enabled: false\ndead_zone_deg: 4.5\n").unwrap();
        assert_eq!(parsed[KEY_SCROLL_ENABLED], PreferenceValue::Bool(false));
        assert_eq!(parsed[KEY_DEAD_ZONE], PreferenceValue::Number(4.5));
    }
}
