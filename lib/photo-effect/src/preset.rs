//! Named parameter sets persisted as one pretty-printed JSON object.

use crate::{ParameterSet, PhotoEffectError, PhotoEffectResult};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fs, io::Write, path::Path};

pub const BASE_PRESET: &str = "base";
pub const TEMPLATE_PRESET: &str = "template";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PresetStore {
    presets: BTreeMap<String, ParameterSet>,
}

impl PresetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the store from `path`. A missing or unreadable file is an empty store.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                log::debug!("no preset file at {}: {e}", path.display());
                return Self::default();
            }
        };

        match serde_json::from_str::<PresetStore>(&text) {
            Ok(store) => {
                log::debug!("loaded {} presets from {}", store.len(), path.display());
                store
            }
            Err(e) => {
                log::warn!("ignore corrupt preset file {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Rewrite the whole store at `path`. The file is replaced atomically.
    pub fn save(&self, path: impl AsRef<Path>) -> PhotoEffectResult<()> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let text = serde_json::to_string_pretty(self)?;
        let mut file = tempfile::NamedTempFile::new_in(dir)?;
        file.write_all(text.as_bytes())?;
        file.write_all(b"\n")?;
        file.persist(path).map_err(|e| PhotoEffectError::Io(e.error))?;

        log::debug!("saved {} presets to {}", self.len(), path.display());
        Ok(())
    }

    /// Insert `base` and `template` if they are missing and persist when
    /// anything was added. Returns whether the store changed.
    pub fn ensure_defaults(&mut self, path: impl AsRef<Path>) -> PhotoEffectResult<bool> {
        let mut changed = false;

        for name in [BASE_PRESET, TEMPLATE_PRESET] {
            if !self.presets.contains_key(name) {
                self.presets.insert(name.to_string(), ParameterSet::base());
                changed = true;
            }
        }

        if changed {
            self.save(path)?;
            log::info!("seeded default presets");
        }

        Ok(changed)
    }

    /// The named preset, or the base preset when `name` is unknown.
    pub fn resolve(&self, name: &str) -> ParameterSet {
        self.presets
            .get(name)
            .or_else(|| self.presets.get(BASE_PRESET))
            .cloned()
            .unwrap_or_default()
    }

    pub fn get(&self, name: &str) -> Option<&ParameterSet> {
        self.presets.get(name)
    }

    /// Store `params` under `name`, replacing any previous entry.
    pub fn insert(&mut self, name: &str, params: ParameterSet) -> PhotoEffectResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PhotoEffectError::InvalidParameter(
                "preset name is empty".to_string(),
            ));
        }

        self.presets.insert(name.to_string(), params);
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> PhotoEffectResult<Option<ParameterSet>> {
        if name == BASE_PRESET {
            return Err(PhotoEffectError::InvalidParameter(
                "the base preset can't be removed".to_string(),
            ));
        }

        Ok(self.presets.remove(name))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.presets.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}
