//! Selection persistence over a key-value store.
//!
//! Layout under the configured keys (all values are JSON text):
//! - aroma: `["Wheel/Aroma/Floral/Jasmine", ...]`
//! - flavor: `[["Sourness", "Wheel/Taste/Sourness/Low"], ...]`
//! - color: `"Wheel/Color/Amber"`, or `null` when no color is picked
//! - progress (optional): the derived [`Progress`] record
//!
//! Loading never fails: absent or malformed values yield empty structures.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::application::completion::Progress;
use crate::application::selection::{AromaSelection, ColorSelection, FlavorSelection, SelectionModel};
use crate::domain::{Branch, SelectionPath};
use crate::infrastructure::traits::KeyValueStore;

/// Store keys of one dataset. Distinct keys let several trees share a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageKeys {
    pub aroma: String,
    pub flavor: String,
    pub color: String,
    #[serde(default)]
    pub progress: Option<String>,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            aroma: "Aroma Japan".into(),
            flavor: "Flavors Japan".into(),
            color: "Color Japan".into(),
            progress: Some("progress Japan".into()),
        }
    }
}

pub struct PersistenceAdapter {
    store: Arc<dyn KeyValueStore>,
    keys: StorageKeys,
}

impl PersistenceAdapter {
    pub fn new(store: Arc<dyn KeyValueStore>, keys: StorageKeys) -> Self {
        Self { store, keys }
    }

    pub fn keys(&self) -> &StorageKeys {
        &self.keys
    }

    /// Writes the structure that belongs to `branch`.
    pub fn save(&self, model: &SelectionModel, branch: Branch) {
        match branch {
            Branch::Aroma => self.save_aroma(model.aroma()),
            Branch::Taste => self.save_flavor(model.flavor()),
            Branch::Color => self.save_color(model.color()),
        }
    }

    pub fn save_all(&self, model: &SelectionModel) {
        for branch in Branch::ALL {
            self.save(model, branch);
        }
    }

    pub fn save_aroma(&self, aroma: &AromaSelection) {
        let list: Vec<String> = aroma.iter().map(SelectionPath::key).collect();
        self.write_json(&self.keys.aroma, &list);
    }

    pub fn save_flavor(&self, flavor: &FlavorSelection) {
        let pairs: Vec<(String, String)> = flavor
            .iter()
            .map(|(category, path)| (category.clone(), path.key()))
            .collect();
        self.write_json(&self.keys.flavor, &pairs);
    }

    pub fn save_color(&self, color: Option<&SelectionPath>) {
        self.write_json(&self.keys.color, &color.map(SelectionPath::key));
    }

    pub fn save_progress(&self, progress: &Progress) {
        if let Some(key) = &self.keys.progress {
            self.write_json(key, progress);
        }
    }

    pub fn load(&self) -> SelectionModel {
        SelectionModel::from_parts(self.load_aroma(), self.load_flavor(), self.load_color())
    }

    pub fn load_aroma(&self) -> AromaSelection {
        let Some(list) = self.read_json::<Vec<String>>(&self.keys.aroma) else {
            return AromaSelection::new();
        };
        let parsed: Result<AromaSelection, _> = list.iter().map(|k| k.parse()).collect();
        parsed.unwrap_or_else(|e| {
            warn!("discarding aroma selection under {:?}: {}", self.keys.aroma, e);
            AromaSelection::new()
        })
    }

    pub fn load_flavor(&self) -> FlavorSelection {
        let Some(pairs) = self.read_json::<Vec<(String, String)>>(&self.keys.flavor) else {
            return FlavorSelection::new();
        };
        let parsed: Result<FlavorSelection, _> = pairs
            .into_iter()
            .map(|(category, key)| key.parse::<SelectionPath>().map(|path| (category, path)))
            .collect();
        parsed.unwrap_or_else(|e| {
            warn!("discarding flavor selection under {:?}: {}", self.keys.flavor, e);
            FlavorSelection::new()
        })
    }

    /// Accepts a JSON string, JSON null, or a bare (unquoted) path.
    pub fn load_color(&self) -> ColorSelection {
        let raw = self.store.get(&self.keys.color)?;
        let key = match serde_json::from_str::<Option<String>>(&raw) {
            Ok(key) => key?,
            Err(_) => raw,
        };
        match key.parse::<SelectionPath>() {
            Ok(path) => Some(path),
            Err(e) => {
                warn!("discarding color selection under {:?}: {}", self.keys.color, e);
                None
            }
        }
    }

    pub fn load_progress(&self) -> Option<Progress> {
        let key = self.keys.progress.as_ref()?;
        self.read_json(key)
    }

    /// Clears the three selection keys and the progress key.
    pub fn reset(&self) {
        self.remove(&self.keys.aroma);
        self.remove(&self.keys.flavor);
        self.remove(&self.keys.color);
        if let Some(key) = &self.keys.progress {
            self.remove(key);
        }
        debug!("selection keys cleared");
    }

    fn read_json<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Option<T> {
        let raw = self.store.get(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("discarding malformed value under {:?}: {}", key, e);
                None
            }
        }
    }

    fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        let result = serde_json::to_string(value)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
            .and_then(|json| self.store.set(key, &json));
        if let Err(e) = result {
            warn!("failed to persist {:?}: {}", key, e);
        }
    }

    fn remove(&self, key: &str) {
        if let Err(e) = self.store.remove(key) {
            warn!("failed to remove {:?}: {}", key, e);
        }
    }
}
