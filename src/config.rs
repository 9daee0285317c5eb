//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/flavorwheel/flavorwheel.toml`
//! 3. Local config: `<dataset_dir>/.flavorwheel.toml`
//! 4. Environment variables: `FLAVORWHEEL_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::chart::{ChartOptions, DEFAULT_CHART_RADIUS};
use crate::application::completion::RequiredCategories;
use crate::application::navigator::DEFAULT_TRANSITION_MS;
use crate::application::ApplicationError;
use crate::domain::{expand_env_vars, BranchNames};
use crate::infrastructure::persistence::StorageKeys;

/// Name of the dataset-local config file.
pub const LOCAL_CONFIG_FILE: &str = ".flavorwheel.toml";

/// Raw storage keys for intermediate parsing (None → inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawStorageKeys {
    pub aroma: Option<String>,
    pub flavor: Option<String>,
    pub color: Option<String>,
    pub progress: Option<String>,
}

/// Raw required categories (arrays are Option to detect "not specified").
///
/// Used during layered config merging to distinguish between:
/// - `None` → field not specified, inherit from base
/// - `Some([])` → explicit empty array
/// - `Some([...])` → explicit values to merge
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawRequiredCategories {
    pub basic: Option<Vec<String>>,
    pub extra: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawBranchNames {
    pub aroma: Option<String>,
    pub taste: Option<String>,
    pub color: Option<String>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub data_source: Option<PathBuf>,
    pub store_path: Option<PathBuf>,
    pub transition_ms: Option<f64>,
    pub chart_radius: Option<f64>,
    pub storage_keys: RawStorageKeys,
    pub required_categories: RawRequiredCategories,
    pub branch_names: RawBranchNames,
}

/// Merge arrays with union semantics and negation support.
///
/// - Items from overlay are appended to base (order kept, no duplicates)
/// - Items prefixed with `!` remove the corresponding item from the result
///
/// # Examples
/// ```ignore
/// merge_array(&["a", "b"], &["c"])       // → ["a", "b", "c"]
/// merge_array(&["a", "b"], &["!a", "c"]) // → ["b", "c"]
/// ```
pub fn merge_array(base: &[String], overlay: &[String]) -> Vec<String> {
    let mut result: Vec<String> = base.to_vec();

    for pattern in overlay {
        if let Some(negated) = pattern.strip_prefix('!') {
            result.retain(|item| item != negated);
        } else if !result.contains(pattern) {
            result.push(pattern.clone());
        }
    }

    result
}

/// Unified configuration for one flavor wheel dataset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Tree document (relative paths resolve against the dataset directory)
    pub data_source: PathBuf,
    /// JSON file backing the key-value store
    pub store_path: PathBuf,
    /// Focus transition duration in milliseconds
    pub transition_ms: f64,
    /// Ring width in chart units
    pub chart_radius: f64,
    pub storage_keys: StorageKeys,
    pub required_categories: RequiredCategories,
    pub branch_names: BranchNames,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_source: PathBuf::from("data/japanese-tea.json"),
            store_path: default_store_path(),
            transition_ms: DEFAULT_TRANSITION_MS,
            chart_radius: DEFAULT_CHART_RADIUS,
            storage_keys: StorageKeys::default(),
            required_categories: RequiredCategories::default(),
            branch_names: BranchNames::default(),
        }
    }
}

/// Get the default store file (XDG data dir, else ~/.flavorwheel).
fn default_store_path() -> PathBuf {
    ProjectDirs::from("", "", "flavorwheel")
        .map(|dirs| dirs.data_dir().join("store.json"))
        .unwrap_or_else(|| PathBuf::from("~/.flavorwheel/store.json"))
}

/// Get the XDG config directory for flavorwheel.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "flavorwheel").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("flavorwheel.toml"))
}

/// Get the path to the local config file in a dataset directory.
pub fn local_config_path(dataset_dir: &Path) -> PathBuf {
    dataset_dir.join(LOCAL_CONFIG_FILE)
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Construction configuration for a chart.
    pub fn chart_options(&self) -> ChartOptions {
        ChartOptions {
            storage_keys: self.storage_keys.clone(),
            required_categories: self.required_categories.clone(),
            branch_names: self.branch_names.clone(),
            transition_ms: self.transition_ms,
            chart_radius: self.chart_radius,
        }
    }

    /// Expand shell variables and tilde in path-like fields.
    ///
    /// Handles `~`, `$VAR`, and `${VAR}` syntax.
    fn expand_paths(&mut self) {
        self.data_source = PathBuf::from(expand_env_vars(&self.data_source.to_string_lossy()));
        self.store_path = PathBuf::from(expand_env_vars(&self.store_path.to_string_lossy()));
    }

    /// Anchor relative paths at the dataset directory.
    fn resolve_paths(&mut self, dataset_dir: &Path) {
        if self.data_source.is_relative() {
            self.data_source = dataset_dir.join(&self.data_source);
        }
        if self.store_path.is_relative() {
            self.store_path = dataset_dir.join(&self.store_path);
        }
    }

    /// Merge overlay config onto self (base) with union semantics for arrays.
    ///
    /// - Scalar options: overlay wins if Some, otherwise keep base
    /// - Required categories: union merge with negation support
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        let merge = |base: &[String], over: &Option<Vec<String>>| {
            over.as_ref()
                .map(|o| merge_array(base, o))
                .unwrap_or_else(|| base.to_vec())
        };
        let mut merged = self.apply_scalars(overlay);
        merged.required_categories = RequiredCategories {
            basic: merge(&self.required_categories.basic, &overlay.required_categories.basic),
            extra: merge(&self.required_categories.extra, &overlay.required_categories.extra),
        };
        merged
    }

    /// Apply global config onto defaults with REPLACE semantics for arrays.
    ///
    /// Unlike `merge_with()` which uses union semantics, this method replaces
    /// arrays entirely if the global config specifies them.
    fn apply_global(&self, global: &RawSettings) -> Self {
        let mut applied = self.apply_scalars(global);
        applied.required_categories = RequiredCategories {
            basic: global
                .required_categories
                .basic
                .clone()
                .unwrap_or_else(|| self.required_categories.basic.clone()),
            extra: global
                .required_categories
                .extra
                .clone()
                .unwrap_or_else(|| self.required_categories.extra.clone()),
        };
        applied
    }

    fn apply_scalars(&self, raw: &RawSettings) -> Self {
        let keys = &raw.storage_keys;
        let names = &raw.branch_names;
        Self {
            data_source: raw
                .data_source
                .clone()
                .unwrap_or_else(|| self.data_source.clone()),
            store_path: raw
                .store_path
                .clone()
                .unwrap_or_else(|| self.store_path.clone()),
            transition_ms: raw.transition_ms.unwrap_or(self.transition_ms),
            chart_radius: raw.chart_radius.unwrap_or(self.chart_radius),
            storage_keys: StorageKeys {
                aroma: keys.aroma.clone().unwrap_or_else(|| self.storage_keys.aroma.clone()),
                flavor: keys.flavor.clone().unwrap_or_else(|| self.storage_keys.flavor.clone()),
                color: keys.color.clone().unwrap_or_else(|| self.storage_keys.color.clone()),
                progress: keys.progress.clone().or_else(|| self.storage_keys.progress.clone()),
            },
            required_categories: self.required_categories.clone(),
            branch_names: BranchNames {
                aroma: names.aroma.clone().unwrap_or_else(|| self.branch_names.aroma.clone()),
                taste: names.taste.clone().unwrap_or_else(|| self.branch_names.taste.clone()),
                color: names.color.clone().unwrap_or_else(|| self.branch_names.color.clone()),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `dataset_dir` - Optional dataset directory for local config and relative paths
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config: `$XDG_CONFIG_HOME/flavorwheel/flavorwheel.toml` (arrays REPLACE defaults)
    /// 3. Local config: `<dataset_dir>/.flavorwheel.toml` (arrays UNION with global)
    /// 4. Environment variables: `FLAVORWHEEL_*` prefix (REPLACES - explicit override)
    pub fn load(dataset_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Load global config (REPLACES defaults)
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.apply_global(&raw);
            }
        }

        // 3. Load and merge dataset config (UNION with global)
        if let Some(dir) = dataset_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 4. Apply environment variables (replaces - explicit override)
        current = Self::apply_env_overrides(current)?;

        current.expand_paths();
        if let Some(dir) = dataset_dir {
            current.resolve_paths(dir);
        }

        Ok(current)
    }

    /// Apply FLAVORWHEEL_* environment variables as explicit overrides.
    ///
    /// Nested keys use `__`, lists use `,`:
    /// `FLAVORWHEEL_REQUIRED_CATEGORIES__BASIC=Sourness,Umami`.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let builder = Config::builder().add_source(
            Environment::with_prefix("FLAVORWHEEL")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("required_categories.basic")
                .with_list_parse_key("required_categories.extra"),
        );

        let config = builder.build().map_err(config_err)?;

        if let Ok(val) = config.get_string("data_source") {
            settings.data_source = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("store_path") {
            settings.store_path = PathBuf::from(val);
        }
        if let Ok(val) = config.get_float("transition_ms") {
            settings.transition_ms = val;
        }
        if let Ok(val) = config.get_float("chart_radius") {
            settings.chart_radius = val;
        }
        if let Ok(val) = config.get_string("storage_keys.aroma") {
            settings.storage_keys.aroma = val;
        }
        if let Ok(val) = config.get_string("storage_keys.flavor") {
            settings.storage_keys.flavor = val;
        }
        if let Ok(val) = config.get_string("storage_keys.color") {
            settings.storage_keys.color = val;
        }
        if let Ok(val) = config.get_string("storage_keys.progress") {
            settings.storage_keys.progress = Some(val);
        }
        if let Ok(val) = config.get::<Vec<String>>("required_categories.basic") {
            settings.required_categories.basic = val;
        }
        if let Ok(val) = config.get::<Vec<String>>("required_categories.extra") {
            settings.required_categories.extra = val;
        }
        if let Ok(val) = config.get_string("branch_names.aroma") {
            settings.branch_names.aroma = val;
        }
        if let Ok(val) = config.get_string("branch_names.taste") {
            settings.branch_names.taste = val;
        }
        if let Ok(val) = config.get_string("branch_names.color") {
            settings.branch_names.color = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# flavorwheel configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/flavorwheel/flavorwheel.toml  (defines your baseline)
#   Local:  <dataset_dir>/.flavorwheel.toml          (dataset-specific settings)
#   Env:    FLAVORWHEEL_* environment variables      (explicit overrides)
#
# Array Merge Semantics:
#   Global config REPLACES compiled defaults.
#   Local config UNIONS with global.
#   Use "!name" in local config to REMOVE an inherited item:
#     extra = ["Body", "!Purity"]  # adds Body, removes Purity

# Tree document, relative to the dataset directory
# data_source = "data/japanese-tea.json"

# Key-value store file shared by all datasets
# store_path = "~/.local/share/flavorwheel/store.json"

# Focus transition duration (ms) and ring width (chart units)
# transition_ms = 550
# chart_radius = 100

[storage_keys]
# Distinct keys let several datasets share one store
# aroma = "Aroma Japan"
# flavor = "Flavors Japan"
# color = "Color Japan"
# progress = "progress Japan"

[required_categories]
# basic = ["Sourness", "Saltiness", "Sweetness", "Bitterness", "Umami"]
# extra = ["Astringency", "Aftertaste", "Fullness", "Smoothness", "Fineness", "Purity"]

[branch_names]
# Names of the root's children that carry each rule set
# aroma = "Aroma"
# taste = "Taste"
# color = "Color"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
