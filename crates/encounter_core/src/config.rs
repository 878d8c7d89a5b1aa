//! Runtime settings for the encounter pipeline.
//!
//! Settings are built once at startup, either from a file or from defaults,
//! and then passed by reference into every component that needs them.
//!
//! # Example JSON
//!
//! ```json
//! {
//!   "ExtendedLances": {
//!     "Autofill": true,
//!     "LanceSizes": {
//!       "6": [ { "Faction": "Locust", "DifficultyMod": 2 } ]
//!     }
//!   }
//! }
//! ```

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{EncounterError, Result};

/// Lance size used when no bucket lists a faction.
pub const DEFAULT_LANCE_SIZE: u32 = 4;

/// Inner radius of the spawn sampling annulus.
pub const DEFAULT_INNER_RADIUS: f32 = 24.0;

/// Outer radius of the spawn sampling annulus.
pub const DEFAULT_OUTER_RADIUS: f32 = 100.0;

/// Resample bound before a colliding candidate is accepted anyway.
pub const DEFAULT_MAX_PLACEMENT_ATTEMPTS: u32 = 20;

/// Ground distance under which two spawn points are considered colliding.
pub const DEFAULT_MIN_SPAWN_SEPARATION: f32 = 24.0;

/// Centre-to-corner size of a placement grid cell.
pub const DEFAULT_HEX_SIZE: f32 = 12.0;

/// Top-level settings document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Settings {
    /// Lance size and difficulty scaling per faction.
    pub extended_lances: ExtendedLancesSettings,
    /// Spawn point placement tuning.
    pub spawn_placement: SpawnPlacementSettings,
    /// Dynamic withdraw (escape chunk) batch.
    pub dynamic_withdraw: DynamicWithdrawSettings,
}

/// Per-faction lance sizing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ExtendedLancesSettings {
    /// Whether the lance augmentation step runs at all.
    pub enable: bool,
    /// Whether under-populated lances are filled up to the faction size.
    pub autofill: bool,
    /// Target size used for factions missing from every bucket.
    pub default_lance_size: u32,
    /// Buckets keyed by lance size.
    pub lance_sizes: BTreeMap<u32, Vec<ExtendedLance>>,
}

impl Default for ExtendedLancesSettings {
    fn default() -> Self {
        Self {
            enable: true,
            autofill: true,
            default_lance_size: DEFAULT_LANCE_SIZE,
            lance_sizes: BTreeMap::new(),
        }
    }
}

/// One faction entry inside a lance-size bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExtendedLance {
    /// Faction key, compared verbatim.
    pub faction: String,
    /// Added to a lance's difficulty adjustment.
    #[serde(default)]
    pub difficulty_mod: i32,
}

impl ExtendedLance {
    /// Create a bucket entry.
    #[must_use]
    pub fn new(faction: impl Into<String>, difficulty_mod: i32) -> Self {
        Self {
            faction: faction.into(),
            difficulty_mod,
        }
    }
}

/// Spawn point placement tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SpawnPlacementSettings {
    /// Minimum offset from the anchor spawn point.
    pub inner_radius: f32,
    /// Maximum offset from the anchor spawn point.
    pub outer_radius: f32,
    /// Resamples allowed before a colliding candidate is accepted.
    pub max_placement_attempts: u32,
    /// Candidates closer than this to any spawn point are resampled.
    pub min_spawn_separation: f32,
    /// Placement grid cell size.
    pub hex_size: f32,
}

impl Default for SpawnPlacementSettings {
    fn default() -> Self {
        Self {
            inner_radius: DEFAULT_INNER_RADIUS,
            outer_radius: DEFAULT_OUTER_RADIUS,
            max_placement_attempts: DEFAULT_MAX_PLACEMENT_ATTEMPTS,
            min_spawn_separation: DEFAULT_MIN_SPAWN_SEPARATION,
            hex_size: DEFAULT_HEX_SIZE,
        }
    }
}

/// Dynamic withdraw batch settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DynamicWithdrawSettings {
    /// Add an escape chunk to encounters that lack one.
    pub enable: bool,
}

impl Settings {
    /// Load settings from a `.json` or `.ron` file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let label = path.display().to_string();
        let contents = std::fs::read_to_string(path).map_err(|source| EncounterError::Io {
            path: label.clone(),
            source,
        })?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&contents, &label),
            Some("ron") => Self::from_ron_str(&contents, &label),
            other => Err(EncounterError::UnsupportedFormat(
                other.unwrap_or_default().to_string(),
            )),
        }
    }

    /// Parse settings from a JSON string.
    pub fn from_json_str(json: &str, label: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|source| EncounterError::JsonParse {
            path: label.to_string(),
            source,
        })
    }

    /// Parse settings from a RON string.
    pub fn from_ron_str(ron: &str, label: &str) -> Result<Self> {
        ron::from_str(ron).map_err(|source| EncounterError::RonParse {
            path: label.to_string(),
            source,
        })
    }

    /// Load settings, falling back to defaults on any failure.
    ///
    /// This is the startup entry point. A broken settings file must never
    /// stop encounters from being built.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        tracing::info!("Loading settings from {}", path.display());
        match Self::load(path) {
            Ok(settings) => {
                for problem in settings.validate() {
                    tracing::warn!("Settings problem: {problem}");
                }
                settings
            }
            Err(e) => {
                tracing::error!("{e}");
                tracing::info!("Error loading settings - using defaults");
                Self::default()
            }
        }
    }

    /// Check internal consistency.
    ///
    /// Problems are reported, not rejected; the pipeline tolerates all of them.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        let placement = &self.spawn_placement;

        if placement.inner_radius < 0.0 || placement.outer_radius < 0.0 {
            problems.push("spawn placement radii must not be negative".to_string());
        }
        if placement.inner_radius > placement.outer_radius {
            problems.push(format!(
                "spawn placement inner radius {} exceeds outer radius {}",
                placement.inner_radius, placement.outer_radius
            ));
        }
        if placement.hex_size < 0.0 {
            problems.push("hex size must not be negative".to_string());
        }

        let mut seen = HashSet::new();
        for (size, factions) in &self.extended_lances.lance_sizes {
            if *size == 0 {
                problems.push("lance size bucket 0 is never a valid target size".to_string());
            }
            for entry in factions {
                if !seen.insert(entry.faction.as_str()) {
                    problems.push(format!(
                        "faction '{}' appears in more than one lance size bucket; the smallest wins",
                        entry.faction
                    ));
                }
            }
        }

        problems
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert!(settings.extended_lances.enable);
        assert!(settings.extended_lances.autofill);
        assert_eq!(settings.extended_lances.default_lance_size, 4);
        assert_eq!(settings.spawn_placement.max_placement_attempts, 20);
        assert_eq!(settings.spawn_placement.inner_radius, 24.0);
        assert_eq!(settings.spawn_placement.outer_radius, 100.0);
        assert!(!settings.dynamic_withdraw.enable);
        assert!(settings.validate().is_empty());
    }

    #[test]
    fn test_parse_json_buckets() {
        let json = r#"{
            "ExtendedLances": {
                "Autofill": false,
                "LanceSizes": {
                    "5": [ { "Faction": "ClanJadeFalcon", "DifficultyMod": 1 } ],
                    "6": [ { "Faction": "Locust", "DifficultyMod": 2 }, { "Faction": "Kurita" } ]
                }
            }
        }"#;
        let settings = Settings::from_json_str(json, "inline").unwrap();
        let lances = &settings.extended_lances;
        assert!(lances.enable);
        assert!(!lances.autofill);
        assert_eq!(lances.lance_sizes.len(), 2);
        assert_eq!(lances.lance_sizes[&6][0], ExtendedLance::new("Locust", 2));
        assert_eq!(lances.lance_sizes[&6][1].difficulty_mod, 0);
    }

    #[test]
    fn test_parse_ron() {
        let ron = r#"(
            ExtendedLances: (
                Autofill: true,
                LanceSizes: { 6: [ (Faction: "Locust", DifficultyMod: 2) ] },
            ),
            SpawnPlacement: ( MaxPlacementAttempts: 5 ),
        )"#;
        let settings = Settings::from_ron_str(ron, "inline").unwrap();
        assert_eq!(settings.spawn_placement.max_placement_attempts, 5);
        assert_eq!(settings.spawn_placement.outer_radius, 100.0);
        assert_eq!(
            settings.extended_lances.lance_sizes[&6],
            vec![ExtendedLance::new("Locust", 2)]
        );
    }

    #[test]
    fn test_non_numeric_bucket_is_parse_error() {
        let json = r#"{ "ExtendedLances": { "LanceSizes": { "six": [] } } }"#;
        assert!(matches!(
            Settings::from_json_str(json, "inline"),
            Err(EncounterError::JsonParse { .. })
        ));
    }

    #[test]
    fn test_validate_reports_problems() {
        let mut settings = Settings::default();
        settings.spawn_placement.inner_radius = 200.0;
        settings
            .extended_lances
            .lance_sizes
            .insert(5, vec![ExtendedLance::new("Locust", 1)]);
        settings
            .extended_lances
            .lance_sizes
            .insert(6, vec![ExtendedLance::new("Locust", 2)]);

        let problems = settings.validate();
        assert_eq!(problems.len(), 2);
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let settings = Settings::load_or_default("/definitely/not/here/settings.json");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_load_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.yaml");
        std::fs::write(&path, "autofill: true").unwrap();
        assert!(matches!(
            Settings::load(&path),
            Err(EncounterError::UnsupportedFormat(ext)) if ext == "yaml"
        ));
    }

    #[test]
    fn test_load_malformed_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(Settings::load(&path).is_err());
        assert_eq!(Settings::load_or_default(&path), Settings::default());
    }
}
